pub mod memory;

pub use memory::PhotoSpotCache;

use serde::{Deserialize, Serialize};

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// Approximate; moka updates its entry count lazily
    pub entries: u64,
}
