//! Parsing and formatting of the provider's human-readable distance and
//! duration strings ("3.1 km", "1 hour 5 mins").
//!
//! Only English unit words are recognised. Anything unrecognised parses to 0,
//! which callers must read as "unknown", not "instant" or "here".

const KM_PER_MILE: f64 = 1.60934;
const KM_PER_FOOT: f64 = 0.0003048;

/// `(number, unit word)` pairs in order of appearance, lowercased.
/// Commas between digits are thousands separators.
fn quantities(text: &str) -> Vec<(f64, String)> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let mut number = String::new();
        while i < chars.len() {
            let c = chars[i];
            let digit_follows = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_digit() || (c == '.' && digit_follows) {
                number.push(c);
            } else if c != ',' || !digit_follows {
                break;
            }
            i += 1;
        }

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }

        let mut unit = String::new();
        while i < chars.len() && chars[i].is_alphabetic() {
            unit.push(chars[i]);
            i += 1;
        }

        if let Ok(value) = number.parse::<f64>() {
            if !unit.is_empty() {
                out.push((value, unit));
            }
        }
    }

    out
}

/// Minutes per unit word, or `None` for words that are not duration units
fn minutes_per_unit(unit: &str) -> Option<f64> {
    if unit == "d" || unit.starts_with("day") {
        Some(1440.0)
    } else if unit == "h" || unit.starts_with("hour") || unit.starts_with("hr") {
        Some(60.0)
    } else if unit == "m" || unit.starts_with("min") {
        Some(1.0)
    } else {
        None
    }
}

/// Kilometers per unit word, or `None` for words that are not distance units
fn km_per_unit(unit: &str) -> Option<f64> {
    match unit {
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Some(1.0),
        "mi" | "mile" | "miles" => Some(KM_PER_MILE),
        "m" | "meter" | "meters" | "metre" | "metres" => Some(0.001),
        "ft" | "foot" | "feet" => Some(KM_PER_FOOT),
        _ => None,
    }
}

/// Total minutes in a duration string, summing every component
/// ("1 hour 5 mins" is 65). Returns 0 when nothing is recognised.
pub fn parse_duration(text: &str) -> u32 {
    let minutes: f64 = quantities(text)
        .into_iter()
        .filter_map(|(value, unit)| minutes_per_unit(&unit).map(|factor| value * factor))
        .sum();
    minutes.round() as u32
}

/// Kilometers in a distance string, from the first number carrying a
/// distance unit. Returns 0.0 when nothing is recognised.
pub fn parse_distance(text: &str) -> f64 {
    quantities(text)
        .into_iter()
        .find_map(|(value, unit)| km_per_unit(&unit).map(|factor| value * factor))
        .unwrap_or(0.0)
}

/// "45 min", "2 hours", "1 hour 5 min"
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    let hour_label = if hours > 1 { "hours" } else { "hour" };

    if remaining == 0 {
        format!("{} {}", hours, hour_label)
    } else {
        format!("{} {} {} min", hours, hour_label, remaining)
    }
}
