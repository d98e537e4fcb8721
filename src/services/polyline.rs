//! Encoded polyline format used by the directions and elevation APIs.
//!
//! Each coordinate is stored as a delta from the previous one, scaled by 1e5,
//! zig-zag encoded and split into 5-bit chunks offset by 63.

use crate::models::Coordinates;

const PRECISION: f64 = 1e5;

pub fn decode(encoded: &str) -> Result<Vec<Coordinates>, String> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_value(bytes, &mut index)?;
        lng += next_value(bytes, &mut index)?;
        points.push(Coordinates {
            lat: lat as f64 / PRECISION,
            lng: lng as f64 / PRECISION,
        });
    }

    Ok(points)
}

pub fn encode(points: &[Coordinates]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, String> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| format!("Truncated polyline at byte {}", index))?;
        if !(63..=126).contains(&byte) {
            return Err(format!(
                "Invalid polyline character {:?} at byte {}",
                byte as char, index
            ));
        }
        *index += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return Err("Polyline value overflow".to_string());
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(out: &mut String, value: i64) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((v & 0x1f) | 0x20) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}
