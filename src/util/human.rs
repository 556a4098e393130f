use crate::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;

const UNITS: [&str; 7] = ["", "KB", "MB", "GB", "TB", "PB", "EB"];

fn size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)(?:\.(\d+))?\s*(?:([A-Z])B)?\s*$").expect("size pattern")
    })
}

/// Parse an hpacucli size such as "146 GB", "1.5MB" or "0  MB" into bytes.
/// Units are decimal (1 KB = 1000 bytes); a bare number is already bytes.
pub fn parse_size(text: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::invalid_size(text);
    let caps = size_re().captures(text).ok_or_else(invalid)?;

    let steps: u32 = match caps.get(3).map(|m| m.as_str()) {
        None      => 0,
        Some("K") => 1,
        Some("M") => 2,
        Some("G") => 3,
        Some("T") => 4,
        Some("P") => 5,
        Some("E") => 6,
        Some(_)   => return Err(invalid()),
    };
    let multiplier = 1000u64.pow(steps);

    let whole: u64 = caps[1].parse().map_err(|_| invalid())?;
    let mut bytes = whole.checked_mul(multiplier).ok_or_else(invalid)?;

    // Fraction digits finer than one byte are dropped.
    if let Some(frac) = caps.get(2) {
        let scale = 3 * steps as usize;
        let digits = &frac.as_str()[..frac.as_str().len().min(scale)];
        if !digits.is_empty() {
            let n: u64 = digits.parse().map_err(|_| invalid())?;
            let frac_bytes = n * 10u64.pow((scale - digits.len()) as u32);
            bytes = bytes.checked_add(frac_bytes).ok_or_else(invalid)?;
        }
    }

    Ok(bytes)
}

/// Format a byte count for diagnostics: "9", "1.5KB", "137GB".
/// Lossy; not meant to be fed back into [`parse_size`].
pub fn fmt_size(bytes: u64) -> String {
    if bytes < 10 {
        return bytes.to_string();
    }

    let mut exp = 0;
    let mut base: u64 = 1;
    while exp + 1 < UNITS.len() && bytes / base >= 1000 {
        base *= 1000;
        exp += 1;
    }

    let val = ((bytes as f64 / base as f64) * 10.0 + 0.5).floor() / 10.0;
    if val < 10.0 { format!("{:.1}{}", val, UNITS[exp]) }
    else          { format!("{:.0}{}", val, UNITS[exp]) }
}
