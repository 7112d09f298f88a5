//! Presentation helpers. None of these are used for identity comparisons.

const ELLIPSIS: &str = "...";

/// Keeps the first `start` and last `end` characters, joined by `...`.
///
/// Text shorter than `start + end` is returned unchanged.
pub fn shorten(text: &str, start: usize, end: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < start + end {
        return text.to_string();
    }
    let head: String = chars[..start].iter().collect();
    let tail: String = chars[chars.len() - end..].iter().collect();
    format!("{head}{ELLIPSIS}{tail}")
}

pub fn format_address(address: &str) -> String {
    shorten(address, 6, 4)
}

pub fn format_tx_hash(hash: &str) -> String {
    shorten(hash, 10, 8)
}

/// Renders a fixed-point integer as a decimal string, trimming trailing zeros.
pub fn format_units(raw: u128, decimals: u32) -> String {
    let digits = raw.to_string();
    let width = decimals as usize;
    if width == 0 {
        return digits;
    }
    let padded = format!("{digits:0>pad$}", pad = width + 1);
    let (whole, fraction) = padded.split_at(padded.len() - width);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

pub fn is_valid_tx_hash(hash: &str) -> bool {
    hash.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
