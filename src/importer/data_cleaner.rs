// ==========================================
// Link Marketplace - Data Cleaner
// ==========================================
// URL normalization, price rounding and lenient number parsing.
// Pure functions, no I/O.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use url::Url;

/// Canonicalizes a raw URL.
///
/// Keeps an existing `http://`/`https://` prefix (any case), otherwise
/// prepends `https://`. The host must be non-empty and contain a dot.
///
/// # Returns
/// - Ok(String): the parser's canonical serialization (lower-cased scheme
///   and host, `/` path when none was given)
/// - Err(ImportError::InvalidUrl)
pub fn normalize_url(raw: &str) -> ImportResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ImportError::InvalidUrl("URL is empty".to_string()));
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| ImportError::InvalidUrl(format!("{} ({})", trimmed, e)))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() && host.contains('.') => Ok(parsed.to_string()),
        _ => Err(ImportError::InvalidUrl(format!(
            "{} (hostname must contain a dot)",
            trimmed
        ))),
    }
}

fn has_http_scheme(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Rounds a price to a non-negative integer.
///
/// Fractions up to and including .50 round down, anything above rounds up.
/// NaN, infinities and negative input yield 0.
pub fn auto_round(price: f64) -> i64 {
    if !price.is_finite() || price < 0.0 {
        return 0;
    }
    let whole = price.floor();
    let frac = price - whole;
    if frac <= 0.5 {
        whole as i64
    } else {
        whole as i64 + 1
    }
}

/// `auto_round` over text; unparseable input yields 0.
pub fn auto_round_str(value: &str) -> i64 {
    parse_price(value).map(auto_round).unwrap_or(0)
}

/// Parses a number, accepting thousands separators (`12,500`).
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a price, additionally accepting a leading `$`.
pub fn parse_price(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    parse_number(trimmed.strip_prefix('$').unwrap_or(trimmed))
}

/// Trims a cell; whitespace-only becomes None.
pub fn normalize_null(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
