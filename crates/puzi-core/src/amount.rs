//! Raw-unit / UI-amount conversion.
//!
//! The protocol only ever sees raw integer units. These helpers convert at
//! the boundary using each asset's own decimal precision, without floating
//! point.

use crate::error::CoreError;

/// Largest supported decimal precision (10^19 still fits in a u64).
pub const MAX_DECIMALS: u8 = 19;

/// Returns `10^decimals` as raw units per whole token.
///
/// # Errors
///
/// Returns [`CoreError::InvalidAmount`] if `decimals` exceeds [`MAX_DECIMALS`].
pub fn units_per_token(decimals: u8) -> Result<u64, CoreError> {
    if decimals > MAX_DECIMALS {
        return Err(CoreError::invalid_amount(format!(
            "{decimals} decimals exceeds maximum of {MAX_DECIMALS}"
        )));
    }
    Ok(10u64.pow(u32::from(decimals)))
}

/// Parses a decimal string (e.g. `"1.5"`) into raw units.
///
/// # Errors
///
/// Returns [`CoreError::InvalidAmount`] for negative, malformed or
/// over-precise input, or on overflow.
pub fn parse_ui_amount(text: &str, decimals: u8) -> Result<u64, CoreError> {
    let scale = units_per_token(decimals)?;
    let text = text.trim();

    if text.starts_with('-') {
        return Err(CoreError::invalid_amount("negative values not allowed"));
    }

    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(CoreError::invalid_amount(format!("invalid number: {text:?}")));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::invalid_amount(format!("invalid number: {text:?}")));
    }
    if frac.len() > usize::from(decimals) {
        return Err(CoreError::invalid_amount(format!(
            "too many decimal places: {text} (max {decimals})"
        )));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| CoreError::invalid_amount(format!("overflow: {text}")))?
    };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<width$}", width = usize::from(decimals))
            .parse()
            .map_err(|_| CoreError::invalid_amount(format!("invalid fractional part: {text}")))?
    };

    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| CoreError::invalid_amount(format!("overflow: {text}")))
}

/// Formats raw units as a decimal string without trailing zeros.
#[must_use]
pub fn format_ui_amount(raw: u64, decimals: u8) -> String {
    let places = usize::from(decimals);
    if places == 0 {
        return raw.to_string();
    }
    let padded = format!("{raw:0>width$}", width = places + 1);
    let (whole, frac) = padded.split_at(padded.len() - places);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}
