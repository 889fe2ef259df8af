// Copyright © 2023 David Caldwell <david@porkrind.org>

// Fixed-width ASCII fields, as found in the IBM 3740 labels and the FICMAC catalog. Nothing on these disks
// is stored as a binary integer: numbers are digit strings, padded with spaces.

use crate::error::{DiskError, Result};

pub fn is_blank(raw: &[u8]) -> bool {
    raw.iter().all(|b| *b == b' ')
}

pub fn text(field: &'static str, raw: &[u8]) -> Result<String> {
    let s = std::str::from_utf8(raw).map_err(|_| DiskError::record(field, format!("not ASCII: {:02x?}", raw)))?;
    if !s.is_ascii() { return Err(DiskError::record(field, format!("not ASCII: {:02x?}", raw))) }
    Ok(s.trim().to_owned())
}

fn number(field: &'static str, raw: &[u8], radix: u32) -> Result<usize> {
    let s = text(field, raw)?;
    if s.is_empty() || !s.chars().all(|c| c.is_digit(radix)) {
        return Err(DiskError::record(field, format!("{:?} is not a base {} number", String::from_utf8_lossy(raw), radix)));
    }
    usize::from_str_radix(&s, radix).map_err(|e| DiskError::record(field, format!("{:?}: {}", s, e)))
}

/// Space padding around the digits is allowed, anything else is an error.
pub fn decimal(field: &'static str, raw: &[u8]) -> Result<usize> {
    number(field, raw, 10)
}

pub fn hex(field: &'static str, raw: &[u8]) -> Result<usize> {
    number(field, raw, 16)
}

/// A blank field decodes to `None` instead of an error.
pub fn optional_decimal(field: &'static str, raw: &[u8]) -> Result<Option<usize>> {
    if is_blank(raw) { return Ok(None) }
    decimal(field, raw).map(Some)
}

pub fn optional_text(field: &'static str, raw: &[u8]) -> Result<Option<String>> {
    if is_blank(raw) { return Ok(None) }
    text(field, raw).map(Some)
}
