//! IPv4 literal parsing and CIDR containment.
//!
//! # Responsibilities
//! - Parse dotted-quad text into a `u32` (most-significant octet first)
//! - Parse `addr/prefix` CIDR text
//! - Test prefix containment with a left-shifted mask
//!
//! # Design Decisions
//! - Strict: octets above 255, signs, whitespace and empty octets are rejected
//! - Leading zeros are read as decimal (`010` is 10), never octal
//! - No IPv6: hosts in brackets or with colons are simply not addresses

use thiserror::Error;

/// Errors produced while parsing address literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Text is not a four-octet decimal IPv4 literal.
    #[error("not an IPv4 address: {0:?}")]
    NotAnAddress(String),

    /// CIDR prefix length is missing, non-numeric or above 32.
    #[error("invalid CIDR prefix length: {0:?}")]
    BadPrefix(String),
}

/// Parse an IPv4 literal into its 32-bit value.
pub fn parse_ipv4(text: &str) -> Result<u32, AddressError> {
    let mut value: u32 = 0;
    let mut octets = 0;

    for part in text.split('.') {
        octets += 1;
        if octets > 4 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::NotAnAddress(text.to_string()));
        }
        let octet: u8 = part
            .parse()
            .map_err(|_| AddressError::NotAnAddress(text.to_string()))?;
        value = (value << 8) | u32::from(octet);
    }

    if octets != 4 {
        return Err(AddressError::NotAnAddress(text.to_string()));
    }
    Ok(value)
}

/// Render a 32-bit value as a dotted quad.
pub fn format_ipv4(value: u32) -> String {
    let [a, b, c, d] = value.to_be_bytes();
    format!("{a}.{b}.{c}.{d}")
}

/// Parse `addr/prefix` into a base address and prefix length.
///
/// The prefix must be one or two digits and at most 32.
pub fn parse_cidr(text: &str) -> Result<(u32, u8), AddressError> {
    let (addr, prefix) = text
        .split_once('/')
        .ok_or_else(|| AddressError::BadPrefix(text.to_string()))?;

    let base = parse_ipv4(addr)?;

    if prefix.is_empty() || prefix.len() > 2 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::BadPrefix(text.to_string()));
    }
    let prefix_len: u8 = prefix
        .parse()
        .map_err(|_| AddressError::BadPrefix(text.to_string()))?;
    if prefix_len > 32 {
        return Err(AddressError::BadPrefix(text.to_string()));
    }

    Ok((base, prefix_len))
}

/// Returns true if `ip` shares its first `prefix_len` bits with `base`.
///
/// A prefix of 0 matches everything; prefixes above 32 are clamped to 32.
pub fn contained_in(ip: u32, base: u32, prefix_len: u8) -> bool {
    let mask = match prefix_len.min(32) {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    };
    (ip & mask) == (base & mask)
}
