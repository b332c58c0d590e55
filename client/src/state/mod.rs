mod bank;
mod margin_account;

pub use {bank::*, margin_account::*};

/// Converts a wrapped I80F48 (16-byte little-endian signed fixed point with
/// 48 fractional bits) to an f64.
pub fn i80f48_to_f64(bytes: &[u8; 16]) -> f64 {
    i128::from_le_bytes(*bytes) as f64 / (1u64 << 48) as f64
}

#[cfg(test)]
pub(crate) fn f64_to_i80f48(value: f64) -> [u8; 16] {
    ((value * (1u64 << 48) as f64) as i128).to_le_bytes()
}
