//! Text form of a word: exactly 12 hex digits, lowercase when rendered.

use crate::{
    bits::WORD_MAX,
    errors::{DecodeError, EncodeError},
};

/// Number of hex digits in a rendered word.
pub const TOKEN_LEN: usize = 12;

/// Renders a 48-bit value as 12 zero-padded lowercase hex digits.
pub fn render_hex(value: u64) -> Result<String, EncodeError> {
    if value > WORD_MAX {
        return Err(EncodeError::ValueTooWide(value));
    }

    Ok(format!("{value:012x}"))
}

/// Parses a 12-digit hex token. Either case is accepted.
pub fn parse_hex(token: &str) -> Result<u64, DecodeError> {
    if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidToken(token.to_string()));
    }

    if token.len() != TOKEN_LEN {
        return Err(DecodeError::InvalidLength {
            token: token.to_string(),
            len: token.len(),
        });
    }

    u64::from_str_radix(token, 16).map_err(|_| DecodeError::InvalidToken(token.to_string()))
}
