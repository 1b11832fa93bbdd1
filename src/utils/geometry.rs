//! Size parsing for map extents and output dimensions

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{MapError, MapResult};

lazy_static! {
    // Strict ASCII form: digits, lowercase 'x', digits. Unicode multiplication
    // signs and embedded whitespace are rejected on purpose.
    static ref SIZE_RE: Regex = Regex::new(r"^(\d+)x(\d+)$").unwrap();
}

/// A width/height pair in pixels or projection units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size
    pub fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }
}

/// Parse a size given as "WIDTHxHEIGHT", e.g. "800x600"
///
/// The `reason` labels which CLI option is being parsed so the error
/// message points at the failing argument.
pub fn parse_size(s: &str, reason: &str) -> MapResult<Size> {
    let captures = SIZE_RE.captures(s.trim()).ok_or_else(|| {
        MapError::ArgumentError(format!(
            "expected WIDTHxHEIGHT (e.g. 800x600) for {}, got '{}'",
            reason, s
        ))
    })?;

    let width = captures[1]
        .parse::<u32>()
        .map_err(|_| MapError::ArgumentError(format!("width out of range for {}", reason)))?;
    let height = captures[2]
        .parse::<u32>()
        .map_err(|_| MapError::ArgumentError(format!("height out of range for {}", reason)))?;

    if width == 0 || height == 0 {
        return Err(MapError::ArgumentError(format!(
            "both dimensions must be positive for {}",
            reason
        )));
    }

    Ok(Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_size() {
        assert_eq!(parse_size("800x600", "output size").unwrap(), Size::new(800, 600));
    }

    #[test]
    fn test_parse_rejects_unicode_separator() {
        assert!(matches!(
            parse_size("800\u{00d7}600", "output size"),
            Err(MapError::ArgumentError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            parse_size("abcx600", "input size"),
            Err(MapError::ArgumentError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!(matches!(
            parse_size("800600", "input size"),
            Err(MapError::ArgumentError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_zero_dimension() {
        assert!(matches!(
            parse_size("0x600", "output size"),
            Err(MapError::ArgumentError(_))
        ));
    }
}
