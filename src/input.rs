//! Free-text length parsing and validation ahead of packing.

use crate::error::PackError;

/// What to do with a piece that is zero or longer than the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizePolicy {
    /// Fail the whole request.
    #[default]
    Reject,
    /// Drop the piece and carry on.
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLengths {
    pub lengths: Vec<u32>,
    /// Numbers that are not positive whole units (`1250.5`, `-3`).
    pub invalid: Vec<String>,
    /// Tokens that are not numbers at all.
    pub discarded: Vec<String>,
}

impl ParsedLengths {
    /// Whole lengths, with `invalid` tokens handled under `policy`: `Reject`
    /// fails on the first one, `Skip` drops them.
    pub fn into_lengths(self, policy: OversizePolicy) -> Result<Vec<u32>, PackError> {
        if let Some(token) = self.invalid.first() {
            match policy {
                OversizePolicy::Reject => return Err(PackError::InvalidPieceToken(token.clone())),
                OversizePolicy::Skip => {
                    tracing::warn!(tokens = ?self.invalid, "skipping lengths that are not whole numbers");
                }
            }
        }
        Ok(self.lengths)
    }
}

enum Token {
    Whole(u32),
    NotWhole,
    NotNumber,
}

fn parse_token(token: &str) -> Token {
    if let Ok(length) = token.parse::<u32>() {
        return Token::Whole(length);
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
                Token::Whole(value as u32)
            } else {
                Token::NotWhole
            }
        }
        _ => Token::NotNumber,
    }
}

/// Splits on whitespace and commas. Empty tokens are ignored; numbers that are
/// not whole go to `invalid`, anything else to `discarded`.
pub fn parse_lengths(text: &str) -> ParsedLengths {
    let mut parsed = ParsedLengths::default();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match parse_token(token) {
            Token::Whole(length) => parsed.lengths.push(length),
            Token::NotWhole => parsed.invalid.push(token.to_string()),
            Token::NotNumber => parsed.discarded.push(token.to_string()),
        }
    }
    if !parsed.discarded.is_empty() {
        tracing::warn!(tokens = ?parsed.discarded, "discarded non-numeric lengths");
    }
    parsed
}

/// Reads the leading digits, so `6000mm` is a 6000 stock.
pub fn parse_capacity(s: &str) -> Result<u32, PackError> {
    let trimmed = s.trim();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    match trimmed[..digits].parse::<u32>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(PackError::InvalidCapacity(s.to_string())),
    }
}

/// Checks every length against the stock under `policy`. An empty result is
/// reported as `EmptyInput`.
pub fn validate_lengths(
    lengths: Vec<u32>,
    capacity: u32,
    policy: OversizePolicy,
) -> Result<Vec<u32>, PackError> {
    if capacity == 0 {
        return Err(PackError::InvalidCapacity(capacity.to_string()));
    }

    let mut valid = Vec::with_capacity(lengths.len());
    for length in lengths {
        if length > 0 && length <= capacity {
            valid.push(length);
            continue;
        }
        match policy {
            OversizePolicy::Reject => {
                return Err(PackError::InvalidPieceLength { length, capacity });
            }
            OversizePolicy::Skip => {
                tracing::warn!(length, capacity, "skipping piece that does not fit stock");
            }
        }
    }

    if valid.is_empty() {
        return Err(PackError::EmptyInput);
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let parsed = parse_lengths("1200, 800 450,,300\n\t75  ");
        assert_eq!(parsed.lengths, vec![1200, 800, 450, 300, 75]);
        assert!(parsed.discarded.is_empty());
    }

    #[test]
    fn test_parse_discards_non_numeric() {
        let parsed = parse_lengths("500 abc 12.5 -3 250 inf");
        assert_eq!(parsed.lengths, vec![500, 250]);
        assert_eq!(parsed.invalid, vec!["12.5", "-3"]);
        assert_eq!(parsed.discarded, vec!["abc", "inf"]);
    }

    #[test]
    fn test_parse_whole_float_notation() {
        let parsed = parse_lengths("800.0 1e3");
        assert_eq!(parsed.lengths, vec![800, 1000]);
        assert!(parsed.invalid.is_empty());
    }

    #[test]
    fn test_fractional_length_rejected() {
        let parsed = parse_lengths("1250.5 800");
        assert_eq!(
            parsed.into_lengths(OversizePolicy::Reject),
            Err(PackError::InvalidPieceToken("1250.5".to_string()))
        );
    }

    #[test]
    fn test_fractional_length_skipped() {
        let parsed = parse_lengths("1250.5 800 7.5");
        assert_eq!(parsed.into_lengths(OversizePolicy::Skip), Ok(vec![800]));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_lengths("  , ,\n"), ParsedLengths::default());
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity("6000"), Ok(6000));
        assert_eq!(parse_capacity(" 2400 "), Ok(2400));
        assert_eq!(parse_capacity("6000mm"), Ok(6000));
        assert!(matches!(parse_capacity("mm6000"), Err(PackError::InvalidCapacity(_))));
        assert!(matches!(parse_capacity("0"), Err(PackError::InvalidCapacity(_))));
        assert!(matches!(parse_capacity("-5"), Err(PackError::InvalidCapacity(_))));
        assert!(matches!(parse_capacity("six"), Err(PackError::InvalidCapacity(_))));
    }

    #[test]
    fn test_validate_reject_oversize() {
        assert_eq!(
            validate_lengths(vec![5, 12, 3], 10, OversizePolicy::Reject),
            Err(PackError::InvalidPieceLength {
                length: 12,
                capacity: 10
            })
        );
    }

    #[test]
    fn test_validate_skip_oversize() {
        assert_eq!(
            validate_lengths(vec![5, 12, 0, 3], 10, OversizePolicy::Skip),
            Ok(vec![5, 3])
        );
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(
            validate_lengths(vec![], 10, OversizePolicy::Reject),
            Err(PackError::EmptyInput)
        );
        assert_eq!(
            validate_lengths(vec![11, 20], 10, OversizePolicy::Skip),
            Err(PackError::EmptyInput)
        );
    }
}
