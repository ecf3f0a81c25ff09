use std::str::FromStr;

/// Parses a strictly positive duration in seconds.
pub fn seconds_parser(s: &str) -> Result<f64, String> {
    let s = s.trim();
    f64::from_str(s)
        .map_err(|e| format!("Invalid seconds value '{}': {}", s, e))
        .and_then(|v| {
            if !v.is_finite() || v <= 0.0 {
                Err(format!("Seconds must be positive, got {}", v))
            } else {
                Ok(v)
            }
        })
}

/// Parses a single-byte column delimiter. Accepts the names `space`, `tab`
/// and `comma` as well as the literal character.
pub fn delimiter_parser(s: &str) -> Result<u8, String> {
    match s {
        "space" | " " => return Ok(b' '),
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        "comma" => return Ok(b','),
        _ => {}
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("Delimiter must be a single ASCII character, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_parser() {
        assert_eq!(seconds_parser("0.5"), Ok(0.5));
        assert_eq!(seconds_parser(" 2 "), Ok(2.0));
        assert!(seconds_parser("0").is_err());
        assert!(seconds_parser("-1.0").is_err());
        assert!(seconds_parser("inf").is_err());
        assert!(seconds_parser("half").is_err());
    }

    #[test]
    fn test_delimiter_parser() {
        assert_eq!(delimiter_parser(" "), Ok(b' '));
        assert_eq!(delimiter_parser("space"), Ok(b' '));
        assert_eq!(delimiter_parser("tab"), Ok(b'\t'));
        assert_eq!(delimiter_parser(","), Ok(b','));
        assert_eq!(delimiter_parser(";"), Ok(b';'));
        assert!(delimiter_parser("").is_err());
        assert!(delimiter_parser("ab").is_err());
        assert!(delimiter_parser("é").is_err());
    }
}
