use arch::word;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Line

/// A single source line, classified once and shared by both passes.
#[derive(Debug, Clone)]
pub struct Line {
    no: usize,
    raw: String,
    pub label: Option<String>,
    pub stmt: Option<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Guide(Guide),
    Inst { name: String, operands: String },
}

/// Guide (`.`-prefixed) statements. The keyword is matched as a prefix of
/// the text after the dot and the payload starts right after it.
#[derive(Debug, Clone)]
pub enum Guide {
    Data(String),
    Str(String),
    Entry(String),
    Extern(String),
    Invalid,
}

impl Line {
    /// `no` is the 1-based source line number.
    pub fn parse(no: usize, raw: &str) -> Line {
        let raw = raw.trim_end_matches('\r');
        let mut rest = raw.trim_start();

        // blank lines and full-line comments carry no statement
        if rest.is_empty() || rest.starts_with(';') {
            return Line {
                no,
                raw: raw.to_string(),
                label: None,
                stmt: None,
            };
        }

        // a leading `ident:` is a label; validity is checked at registration
        let mut label = None;
        if let Some((head, tail)) = split_label(rest) {
            label = Some(head.to_string());
            rest = tail.trim_start();
        }

        let stmt = if let Some(guide) = rest.strip_prefix('.') {
            Stmt::Guide(Guide::classify(guide))
        } else {
            let (name, operands) = match rest.split_once(char::is_whitespace) {
                Some((name, operands)) => (name, operands),
                None => (rest, ""),
            };
            Stmt::Inst {
                name: name.to_string(),
                operands: operands.to_string(),
            }
        };

        Line {
            no,
            raw: raw.to_string(),
            label,
            stmt: Some(stmt),
        }
    }

    pub fn no(&self) -> usize {
        self.no
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Splits a leading `ident:` where ident is an ASCII letter followed by
/// ASCII alphanumerics. Anything else in front of a `:` is left in place
/// for the instruction lookup to reject.
fn split_label(s: &str) -> Option<(&str, &str)> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (i, c) in chars {
        if c == ':' {
            return Some((&s[..i], &s[i + 1..]));
        }
        if !c.is_ascii_alphanumeric() {
            return None;
        }
    }
    None
}

impl Guide {
    fn classify(s: &str) -> Guide {
        if let Some(payload) = s.strip_prefix("data") {
            Guide::Data(payload.to_string())
        } else if let Some(payload) = s.strip_prefix("string") {
            Guide::Str(payload.to_string())
        } else if let Some(payload) = s.strip_prefix("entry") {
            Guide::Entry(payload.to_string())
        } else if let Some(payload) = s.strip_prefix("extern") {
            Guide::Extern(payload.to_string())
        } else {
            Guide::Invalid
        }
    }
}

// ----------------------------------------------------------------------------
// Operand splitting

/// Split an operand list on commas into trimmed fields. `None` marks a
/// malformed list (an empty field somewhere); both passes go through here
/// so they can never disagree on what the operands were.
pub fn split_operands(s: &str) -> Option<Vec<&str>> {
    let s = s.trim();
    if s.is_empty() {
        return Some(vec![]);
    }
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    if fields.iter().any(|f| f.is_empty()) {
        return None;
    }
    Some(fields)
}

// ----------------------------------------------------------------------------
// Integer parsing

/// Signed decimal integer: optional sign, digits, then nothing but
/// whitespace.
pub fn parse_int(s: &str) -> Result<i64, Error> {
    let t = s.trim();
    if t.is_empty() {
        return Err(Error::MissingValue);
    }
    let unsigned = t.strip_prefix(|c| c == '+' || c == '-').unwrap_or(t);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return Err(Error::InvalidValue(t.to_string()));
    }
    let (num, tail) = t.split_at(t.len() - unsigned.len() + digits);
    if !tail.trim().is_empty() {
        return Err(Error::Leftover(tail.trim().to_string()));
    }
    // numerals beyond i64 saturate; every caller range-checks far below that
    Ok(num.parse::<i64>().unwrap_or(if num.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Integer bound for an operand extension word's 21-bit value field.
pub fn parse_int21(s: &str) -> Result<i32, Error> {
    let v = parse_int(s)?;
    if !word::fits_int21(v) {
        return Err(Error::Int21Overflow);
    }
    Ok(v as i32)
}

/// Integer bound for a plain 24-bit data word.
pub fn parse_int24(s: &str) -> Result<i32, Error> {
    let v = parse_int(s)?;
    if !word::fits_int24(v) {
        return Err(Error::Int24Overflow);
    }
    Ok(v as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(line: &Line) -> &Stmt {
        line.stmt.as_ref().unwrap()
    }

    #[test]
    fn blank_and_comment_lines() {
        assert!(Line::parse(1, "").stmt.is_none());
        assert!(Line::parse(1, "   \t ").stmt.is_none());
        assert!(Line::parse(1, "; a comment").stmt.is_none());
        assert!(Line::parse(1, "   ; indented comment").stmt.is_none());
        // a semicolon later in the line is not a comment marker
        assert!(Line::parse(1, "stop ;").stmt.is_some());
    }

    #[test]
    fn label_split() {
        let line = Line::parse(1, "MAIN: mov #5, r2");
        assert_eq!(line.label.as_deref(), Some("MAIN"));
        match stmt(&line) {
            Stmt::Inst { name, operands } => {
                assert_eq!(name, "mov");
                assert_eq!(operands, "#5, r2");
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn garbage_before_colon_is_not_a_label() {
        // a leading token that breaks the naming rule falls through whole
        let line = Line::parse(1, "1BAD: mov #5, r2");
        assert_eq!(line.label, None);
        match stmt(&line) {
            Stmt::Inst { name, .. } => assert_eq!(name, "1BAD:"),
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn crlf_terminator_is_stripped() {
        let line = Line::parse(1, "stop\r");
        match stmt(&line) {
            Stmt::Inst { name, operands } => {
                assert_eq!(name, "stop");
                assert_eq!(operands, "");
            }
            _ => panic!("expected instruction"),
        }
    }

    #[test]
    fn guide_classification() {
        let line = Line::parse(1, "LIST: .data 6, -9");
        assert_eq!(line.label.as_deref(), Some("LIST"));
        match stmt(&line) {
            Stmt::Guide(Guide::Data(payload)) => assert_eq!(payload, " 6, -9"),
            _ => panic!("expected data guide"),
        }
        // the keyword is a prefix; the payload may touch it
        match stmt(&Line::parse(1, ".string\"ab\"")) {
            Stmt::Guide(Guide::Str(payload)) => assert_eq!(payload, "\"ab\""),
            _ => panic!("expected string guide"),
        }
        assert!(matches!(
            stmt(&Line::parse(1, ".entry MAIN")),
            Stmt::Guide(Guide::Entry(_))
        ));
        assert!(matches!(
            stmt(&Line::parse(1, ".extern EXT")),
            Stmt::Guide(Guide::Extern(_))
        ));
        assert!(matches!(
            stmt(&Line::parse(1, ".word 5")),
            Stmt::Guide(Guide::Invalid)
        ));
    }

    #[test]
    fn split_operands_fields() {
        assert_eq!(split_operands(""), Some(vec![]));
        assert_eq!(split_operands("   "), Some(vec![]));
        assert_eq!(split_operands("#5, r2"), Some(vec!["#5", "r2"]));
        assert_eq!(split_operands(" LABEL "), Some(vec!["LABEL"]));
        assert_eq!(split_operands("a, b, c"), Some(vec!["a", "b", "c"]));
        assert_eq!(split_operands("a,,b"), None);
        assert_eq!(split_operands("a,"), None);
        assert_eq!(split_operands(",a"), None);
    }

    #[test]
    fn parse_int_shapes() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int(" -7 ").unwrap(), -7);
        assert_eq!(parse_int("+3").unwrap(), 3);
        assert!(matches!(parse_int(""), Err(Error::MissingValue)));
        assert!(matches!(parse_int("-"), Err(Error::InvalidValue(_))));
        assert!(matches!(parse_int("abc"), Err(Error::InvalidValue(_))));
        assert!(matches!(parse_int("12x"), Err(Error::Leftover(_))));
        assert!(matches!(parse_int("12 3"), Err(Error::Leftover(_))));
    }

    #[test]
    fn parse_int21_bounds() {
        assert_eq!(parse_int21("-1048575").unwrap(), -1_048_575);
        assert_eq!(parse_int21("1048574").unwrap(), 1_048_574);
        assert!(matches!(parse_int21("-1048576"), Err(Error::Int21Overflow)));
        assert!(matches!(parse_int21("1048575"), Err(Error::Int21Overflow)));
    }

    #[test]
    fn parse_int24_bounds() {
        assert_eq!(parse_int24("-8388607").unwrap(), -8_388_607);
        assert_eq!(parse_int24("8388606").unwrap(), 8_388_606);
        assert!(matches!(parse_int24("-8388608"), Err(Error::Int24Overflow)));
        assert!(matches!(parse_int24("8388607"), Err(Error::Int24Overflow)));
        // far beyond any machine word
        assert!(matches!(
            parse_int24("99999999999999999999999"),
            Err(Error::Int24Overflow)
        ));
    }
}
