//! Parser for `.properties` resources.
//!
//! Follows the classic line-oriented format: `key=value`, `key: value` or
//! `key value`, `#`/`!` comments, trailing-backslash continuation lines and
//! backslash escapes (including `\uXXXX`). Later keys overwrite earlier ones.

use std::collections::HashMap;

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// A parsed property table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    entries: HashMap<String, String>,
}

impl PropertyTable {
    pub fn new() -> Self {
        PropertyTable::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// A syntax error at a specific (1-based) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse properties text into a table.
pub fn parse(text: &str) -> Result<PropertyTable, ParseError> {
    let mut table = PropertyTable::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line_no = idx + 1;
        let trimmed = raw.trim_start_matches(WHITESPACE);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while has_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        let key = unescape(key).map_err(|message| ParseError { line: line_no, message })?;
        let value = unescape(value).map_err(|message| ParseError { line: line_no, message })?;
        table.insert(key, value);
    }

    Ok(table)
}

/// An odd number of trailing backslashes continues the line.
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut split: Option<(usize, char)> = None;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                split = Some((i, c));
                break;
            }
            _ => {}
        }
    }

    let Some((end, sep)) = split else {
        return (line, "");
    };

    let key = &line[..end];
    let mut rest = line[end + sep.len_utf8()..].trim_start_matches(WHITESPACE);
    if WHITESPACE.contains(&sep) {
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped.trim_start_matches(WHITESPACE);
        }
    }
    (key, rest)
}

fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let code = read_hex4(&mut chars)?;
                let code = match code {
                    0xD800..=0xDBFF => {
                        let low = match (chars.next(), chars.next()) {
                            (Some('\\'), Some('u')) => read_hex4(&mut chars)?,
                            _ => return Err(format!("unpaired surrogate `\\u{:04x}`", code)),
                        };
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(format!(
                                "escape `\\u{:04x}` does not complete surrogate `\\u{:04x}`",
                                low, code
                            ));
                        }
                        0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
                    }
                    code => code,
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("unpaired surrogate `\\u{:04x}`", code))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            // A lone trailing backslash is dropped.
            None => {}
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
        return Err(format!("malformed \\uXXXX escape `\\u{}`", hex));
    }
    u32::from_str_radix(&hex, 16).map_err(|_| format!("malformed \\uXXXX escape `\\u{}`", hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        let table = parse("a=1\nb: 2\nc 3\nd = 4\ne\t:\t5\n").unwrap();
        assert_eq!(table.get("a"), Some("1"));
        assert_eq!(table.get("b"), Some("2"));
        assert_eq!(table.get("c"), Some("3"));
        assert_eq!(table.get("d"), Some("4"));
        assert_eq!(table.get("e"), Some("5"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let table = parse("# comment\n! also comment\n\n   \nkey=value\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("key"), Some("value"));
    }

    #[test]
    fn test_key_without_value() {
        let table = parse("flag\n").unwrap();
        assert_eq!(table.get("flag"), Some(""));
    }

    #[test]
    fn test_continuation_lines() {
        let table = parse("libs=ssl \\\n     crypto \\\n     z\nnext=1\n").unwrap();
        assert_eq!(table.get("libs"), Some("ssl crypto z"));
        assert_eq!(table.get("next"), Some("1"));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let table = parse("path=C:\\\\temp\\\\\nother=2\n").unwrap();
        assert_eq!(table.get("path"), Some("C:\\temp\\"));
        assert_eq!(table.get("other"), Some("2"));
    }

    #[test]
    fn test_escapes() {
        let table = parse("a\\=b=c\\td\ngreek=\\u03b1\n").unwrap();
        assert_eq!(table.get("a=b"), Some("c\td"));
        assert_eq!(table.get("greek"), Some("α"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let table = parse("k=1\nk=2\n").unwrap();
        assert_eq!(table.get("k"), Some("2"));
    }

    #[test]
    fn test_value_keeps_trailing_whitespace() {
        let table = parse("k = v  \n").unwrap();
        assert_eq!(table.get("k"), Some("v  "));
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = parse("a=1\r\nb=2\r\n").unwrap();
        assert_eq!(table.get("a"), Some("1"));
        assert_eq!(table.get("b"), Some("2"));
    }

    #[test]
    fn test_truncated_unicode_escape_is_error() {
        let err = parse("ok=1\nbad=\\u12").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("\\u"));
    }

    #[test]
    fn test_non_hex_unicode_escape_is_error() {
        let err = parse("bad=\\uzz11\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_surrogate_escape_is_error() {
        assert!(parse("bad=\\ud800\n").is_err());
        assert!(parse("bad=\\ude00\n").is_err());
        assert!(parse("bad=\\ud83dx\n").is_err());
        assert!(parse("bad=\\ud83d\\u0041\n").is_err());
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let table = parse("e=\\ud83d\\ude00\nmixed=a\\uD83D\\uDE00b\n").unwrap();
        assert_eq!(table.get("e"), Some("\u{1F600}"));
        assert_eq!(table.get("mixed"), Some("a\u{1F600}b"));
    }

    #[test]
    fn test_keys_sorted() {
        let table = parse("b=2\na=1\nc=3\n").unwrap();
        assert_eq!(table.keys(), vec!["a", "b", "c"]);
    }
}
