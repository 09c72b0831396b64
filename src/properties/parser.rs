//! Line-oriented properties parser.
//!
//! Accepts the classic properties syntax: `key=value`, `key: value` and
//! `key value` entries, `#`/`!` comment lines, backslash line continuation,
//! and `\t \n \r \f \uXXXX` escapes.

use super::PropertyMap;
use crate::error::{ConfigError, Result};

/// Text encoding of a properties stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// ISO-8859-1, one byte per character. Never fails to decode.
    Latin1,
    /// Strict UTF-8. Invalid sequences are a decode error.
    Utf8,
    /// UTF-8 when the whole stream is valid UTF-8, ISO-8859-1 otherwise.
    #[default]
    Utf8OrLatin1,
}

impl Encoding {
    fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Latin1 => Ok(latin1(bytes)),
            Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| ConfigError::Decode(e.to_string())),
            Self::Utf8OrLatin1 => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(text.to_owned()),
                Err(_) => Ok(latin1(bytes)),
            },
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode `bytes` with `encoding` and parse the result.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] for invalid strict UTF-8 and
/// [`ConfigError::Parse`] for a malformed `\uXXXX` escape.
pub fn parse_bytes(bytes: &[u8], encoding: Encoding) -> Result<PropertyMap> {
    let text = encoding.decode(bytes)?;
    parse_str(&text)
}

/// Parse properties text.
///
/// Later duplicates of a name replace earlier ones. Entries with an empty
/// name are skipped.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for a malformed `\uXXXX` escape.
pub fn parse_str(text: &str) -> Result<PropertyMap> {
    let mut map = PropertyMap::new();
    let mut lines = LogicalLines::new(text);

    while let Some((line_no, line)) = lines.next_line() {
        let (raw_key, raw_value) = split_entry(&line);
        let key = unescape(raw_key, line_no)?;
        let value = unescape(raw_value, line_no)?;

        if key.is_empty() {
            tracing::debug!(line = line_no, "Skipping property with empty name");
            continue;
        }
        map.insert(key, value);
    }

    Ok(map)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Joins physical lines into logical ones and drops comments and blank lines.
struct LogicalLines {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl LogicalLines {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Consume one line terminator (`\n`, `\r` or `\r\n`) at the cursor.
    fn eat_terminator(&mut self) {
        match self.chars.get(self.pos) {
            Some('\r') => {
                self.pos += 1;
                if self.chars.get(self.pos) == Some(&'\n') {
                    self.pos += 1;
                }
            }
            Some('\n') => self.pos += 1,
            _ => return,
        }
        self.line += 1;
    }

    fn skip_blanks(&mut self) {
        while self.chars.get(self.pos).is_some_and(|&c| is_blank(c)) {
            self.pos += 1;
        }
    }

    fn skip_to_line_end(&mut self) {
        while self
            .chars
            .get(self.pos)
            .is_some_and(|&c| c != '\n' && c != '\r')
        {
            self.pos += 1;
        }
        self.eat_terminator();
    }

    /// Return the next logical line with its starting physical line number.
    ///
    /// Escapes are left intact; only the continuation backslashes are removed.
    fn next_line(&mut self) -> Option<(usize, Vec<char>)> {
        loop {
            self.skip_blanks();
            let &first = self.chars.get(self.pos)?;

            if first == '\n' || first == '\r' {
                self.eat_terminator();
                continue;
            }
            if first == '#' || first == '!' {
                self.skip_to_line_end();
                continue;
            }

            let start_line = self.line;
            let mut out = Vec::new();
            let mut preceding_backslash = false;

            loop {
                match self.chars.get(self.pos).copied() {
                    None => {
                        if preceding_backslash {
                            out.pop();
                        }
                        return Some((start_line, out));
                    }
                    Some('\n' | '\r') if preceding_backslash => {
                        out.pop();
                        preceding_backslash = false;
                        self.eat_terminator();
                        self.skip_blanks();
                    }
                    Some('\n' | '\r') => {
                        self.eat_terminator();
                        return Some((start_line, out));
                    }
                    Some(c) => {
                        preceding_backslash = c == '\\' && !preceding_backslash;
                        out.push(c);
                        self.pos += 1;
                    }
                }
            }
        }
    }
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &[char]) -> (&[char], &[char]) {
    let limit = line.len();
    let mut key_len = 0;
    let mut value_start = limit;
    let mut has_separator = false;
    let mut preceding_backslash = false;

    while key_len < limit {
        let c = line[key_len];
        if !preceding_backslash {
            if c == '=' || c == ':' {
                value_start = key_len + 1;
                has_separator = true;
                break;
            }
            if is_blank(c) {
                value_start = key_len + 1;
                break;
            }
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        key_len += 1;
    }

    while value_start < limit {
        let c = line[value_start];
        if is_blank(c) {
            value_start += 1;
        } else if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            value_start += 1;
        } else {
            break;
        }
    }

    (&line[..key_len], &line[value_start..])
}

fn unescape(raw: &[char], line_no: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let c = raw[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&escaped) = raw.get(i) else {
            break;
        };
        i += 1;

        match escaped {
            'u' => {
                let code = hex4(raw, i, line_no)?;
                i += 4;

                if (0xD800..0xDC00).contains(&code) && raw[i..].starts_with(&['\\', 'u']) {
                    // A high surrogate followed by an escaped low surrogate is one code point.
                    let low = hex4(raw, i + 2, line_no)?;
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                        i += 6;
                        continue;
                    }
                }

                // Unpaired surrogate halves have no scalar value of their own.
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'n' => out.push('\n'),
            'f' => out.push('\u{000C}'),
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Value of the four hex digits starting at `start`.
fn hex4(raw: &[char], start: usize, line_no: usize) -> Result<u32> {
    let digits = raw
        .get(start..start + 4)
        .ok_or_else(|| malformed_unicode(line_no))?;
    let mut code = 0u32;
    for d in digits {
        let nibble = d.to_digit(16).ok_or_else(|| malformed_unicode(line_no))?;
        code = (code << 4) | nibble;
    }
    Ok(code)
}

fn malformed_unicode(line: usize) -> ConfigError {
    ConfigError::Parse {
        line,
        message: "Malformed \\uxxxx encoding".to_string(),
    }
}
