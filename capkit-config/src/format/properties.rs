//! Java-style `.properties` documents.
//!
//! - `key=value`, `key: value` and `key value` are all accepted
//! - lines starting with `#` or `!` are comments
//! - a trailing backslash joins the next line (its leading blanks dropped)
//! - `\t \n \r \f \uXXXX` escapes are decoded, surrogate pairs included;
//!   `\x` is `x` for anything else
//!
//! Keys are already dotted paths, so the document is flat by construction.

use std::str::Chars;

use serde_json::{Map, Value};

pub fn parse(text: &str) -> Result<Map<String, Value>, String> {
    let mut document = Map::new();
    for (number, line) in logical_lines(text) {
        let (key, value) = split_entry(&line);
        let key = unescape(key).map_err(|e| format!("line {number}: {e}"))?;
        let value = unescape(value).map_err(|e| format!("line {number}: {e}"))?;
        document.insert(key, Value::String(value));
    }
    Ok(document)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// Comment-free, continuation-joined lines, with their 1-based start line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim_start_matches(is_blank);

        let (start, mut buf) = match current.take() {
            Some((start, buf)) => (start, buf),
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        let trailing = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            buf.push_str(&trimmed[..trimmed.len() - 1]);
            current = Some((start, buf));
        } else {
            buf.push_str(trimmed);
            out.push((start, buf));
        }
    }

    // a continuation on the final line just ends the entry
    if let Some(entry) = current {
        out.push(entry);
    }
    out
}

/// Split a logical line into raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(|c| c == '=' || c == ':') {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let unit = utf16_unit(&mut chars)?;
                // characters outside the BMP arrive as a surrogate pair
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => {
                            let low = utf16_unit(&mut chars)?;
                            char::decode_utf16([unit, low]).next().and_then(Result::ok)
                        }
                        _ => None,
                    }
                } else {
                    char::from_u32(u32::from(unit))
                };
                out.push(decoded.ok_or_else(|| format!("unpaired surrogate '\\u{unit:04X}'"))?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn utf16_unit(chars: &mut Chars<'_>) -> Result<u16, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("malformed \\u escape '\\u{hex}'"));
    }
    u16::from_str_radix(&hex, 16).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(doc: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        doc.get(key).and_then(Value::as_str)
    }

    #[test]
    fn separators_and_comments() {
        let doc = parse(
            "# comment\n\
             ! also a comment\n\
             \n\
             app.device.web.url = http://grid:4444/wd/hub\n\
             app.notification.slack.channel:#qa\n\
             app.name   test-suite\n\
             empty=\n",
        )
        .unwrap();

        assert_eq!(doc.len(), 4);
        assert_eq!(get(&doc, "app.device.web.url"), Some("http://grid:4444/wd/hub"));
        assert_eq!(get(&doc, "app.notification.slack.channel"), Some("#qa"));
        assert_eq!(get(&doc, "app.name"), Some("test-suite"));
        assert_eq!(get(&doc, "empty"), Some(""));
    }

    #[test]
    fn value_keeps_later_separators() {
        let doc = parse("jdbc.url=jdbc:postgresql://db1:5432/app?ssl=true\n").unwrap();
        assert_eq!(get(&doc, "jdbc.url"), Some("jdbc:postgresql://db1:5432/app?ssl=true"));
    }

    #[test]
    fn continuation_lines_are_joined() {
        let doc = parse("browsers = chrome, \\\n    firefox, \\\n    safari\nnext=1\n").unwrap();
        assert_eq!(get(&doc, "browsers"), Some("chrome, firefox, safari"));
        assert_eq!(get(&doc, "next"), Some("1"));
    }

    #[test]
    fn escaped_backslash_is_not_a_continuation() {
        let doc = parse("path=C:\\\\temp\\\\\nother=x\n").unwrap();
        assert_eq!(get(&doc, "path"), Some("C:\\temp\\"));
        assert_eq!(get(&doc, "other"), Some("x"));
    }

    #[test]
    fn escapes_in_keys_and_values() {
        let doc = parse("key\\ with\\=sep=tab\\there \\u00e9\n").unwrap();
        assert_eq!(get(&doc, "key with=sep"), Some("tab\there é"));
    }

    #[test]
    fn malformed_unicode_escape_fails() {
        let err = parse("ok=1\nbad=\\u12\n").unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");
    }

    #[test]
    fn surrogate_pairs_decode_to_one_char() {
        let doc = parse("emoji=\\uD83D\\uDE00\nplain=\\u00e9\n").unwrap();
        assert_eq!(get(&doc, "emoji"), Some("\u{1F600}"));
        assert_eq!(get(&doc, "plain"), Some("é"));
    }

    #[test]
    fn lone_surrogates_are_rejected() {
        let err = parse("high=\\uD83D\n").unwrap_err();
        assert!(err.contains("unpaired surrogate"), "{err}");

        let err = parse("low=\\uDE00\n").unwrap_err();
        assert!(err.contains("unpaired surrogate"), "{err}");

        assert!(parse("mixed=\\uD83D\\u0041\n").is_err());
        assert!(parse("cut=\\uD83Dx\n").is_err());
    }

    #[test]
    fn later_duplicates_win() {
        let doc = parse("a=1\na=2\n").unwrap();
        assert_eq!(get(&doc, "a"), Some("2"));
    }
}
