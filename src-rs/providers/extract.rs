//! Pure content extractors for the reverse-engineered token-stream grammars.
//!
//! Both Typefully and the Cloudflare playground reply with chunked text made
//! of repeated `0:"<escaped-text>"` tokens. The extractors are free of I/O so
//! malformed input can be thrown at them directly in tests.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TYPEFULLY_TOKEN: Regex = Regex::new(r#"0:"(.*?)""#).unwrap();
    // Cloudflare terminates each token with `",` or end of line.
    static ref CLOUDFLARE_TOKEN: Regex = Regex::new(r#"0:"(.*?)"(,|$)"#).unwrap();
}

/// Content of the first `0:"..."` token on a Typefully stream line, unescaped.
/// Returns an empty string when the pattern is absent.
pub fn typefully_token(line: &str) -> String {
    match TYPEFULLY_TOKEN.captures(line).and_then(|caps| caps.get(1)) {
        Some(m) => unescape(m.as_str()),
        None => String::new(),
    }
}

/// Cloudflare variant of the same grammar.
pub fn cloudflare_token(line: &str) -> String {
    match CLOUDFLARE_TOKEN.captures(line).and_then(|caps| caps.get(1)) {
        Some(m) => unescape(m.as_str()),
        None => String::new(),
    }
}

/// Unescape `\n`, `\t`, `\"`, `\\` and `\uXXXX` sequences. Anything that
/// fails strict decoding is kept literally instead of failing the extraction.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match decode_unicode(&hex) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn decode_unicode(hex: &str) -> Option<char> {
    if hex.len() != 4 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typefully_unescapes_newlines() {
        assert_eq!(typefully_token(r#"0:"hello\n world""#), "hello\n world");
    }

    #[test]
    fn typefully_handles_tabs_quotes_and_backslashes() {
        assert_eq!(typefully_token(r#"0:"a\tb""#), "a\tb");
        assert_eq!(typefully_token(r#"0:"say \\hi""#), "say \\hi");
    }

    #[test]
    fn typefully_returns_empty_when_pattern_absent() {
        assert_eq!(typefully_token("e:{\"finishReason\":\"stop\"}"), "");
        assert_eq!(typefully_token(""), "");
    }

    #[test]
    fn unicode_escapes_decode_with_literal_fallback() {
        assert_eq!(unescape("caf\\u00e9"), "caf\u{e9}");
        // lone surrogate cannot decode, kept literally
        assert_eq!(unescape(r"bad\ud800seq"), "bad\\ud800seq");
        // truncated escape at end of input
        assert_eq!(unescape(r"oops\u00"), "oops\\u00");
    }

    #[test]
    fn cloudflare_token_stops_at_comma_terminator() {
        assert_eq!(cloudflare_token(r#"0:"chunk one","#), "chunk one");
        assert_eq!(cloudflare_token(r#"0:"end of line""#), "end of line");
        assert_eq!(cloudflare_token(r#"e:{"usage":{}}"#), "");
    }
}
