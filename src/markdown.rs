//! Lexer for the markdown subset the chat UI emits: bold/italic emphasis,
//! two bullet levels, and numbered-list detection (numbered lines stay plain
//! text so their numerals survive).

use std::sync::OnceLock;

use regex::Regex;

use crate::glyph;
use crate::model::{Indent, LineToken, StyledRun};

/// Lines that open with `1. `, `23. ` etc. are never bullets, regardless of
/// leading whitespace; they render verbatim.
fn numbered_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\.\s").unwrap())
}

/// Detect a bullet marker at the start of `line` (already tab-stripped).
/// Returns the content after the marker, or None when the line is not a
/// bullet. Markers: `•` or `-` followed by whitespace or end of line, or a
/// single `*` not immediately followed by a second `*` (two asterisks open
/// bold emphasis instead).
fn strip_bullet_marker(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    match first {
        '•' => Some(rest.strip_prefix(char::is_whitespace).unwrap_or(rest)),
        '-' if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            Some(rest.strip_prefix(char::is_whitespace).unwrap_or(rest))
        }
        '*' if !rest.starts_with('*') => {
            Some(rest.strip_prefix(char::is_whitespace).unwrap_or(rest))
        }
        _ => None,
    }
}

/// Parse one text body into a flat token stream. Glyph normalization runs
/// first, so the emitted runs only contain drawable characters.
pub fn parse(text: &str) -> Vec<LineToken> {
    let normalized = glyph::normalize(text);
    let mut tokens = Vec::new();

    for raw_line in normalized.split('\n') {
        let line = raw_line.trim_end_matches('\r');

        if line.trim().is_empty() {
            // Blank spacing, never a zero-width bullet.
            tokens.push(LineToken::ParagraphBreak);
            continue;
        }

        if numbered_list_re().is_match(line) {
            tokenize_inline(line, &mut tokens);
            tokens.push(LineToken::LineEnd);
            continue;
        }

        let (tabbed, unprefixed) = match line.strip_prefix('\t') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        match strip_bullet_marker(unprefixed) {
            Some(content) => {
                let indent = if tabbed { Indent::Sub } else { Indent::Main };
                tokens.push(LineToken::BulletStart(indent));
                // A bare marker still yields the bullet line, just empty.
                tokenize_inline(content, &mut tokens);
            }
            None => tokenize_inline(line, &mut tokens),
        }
        tokens.push(LineToken::LineEnd);
    }

    tokens
}

/// Tokenize a body with no style parsing at all: each line becomes one plain
/// run, blank lines become paragraph spacing. Used for unstyled text blocks,
/// which wrap at fixed width but keep markers and asterisks verbatim.
pub fn plain(text: &str) -> Vec<LineToken> {
    let normalized = glyph::normalize(text);
    let mut tokens = Vec::new();
    for raw_line in normalized.split('\n') {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            tokens.push(LineToken::ParagraphBreak);
        } else {
            tokens.push(LineToken::Run(StyledRun::plain(line)));
            tokens.push(LineToken::LineEnd);
        }
    }
    tokens
}

/// Inline emphasis scanner. `***` toggles bold+italic together and must be
/// tested before the shorter delimiters — a `**` check alone would eat two of
/// the three asterisks. A delimiter that opens emphasis with no matching
/// close ahead on the line is emitted literally instead of toggling.
fn tokenize_inline(line: &str, out: &mut Vec<LineToken>) {
    let mut bold = false;
    let mut italic = false;
    let mut buf = String::new();
    let bytes = line.as_bytes();
    let mut i = 0;

    let mut flush = |buf: &mut String, bold: bool, italic: bool| {
        if !buf.is_empty() {
            out.push(LineToken::Run(StyledRun {
                text: std::mem::take(buf),
                bold,
                italic,
            }));
        }
    };

    while i < bytes.len() {
        let rest = &line[i..];
        if rest.starts_with("***") {
            let closes = bold && italic;
            if closes || rest[3..].contains("***") {
                flush(&mut buf, bold, italic);
                bold = !bold;
                italic = !italic;
            } else {
                buf.push_str("***");
            }
            i += 3;
        } else if rest.starts_with("**") {
            if bold || rest[2..].contains("**") {
                flush(&mut buf, bold, italic);
                bold = !bold;
            } else {
                buf.push_str("**");
            }
            i += 2;
        } else if rest.starts_with('*') {
            if italic || rest[1..].contains('*') {
                flush(&mut buf, bold, italic);
                italic = !italic;
            } else {
                buf.push('*');
            }
            i += 1;
        } else {
            let c = rest.chars().next().unwrap_or('\0');
            buf.push(c);
            i += c.len_utf8();
        }
    }
    flush(&mut buf, bold, italic);
}
