//! Text normalization: the canonical form every extractor and the classifier read.
//!
//! Output invariants: `\n` is the only line separator, no control characters,
//! no format characters (zero-width, soft hyphen, bidi marks and embeddings,
//! BOM; Unicode category `Cf`), single spaces inside a line, no leading/trailing
//! spaces on a line, no empty lines. Any string satisfying these is a fixed
//! point, which makes `normalize` idempotent.

use std::sync::LazyLock;

use regex::Regex;

static FORMAT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Cf}+").expect("format class pattern is valid"));

/// Canonical, case-preserving text plus a case-folded view of it.
///
/// Structural extractors (name, sections) read `cased()`; token matchers
/// (skills) read `folded()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    cased: String,
    folded: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let cased = normalize(raw);
        let folded = cased.to_lowercase();
        Self { cased, folded }
    }

    pub fn cased(&self) -> &str {
        &self.cased
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.cased.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.cased.lines()
    }
}

/// Normalizes raw extracted text. Total and deterministic.
pub fn normalize(raw: &str) -> String {
    let raw = FORMAT_CHARS.replace_all(raw, "");
    let mut cleaned = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                // CRLF and lone CR both become one line break
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                cleaned.push('\n');
            }
            '\n' => cleaned.push('\n'),
            // Form feeds and the Unicode line/paragraph separators break lines
            '\u{000C}' | '\u{2028}' | '\u{2029}' => cleaned.push('\n'),
            // U+FFFD marks bytes that could not be decoded upstream
            '\u{FFFD}' => cleaned.push(' '),
            c if c.is_control() || c.is_whitespace() => cleaned.push(' '),
            c => cleaned.push(c),
        }
    }

    let mut out = String::with_capacity(cleaned.len());
    for line in cleaned.split('\n') {
        let mut words = line.split(' ').filter(|w| !w.is_empty()).peekable();
        if words.peek().is_none() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let mut first = true;
        for word in words {
            if !first {
                out.push(' ');
            }
            out.push_str(word);
            first = false;
        }
    }
    out
}
