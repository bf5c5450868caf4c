//! Heuristic field extractors: pure, total functions over normalized text.
//!
//! None of them fail: a field that cannot be found is `None` (or empty), and
//! no extractor reads another's output, so they can run in any order.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::ExtractedFields;
use crate::pipeline::normalizer::NormalizedText;
use crate::pipeline::sections::{extract_sections, is_section_header};
use crate::pipeline::skills::extract_skills;

/// Only the top of the document is searched for a name.
const NAME_SCAN_LINES: usize = 10;
const NAME_MAX_CHARS: usize = 60;
const NAME_WORDS: std::ops::RangeInclusive<usize> = 2..=4;

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[a-z0-9._%+-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,63}\b",
    )
    .expect("email pattern is valid")
});

// Optional country code, optional area code (bare or parenthesized), then two
// digit groups. Separators are space, dot or dash; never a line break.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\+?[0-9]{1,3}[ .-]?)?(?:\([0-9]{2,4}\)[ ]?|[0-9]{2,4}[ .-]?)?[0-9]{3,4}[ .-]?[0-9]{3,5}\b",
    )
    .expect("phone pattern is valid")
});

/// Runs every extractor over the same normalized text.
pub fn extract_fields(text: &NormalizedText) -> ExtractedFields {
    ExtractedFields {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        skills: extract_skills(text),
        sections: extract_sections(text),
    }
}

/// First line near the top that looks like a personal name. Resumes put the
/// name first, so document order decides between several candidates.
pub fn extract_name(text: &NormalizedText) -> Option<String> {
    text.lines()
        .take(NAME_SCAN_LINES)
        .find(|line| is_plausible_name(line))
        .map(str::to_string)
}

pub fn extract_email(text: &NormalizedText) -> Option<String> {
    EMAIL_RE
        .find(text.cased())
        .map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &NormalizedText) -> Option<String> {
    let cased = text.cased();
    PHONE_RE
        .find_iter(cased)
        .filter(|m| {
            // A match starting mid-number is a fragment of something longer
            !cased[..m.start()].ends_with(|c: char| c.is_ascii_digit())
        })
        .map(|m| m.as_str().trim())
        .find(|candidate| is_plausible_phone(candidate))
        .map(str::to_string)
}

fn is_plausible_name(line: &str) -> bool {
    if line.chars().count() > NAME_MAX_CHARS || is_section_header(line) {
        return false;
    }
    let words: Vec<&str> = line.split(' ').collect();
    NAME_WORDS.contains(&words.len()) && words.iter().all(|w| is_name_word(w))
}

fn is_name_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    // Capitalized, letters plus the punctuation found in names ("O'Neil", "Mary-Jane", "J.")
    first.is_alphabetic()
        && !first.is_lowercase()
        && chars.all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\'' | '\u{2019}'))
}

fn is_plausible_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_DIGITS.contains(&digits) {
        return false;
    }
    // "2015-2019 2020" is a run of years, not a number
    let groups: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    !groups
        .iter()
        .all(|g| g.len() == 4 && (g.starts_with("19") || g.starts_with("20")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(raw: &str) -> NormalizedText {
        NormalizedText::new(raw)
    }

    #[test]
    fn test_partial_extraction_tolerance() {
        let fields = extract_fields(&text("Jane Doe\njane@example.com\nPython, SQL"));
        assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.email.as_deref(), Some("jane@example.com"));
        assert!(fields.skills.contains("Python"));
        assert!(fields.skills.contains("SQL"));
        assert_eq!(fields.phone, None);
    }

    #[test]
    fn test_extractors_are_total_on_degenerate_input() {
        let inputs = [
            "",
            "   ",
            "\n\t\n",
            "履歴書 🚀 ünïcödé — ✓✓✓",
            "\u{0000}\u{FFFD}\u{200B}",
            "@@@ ... --- ()()",
        ];
        for raw in inputs {
            let fields = extract_fields(&text(raw));
            assert_eq!(fields.email, None, "{raw:?}");
            assert_eq!(fields.phone, None, "{raw:?}");
            assert!(fields.skills.is_empty(), "{raw:?}");
            assert!(fields.sections.is_empty(), "{raw:?}");
        }
        assert_eq!(extract_name(&text("")), None);
        assert_eq!(extract_name(&text("   ")), None);
    }

    #[test]
    fn test_extractors_are_order_independent() {
        let t = text("John Smith\n+1 (555) 123-4567\njohn@smith.io\nSkills: Rust, Docker");
        let forward = (
            extract_name(&t),
            extract_email(&t),
            extract_phone(&t),
            extract_skills(&t),
            extract_sections(&t),
        );
        let sections = extract_sections(&t);
        let skills = extract_skills(&t);
        let phone = extract_phone(&t);
        let email = extract_email(&t);
        let name = extract_name(&t);
        assert_eq!(forward, (name, email, phone, skills, sections));
    }

    #[test]
    fn test_extract_name_cases() {
        let cases: &[(&str, Option<&str>)] = &[
            ("Jane Doe\nEngineer", Some("Jane Doe")),
            ("  JOHN   SMITH  \nResume", Some("JOHN SMITH")),
            ("Mary-Jane O'Neil\nx", Some("Mary-Jane O'Neil")),
            ("José Álvarez Ruiz", Some("José Álvarez Ruiz")),
            ("Curriculum\njane@example.com\nJane Doe", Some("Jane Doe")),
            ("Education\nJane Doe", Some("Jane Doe")),
            ("Work Experience\nAcme Corp Ltd 2019", None),
            ("jane doe", None),
            ("Madonna", None),
            ("Call 555 123 4567", None),
            ("Skills: Python, SQL", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(extract_name(&text(raw)).as_deref(), *expected, "input {raw:?}");
        }
    }

    #[test]
    fn test_extract_name_prefers_first_candidate() {
        let t = text("Alice Walker\nBob Marley\nCarol King");
        assert_eq!(extract_name(&t).as_deref(), Some("Alice Walker"));
    }

    #[test]
    fn test_extract_name_only_scans_top_of_document() {
        let mut raw = "x\n".repeat(NAME_SCAN_LINES);
        raw.push_str("Jane Doe");
        assert_eq!(extract_name(&text(&raw)), None);
    }

    #[test]
    fn test_bidi_marks_from_pdf_text_do_not_hide_fields() {
        let fields = extract_fields(&text(concat!(
            "\u{200E}Jane Doe\u{200F}\n",
            "Phone: \u{202A}(555) 123-4567\u{202C}\n",
            "\u{2066}jane@example.com\u{2069}",
        )));
        assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.email.as_deref(), Some("jane@example.com"));
        assert_eq!(fields.phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_extract_email_cases() {
        let cases: &[(&str, Option<&str>)] = &[
            ("contact: jane@example.com", Some("jane@example.com")),
            ("Jane.Doe+cv@mail.example.co.uk.", Some("Jane.Doe+cv@mail.example.co.uk")),
            ("first a@b.io then c@d.org", Some("a@b.io")),
            ("jane@localhost", None),
            ("@example.com", None),
            ("jane@-bad.com", None),
            ("no email here", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(extract_email(&text(raw)).as_deref(), *expected, "input {raw:?}");
        }
    }

    #[test]
    fn test_extract_phone_cases() {
        let cases: &[(&str, Option<&str>)] = &[
            ("Phone: +1 (555) 123-4567", Some("+1 (555) 123-4567")),
            ("Mobile 555-123-4567", Some("555-123-4567")),
            ("call 9876543210 now", Some("9876543210")),
            ("+91 98765 43210", Some("+91 98765 43210")),
            ("tel 555.123.4567", Some("555.123.4567")),
            ("worked 2015-2019 2020-2022", None),
            ("short 123-4567", None),
            ("id 12345678901234567890", None),
            ("no digits", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(extract_phone(&text(raw)).as_deref(), *expected, "input {raw:?}");
        }
    }
}
