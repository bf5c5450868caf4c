//! Section splitting over recognized resume headers.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::normalizer::NormalizedText;

/// Section label → header spellings that introduce it (lower-case).
const SECTION_HEADERS: &[(&str, &[&str])] = &[
    (
        "summary",
        &[
            "summary",
            "professional summary",
            "career objective",
            "objective",
            "profile",
            "about me",
        ],
    ),
    (
        "experience",
        &[
            "experience",
            "work experience",
            "professional experience",
            "experience details",
            "employment history",
            "work history",
            "company details",
        ],
    ),
    (
        "education",
        &[
            "education",
            "education details",
            "academic background",
            "academic qualifications",
            "educational qualifications",
        ],
    ),
    (
        "skills",
        &[
            "skills",
            "technical skills",
            "skill details",
            "key skills",
            "core competencies",
        ],
    ),
    (
        "projects",
        &[
            "projects",
            "project details",
            "academic projects",
            "personal projects",
        ],
    ),
    (
        "certifications",
        &["certifications", "certificates", "licenses & certifications"],
    ),
];

static ALIAS_TO_LABEL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    SECTION_HEADERS
        .iter()
        .flat_map(|(label, aliases)| aliases.iter().map(move |alias| (*alias, *label)))
        .collect()
});

/// A header is a line that starts with an alias followed by `:` or the end of the line.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut aliases: Vec<&str> = ALIAS_TO_LABEL.keys().copied().collect();
    // Longest first so "work experience" wins over "experience" at the same position
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = aliases
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?im)^({alternation})[ \t]*(?::|$)"))
        .expect("section header pattern is valid")
});

/// True when a single line of normalized text is a recognized section header.
pub fn is_section_header(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

/// Splits normalized text into labelled sections. Text before the first header
/// is not assigned; no recognized headers yields an empty map.
pub fn extract_sections(text: &NormalizedText) -> BTreeMap<String, String> {
    let cased = text.cased();

    let headers: Vec<(&'static str, usize, usize)> = HEADER_RE
        .captures_iter(cased)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let alias = caps.get(1)?.as_str().to_lowercase();
            let label = ALIAS_TO_LABEL.get(alias.as_str())?;
            Some((*label, whole.start(), whole.end()))
        })
        .collect();

    let mut sections: BTreeMap<String, String> = BTreeMap::new();
    for (i, &(label, _, content_start)) in headers.iter().enumerate() {
        let content_end = headers
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(cased.len());
        let content = cased[content_start..content_end].trim();

        // Repeated headers append to the same label
        let entry = sections.entry(label.to_string()).or_default();
        if !content.is_empty() {
            if !entry.is_empty() {
                entry.push('\n');
            }
            entry.push_str(content);
        }
    }

    sections
}
