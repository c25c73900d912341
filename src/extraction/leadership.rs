//! Captain and vice-captain markers
//!
//! Apps mark leaders with brackets ("(C)", "[VC]"), labels ("Captain:"),
//! a bare trailing letter ("Kohli C") or the word itself. The signals are not
//! mutually exclusive, so a single line can raise both flags.

use super::validator;
use regex::Regex;
use std::sync::LazyLock;

/// Cleaned names outside this range are discarded even when marked
const CLEAN_NAME_LEN: std::ops::RangeInclusive<usize> = 2..=25;

static VICE_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bvice[\s-]*captain\b").unwrap());
static VC_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[(\[]\s*v\s*\.?\s*c\s*\.?\s*[)\]]").unwrap());
static VC_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\bvice[\s-]*captain|\bvc)\s*:").unwrap());
static VC_EDGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^vc\s|\svc$|^vc$").unwrap());

static C_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[(\[]\s*c\s*\.?\s*[)\]]").unwrap());
static C_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\bcaptain|\bc)\s*:").unwrap());
static C_EDGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^c\s|\sc$|^c$").unwrap());
static CAPTAIN_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)captain").unwrap());

static LEADERSHIP_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(vice[\s-]*captain|captain|vice)\b").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Leadership flags found on one line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leadership {
    pub captain: bool,
    pub vice_captain: bool,
}

impl Leadership {
    pub fn any(&self) -> bool {
        self.captain || self.vice_captain
    }
}

/// Blank out every vice-captain signal so captain checks can't see "captain"
/// inside "vice captain" or the "c" inside "(vc)"
pub fn strip_vice_markers(text: &str) -> String {
    let text = VC_BRACKET.replace_all(text, " ");
    let text = VC_LABEL.replace_all(&text, " ");
    let text = VICE_PHRASE.replace_all(&text, " ");
    VC_EDGE.replace_all(text.trim(), " ").into_owned()
}

/// Detect captain / vice-captain markers on the original line text
pub fn detect(line: &str) -> Leadership {
    let line = line.trim();
    let vice_marked =
        VC_BRACKET.is_match(line) || VC_LABEL.is_match(line) || VC_EDGE.is_match(line);
    let vice_captain = vice_marked || VICE_PHRASE.is_match(line);

    let rest = strip_vice_markers(line);
    let rest = rest.trim();
    let captain_marked =
        C_BRACKET.is_match(rest) || C_LABEL.is_match(rest) || C_EDGE.is_match(rest);
    let captain = captain_marked || CAPTAIN_WORD.is_match(rest);

    // Naming both posts without marking either is a prompt such as
    // "Choose your Captain and Vice Captain", not a player row
    if captain && vice_captain && !captain_marked && !vice_marked {
        return Leadership::default();
    }

    Leadership {
        captain,
        vice_captain,
    }
}

/// Remove leadership markers, leaving just the name
pub fn clean(line: &str, flags: Leadership) -> String {
    let text = VC_BRACKET.replace_all(line, " ");
    let text = C_BRACKET.replace_all(&text, " ");
    let text = VC_LABEL.replace_all(&text, " ");
    let text = C_LABEL.replace_all(&text, " ");
    let mut text = LEADERSHIP_WORDS.replace_all(&text, " ").trim().to_string();

    if flags.vice_captain {
        text = VC_EDGE.replace_all(&text, " ").trim().to_string();
    }
    if flags.captain {
        text = C_EDGE.replace_all(&text, " ").trim().to_string();
    }

    let collapsed = WHITESPACE.replace_all(&text, " ");
    collapsed
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, ':' | '-' | '|' | ',' | '*' | '\u{2022}' | '\u{00b7}')
        })
        .to_string()
}

/// Clean a line and keep the result only if it still reads as a name
pub fn cleaned_name(line: &str, flags: Leadership) -> Option<String> {
    let name = clean(line, flags);
    let len = name.chars().count();
    (CLEAN_NAME_LEN.contains(&len) && validator::is_valid_name(&name)).then_some(name)
}
