//! Plausibility checks for player names

/// Scoreboard words OCR often leaves on a line of their own
const EXCLUDED: &[&str] = &[
    "BATTING", "BOWLING", "FIELDING", "EXTRAS", "TOTAL", "RUNS", "WICKETS", "OVERS",
];

pub const MAX_NAME_LEN: usize = 30;

/// Letters plus the punctuation that shows up in real names
pub fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, ' ' | '.' | '-' | '\'' | '\u{2019}')
}

/// Whether a cleaned line looks like a player's name.
///
/// Mononyms are allowed as long as they are at least three characters; short
/// all-caps tokens are rejected since they are nearly always team codes.
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();

    if len == 0 || len > MAX_NAME_LEN {
        return false;
    }
    if !name.chars().all(is_name_char) || !name.chars().any(char::is_alphabetic) {
        return false;
    }
    if len <= 3 && !name.chars().any(char::is_lowercase) {
        return false;
    }

    let upper = name.to_uppercase();
    if EXCLUDED.contains(&upper.as_str()) {
        return false;
    }

    name.contains(' ') || len >= 3
}
