//! Noise rules shared by every pass
//!
//! Screenshots from different fantasy apps keep adding new labels, so the
//! knowledge of what is *not* a player lives in this one table. New UI
//! variants are handled by adding a rule or a word here.

use super::RoleContext;
use regex::Regex;
use std::sync::LazyLock;

/// Team abbreviations printed next to player names
pub const TEAM_CODES: &[&str] = &[
    "CSK", "MI", "RCB", "KKR", "SRH", "DC", "PBKS", "KXIP", "RR", "LSG", "GT", "IND", "AUS",
    "ENG", "PAK", "SA", "NZ", "WI", "SL", "BAN", "AFG", "IRE", "ZIM", "NED",
];

/// Words that never appear in a player line accepted by the loose passes
const DENYLIST: &[&str] = &[
    // roles
    "wicket", "keeper", "keepers", "wk", "batter", "batters", "batsman", "batsmen", "bowler",
    "bowlers", "all", "rounder", "rounders", "allrounder", "allrounders", "captain", "vice",
    // app chrome
    "team", "match", "preview", "save", "edit", "confirm", "submit", "credit", "credits",
    "remaining", "balance", "selected", "dream11", "points", "pts", "cr", "players", "player",
    "left", "lineup", "lineups", "announced", "playing", "squad", "create", "next", "back",
    "done", "contest", "join", "share", "view", "choose", "pick", "your",
    // prompt filler
    "and", "the", "of",
    // scoreboard
    "total", "runs", "wickets", "overs", "extras", "batting", "bowling", "fielding",
    // actions
    "tap", "click", "select", "cancel", "ok", "yes", "no",
];

static WICKET_KEEPER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)wicket[\s-]?keeper|\bwk\b").unwrap());
static ALL_ROUNDER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)all[\s-]?rounder").unwrap());
static BATTER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)batter|batsm[ae]n").unwrap());
static BOWLER_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)bowler").unwrap());

static UI_CHROME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(save|edit|confirm|submit|preview|credits?|remaining|balance|selected|team|match|points|pts|next|back|done|choose|pick|dream\s?11|d11)\b",
    )
    .unwrap()
});
static NUMERIC_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[+\-]?\d[\d\s.,:/%+\-]*(pts?|points|cr)?$").unwrap()
});
static ACTION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(tap|click|select|cancel|ok|yes|no)[.!]?$").unwrap()
});
static SCOREBOARD_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(total|runs|wickets|overs|extras|batting|bowling|fielding)\b").unwrap()
});

/// Role announced by a header line such as "BATTERS (4)"
pub fn role_header(line: &str) -> Option<RoleContext> {
    // "all-rounder" is checked before the others so "ALL-ROUNDERS" never
    // falls through to a looser match
    if ALL_ROUNDER_HEADER.is_match(line) {
        Some(RoleContext::AllRounder)
    } else if WICKET_KEEPER_HEADER.is_match(line) {
        Some(RoleContext::WicketKeeper)
    } else if BATTER_HEADER.is_match(line) {
        Some(RoleContext::Batter)
    } else if BOWLER_HEADER.is_match(line) {
        Some(RoleContext::Bowler)
    } else {
        None
    }
}

/// One named reason to treat a line as noise
pub struct SkipRule {
    pub name: &'static str,
    /// A leadership marker on the line keeps it as a candidate anyway
    pub overridable: bool,
    predicate: fn(&str) -> bool,
    /// Removes the words the rule matched, for rules that match part of a line
    strip: Option<fn(&str) -> String>,
}

impl SkipRule {
    pub fn matches(&self, line: &str) -> bool {
        (self.predicate)(line)
    }

    /// The line without the words that made it noise
    pub fn strip(&self, line: &str) -> String {
        match self.strip {
            Some(strip) => strip(line),
            None => line.to_string(),
        }
    }
}

/// Evaluated in order; the first match decides
pub static SKIP_RULES: &[SkipRule] = &[
    SkipRule {
        name: "ui_chrome",
        overridable: true,
        predicate: |line| UI_CHROME.is_match(line),
        strip: Some(strip_ui_chrome),
    },
    SkipRule {
        name: "team_code",
        overridable: true,
        predicate: is_team_code,
        strip: None,
    },
    SkipRule {
        name: "numeric_total",
        overridable: false,
        predicate: |line| NUMERIC_TOTAL.is_match(line),
        strip: None,
    },
    SkipRule {
        name: "single_character",
        overridable: false,
        predicate: |line| line.chars().count() == 1,
        strip: None,
    },
    SkipRule {
        name: "punctuation_only",
        overridable: false,
        predicate: |line| !line.chars().any(char::is_alphanumeric),
        strip: None,
    },
    SkipRule {
        name: "length_bounds",
        overridable: true,
        predicate: |line| {
            let len = line.chars().count();
            !(2..=30).contains(&len)
        },
        strip: None,
    },
    SkipRule {
        name: "action_word",
        overridable: true,
        predicate: |line| ACTION_WORD.is_match(line),
        strip: None,
    },
    SkipRule {
        name: "scoreboard_word",
        overridable: true,
        predicate: |line| SCOREBOARD_WORD.is_match(line),
        strip: Some(strip_scoreboard_words),
    },
];

/// First rule that marks the line as noise
pub fn first_skip_rule(line: &str) -> Option<&'static SkipRule> {
    SKIP_RULES.iter().find(|rule| rule.matches(line))
}

pub fn skip_rule(name: &str) -> Option<&'static SkipRule> {
    SKIP_RULES.iter().find(|rule| rule.name == name)
}

fn strip_ui_chrome(line: &str) -> String {
    UI_CHROME.replace_all(line, " ").into_owned()
}

fn strip_scoreboard_words(line: &str) -> String {
    SCOREBOARD_WORD.replace_all(line, " ").into_owned()
}

fn is_team_code(line: &str) -> bool {
    let upper = line.trim().to_uppercase();
    TEAM_CODES.contains(&upper.as_str())
}

/// True when any word of the line is a team code, role word or UI word
pub fn contains_denylisted_word(line: &str) -> bool {
    line.split(|c: char| c.is_whitespace() || matches!(c, '.' | '-' | '\''))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .any(|word| {
            DENYLIST.contains(&word.as_str())
                || TEAM_CODES.iter().any(|code| code.eq_ignore_ascii_case(&word))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(line: &str) -> Option<&'static str> {
        first_skip_rule(line).map(|rule| rule.name)
    }

    #[test]
    fn test_role_headers() {
        assert_eq!(role_header("WICKET-KEEPERS (1)"), Some(RoleContext::WicketKeeper));
        assert_eq!(role_header("Wicket Keeper"), Some(RoleContext::WicketKeeper));
        assert_eq!(role_header("WK"), Some(RoleContext::WicketKeeper));
        assert_eq!(role_header("BATTERS (4)"), Some(RoleContext::Batter));
        assert_eq!(role_header("Batsmen"), Some(RoleContext::Batter));
        assert_eq!(role_header("ALL-ROUNDERS (2)"), Some(RoleContext::AllRounder));
        assert_eq!(role_header("all rounder"), Some(RoleContext::AllRounder));
        assert_eq!(role_header("BOWLERS (4)"), Some(RoleContext::Bowler));
        assert_eq!(role_header("Virat Kohli"), None);
        assert_eq!(role_header("Hawkins"), None);
    }

    #[test]
    fn test_ui_chrome() {
        assert_eq!(rule_for("Team Preview"), Some("ui_chrome"));
        assert_eq!(rule_for("100 Credits Left"), Some("ui_chrome"));
        assert_eq!(rule_for("Dream11"), Some("ui_chrome"));
        assert_eq!(rule_for("SAVE"), Some("ui_chrome"));
        assert_eq!(rule_for("Steve Smith"), None);
    }

    #[test]
    fn test_team_codes() {
        assert_eq!(rule_for("CSK"), Some("team_code"));
        assert_eq!(rule_for("rcb"), Some("team_code"));
        assert_eq!(rule_for("PBKS"), Some("team_code"));
        assert_eq!(rule_for("Russell"), None);
    }

    #[test]
    fn test_numeric_totals() {
        assert_eq!(rule_for("9.5"), Some("numeric_total"));
        assert_eq!(rule_for("100 pts"), Some("numeric_total"));
        assert_eq!(rule_for("45.5 Cr"), Some("numeric_total"));
        assert_eq!(rule_for("11/11"), Some("numeric_total"));
        assert!(!first_skip_rule("9.5").unwrap().overridable);
    }

    #[test]
    fn test_character_rules() {
        assert_eq!(rule_for("C"), Some("single_character"));
        assert_eq!(rule_for("--"), Some("punctuation_only"));
        assert_eq!(rule_for("Abcdefghijklmnop Qrstuvwxyzabcdefg"), Some("length_bounds"));
    }

    #[test]
    fn test_action_and_scoreboard_words() {
        assert_eq!(rule_for("OK"), Some("action_word"));
        assert_eq!(rule_for("Cancel"), Some("action_word"));
        assert_eq!(rule_for("Total Runs"), Some("scoreboard_word"));
        assert_eq!(rule_for("BOWLING"), Some("scoreboard_word"));
        assert_eq!(rule_for("Nortje"), None);
    }

    #[test]
    fn test_strip_removes_matched_words() {
        let chrome = skip_rule("ui_chrome").unwrap();
        assert_eq!(chrome.strip("Team captain: Virat Kohli").trim(), "captain: Virat Kohli");
        let scoreboard = skip_rule("scoreboard_word").unwrap();
        assert_eq!(scoreboard.strip("Total Runs").trim(), "");
        let length = skip_rule("length_bounds").unwrap();
        assert_eq!(length.strip("Virat Kohli"), "Virat Kohli");
        assert!(skip_rule("no_such_rule").is_none());
    }

    #[test]
    fn test_prompt_words_are_chrome() {
        assert_eq!(rule_for("Choose Captain"), Some("ui_chrome"));
        assert!(contains_denylisted_word("Choose your and"));
    }

    #[test]
    fn test_denylisted_words() {
        assert!(contains_denylisted_word("All Rounders"));
        assert!(contains_denylisted_word("Team Preview"));
        assert!(contains_denylisted_word("MI Batting"));
        assert!(contains_denylisted_word("srh"));
        assert!(!contains_denylisted_word("Mitchell Starc"));
        assert!(!contains_denylisted_word("Quinton de Kock"));
    }
}
