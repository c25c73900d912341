//! Escalating extraction passes
//!
//! All three passes share one runner; a `PassConfig` says how strict each one
//! is. The looser passes only run while fewer than `MIN_CONFIDENT_PLAYERS`
//! names have been accepted.

use super::classifier::{self, LineClass};
use super::leadership::{self, Leadership};
use super::rules;
use super::validator;
use super::{Line, PlayerCandidate, RoleContext, EXPECTED_PLAYERS, MIN_CONFIDENT_PLAYERS};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Surnames accepted by the surname pass even when shorter than four letters.
/// Longer single tokens are accepted without a dictionary hit.
const KNOWN_SURNAMES: &[&str] = &[
    "ali", "rao", "dar", "lee", "fox", "roy", "rana", "gill", "pant", "iyer", "axar", "dube",
    "head", "root", "wood", "kohli", "sharma", "dhoni", "bumrah", "jadeja", "rahul", "pandya",
    "ashwin", "chahal", "kumar", "shami", "siraj", "yadav", "kishan", "samson", "thakur",
    "patel", "jaiswal", "warner", "smith", "cummins", "starc", "stokes", "buttler", "babar",
    "rizwan", "afridi", "rashid", "maxwell", "boult", "rabada", "miller", "russell", "narine",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Structured,
    Aggressive,
    Surname,
}

/// How many words a line may have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    Any,
    /// At least two words, biasing towards full names
    MultiWord,
    SingleWord,
}

/// Strictness of one pass
#[derive(Debug, Clone)]
pub struct PassConfig {
    pub kind: PassKind,
    /// Role headers, skip rules, leadership markers and the name validator
    pub classify: bool,
    pub length: RangeInclusive<usize>,
    /// Allow the punctuation real names carry, otherwise letters only
    pub name_punctuation: bool,
    pub shape: TokenShape,
    /// Single tokens shorter than this must be known surnames
    pub dictionary_below: usize,
    pub stop_at_full_team: bool,
}

impl PassConfig {
    pub fn structured() -> Self {
        Self {
            kind: PassKind::Structured,
            classify: true,
            length: 2..=25,
            name_punctuation: true,
            shape: TokenShape::Any,
            dictionary_below: 0,
            stop_at_full_team: false,
        }
    }

    pub fn aggressive() -> Self {
        Self {
            kind: PassKind::Aggressive,
            classify: false,
            length: 3..=30,
            name_punctuation: true,
            shape: TokenShape::MultiWord,
            dictionary_below: 0,
            stop_at_full_team: true,
        }
    }

    pub fn surname() -> Self {
        Self {
            kind: PassKind::Surname,
            classify: false,
            length: 3..=15,
            name_punctuation: false,
            shape: TokenShape::SingleWord,
            dictionary_below: 4,
            stop_at_full_team: true,
        }
    }

    /// Shape checks used by the loose passes
    fn accepts_loose(&self, text: &str) -> bool {
        let len = text.chars().count();
        if !self.length.contains(&len) {
            return false;
        }
        let allowed = |c: char| {
            if self.name_punctuation {
                validator::is_name_char(c)
            } else {
                c.is_alphabetic()
            }
        };
        if !text.chars().all(allowed) || !text.chars().any(char::is_alphabetic)
        {
            return false;
        }
        let words = text.split_whitespace().count();
        let shape_ok = match self.shape {
            TokenShape::Any => true,
            TokenShape::MultiWord => words >= 2,
            TokenShape::SingleWord => words == 1,
        };
        if !shape_ok || rules::contains_denylisted_word(text) {
            return false;
        }
        len >= self.dictionary_below || KNOWN_SURNAMES.contains(&text.to_lowercase().as_str())
    }
}

/// The pass order, strictest first
pub fn default_passes() -> [PassConfig; 3] {
    [
        PassConfig::structured(),
        PassConfig::aggressive(),
        PassConfig::surname(),
    ]
}

/// What one pass contributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub kind: PassKind,
    pub added: usize,
}

/// Captain and vice-captain as assigned from line-level markers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaders {
    pub captain: Option<String>,
    pub vice_captain: Option<String>,
}

impl Leaders {
    /// The first captain marker wins. A vice-captain marker counts unless the
    /// same line just assigned the captain; nothing is ever reassigned.
    pub fn apply(&mut self, name: &str, flags: Leadership) {
        let mut took_captain = false;
        if flags.captain && self.captain.is_none() {
            self.captain = Some(name.to_string());
            took_captain = true;
        }
        if flags.vice_captain
            && !took_captain
            && self.vice_captain.is_none()
            && self.captain.as_deref() != Some(name)
        {
            self.vice_captain = Some(name.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub candidates: Vec<PlayerCandidate>,
    pub leaders: Leaders,
    pub reports: Vec<PassReport>,
}

/// The accepted name that overlaps `name`, compared case-insensitively as a
/// substring in either direction so "Kohli" matches "Virat Kohli"
pub fn represented_by<'a>(accepted: &'a [PlayerCandidate], name: &str) -> Option<&'a str> {
    let needle = name.to_lowercase();
    accepted
        .iter()
        .map(|c| c.cleaned_name.as_str())
        .find(|existing| {
            let existing = existing.to_lowercase();
            existing.contains(&needle) || needle.contains(&existing)
        })
}

/// Run the passes in order until enough players are found
pub fn run(lines: &[Line]) -> PassOutcome {
    run_with(lines, &default_passes())
}

pub fn run_with(lines: &[Line], passes: &[PassConfig]) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for (i, config) in passes.iter().enumerate() {
        if i > 0 && outcome.candidates.len() >= MIN_CONFIDENT_PLAYERS {
            tracing::debug!(
                "{} players found, skipping {:?} pass",
                outcome.candidates.len(),
                config.kind
            );
            break;
        }
        let added = run_pass(config, lines, &mut outcome);
        tracing::debug!(
            "{:?} pass added {} player(s), {} total",
            config.kind,
            added,
            outcome.candidates.len()
        );
        outcome.reports.push(PassReport {
            kind: config.kind,
            added,
        });
    }

    outcome
}

/// What is left of a marked line once the markers are gone must not be noise
/// itself
fn still_a_name(name: &str) -> bool {
    rules::first_skip_rule(name).is_none() && !rules::contains_denylisted_word(name)
}

fn run_pass(config: &PassConfig, lines: &[Line], outcome: &mut PassOutcome) -> usize {
    let before = outcome.candidates.len();

    if config.classify {
        for classified in classifier::classify_lines(lines) {
            let LineClass::Candidate { overridden } = classified.class else {
                continue;
            };
            let flags = classified.leadership;
            let line = classified.line;
            // A marker keeps the line, not the noise that would have skipped it
            let text = match overridden.and_then(rules::skip_rule) {
                Some(rule) => rule.strip(&line.text),
                None => line.text.clone(),
            };
            let Some(name) = leadership::cleaned_name(&text, flags)
                .filter(|name| config.length.contains(&name.chars().count()))
                .filter(|name| !flags.any() || still_a_name(name))
            else {
                tracing::trace!("Discarding line {}: {:?}", line.index, line.text);
                continue;
            };
            if let Some(rule) = overridden {
                tracing::trace!("Leadership marker overrode {} for {:?}", rule, name);
            }

            if let Some(existing) = represented_by(&outcome.candidates, &name) {
                // A repeat can still carry the marker the first sighting lacked
                if flags.any() {
                    let existing = existing.to_string();
                    outcome.leaders.apply(&existing, flags);
                }
                continue;
            }

            outcome.leaders.apply(&name, flags);
            outcome.candidates.push(PlayerCandidate {
                raw_line: line.text.clone(),
                cleaned_name: name,
                role: classified.role,
                is_captain: flags.captain,
                is_vice_captain: flags.vice_captain,
            });
        }
    } else {
        for line in lines {
            if config.stop_at_full_team && outcome.candidates.len() >= EXPECTED_PLAYERS {
                break;
            }
            let text = line.text.trim();
            if !config.accepts_loose(text) || represented_by(&outcome.candidates, text).is_some() {
                continue;
            }
            outcome.candidates.push(PlayerCandidate {
                raw_line: line.text.clone(),
                cleaned_name: text.to_string(),
                role: RoleContext::Unknown,
                is_captain: false,
                is_vice_captain: false,
            });
        }
    }

    outcome.candidates.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::split_lines;

    fn names(outcome: &PassOutcome) -> Vec<&str> {
        outcome
            .candidates
            .iter()
            .map(|c| c.cleaned_name.as_str())
            .collect()
    }

    #[test]
    fn test_represented_by_substring() {
        let outcome = run(&split_lines("Virat Kohli"));
        assert_eq!(represented_by(&outcome.candidates, "KOHLI"), Some("Virat Kohli"));
        assert_eq!(
            represented_by(&outcome.candidates, "Virat Kohli Jr"),
            Some("Virat Kohli")
        );
        assert_eq!(represented_by(&outcome.candidates, "Rohit Sharma"), None);
    }

    #[test]
    fn test_partial_repeat_is_not_readded() {
        let outcome = run(&split_lines("Virat Kohli\nKohli\nKOHLI"));
        assert_eq!(names(&outcome), vec!["Virat Kohli"]);
    }

    #[test]
    fn test_repeat_line_carries_marker() {
        let outcome = run(&split_lines("Virat Kohli\nRohit Sharma\nKohli (c)"));
        assert_eq!(outcome.leaders.captain.as_deref(), Some("Virat Kohli"));
        assert!(!outcome.candidates[0].is_captain);
    }

    #[test]
    fn test_marker_on_chrome_line_keeps_only_the_name() {
        let outcome = run(&split_lines("Team captain: Virat Kohli\nRohit Sharma"));
        assert_eq!(names(&outcome), vec!["Virat Kohli", "Rohit Sharma"]);
        assert_eq!(outcome.leaders.captain.as_deref(), Some("Virat Kohli"));
    }

    #[test]
    fn test_marker_cannot_promote_leftover_chrome() {
        let outcome = run(&split_lines("Pick your captain\nCaptain of the side\nVirat Kohli"));
        assert_eq!(names(&outcome), vec!["Virat Kohli"]);
        assert_eq!(outcome.leaders.captain, None);
    }

    #[test]
    fn test_leaders_first_captain_wins() {
        let mut leaders = Leaders::default();
        let captain = Leadership {
            captain: true,
            vice_captain: false,
        };
        leaders.apply("Virat Kohli", captain);
        leaders.apply("Rohit Sharma", captain);
        assert_eq!(leaders.captain.as_deref(), Some("Virat Kohli"));
        assert_eq!(leaders.vice_captain, None);
    }

    #[test]
    fn test_leaders_both_flags_on_one_line() {
        let both = Leadership {
            captain: true,
            vice_captain: true,
        };
        let mut leaders = Leaders::default();
        leaders.apply("Virat Kohli", both);
        assert_eq!(leaders.captain.as_deref(), Some("Virat Kohli"));
        assert_eq!(leaders.vice_captain, None);

        // With a captain already chosen, the same markers make a vice-captain
        leaders.apply("Rohit Sharma", both);
        assert_eq!(leaders.captain.as_deref(), Some("Virat Kohli"));
        assert_eq!(leaders.vice_captain.as_deref(), Some("Rohit Sharma"));
    }

    #[test]
    fn test_loose_pass_shapes() {
        let aggressive = PassConfig::aggressive();
        assert!(aggressive.accepts_loose("Quinton de Kock"));
        assert!(!aggressive.accepts_loose("Bumrah"));
        assert!(!aggressive.accepts_loose("All Rounders"));
        assert!(!aggressive.accepts_loose("Virat Kohli 9.5"));

        let surname = PassConfig::surname();
        assert!(surname.accepts_loose("Bumrah"));
        assert!(surname.accepts_loose("Ali"));
        assert!(!surname.accepts_loose("Xyz"));
        assert!(!surname.accepts_loose("Virat Kohli"));
        assert!(!surname.accepts_loose("Bowlers"));
        assert!(!surname.accepts_loose("O'Brien"));
        assert!(!surname.accepts_loose("Venkateshwaranathan"));
    }

    #[test]
    fn test_loose_passes_stop_at_eleven() {
        let lines = split_lines(
            "Alpha Bravo\nCharlie Delta\nEcho Foxtrot\nGolf Hotel\nIndia Juliet\nKilo Lima\n\
             Mike November\nOscar Papa\nQuebec Romeo\nSierra Tango\nUniform Victor\n\
             Whiskey Xray\nYankee Zulu",
        );
        let outcome = run_with(&lines, &[PassConfig::aggressive()]);
        assert_eq!(outcome.candidates.len(), EXPECTED_PLAYERS);
        assert_eq!(outcome.candidates[10].cleaned_name, "Uniform Victor");
    }

    #[test]
    fn test_escalation_skipped_when_enough() {
        let text = "Virat Kohli\nRohit Sharma\nMS Dhoni\nJasprit Bumrah\nRavindra Jadeja\nKL Rahul\nHardik Pandya\nR Ashwin\nKuldeep Yadav Extra Long Name";
        let outcome = run(&split_lines(text));
        assert_eq!(
            outcome.reports,
            vec![PassReport {
                kind: PassKind::Structured,
                added: 8
            }]
        );
    }
}
