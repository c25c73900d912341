//! Team extraction from raw OCR text
//!
//! OCR flattens a team screenshot into loosely ordered lines mixing player
//! rows with UI chrome. The pipeline classifies lines, validates candidate
//! names, resolves captain and vice-captain markers, escalates through
//! progressively looser passes when too few players were found, and finally
//! assembles a deduplicated `ExtractionResult`.

pub mod assemble;
pub mod classifier;
pub mod leadership;
pub mod passes;
pub mod rules;
pub mod validator;

use crate::error::OcrError;
use serde::Serialize;

/// Players in a complete team
pub const EXPECTED_PLAYERS: usize = 11;

/// Below this many players the looser passes run and the result is partial
pub const MIN_CONFIDENT_PLAYERS: usize = 8;

/// A trimmed, non-empty line of OCR output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub index: usize,
}

/// Split recognized text on any line break, trimming and dropping empty lines
pub fn split_lines(raw: &str) -> Vec<Line> {
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(index, text)| Line {
            text: text.to_string(),
            index,
        })
        .collect()
}

/// Player category announced by the most recent role header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleContext {
    #[default]
    Unknown,
    WicketKeeper,
    Batter,
    Bowler,
    AllRounder,
}

/// A player accepted by one of the passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerCandidate {
    #[serde(skip)]
    pub raw_line: String,
    #[serde(rename = "name")]
    pub cleaned_name: String,
    pub role: RoleContext,
    #[serde(rename = "isCaptain")]
    pub is_captain: bool,
    #[serde(rename = "isViceCaptain")]
    pub is_vice_captain: bool,
}

/// The team recovered from one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub players: Vec<String>,
    pub captain: String,
    pub vice_captain: String,
    #[serde(rename = "playerDetails")]
    pub player_details: Vec<PlayerCandidate>,
    #[serde(rename = "extractedCount")]
    pub extracted_count: usize,
    #[serde(rename = "expectedCount")]
    pub expected_count: usize,
    #[serde(rename = "rawText")]
    pub raw_text: String,
}

impl ExtractionResult {
    /// Fewer players than needed to trust the result without manual review
    pub fn is_partial(&self) -> bool {
        self.extracted_count < MIN_CONFIDENT_PLAYERS
    }
}

/// Extraction result together with what each pass contributed
#[derive(Debug, Clone)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub passes: Vec<passes::PassReport>,
}

/// Run the full pipeline over raw OCR text
pub fn extract(raw_text: &str) -> Result<Extraction, OcrError> {
    if raw_text.trim().is_empty() {
        return Err(OcrError::NoTextDetected);
    }

    let lines = split_lines(raw_text);
    let outcome = passes::run(&lines);
    let result = assemble::assemble(raw_text, outcome.candidates, &outcome.leaders);

    tracing::info!(
        "Extracted {}/{} players over {} pass(es), captain: {:?}, vice-captain: {:?}",
        result.extracted_count,
        EXPECTED_PLAYERS,
        outcome.reports.len(),
        result.captain,
        result.vice_captain
    );

    Ok(Extraction {
        result,
        passes: outcome.reports,
    })
}

#[cfg(test)]
mod tests {
    use super::passes::PassKind;
    use super::*;

    const ROSTER: &str = "Virat Kohli (c)\nRohit Sharma (vc)\nMS Dhoni\nJasprit Bumrah\nRavindra Jadeja\nKL Rahul\nHardik Pandya\nR Ashwin\nYuzvendra Chahal\nBhuvneshwar Kumar\nMohammed Shami";

    fn assert_invariants(result: &ExtractionResult) {
        assert!(result.players.len() <= EXPECTED_PLAYERS);
        assert_eq!(result.extracted_count, result.players.len());
        assert_eq!(result.player_details.len(), result.players.len());
        assert_eq!(result.expected_count, EXPECTED_PLAYERS);
        for (i, a) in result.players.iter().enumerate() {
            for b in &result.players[i + 1..] {
                assert!(!a.eq_ignore_ascii_case(b), "duplicate {a:?} / {b:?}");
            }
        }
        for leader in [&result.captain, &result.vice_captain] {
            if !leader.is_empty() {
                assert!(
                    result.players.iter().any(|p| p.eq_ignore_ascii_case(leader)),
                    "{leader:?} is not a player"
                );
            }
        }
    }

    fn kinds(extraction: &Extraction) -> Vec<PassKind> {
        extraction.passes.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn test_split_lines_trims_and_drops_empties() {
        let lines = split_lines("  Virat Kohli \r\n\r\n\tMS Dhoni\rKL Rahul\n   \n");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Virat Kohli", "MS Dhoni", "KL Rahul"]);
        assert_eq!(lines[2].index, 2);
    }

    #[test]
    fn test_bracket_markers_roster() {
        let extraction = extract(ROSTER).unwrap();
        let result = &extraction.result;
        assert_invariants(result);
        assert_eq!(result.players.len(), 11);
        assert_eq!(result.captain, "Virat Kohli");
        assert_eq!(result.vice_captain, "Rohit Sharma");
        assert!(result.player_details[0].is_captain);
        assert!(result.player_details[1].is_vice_captain);
        assert_eq!(result.raw_text, ROSTER);
    }

    #[test]
    fn test_colon_labels_roster() {
        let text = ROSTER
            .replace("Virat Kohli (c)", "Captain: Virat Kohli")
            .replace("Rohit Sharma (vc)", "Vice Captain: Rohit Sharma");
        let result = extract(&text).unwrap().result;
        assert_invariants(&result);
        assert_eq!(result.players.len(), 11);
        assert_eq!(result.captain, "Virat Kohli");
        assert_eq!(result.vice_captain, "Rohit Sharma");
    }

    #[test]
    fn test_selection_prompt_is_not_a_player() {
        let text = format!("Choose your Captain and Vice Captain\n{}", ROSTER);
        let result = extract(&text).unwrap().result;
        assert_invariants(&result);
        assert_eq!(result.players.len(), 11);
        assert_eq!(result.players[0], "Virat Kohli");
        assert_eq!(result.players[10], "Mohammed Shami");
        assert_eq!(result.captain, "Virat Kohli");
        assert_eq!(result.vice_captain, "Rohit Sharma");
    }

    #[test]
    fn test_chrome_around_label_is_dropped() {
        let text = ROSTER.replace("Virat Kohli (c)", "Team captain: Virat Kohli");
        let result = extract(&text).unwrap().result;
        assert_invariants(&result);
        assert_eq!(result.players[0], "Virat Kohli");
        assert_eq!(result.captain, "Virat Kohli");
    }

    #[test]
    fn test_badge_lines_below_players() {
        let text = ROSTER
            .replace("Virat Kohli (c)", "Virat Kohli\nC")
            .replace("Rohit Sharma (vc)", "Rohit Sharma\nVC");
        let result = extract(&text).unwrap().result;
        assert_invariants(&result);
        assert_eq!(result.players.len(), 11);
        assert_eq!(result.captain, "Virat Kohli");
        assert_eq!(result.vice_captain, "Rohit Sharma");
    }

    #[test]
    fn test_structured_pass_alone_suffices() {
        let extraction = extract(ROSTER).unwrap();
        assert_eq!(kinds(&extraction), vec![PassKind::Structured]);
    }

    #[test]
    fn test_team_code_is_noise() {
        let text = format!("CSK\n{}", ROSTER);
        let result = extract(&text).unwrap().result;
        assert!(!result.players.iter().any(|p| p.eq_ignore_ascii_case("CSK")));
        assert_eq!(result.players.len(), 11);

        let alone = extract("CSK").unwrap().result;
        assert!(alone.players.is_empty());
        assert_invariants(&alone);
    }

    #[test]
    fn test_aggressive_pass_fills_shortfall() {
        // The last two lines are too long for the structured pass
        let text = "Virat Kohli\nRohit Sharma\nMS Dhoni\nJasprit Bumrah\nRavindra Jadeja\nKL Rahul\nRahmanullah Gurbaz Afghanistan\nMujeeb Ur Rahman Zadran Afghan";
        let extraction = extract(text).unwrap();
        assert_eq!(
            kinds(&extraction),
            vec![PassKind::Structured, PassKind::Aggressive]
        );
        assert_eq!(extraction.passes[0].added, 6);
        assert_eq!(extraction.passes[1].added, 2);
        assert_eq!(extraction.result.players.len(), 8);
        assert_invariants(&extraction.result);
    }

    #[test]
    fn test_surname_pass_runs_last() {
        let text = "Virat Kohli\nRohit Sharma\nMS Dhoni\nJasprit Bumrah\nRavindra Jadeja\nALI\nRAO\nXYZ";
        let extraction = extract(text).unwrap();
        assert_eq!(
            kinds(&extraction),
            vec![
                PassKind::Structured,
                PassKind::Aggressive,
                PassKind::Surname
            ]
        );
        let result = &extraction.result;
        assert_eq!(result.players.len(), 7);
        assert!(result.players.contains(&"ALI".to_string()));
        assert!(result.players.contains(&"RAO".to_string()));
        assert!(!result.players.contains(&"XYZ".to_string()));
        assert!(result.is_partial());
        assert_invariants(result);
    }

    #[test]
    fn test_noisy_screenshot() {
        let text = "Team Preview\n100 Credits Left\nWICKET-KEEPERS\nRishabh Pant\n9.5\nBATTERS\nVirat Kohli (C)\nShubman Gill\nSuryakumar Yadav\nALL-ROUNDERS\nHardik Pandya (VC)\nRavindra Jadeja\nAxar Patel\nBOWLERS\nJasprit Bumrah\nKuldeep Yadav\nMohammed Siraj\nArshdeep Singh\nIND\nAUS\nSave Team\nNext";
        let result = extract(text).unwrap().result;
        assert_invariants(&result);
        assert_eq!(result.players.len(), 11);
        assert_eq!(result.captain, "Virat Kohli");
        assert_eq!(result.vice_captain, "Hardik Pandya");
        assert_eq!(result.player_details[0].role, RoleContext::WicketKeeper);
        assert_eq!(result.player_details[1].role, RoleContext::Batter);
        assert_eq!(result.player_details[4].role, RoleContext::AllRounder);
        assert_eq!(result.player_details[7].role, RoleContext::Bowler);
        assert!(!result.players.iter().any(|p| p == "Next"));
    }

    #[test]
    fn test_truncates_to_eleven() {
        let text = format!("{}\nShubman Gill\nRishabh Pant", ROSTER);
        let result = extract(&text).unwrap().result;
        assert_eq!(result.players.len(), 11);
        assert_eq!(result.players[10], "Mohammed Shami");
        assert_invariants(&result);
    }

    #[test]
    fn test_idempotent() {
        let text = format!("Team Preview\n{}\nCaptain\n12.5 pts", ROSTER);
        assert_eq!(extract(&text).unwrap().result, extract(&text).unwrap().result);
    }

    #[test]
    fn test_empty_text_is_no_text() {
        assert!(matches!(extract(""), Err(OcrError::NoTextDetected)));
        assert!(matches!(extract("  \n\t\r\n "), Err(OcrError::NoTextDetected)));
    }

    #[test]
    fn test_serialized_field_names() {
        let result = extract(ROSTER).unwrap().result;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["captain"], "Virat Kohli");
        assert_eq!(json["vice_captain"], "Rohit Sharma");
        assert_eq!(json["extractedCount"], 11);
        assert_eq!(json["expectedCount"], 11);
        assert_eq!(json["playerDetails"][0]["name"], "Virat Kohli");
        assert_eq!(json["playerDetails"][0]["isCaptain"], true);
        assert_eq!(json["playerDetails"][1]["isViceCaptain"], true);
        assert_eq!(json["playerDetails"][0]["role"], "unknown");
        assert!(json["playerDetails"][0].get("raw_line").is_none());
        assert!(json["rawText"].as_str().unwrap().contains("MS Dhoni"));
    }
}
