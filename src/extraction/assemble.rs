//! Final result assembly and captain / vice-captain back-filling

use super::leadership;
use super::passes::Leaders;
use super::{ExtractionResult, PlayerCandidate, EXPECTED_PLAYERS};
use regex::Regex;
use std::sync::LazyLock;

/// Shortest captured fragment a template match may resolve to a player
const MIN_TEMPLATE_MATCH: usize = 3;

static CAPTAIN_TEMPLATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bcaptain\s*[:\-]\s*([a-z][a-z .'\-]{1,30})",
        r"(?i)\bc\s*:\s*([a-z][a-z .'\-]{1,30})",
        r"(?i)([a-z][a-z .'\-]{1,30}?)\s*[(\[]\s*c\s*[)\]]",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static VICE_CAPTAIN_TEMPLATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bvice[\s-]*captain\s*[:\-]\s*([a-z][a-z .'\-]{1,30})",
        r"(?i)\bvc\s*:\s*([a-z][a-z .'\-]{1,30})",
        r"(?i)([a-z][a-z .'\-]{1,30}?)\s*[(\[]\s*v\s*\.?\s*c\s*[)\]]",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Post {
    Captain,
    ViceCaptain,
}

/// Build the final result from the accepted candidates
pub fn assemble(
    raw_text: &str,
    mut candidates: Vec<PlayerCandidate>,
    leaders: &Leaders,
) -> ExtractionResult {
    candidates.truncate(EXPECTED_PLAYERS);
    let players: Vec<String> = candidates.iter().map(|c| c.cleaned_name.clone()).collect();

    let captain = resolve(Post::Captain, raw_text, &candidates, &players, leaders, None);
    let vice_captain = resolve(
        Post::ViceCaptain,
        raw_text,
        &candidates,
        &players,
        leaders,
        captain.as_deref(),
    );

    ExtractionResult {
        extracted_count: players.len(),
        expected_count: EXPECTED_PLAYERS,
        players,
        captain: captain.unwrap_or_default(),
        vice_captain: vice_captain.unwrap_or_default(),
        player_details: candidates,
        raw_text: raw_text.to_string(),
    }
}

/// Fall back through line markers, candidate flags, raw-text proximity and
/// finally the regex templates
fn resolve(
    post: Post,
    raw_text: &str,
    candidates: &[PlayerCandidate],
    players: &[String],
    leaders: &Leaders,
    exclude: Option<&str>,
) -> Option<String> {
    let allowed = |name: &str| exclude != Some(name);

    let assigned = match post {
        Post::Captain => leaders.captain.as_deref(),
        Post::ViceCaptain => leaders.vice_captain.as_deref(),
    };
    if let Some(name) = assigned.filter(|n| players.iter().any(|p| p == n) && allowed(*n)) {
        return Some(name.to_string());
    }

    let flagged = candidates
        .iter()
        .filter(|c| match post {
            Post::Captain => c.is_captain,
            Post::ViceCaptain => c.is_vice_captain,
        })
        .map(|c| c.cleaned_name.as_str())
        .find(|name| allowed(*name));
    if let Some(name) = flagged {
        return Some(name.to_string());
    }

    if let Some(name) = by_proximity(post, raw_text, players, exclude) {
        tracing::debug!("{:?} resolved by proximity: {}", post, name);
        return Some(name);
    }

    let found = by_template(post, raw_text, players, exclude);
    if let Some(name) = &found {
        tracing::debug!("{:?} resolved by template: {}", post, name);
    }
    found
}

/// A raw line holding nothing but the marker, such as a "C" badge, with a
/// player named on the line just before or just after it
fn by_proximity(
    post: Post,
    raw_text: &str,
    players: &[String],
    exclude: Option<&str>,
) -> Option<String> {
    let lines: Vec<&str> = raw_text
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        let flags = leadership::detect(line);
        let marked = match post {
            Post::Captain => flags.captain,
            Post::ViceCaptain => flags.vice_captain,
        };
        if !marked {
            continue;
        }
        // The marker sits on someone's own row, which the neighbours say nothing about
        if leadership::clean(line, flags).chars().any(char::is_alphabetic) {
            continue;
        }

        let neighbours = [i.checked_sub(1), Some(i + 1)];
        for neighbour in neighbours.into_iter().flatten().filter_map(|j| lines.get(j)) {
            let neighbour = neighbour.to_lowercase();
            let hit = players
                .iter()
                .filter(|p| exclude != Some(p.as_str()))
                .find(|p| neighbour.contains(&p.to_lowercase()));
            if let Some(player) = hit {
                return Some(player.clone());
            }
        }
    }
    None
}

fn by_template(
    post: Post,
    raw_text: &str,
    players: &[String],
    exclude: Option<&str>,
) -> Option<String> {
    let (templates, text) = match post {
        // Captain templates must not fire inside "vice captain:" or "(vc)"
        Post::Captain => (
            &*CAPTAIN_TEMPLATES,
            raw_text
                .lines()
                .map(leadership::strip_vice_markers)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Post::ViceCaptain => (&*VICE_CAPTAIN_TEMPLATES, raw_text.to_string()),
    };

    templates
        .iter()
        .flat_map(|template| template.captures_iter(&text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|fragment| fragment.chars().count() >= MIN_TEMPLATE_MATCH)
        .find_map(|fragment| {
            players
                .iter()
                .filter(|p| exclude != Some(p.as_str()))
                .find(|p| {
                    let player = p.to_lowercase();
                    player.contains(&fragment) || fragment.contains(&player)
                })
                .cloned()
        })
}
