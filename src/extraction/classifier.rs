use super::leadership::{self, Leadership};
use super::rules;
use super::{Line, RoleContext};

/// What the classifier decided about one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// A role banner; shifts the context for following lines
    RoleHeader(RoleContext),
    /// Noise, with the name of the rule that matched
    Skip(&'static str),
    /// Possibly a player. `overridden` names the skip rule a leadership marker beat
    Candidate { overridden: Option<&'static str> },
}

#[derive(Debug, Clone)]
pub struct ClassifiedLine<'a> {
    pub line: &'a Line,
    /// Role context in effect for this line
    pub role: RoleContext,
    pub class: LineClass,
    pub leadership: Leadership,
}

/// Classify a single line given the role context carried in from the lines
/// above it, returning the context for the next line.
pub fn classify_line(context: RoleContext, text: &str) -> (RoleContext, LineClass, Leadership) {
    if let Some(role) = rules::role_header(text) {
        return (role, LineClass::RoleHeader(role), Leadership::default());
    }

    let leadership = leadership::detect(text);
    let class = match rules::first_skip_rule(text) {
        None => LineClass::Candidate { overridden: None },
        Some(rule) if rule.overridable && leadership.any() => LineClass::Candidate {
            overridden: Some(rule.name),
        },
        Some(rule) => LineClass::Skip(rule.name),
    };

    (context, class, leadership)
}

/// Fold the classifier over the lines in order
pub fn classify_lines(lines: &[Line]) -> Vec<ClassifiedLine<'_>> {
    lines
        .iter()
        .scan(RoleContext::Unknown, |context, line| {
            let (next, class, leadership) = classify_line(*context, &line.text);
            *context = next;
            Some(ClassifiedLine {
                line,
                role: next,
                class,
                leadership,
            })
        })
        .collect()
}
