//! Structured `_Prompt:_` fields.
//!
//! Prompts are authored as one pipe-delimited line such as
//! `Role: Backend Developer | Task: add endpoint | Restrictions: no new deps`.
//! Free text may precede the first key and values may contain colons, so the
//! split is heuristic and deliberately forgiving.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Keys recognised at the start of a prompt. Changing this list changes how
/// existing documents parse.
pub const PROMPT_KEYS: &[&str] = &[
    "Role",
    "Task",
    "Context",
    "Instructions",
    "Requirements",
    "Leverage",
    "Success",
    "Restrictions",
];

static PROMPT_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn prompt_key_re() -> &'static Regex {
    PROMPT_KEY_RE.get_or_init(|| {
        let pattern = format!(r"(?i)(?-u:\b)(?:{}):", PROMPT_KEYS.join("|"));
        Regex::new(&pattern).unwrap()
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSection {
    pub key: String,
    pub value: String,
}

/// Split a prompt into ordered key/value sections.
///
/// Returns `None` when the prompt has no `|` or nothing parses into a section,
/// in which case callers treat the prompt as opaque text.
pub fn parse_structured_prompt(prompt: &str) -> Option<Vec<PromptSection>> {
    if prompt.is_empty() || !prompt.contains('|') {
        return None;
    }

    let mut pieces = prompt.split('|').map(str::trim).filter(|p| !p.is_empty());
    let mut sections: Vec<PromptSection> = Vec::new();

    if let Some(first) = pieces.next() {
        // The rightmost key wins so that preamble prose mentioning a key
        // ("... then implement the task: Role: ...") is skipped.
        let start = prompt_key_re()
            .find_iter(first)
            .last()
            .map_or(0, |m| m.start());
        let keyed = &first[start..];
        if let Some(colon) = keyed.find(':') {
            push_section(&mut sections, &keyed[..colon], &keyed[colon + 1..]);
        }
    }

    for piece in pieces {
        match split_colon(piece) {
            Some(colon) => push_section(&mut sections, &piece[..colon], &piece[colon + 1..]),
            None => {
                if let Some(last) = sections.last_mut() {
                    let text = strip_underscores(piece);
                    last.value.push_str(" | ");
                    last.value.push_str(text);
                }
            }
        }
    }

    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

/// First `:` that is neither the first nor the last character of `piece`.
fn split_colon(piece: &str) -> Option<usize> {
    piece
        .match_indices(':')
        .map(|(i, _)| i)
        .find(|&i| i > 0 && i + 1 < piece.len())
}

fn push_section(sections: &mut Vec<PromptSection>, key: &str, value: &str) {
    let key = strip_underscores(key);
    let value = strip_underscores(value);
    if key.is_empty() || value.is_empty() {
        return;
    }
    sections.push(PromptSection {
        key: key.to_string(),
        value: value.to_string(),
    });
}

fn strip_underscores(s: &str) -> &str {
    s.trim().trim_matches('_').trim()
}
