//! Line classification for task documents.
//!
//! Every line of a `tasks.md` falls into exactly one [`LineKind`]. The order of
//! the checks in [`classify_line`] is the metadata priority order: a
//! `_Prompt:` line wins over everything else because prompt payloads routinely
//! mention `_Requirements:` and `_Leverage:`.

use regex::Regex;
use std::sync::OnceLock;

static CHECKBOX_RE: OnceLock<Regex> = OnceLock::new();
static PROMPT_CLOSED_RE: OnceLock<Regex> = OnceLock::new();
static REQUIREMENTS_RE: OnceLock<Regex> = OnceLock::new();
static LEVERAGE_RE: OnceLock<Regex> = OnceLock::new();
static FILES_MARKER_RE: OnceLock<Regex> = OnceLock::new();
static FILES_RE: OnceLock<Regex> = OnceLock::new();
static FILES_OR_PURPOSE_RE: OnceLock<Regex> = OnceLock::new();
static PARENTHETICAL_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

pub(crate) fn checkbox_re() -> &'static Regex {
    compiled(&CHECKBOX_RE, r"^\s*-\s+\[([ x-])\]")
}

fn prompt_closed_re() -> &'static Regex {
    compiled(&PROMPT_CLOSED_RE, r"_Prompt:\s*(.+)_$")
}

fn requirements_re() -> &'static Regex {
    compiled(&REQUIREMENTS_RE, r"_Requirements:\s*([^_]+?)_")
}

fn leverage_re() -> &'static Regex {
    compiled(&LEVERAGE_RE, r"_Leverage:\s*([^_]+?)_")
}

fn files_marker_re() -> &'static Regex {
    compiled(&FILES_MARKER_RE, r"Files?:")
}

fn files_re() -> &'static Regex {
    compiled(&FILES_RE, r"Files?:\s*(.+)$")
}

fn files_or_purpose_re() -> &'static Regex {
    compiled(&FILES_OR_PURPOSE_RE, r"(?i)^(?:files?|purpose):")
}

fn parenthetical_re() -> &'static Regex {
    compiled(&PARENTHETICAL_RE, r"\(.*?\)")
}

/// A single classified line. Borrowed variants point into the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// `- [ ]`, `- [-]` or `- [x]`; delimits metadata spans.
    Checkbox,
    /// A `_Prompt:` line. `closed` is false when the closing underscore is
    /// missing and the prompt continues on the following lines.
    Prompt { text: &'a str, closed: bool },
    Requirements(Vec<&'a str>),
    Leverage(Vec<&'a str>),
    Files(Vec<String>),
    Purpose(&'a str),
    /// Any other `- ` bullet; recorded as an implementation detail.
    Bullet(&'a str),
    Other,
}

pub fn is_checkbox(line: &str) -> bool {
    checkbox_re().is_match(line)
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if is_checkbox(line) {
        return LineKind::Checkbox;
    }

    if let Some(start) = trimmed.find("_Prompt:") {
        if let Some(caps) = prompt_closed_re().captures(trimmed) {
            let text = caps.get(1).map_or("", |m| m.as_str()).trim();
            return LineKind::Prompt { text, closed: true };
        }
        let rest = trimmed[start + "_Prompt:".len()..].trim_start();
        let text = strip_trailing_underscore(rest).trim();
        return LineKind::Prompt {
            text,
            closed: false,
        };
    }

    if trimmed.contains("_Requirements:") {
        let items = comma_list(requirements_re(), trimmed)
            .into_iter()
            .filter(|item| *item != "NFR")
            .collect();
        return LineKind::Requirements(items);
    }

    if trimmed.contains("_Leverage:") {
        return LineKind::Leverage(comma_list(leverage_re(), trimmed));
    }

    if files_marker_re().is_match(trimmed) {
        let files = files_re()
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|f| parenthetical_re().replace_all(f, "").trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        return LineKind::Files(files);
    }

    if let Some(bullet) = trimmed.strip_prefix("- ") {
        if !bullet.starts_with('[') {
            let bullet = bullet.trim();
            if let Some(purpose) = bullet.strip_prefix("Purpose:") {
                return LineKind::Purpose(purpose.trim());
            }
            if files_or_purpose_re().is_match(bullet) {
                return LineKind::Other;
            }
            return LineKind::Bullet(bullet);
        }
    }

    LineKind::Other
}

/// True when `line` terminates an unclosed multi-line prompt.
pub fn ends_prompt(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with("- ") || files_or_purpose_re().is_match(trimmed)
}

/// Text a line contributes to an unclosed multi-line prompt.
pub fn prompt_continuation(line: &str) -> &str {
    strip_trailing_underscore(line.trim()).trim_end()
}

fn strip_trailing_underscore(s: &str) -> &str {
    s.strip_suffix('_').unwrap_or(s)
}

fn comma_list<'a>(re: &Regex, line: &'a str) -> Vec<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_lines() {
        assert_eq!(classify_line("- [ ] 1. Task"), LineKind::Checkbox);
        assert_eq!(classify_line("    - [x] 2.1 Nested"), LineKind::Checkbox);
        assert_eq!(classify_line("-   [-] 3 Wide"), LineKind::Checkbox);
        assert_eq!(classify_line("- [ ] Just a note"), LineKind::Checkbox);
        assert!(!is_checkbox("- [X] uppercase is not a glyph"));
        assert!(!is_checkbox("* [ ] star bullet"));
    }

    #[test]
    fn blank_lines() {
        assert_eq!(classify_line(""), LineKind::Blank);
        assert_eq!(classify_line("   \t "), LineKind::Blank);
    }

    #[test]
    fn requirements_drop_nfr_and_empties() {
        assert_eq!(
            classify_line("  - _Requirements: R1, R2, NFR, , 3.1_"),
            LineKind::Requirements(vec!["R1", "R2", "3.1"])
        );
    }

    #[test]
    fn requirements_without_closing_underscore_yield_nothing() {
        assert_eq!(
            classify_line("- _Requirements: R1, R2"),
            LineKind::Requirements(vec![])
        );
    }

    #[test]
    fn leverage_keeps_entries() {
        assert_eq!(
            classify_line("- _Leverage: src/utils.ts, src/api/client.ts_"),
            LineKind::Leverage(vec!["src/utils.ts", "src/api/client.ts"])
        );
    }

    #[test]
    fn files_strip_parentheticals() {
        assert_eq!(
            classify_line("- Files: src/a.ts (new), src/b.ts (modify),  "),
            LineKind::Files(vec!["src/a.ts".to_string(), "src/b.ts".to_string()])
        );
        assert_eq!(
            classify_line("File: src/only.rs"),
            LineKind::Files(vec!["src/only.rs".to_string()])
        );
    }

    #[test]
    fn closed_prompt() {
        assert_eq!(
            classify_line("  - _Prompt: Role: dev | Task: build x_"),
            LineKind::Prompt {
                text: "Role: dev | Task: build x",
                closed: true
            }
        );
    }

    #[test]
    fn open_prompt() {
        assert_eq!(
            classify_line("- _Prompt: Role: dev |"),
            LineKind::Prompt {
                text: "Role: dev |",
                closed: false
            }
        );
    }

    #[test]
    fn prompt_beats_requirements() {
        let kind = classify_line("- _Prompt: Task: see _Requirements: R1_ first_");
        assert!(matches!(kind, LineKind::Prompt { closed: true, .. }));
    }

    #[test]
    fn bullets_and_purposes() {
        assert_eq!(
            classify_line("- Purpose: Provide login"),
            LineKind::Purpose("Provide login")
        );
        assert_eq!(
            classify_line("  - Add validation helper"),
            LineKind::Bullet("Add validation helper")
        );
        assert_eq!(classify_line("- purpose: lowercase"), LineKind::Other);
    }

    #[test]
    fn prose_is_other() {
        assert_eq!(classify_line("Some explanatory prose."), LineKind::Other);
        assert_eq!(classify_line("## Phase 2"), LineKind::Other);
    }

    #[test]
    fn prompt_terminators() {
        assert!(ends_prompt(""));
        assert!(ends_prompt("  - next bullet"));
        assert!(ends_prompt("Files: a.rs"));
        assert!(ends_prompt("purpose: x"));
        assert!(!ends_prompt("Success: it works_"));
        assert_eq!(prompt_continuation("  Success: it works_ "), "Success: it works");
    }
}
