//! In-place status transitions on task documents.

use super::split_task_id;
use crate::types::TaskStatus;
use regex::Regex;
use std::sync::OnceLock;

static TASK_LINE_RE: OnceLock<Regex> = OnceLock::new();

/// `<indent>- [<glyph>] <text>`; the same shape the parser accepts as a task.
pub(crate) fn task_line_re() -> &'static Regex {
    TASK_LINE_RE.get_or_init(|| Regex::new(r"^(\s*)-\s+\[([ x-])\]\s+(.+)").unwrap())
}

/// Rewrite the checkbox of the first task whose id equals `task_id`.
///
/// At most one line changes; every other byte of `markdown` is preserved,
/// including line endings and a missing trailing newline. An unknown id
/// returns the input unchanged.
pub fn update_task_status(markdown: &str, task_id: &str, status: TaskStatus) -> String {
    let mut offset = 0;
    for line in markdown.split('\n') {
        let start = offset;
        offset += line.len() + 1;

        let Some(caps) = task_line_re().captures(line) else {
            continue;
        };
        let (Some(indent), Some(text)) = (caps.get(1), caps.get(3)) else {
            continue;
        };
        let Some((id, _)) = split_task_id(text.as_str()) else {
            continue;
        };
        if id != task_id {
            continue;
        }

        let rewritten = format!(
            "{}- [{}] {}",
            indent.as_str(),
            status.glyph(),
            text.as_str()
        );
        let end = start + line.len();
        let mut updated = String::with_capacity(markdown.len() + 8);
        updated.push_str(&markdown[..start]);
        updated.push_str(&rewritten);
        updated.push_str(&markdown[end..]);
        return updated;
    }
    markdown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed_lines(a: &str, b: &str) -> usize {
        let a: Vec<&str> = a.split('\n').collect();
        let b: Vec<&str> = b.split('\n').collect();
        assert_eq!(a.len(), b.len());
        a.iter().zip(&b).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn completes_second_task() {
        let out = update_task_status("- [ ] 1. X\n- [ ] 2. Y\n", "2", TaskStatus::Completed);
        assert_eq!(out, "- [ ] 1. X\n- [x] 2. Y\n");
    }

    #[test]
    fn unknown_id_returns_input() {
        let text = "- [ ] 1. X\n  - _Requirements: R1_\n";
        assert_eq!(update_task_status(text, "999", TaskStatus::Completed), text);
    }

    #[test]
    fn preserves_indent_and_metadata() {
        let text = "# Tasks\n\n- [ ] 1. Parent\n  - [x] 1.1 Child\n    - _Leverage: a.rs_\n\nProse stays.\n";
        let out = update_task_status(text, "1.1", TaskStatus::InProgress);
        assert_eq!(
            out,
            "# Tasks\n\n- [ ] 1. Parent\n  - [-] 1.1 Child\n    - _Leverage: a.rs_\n\nProse stays.\n"
        );
        assert_eq!(changed_lines(text, &out), 1);
    }

    #[test]
    fn id_match_is_exact() {
        let text = "- [ ] 1.1 A\n- [ ] 1 B\n";
        let out = update_task_status(text, "1", TaskStatus::Completed);
        assert_eq!(out, "- [ ] 1.1 A\n- [x] 1 B\n");
    }

    #[test]
    fn first_duplicate_wins() {
        let text = "- [ ] 3. First\n- [ ] 3. Second\n";
        let out = update_task_status(text, "3", TaskStatus::Completed);
        assert_eq!(out, "- [x] 3. First\n- [ ] 3. Second\n");
    }

    #[test]
    fn idempotent() {
        let text = "- [ ] 1. X\n- [-] 2. Y";
        for status in TaskStatus::all() {
            let once = update_task_status(text, "2", *status);
            let twice = update_task_status(&once, "2", *status);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn crlf_and_missing_trailing_newline_survive() {
        let text = "- [ ] 1. X\r\n- [ ] 2. Y";
        let out = update_task_status(text, "1", TaskStatus::Completed);
        assert_eq!(out, "- [x] 1. X\r\n- [ ] 2. Y");
        let out = update_task_status(text, "2", TaskStatus::Completed);
        assert_eq!(out, "- [ ] 1. X\r\n- [x] 2. Y");
    }

    #[test]
    fn unlabeled_checkbox_is_not_a_target() {
        let text = "- [ ] Just a note\n- [ ] 1. Real\n";
        let out = update_task_status(text, "1", TaskStatus::Completed);
        assert_eq!(out, "- [ ] Just a note\n- [x] 1. Real\n");
    }

    #[test]
    fn non_ascii_digit_ids_are_never_rewritten() {
        let text = "- [ ] \u{0663}. Arabic-indic\n- [ ] \u{FF12} Fullwidth\n";
        assert_eq!(update_task_status(text, "\u{0663}", TaskStatus::Completed), text);
        assert_eq!(update_task_status(text, "\u{FF12}", TaskStatus::Completed), text);
    }
}
