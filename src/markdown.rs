//! Markdown documents for full posts

use crate::models::{Child, Post};
use crate::utils::html_to_markdown;

pub const INSTRUCTOR_ANSWER: &str = "Instructor Answer";
pub const STUDENT_ANSWER: &str = "Student Answer";

/// " (endorsed by N user[s])", or nothing when nobody endorsed the answer
fn endorsement_suffix(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => String::from(" (endorsed by 1 user)"),
        n => format!(" (endorsed by {n} users)"),
    }
}

/// Format an instructor or student answer block
///
/// # Arguments
/// * `answer` - An `i_answer` or `s_answer` child of a post
/// * `label` - Heading text, e.g. "Instructor Answer"
///
/// # Returns
/// A `## <label>` heading, with the endorsement count if any, a blank line
/// and the current revision as markdown. Empty when the answer has no
/// content; callers must skip it rather than emit a bare heading.
pub fn render_answer(answer: &Child, label: &str) -> String {
    let content = answer
        .current()
        .map(|rev| html_to_markdown(&rev.content))
        .unwrap_or_default();
    if content.is_empty() {
        return String::new();
    }

    format!(
        "## {}{}\n\n{}",
        label,
        endorsement_suffix(answer.tag_endorse.len()),
        content
    )
}

/// Format a follow-up and its replies as a nested bullet list.
///
/// A follow-up whose own text is empty renders as nothing, replies included.
/// Empty replies are skipped one by one.
pub fn render_followup(followup: &Child) -> String {
    let content = html_to_markdown(&followup.subject);
    if content.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("- **Follow-up:** {}", content)];
    for reply in &followup.children {
        let reply_content = html_to_markdown(&reply.subject);
        if !reply_content.is_empty() {
            lines.push(format!("  - **Reply:** {}", reply_content));
        }
    }
    lines.join("\n")
}

/// Generate the full document for a post
///
/// # Arguments
/// * `post` - The post record, already defaulted at deserialization
///
/// # Returns
/// The heading, metadata line, body, the first instructor and student
/// answers, then every follow-up in order, joined by newlines
pub fn render_post(post: &Post) -> String {
    let mut lines = vec![format!("# @{}: {}", post.display_id(), post.subject())];

    let mut meta_parts = Vec::new();
    if !post.kind.is_empty() {
        meta_parts.push(format!("Type: {}", post.kind));
    }
    if !post.folders.is_empty() {
        meta_parts.push(format!("Folders: {}", post.folders.join(", ")));
    }
    if !post.created.is_empty() {
        meta_parts.push(format!("Date: {}", post.created));
    }
    if !meta_parts.is_empty() {
        lines.push(meta_parts.join(" | "));
    }

    let content = post
        .current()
        .map(|rev| html_to_markdown(&rev.content))
        .unwrap_or_default();
    if !content.is_empty() {
        lines.push(String::new());
        lines.push(content);
    }

    let answers = [
        (post.instructor_answer(), INSTRUCTOR_ANSWER),
        (post.student_answer(), STUDENT_ANSWER),
    ];
    for (answer, label) in answers {
        let Some(answer) = answer else { continue };
        let formatted = render_answer(answer, label);
        if !formatted.is_empty() {
            lines.push(String::new());
            lines.push(formatted);
        }
    }

    let mut followups = post.followups().peekable();
    if followups.peek().is_some() {
        lines.push(String::new());
        lines.push(String::from("## Follow-up Discussions"));
        lines.push(String::new());
        lines.extend(followups.map(render_followup).filter(|f| !f.is_empty()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn child(value: Value) -> Child {
        serde_json::from_value(value).unwrap()
    }

    fn post(value: Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    // Tests for endorsement_suffix()
    #[test]
    fn test_endorsement_suffix_pluralization() {
        assert_eq!(endorsement_suffix(0), "");
        assert_eq!(endorsement_suffix(1), " (endorsed by 1 user)");
        assert_eq!(endorsement_suffix(2), " (endorsed by 2 users)");
        assert_eq!(endorsement_suffix(12), " (endorsed by 12 users)");
    }

    // Tests for render_answer()
    #[test]
    fn test_render_answer_without_endorsement() {
        let answer = child(json!({
            "type": "i_answer",
            "history": [{"content": "<p>Use the <b>second</b> formula.</p>"}],
        }));
        assert_eq!(
            render_answer(&answer, INSTRUCTOR_ANSWER),
            "## Instructor Answer\n\nUse the **second** formula."
        );
    }

    #[test]
    fn test_render_answer_single_endorser() {
        let answer = child(json!({
            "type": "s_answer",
            "history": [{"content": "yes"}],
            "tag_endorse": [{"id": "u1"}],
        }));
        assert_eq!(
            render_answer(&answer, STUDENT_ANSWER),
            "## Student Answer (endorsed by 1 user)\n\nyes"
        );
    }

    #[test]
    fn test_render_answer_many_endorsers() {
        let answer = child(json!({
            "type": "s_answer",
            "history": [{"content": "yes"}],
            "tag_endorse": ["u1", "u2", "u3"],
        }));
        assert_eq!(
            render_answer(&answer, STUDENT_ANSWER),
            "## Student Answer (endorsed by 3 users)\n\nyes"
        );
    }

    #[test]
    fn test_render_answer_keeps_space_after_bold_label() {
        let answer = child(json!({
            "type": "i_answer",
            "history": [{"content": "<p><strong>Note: </strong>the deadline moved.</p>"}],
        }));
        assert_eq!(
            render_answer(&answer, INSTRUCTOR_ANSWER),
            "## Instructor Answer\n\n**Note:** the deadline moved."
        );
    }

    #[test]
    fn test_render_answer_uses_current_revision() {
        let answer = child(json!({
            "history": [{"content": "new"}, {"content": "old"}],
        }));
        assert_eq!(render_answer(&answer, STUDENT_ANSWER), "## Student Answer\n\nnew");
    }

    #[test]
    fn test_render_answer_empty_history() {
        let answer = child(json!({"type": "i_answer", "tag_endorse": ["u1"]}));
        assert_eq!(render_answer(&answer, INSTRUCTOR_ANSWER), "");
    }

    #[test]
    fn test_render_answer_content_only_markup() {
        let answer = child(json!({"history": [{"content": "<p> </p><img src=\"x\">"}]}));
        assert_eq!(render_answer(&answer, INSTRUCTOR_ANSWER), "");
    }

    // Tests for render_followup()
    #[test]
    fn test_render_followup_with_replies() {
        let followup = child(json!({
            "type": "followup",
            "subject": "<p>Is late submission allowed?</p>",
            "children": [
                {"subject": "Up to two days."},
                {"subject": ""},
                {"subject": "<p>Thanks!</p>"},
            ],
        }));
        assert_eq!(
            render_followup(&followup),
            "- **Follow-up:** Is late submission allowed?\n  - **Reply:** Up to two days.\n  - **Reply:** Thanks!"
        );
    }

    #[test]
    fn test_render_followup_without_replies() {
        let followup = child(json!({"type": "followup", "subject": "ping"}));
        assert_eq!(render_followup(&followup), "- **Follow-up:** ping");
    }

    #[test]
    fn test_render_followup_empty_subject_drops_replies() {
        let followup = child(json!({
            "type": "followup",
            "subject": "",
            "children": [{"subject": "one"}, {"subject": "two"}],
        }));
        assert_eq!(render_followup(&followup), "");
    }

    // Tests for render_post()
    #[test]
    fn test_render_post_full() {
        let p = post(json!({
            "nr": 142,
            "type": "question",
            "folders": ["hw1", "logistics"],
            "created": "2024-09-03T17:12:45Z",
            "history": [
                {"subject": "Deadline for HW1 &amp; HW2?", "content": "<p>When is it due?</p>"},
                {"subject": "old", "content": "old"},
            ],
            "children": [
                {"type": "followup", "subject": "Same question", "children": [{"subject": "+1"}]},
                {"type": "i_answer", "history": [{"content": "Friday."}], "tag_endorse": []},
                {"type": "s_answer", "history": [{"content": "I think Friday"}], "tag_endorse": ["a", "b"]},
                {"type": "followup", "subject": "Time zone?"},
            ],
        }));
        let expected = "\
# @142: Deadline for HW1 & HW2?
Type: question | Folders: hw1, logistics | Date: 2024-09-03T17:12:45Z

When is it due?

## Instructor Answer

Friday.

## Student Answer (endorsed by 2 users)

I think Friday

## Follow-up Discussions

- **Follow-up:** Same question
  - **Reply:** +1
- **Follow-up:** Time zone?";
        assert_eq!(render_post(&p), expected);
    }

    #[test]
    fn test_render_post_empty_history() {
        let p = post(json!({"nr": 9, "type": "", "history": []}));
        assert_eq!(render_post(&p), "# @9: (no subject)");
    }

    #[test]
    fn test_render_post_default_type_is_note() {
        let p = post(json!({"nr": 1, "history": [{"subject": "Hi", "content": ""}]}));
        assert_eq!(render_post(&p), "# @1: Hi\nType: note");
    }

    #[test]
    fn test_render_post_metadata_order_with_gaps() {
        let p = post(json!({
            "nr": 5,
            "type": "",
            "created": "yesterday",
            "history": [{"subject": "s", "content": "body"}],
        }));
        assert_eq!(render_post(&p), "# @5: s\nDate: yesterday\n\nbody");
    }

    #[test]
    fn test_render_post_skips_empty_answers() {
        let p = post(json!({
            "nr": 2,
            "type": "question",
            "history": [{"subject": "q", "content": "?"}],
            "children": [
                {"type": "i_answer", "history": []},
                {"type": "i_answer", "history": [{"content": "ignored duplicate"}]},
                {"type": "s_answer", "history": [{"content": "student"}]},
            ],
        }));
        assert_eq!(
            render_post(&p),
            "# @2: q\nType: question\n\n?\n\n## Student Answer\n\nstudent"
        );
    }

    #[test]
    fn test_render_post_empty_followups_leave_no_gaps() {
        let p = post(json!({
            "nr": 3,
            "type": "note",
            "history": [{"subject": "n", "content": ""}],
            "children": [
                {"type": "followup", "subject": "a"},
                {"type": "followup", "subject": ""},
                {"type": "followup", "subject": "b"},
            ],
        }));
        assert_eq!(
            render_post(&p),
            "# @3: n\nType: note\n\n## Follow-up Discussions\n\n- **Follow-up:** a\n- **Follow-up:** b"
        );
    }

    #[test]
    fn test_render_post_is_deterministic() {
        let p = post(json!({
            "nr": 8,
            "history": [{"subject": "x", "content": "<ul><li>a</li></ul>"}],
            "children": [{"type": "followup", "subject": "f"}],
        }));
        assert_eq!(render_post(&p), render_post(&p));
    }
}
