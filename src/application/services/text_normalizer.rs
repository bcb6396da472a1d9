use regex::Regex;
use std::sync::LazyLock;

static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());

/// Canonicalizes whitespace only: runs of spaces and tabs become one space,
/// any run of blank lines becomes a single blank line, and every line as well
/// as the whole text is trimmed. Content characters are never changed.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(&unified, " ");

    let mut result = String::with_capacity(collapsed.len());
    let mut prev_was_blank = false;
    let mut first_content = true;

    for line in collapsed.split('\n') {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            prev_was_blank = true;
            continue;
        }

        if !first_content && prev_was_blank {
            result.push_str("\n\n");
        } else if !first_content {
            result.push('\n');
        }
        result.push_str(trimmed);
        prev_was_blank = false;
        first_content = false;
    }

    result
}
