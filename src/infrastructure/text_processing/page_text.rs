/// Text recovered from one PDF page. `number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageText {
    pub number: usize,
    pub text: String,
}

impl PageText {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Joins non-empty pages, each preceded by a `--- Page N ---` marker line.
pub(crate) fn join_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .filter(|page| !page.text.trim().is_empty())
        .map(|page| format!("--- Page {} ---\n{}", page.number, page.text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Characters of page content, markers excluded.
pub(crate) fn content_chars(pages: &[PageText]) -> usize {
    pages.iter().map(|page| page.text.trim().chars().count()).sum()
}

pub(crate) fn unread_pages_warning(failed: usize) -> Vec<String> {
    match failed {
        0 => Vec::new(),
        1 => vec!["1 page could not be read and is missing from the text".to_string()],
        n => vec![format!("{n} pages could not be read and are missing from the text")],
    }
}
