/// One transport-sized piece of a longer text. `text` never contains the
/// continuation indicator; render it with [`ContinuationIndicator`] when sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub total_count: usize,
    pub text: String,
    pub is_final: bool,
}

/// Short note appended to every non-final segment, e.g. `Part 1/3 • continued...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationIndicator {
    template: String,
}

impl ContinuationIndicator {
    pub const DEFAULT_TEMPLATE: &'static str = "\n\n📄 Part {index}/{total} • continued...";

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// `index` is 1-based here, as shown to the reader.
    pub fn render(&self, index: usize, total: usize) -> String {
        self.template
            .replace("{index}", &index.to_string())
            .replace("{total}", &total.to_string())
    }

    /// Upper bound on the rendered length for any segment of a text with
    /// `source_chars` characters; a text can never yield more segments than characters.
    pub fn max_chars_for(&self, source_chars: usize) -> usize {
        let widest = source_chars.max(1);
        self.render(widest, widest).chars().count()
    }

    pub fn apply(&self, segment: &Segment) -> String {
        if segment.is_final {
            segment.text.clone()
        } else {
            let mut out = segment.text.clone();
            out.push_str(&self.render(segment.index + 1, segment.total_count));
            out
        }
    }
}

impl Default for ContinuationIndicator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TEMPLATE)
    }
}
