use crate::domain::{ContinuationIndicator, Segment};

/// A split point candidate. `keep` is how many bytes of the pattern stay with
/// the preceding segment, so headers and list markers open the next segment.
struct Boundary {
    pattern: &'static str,
    keep: usize,
}

// Most to least preferred.
const BOUNDARIES: &[Boundary] = &[
    Boundary { pattern: "\n\n**", keep: 2 },
    Boundary { pattern: "\n\n#", keep: 2 },
    Boundary { pattern: "\n**", keep: 1 },
    Boundary { pattern: "\n#", keep: 1 },
    Boundary { pattern: "\n\n", keep: 2 },
    Boundary { pattern: "\n•", keep: 1 },
    Boundary { pattern: "\n- ", keep: 1 },
    Boundary { pattern: "\n* ", keep: 1 },
    Boundary { pattern: "\n", keep: 1 },
    Boundary { pattern: ". ", keep: 1 },
    Boundary { pattern: "! ", keep: 1 },
    Boundary { pattern: "? ", keep: 1 },
    Boundary { pattern: "; ", keep: 1 },
    Boundary { pattern: ", ", keep: 1 },
    Boundary { pattern: " ", keep: 0 },
];

/// Splits long text into transport-sized segments at the best semantic boundary.
///
/// Sizes are counted in characters. Space for the continuation indicator is
/// reserved before splitting, so a non-final segment plus its indicator never
/// exceeds `max_payload_chars`.
#[derive(Debug, Clone)]
pub struct ResultSegmenter {
    max_payload_chars: usize,
    reserve_buffer_chars: usize,
    indicator: ContinuationIndicator,
}

impl ResultSegmenter {
    pub const DEFAULT_MAX_PAYLOAD_CHARS: usize = 4096;
    pub const DEFAULT_RESERVE_BUFFER_CHARS: usize = 100;

    pub fn new(
        max_payload_chars: usize,
        reserve_buffer_chars: usize,
        indicator: ContinuationIndicator,
    ) -> Self {
        Self {
            max_payload_chars,
            reserve_buffer_chars,
            indicator,
        }
    }

    pub fn max_payload_chars(&self) -> usize {
        self.max_payload_chars
    }

    pub fn indicator(&self) -> &ContinuationIndicator {
        &self.indicator
    }

    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let total_chars = text.chars().count();
        if total_chars <= self.max_payload_chars {
            return vec![Segment {
                index: 0,
                total_count: 1,
                text: text.to_string(),
                is_final: true,
            }];
        }

        let indicator_chars = self.indicator.max_chars_for(total_chars);
        let budget = self.max_payload_chars.saturating_sub(indicator_chars).max(1);

        let mut pieces: Vec<String> = Vec::new();
        let mut remaining = text;

        while remaining.chars().count() > self.max_payload_chars {
            let split_at = self.find_split(remaining, budget);
            let (head, tail) = remaining.split_at(split_at);

            let head = head.trim();
            if !head.is_empty() {
                pieces.push(head.to_string());
            }
            remaining = tail.trim_start();
        }

        let last = remaining.trim();
        if !last.is_empty() || pieces.is_empty() {
            pieces.push(last.to_string());
        }

        let total_count = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Segment {
                index,
                total_count,
                text,
                is_final: index + 1 == total_count,
            })
            .collect()
    }

    /// Text as handed to the transport, continuation indicator included.
    pub fn transmitted(&self, segment: &Segment) -> String {
        self.indicator.apply(segment)
    }

    /// Byte offset to split `remaining` at. Looks for the rightmost occurrence of
    /// each boundary inside `(budget / 2, budget - reserve]` in preference order,
    /// and hard-splits at `budget` characters when none is found.
    fn find_split(&self, remaining: &str, budget: usize) -> usize {
        let upper_chars = budget.saturating_sub(self.reserve_buffer_chars).max(1);
        let lower_chars = budget / 2;
        let window = &remaining[..byte_offset(remaining, upper_chars)];

        for boundary in BOUNDARIES {
            if let Some(pos) = window.rfind(boundary.pattern) {
                if window[..pos].chars().count() > lower_chars {
                    return pos + boundary.keep;
                }
            }
        }

        byte_offset(remaining, budget)
    }
}

impl Default for ResultSegmenter {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_PAYLOAD_CHARS,
            Self::DEFAULT_RESERVE_BUFFER_CHARS,
            ContinuationIndicator::default(),
        )
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
