use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Fair,
    Good,
    Excellent,
}

impl QualityTier {
    pub const GOOD_ABOVE: usize = 300;
    pub const EXCELLENT_ABOVE: usize = 1000;

    /// Confidence label shown to the user. Never gates success.
    pub fn from_char_count(char_count: usize) -> Self {
        if char_count > Self::EXCELLENT_ABOVE {
            QualityTier::Excellent
        } else if char_count > Self::GOOD_ABOVE {
            QualityTier::Good
        } else {
            QualityTier::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Fair => "fair",
            QualityTier::Good => "good",
            QualityTier::Excellent => "excellent",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
