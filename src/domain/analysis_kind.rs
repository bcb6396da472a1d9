use std::fmt;
use std::str::FromStr;

/// Kind of legal analysis requested for an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    DocumentSummary,
    LawCompliance,
    ErrorDetection,
    RiskAssessment,
    Recommendations,
    CorrespondenceAnalysis,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 6] = [
        AnalysisKind::DocumentSummary,
        AnalysisKind::LawCompliance,
        AnalysisKind::ErrorDetection,
        AnalysisKind::RiskAssessment,
        AnalysisKind::Recommendations,
        AnalysisKind::CorrespondenceAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::DocumentSummary => "document_summary",
            AnalysisKind::LawCompliance => "law_compliance",
            AnalysisKind::ErrorDetection => "error_detection",
            AnalysisKind::RiskAssessment => "risk_assessment",
            AnalysisKind::Recommendations => "recommendations",
            AnalysisKind::CorrespondenceAnalysis => "correspondence_analysis",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            AnalysisKind::DocumentSummary => {
                "Summarize the content and purpose of the document."
            }
            AnalysisKind::LawCompliance => {
                "Check whether the document complies with current legislation."
            }
            AnalysisKind::ErrorDetection => {
                "Find legal, technical and logical errors in the document."
            }
            AnalysisKind::RiskAssessment => {
                "Assess the legal risks and potential problems the document creates."
            }
            AnalysisKind::Recommendations => "Suggest concrete improvements to the document.",
            AnalysisKind::CorrespondenceAnalysis => {
                "Analyze this business correspondence and its legal implications."
            }
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Invalid analysis kind: {}", s))
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
