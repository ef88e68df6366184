use serde::{Deserialize, Serialize};

/// The analysis kinds a user can request. Each mode owns one result slot,
/// one prompt template and one download file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    ResumeAnalysis,
    PercentageMatch,
    Improvisation,
}

impl AnalysisMode {
    /// Display order of the mode selector.
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::ResumeAnalysis,
        AnalysisMode::PercentageMatch,
        AnalysisMode::Improvisation,
    ];

    /// Form / URL value, matching the serde representation.
    pub fn slug(self) -> &'static str {
        match self {
            AnalysisMode::ResumeAnalysis => "resume_analysis",
            AnalysisMode::PercentageMatch => "percentage_match",
            AnalysisMode::Improvisation => "improvisation",
        }
    }

    /// Label on the mode selector.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisMode::ResumeAnalysis => "Resume Analysis",
            AnalysisMode::PercentageMatch => "Percentage Match",
            AnalysisMode::Improvisation => "Improvisation",
        }
    }

    /// Heading of the collapsible section holding the result.
    pub fn section_title(self) -> &'static str {
        match self {
            AnalysisMode::ResumeAnalysis => "About this resume",
            AnalysisMode::PercentageMatch => "ATS Score of this Resume",
            AnalysisMode::Improvisation => "Suggestions for your Improvisation here",
        }
    }

    pub fn result_title(self) -> &'static str {
        match self {
            AnalysisMode::ResumeAnalysis => "Resume Analysis",
            AnalysisMode::PercentageMatch => "Percentage Match",
            AnalysisMode::Improvisation => "Improvisation Suggestions",
        }
    }

    pub fn download_label(self) -> &'static str {
        match self {
            AnalysisMode::ResumeAnalysis => "Download Resume Analysis",
            AnalysisMode::PercentageMatch => "Download Percentage Match",
            AnalysisMode::Improvisation => "Download Improvisation Suggestions",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            AnalysisMode::ResumeAnalysis => "resume_analysis.txt",
            AnalysisMode::PercentageMatch => "percentage_match.txt",
            AnalysisMode::Improvisation => "improvisation_suggestions.txt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_matches_serde_representation() {
        for mode in AnalysisMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.slug()));
        }
    }

    #[test]
    fn test_download_file_names() {
        assert_eq!(AnalysisMode::ResumeAnalysis.file_name(), "resume_analysis.txt");
        assert_eq!(AnalysisMode::PercentageMatch.file_name(), "percentage_match.txt");
        assert_eq!(
            AnalysisMode::Improvisation.file_name(),
            "improvisation_suggestions.txt"
        );
    }

    #[test]
    fn test_default_mode_is_resume_analysis() {
        assert_eq!(AnalysisMode::default(), AnalysisMode::ResumeAnalysis);
    }
}
