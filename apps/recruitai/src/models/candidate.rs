use serde::{Deserialize, Serialize};

/// A ranked candidate as returned by `POST /screen`.
///
/// `strengths` and `gaps` may be absent on the wire; they decode as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub rank: u32,
    pub name: String,
    pub score: u32, // 0 – 100
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

/// The four fixed screening outcome tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    #[default]
    Consider,
    NotRecommended,
}

impl Recommendation {
    pub const ALL: [Recommendation; 4] = [
        Recommendation::HighlyRecommended,
        Recommendation::Recommended,
        Recommendation::Consider,
        Recommendation::NotRecommended,
    ];

    /// Maps a free-form label to a tier. Anything unrecognized is `Consider`.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == label)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly Recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::Consider => "Consider",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }
}

/// Success body of `POST /screen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenResponse {
    pub success: bool,
    pub results: Vec<Candidate>,
    pub total_candidates: usize,
}

/// Body shape as seen by a client that has not yet checked for failure:
/// every field is optional because a failed screening only carries `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenReplyBody {
    #[serde(default)]
    pub results: Option<Vec<Candidate>>,
    #[serde(default)]
    pub total_candidates: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_optional_lists_default_to_empty() {
        let json = r#"{"rank":1,"name":"Alice","score":82,"recommendation":"Highly Recommended"}"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert!(c.strengths.is_empty());
        assert!(c.gaps.is_empty());
        assert_eq!(c.assessment, None);
    }

    #[test]
    fn test_recommendation_from_label_exact_match() {
        for tier in Recommendation::ALL {
            assert_eq!(Recommendation::from_label(tier.label()), tier);
        }
    }

    #[test]
    fn test_recommendation_unknown_label_is_consider() {
        assert_eq!(
            Recommendation::from_label("Strong Hire"),
            Recommendation::Consider
        );
        assert_eq!(
            Recommendation::from_label("highly recommended"),
            Recommendation::Consider
        );
    }

    #[test]
    fn test_reply_body_with_error_only() {
        let body: ScreenReplyBody =
            serde_json::from_str(r#"{"error":"Please upload at least one resume."}"#).unwrap();
        assert!(body.results.is_none());
        assert_eq!(
            body.error.as_deref(),
            Some("Please upload at least one resume.")
        );
    }
}
