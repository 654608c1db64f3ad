//! Ranked results: candidate view models and their rendering.
//!
//! `ResultsView::build` derives everything display-related from the response
//! (rank decoration, score tier, badge class, tag lists). `render` turns the
//! view into a `Node` tree; escaping is left to `Node::to_html`.

use crate::client::markup::{Element, Node};
use crate::models::candidate::{Candidate, Recommendation};

const MAX_STRENGTH_TAGS: usize = 4;
const MAX_GAP_TAGS: usize = 2;
const CARD_STAGGER_MS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: u32) -> Self {
        match score {
            s if s >= 70 => ScoreTier::High,
            s if s >= 45 => ScoreTier::Mid,
            _ => ScoreTier::Low,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Mid => "mid",
            ScoreTier::Low => "low",
        }
    }
}

/// Position-based decoration: medals for the top three, `#rank` for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDecoration {
    pub class: &'static str,
    pub marker: String,
}

impl RankDecoration {
    pub fn for_position(index: usize, rank: u32) -> Self {
        let (class, marker) = match index {
            0 => ("rank-1", "🥇".to_string()),
            1 => ("rank-2", "🥈".to_string()),
            2 => ("rank-3", "🥉".to_string()),
            _ => ("rank-other", format!("#{rank}")),
        };
        Self { class, marker }
    }
}

pub fn recommendation_class(label: &str) -> &'static str {
    match Recommendation::from_label(label) {
        Recommendation::HighlyRecommended => "rec-highly",
        Recommendation::Recommended => "rec-recommended",
        Recommendation::Consider => "rec-consider",
        Recommendation::NotRecommended => "rec-not",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCard {
    pub index: usize,
    pub rank: RankDecoration,
    pub name: String,
    pub recommendation: String,
    pub recommendation_class: &'static str,
    pub score: u32,
    pub tier: ScoreTier,
    pub assessment: Option<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

impl CandidateCard {
    pub fn from_candidate(index: usize, candidate: &Candidate) -> Self {
        let score = candidate.score.min(100);
        Self {
            index,
            rank: RankDecoration::for_position(index, candidate.rank),
            name: candidate.name.clone(),
            recommendation: candidate.recommendation.clone(),
            recommendation_class: recommendation_class(&candidate.recommendation),
            score,
            tier: ScoreTier::for_score(score),
            assessment: candidate
                .assessment
                .clone()
                .filter(|a| !a.is_empty()),
            strengths: candidate
                .strengths
                .iter()
                .take(MAX_STRENGTH_TAGS)
                .cloned()
                .collect(),
            gaps: candidate.gaps.iter().take(MAX_GAP_TAGS).cloned().collect(),
        }
    }

    fn render(&self, bars_animated: bool) -> Node {
        let tier = self.tier.class();
        let bar_width = if bars_animated { self.score } else { 0 };

        let header = Element::new("div")
            .class("candidate-header")
            .child(
                Element::new("div")
                    .class("rank-badge")
                    .text(self.rank.marker.clone()),
            )
            .child(
                Element::new("div")
                    .class("candidate-info")
                    .child(
                        Element::new("div")
                            .class("candidate-name")
                            .text(self.name.clone()),
                    )
                    .child(
                        Element::new("div").class("candidate-meta").child(
                            Element::new("span")
                                .class(format!(
                                    "recommendation-badge {}",
                                    self.recommendation_class
                                ))
                                .text(self.recommendation.clone()),
                        ),
                    ),
            )
            .child(
                Element::new("div")
                    .class("score-display")
                    .child(
                        Element::new("div").class("score-bar-wrapper").child(
                            Element::new("div")
                                .class(format!("score-bar {tier}"))
                                .attr("style", format!("width: {bar_width}%"))
                                .attr("data-width", format!("{}%", self.score)),
                        ),
                    )
                    .child(
                        Element::new("div")
                            .class(format!("score-number {tier}"))
                            .text(self.score.to_string()),
                    ),
            );

        let strength_tags = self.strengths.iter().map(|s| {
            Node::from(
                Element::new("span")
                    .class("tag tag-strength")
                    .text(format!("✓ {s}")),
            )
        });
        let gap_tags = self.gaps.iter().map(|g| {
            Node::from(
                Element::new("span")
                    .class("tag tag-gap")
                    .text(format!("✗ {g}")),
            )
        });
        let tags: Vec<Node> = strength_tags.chain(gap_tags).collect();

        let mut card = Element::new("div")
            .class(format!("candidate-card {}", self.rank.class))
            .attr(
                "style",
                format!("animation-delay: {}ms", self.index * CARD_STAGGER_MS),
            )
            .child(header);
        if let Some(assessment) = &self.assessment {
            card = card.child(
                Element::new("div")
                    .class("candidate-assessment")
                    .text(assessment.clone()),
            );
        }
        card.child(Element::new("div").class("candidate-tags").children(tags))
            .into()
    }
}

/// The results overlay contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub subtitle: String,
    pub cards: Vec<CandidateCard>,
    bars_animated: bool,
}

impl ResultsView {
    pub fn build(results: &[Candidate], total: usize) -> Self {
        Self {
            subtitle: format!(
                "{total} candidate{} analyzed • Ranked by AI match score",
                if total > 1 { "s" } else { "" }
            ),
            cards: results
                .iter()
                .enumerate()
                .map(|(i, c)| CandidateCard::from_candidate(i, c))
                .collect(),
            bars_animated: false,
        }
    }

    /// Next display frame: bars grow from 0 to their score.
    pub fn animate_score_bars(&mut self) {
        self.bars_animated = true;
    }

    pub fn bars_animated(&self) -> bool {
        self.bars_animated
    }

    pub fn render(&self) -> Node {
        Element::new("div")
            .class("results-body")
            .children(self.cards.iter().map(|c| c.render(self.bars_animated)))
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::ScreenReplyBody;

    fn candidate(rank: u32, name: &str, score: u32, rec: &str) -> Candidate {
        Candidate {
            rank,
            name: name.to_string(),
            score,
            recommendation: rec.to_string(),
            assessment: None,
            strengths: vec![],
            gaps: vec![],
        }
    }

    #[test]
    fn test_alice_response_renders_one_high_first_place_card() {
        let json = r#"{"results":[{"rank":1,"name":"Alice","score":82,
            "recommendation":"Highly Recommended","strengths":["SQL"],"gaps":[]}],
            "total_candidates":1}"#;
        let body: ScreenReplyBody = serde_json::from_str(json).unwrap();
        let results = body.results.unwrap();

        let view = ResultsView::build(&results, body.total_candidates.unwrap());
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.subtitle, "1 candidate analyzed • Ranked by AI match score");

        let card = &view.cards[0];
        assert_eq!(card.rank.class, "rank-1");
        assert_eq!(card.rank.marker, "🥇");
        assert_eq!(card.tier, ScoreTier::High);

        let node = view.render();
        assert_eq!(node.find_by_class("candidate-card").len(), 1);
        let tags = node.find_by_class("tag-strength");
        assert_eq!(tags.len(), 1);
        assert!(Node::Element(tags[0].clone()).to_html().contains("SQL"));
        assert_eq!(node.find_by_class("score-bar")[0].get_attr("class"), Some("score-bar high"));
    }

    #[test]
    fn test_script_name_is_escaped() {
        let view = ResultsView::build(
            &[candidate(1, "<script>alert(1)</script>", 50, "Consider")],
            1,
        );
        let html = view.render().to_html();
        assert!(!html.contains("<script"));
        assert!(!html.contains("</script"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_every_text_field_is_escaped() {
        let mut c = candidate(1, "A", 50, "<b>Recommended</b>");
        c.assessment = Some("\"quoted\" & <i>".into());
        c.strengths = vec!["<x>".into()];
        c.gaps = vec!["<y>".into()];
        let html = ResultsView::build(&[c], 1).render().to_html();
        for raw in ["<b>", "<i>", "<x>", "<y>", "\"quoted\""] {
            assert!(!html.contains(raw), "found unescaped {raw}");
        }
        assert!(html.contains("&quot;quoted&quot; &amp; &lt;i&gt;"));
    }

    #[test]
    fn test_rank_decorations_by_position() {
        let results: Vec<Candidate> = (1..=5)
            .map(|r| candidate(r, &format!("C{r}"), 50, "Consider"))
            .collect();
        let view = ResultsView::build(&results, 5);
        let markers: Vec<&str> = view.cards.iter().map(|c| c.rank.marker.as_str()).collect();
        assert_eq!(markers, vec!["🥇", "🥈", "🥉", "#4", "#5"]);
        assert_eq!(view.cards[3].rank.class, "rank-other");
        assert_eq!(view.subtitle, "5 candidates analyzed • Ranked by AI match score");
    }

    #[test]
    fn test_score_tier_boundaries() {
        assert_eq!(ScoreTier::for_score(100), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(70), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(69), ScoreTier::Mid);
        assert_eq!(ScoreTier::for_score(45), ScoreTier::Mid);
        assert_eq!(ScoreTier::for_score(44), ScoreTier::Low);
        assert_eq!(ScoreTier::for_score(0), ScoreTier::Low);
    }

    #[test]
    fn test_recommendation_classes_with_fallback() {
        assert_eq!(recommendation_class("Highly Recommended"), "rec-highly");
        assert_eq!(recommendation_class("Recommended"), "rec-recommended");
        assert_eq!(recommendation_class("Consider"), "rec-consider");
        assert_eq!(recommendation_class("Not Recommended"), "rec-not");
        assert_eq!(recommendation_class("Maybe"), "rec-consider");
    }

    #[test]
    fn test_tags_are_capped() {
        let mut c = candidate(1, "A", 80, "Recommended");
        c.strengths = (0..6).map(|i| format!("s{i}")).collect();
        c.gaps = (0..5).map(|i| format!("g{i}")).collect();
        let card = CandidateCard::from_candidate(0, &c);
        assert_eq!(card.strengths, vec!["s0", "s1", "s2", "s3"]);
        assert_eq!(card.gaps, vec!["g0", "g1"]);

        let node = ResultsView::build(&[c], 1).render();
        assert_eq!(node.find_by_class("tag").len(), 6);
    }

    #[test]
    fn test_empty_assessment_is_omitted() {
        let mut c = candidate(1, "A", 80, "Recommended");
        c.assessment = Some(String::new());
        let node = ResultsView::build(&[c.clone()], 1).render();
        assert!(node.find_by_class("candidate-assessment").is_empty());

        c.assessment = Some("Solid.".into());
        let node = ResultsView::build(&[c], 1).render();
        assert_eq!(node.find_by_class("candidate-assessment").len(), 1);
    }

    #[test]
    fn test_score_bars_start_empty_then_animate() {
        let mut view = ResultsView::build(&[candidate(1, "A", 82, "Recommended")], 1);
        let node = view.render();
        let bar = node.find_by_class("score-bar")[0];
        assert_eq!(bar.get_attr("style"), Some("width: 0%"));
        assert_eq!(bar.get_attr("data-width"), Some("82%"));

        view.animate_score_bars();
        let node = view.render();
        assert_eq!(
            node.find_by_class("score-bar")[0].get_attr("style"),
            Some("width: 82%")
        );
    }
}
