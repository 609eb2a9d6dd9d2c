use serde::{Deserialize, Serialize};

/// Categorical outcome mapped from the deal score. Purely a function of
/// the current score; no hysteresis or history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    StrongDeal,
    GoodNegotiate,
    WeakLowball,
    Pass,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::StrongDeal => "strong-deal",
            Recommendation::GoodNegotiate => "good-negotiate",
            Recommendation::WeakLowball => "weak-lowball",
            Recommendation::Pass => "pass",
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Recommendation::StrongDeal => {
                "Strong spread with manageable costs; pursue aggressively at or near the suggested offer."
            }
            Recommendation::GoodNegotiate => {
                "Workable deal if the price comes down; open below the suggested offer and negotiate."
            }
            Recommendation::WeakLowball => {
                "Thin margins at the asking price; only a deep discount makes this work."
            }
            Recommendation::Pass => {
                "The numbers do not support an offer; pass unless the assumptions change materially."
            }
        }
    }
}

/// Serializable category + rationale pair for results and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub category: Recommendation,
    pub reason: String,
}

impl From<Recommendation> for RecommendationView {
    fn from(category: Recommendation) -> Self {
        Self {
            category,
            reason: category.reason().to_string(),
        }
    }
}

/// Map a deal score to its category: ≥80 strong, ≥60 negotiate, ≥40
/// lowball, otherwise pass.
pub fn recommend(deal_score: f64) -> Recommendation {
    if deal_score >= 80.0 {
        Recommendation::StrongDeal
    } else if deal_score >= 60.0 {
        Recommendation::GoodNegotiate
    } else if deal_score >= 40.0 {
        Recommendation::WeakLowball
    } else {
        Recommendation::Pass
    }
}
