use serde::{Deserialize, Serialize};

use super::domain::AreaType;

/// Attribute tolerances consumed by the matching filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingCriteria {
    pub bed_tolerance: u8,
    pub bath_tolerance: f32,
    /// Relative square-footage tolerance, e.g. 0.15 for ±15%.
    pub sqft_tolerance: f64,
    /// Relative lot-size tolerance; `None` when lot size is not a value
    /// driver for the area type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_tolerance: Option<f64>,
    pub year_built_tolerance: u16,
}

/// Geographic and temporal bounds for one comp search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub radius_miles: f64,
    pub window_months: u32,
}

/// Derived search configuration for a subject property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub preferred_months: u32,
    pub max_months: u32,
    pub criteria: MatchingCriteria,
}

impl SearchParams {
    pub fn initial_window(&self) -> SearchWindow {
        SearchWindow {
            radius_miles: self.radius,
            window_months: self.preferred_months,
        }
    }
}

/// Derive search radius, time window, and attribute tolerances from the
/// area classification and the subject's size.
pub fn build_search_params(area: AreaType, subject_sqft: u32) -> SearchParams {
    let (min_radius, radius, max_radius) = match area {
        AreaType::Urban => (0.25, 0.5, 0.75),
        AreaType::Suburban => (0.5, 1.0, 1.5),
        AreaType::Rural => (1.0, 2.0, 2.5),
    };

    // Smaller homes need tighter matching; absolute dollar variance per
    // square foot is larger.
    let sqft_tolerance = if subject_sqft < 800 {
        0.10
    } else if subject_sqft < 1200 {
        0.15
    } else {
        0.20
    };

    let lot_tolerance = match area {
        AreaType::Urban => None,
        AreaType::Suburban | AreaType::Rural => Some(0.5),
    };

    SearchParams {
        radius,
        min_radius,
        max_radius,
        preferred_months: 6,
        max_months: 12,
        criteria: MatchingCriteria {
            bed_tolerance: 1,
            bath_tolerance: 1.0,
            sqft_tolerance,
            lot_tolerance,
            year_built_tolerance: 10,
        },
    }
}

const RADIUS_GROWTH: f64 = 1.5;

/// Bounded widening of the search window when a pass returns too few
/// comps. Each step grows the radius toward `max_radius` and stretches the
/// time window to `max_months`; the ladder is exhausted once both bounds
/// are reached or the step cap is hit, and the caller keeps whatever was
/// found.
#[derive(Debug, Clone)]
pub struct SearchLadder {
    current: SearchWindow,
    max_radius: f64,
    max_months: u32,
    steps_taken: u32,
    step_cap: u32,
}

impl SearchLadder {
    pub fn new(params: &SearchParams, step_cap: u32) -> Self {
        Self {
            current: params.initial_window(),
            max_radius: params.max_radius,
            max_months: params.max_months,
            steps_taken: 0,
            step_cap,
        }
    }

    pub fn current(&self) -> SearchWindow {
        self.current
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    fn at_bounds(&self) -> bool {
        self.current.radius_miles >= self.max_radius
            && self.current.window_months >= self.max_months
    }

    /// Widen the window one step; `None` once the ladder is exhausted.
    pub fn expand(&mut self) -> Option<SearchWindow> {
        if self.steps_taken >= self.step_cap || self.at_bounds() {
            return None;
        }

        self.current.radius_miles =
            (self.current.radius_miles * RADIUS_GROWTH).min(self.max_radius);
        self.current.window_months = self.max_months;
        self.steps_taken += 1;

        Some(self.current)
    }
}
