use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AreaType, SubjectProperty, DEFAULT_DAYS_ON_MARKET};
use super::scoring::ScoredComp;

/// Weight of each deal-score signal; the five weights sum to 1.0.
const SPREAD_WEIGHT: f64 = 0.40;
const REPAIR_WEIGHT: f64 = 0.20;
const MARKET_WEIGHT: f64 = 0.20;
const AREA_WEIGHT: f64 = 0.10;
const COMP_STRENGTH_WEIGHT: f64 = 0.10;

/// Within the market signal, the DOM comparison outweighs demand.
const DOM_WEIGHT: f64 = 0.6;
const DEMAND_WEIGHT: f64 = 0.4;

/// Comps sold within this many months count as "recent" for the price
/// trend signal.
const TREND_RECENT_MONTHS: f64 = 6.0;

/// Inputs to the deal-score composer beyond the comp pool itself.
#[derive(Debug, Clone)]
pub struct DealContext {
    pub asking_price: f64,
    pub arv: f64,
    pub estimated_repairs: f64,
    pub subject_days_on_market: Option<u32>,
    pub area_type: AreaType,
    /// Externally supplied neighborhood rating, already stripped of
    /// unavailable/default sentinel values.
    pub neighborhood_rating: Option<f64>,
    pub as_of: NaiveDate,
}

impl DealContext {
    pub fn for_subject(
        subject: &SubjectProperty,
        arv: f64,
        estimated_repairs: f64,
        area_type: AreaType,
        neighborhood_rating: Option<f64>,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            asking_price: subject.asking_price,
            arv,
            estimated_repairs,
            subject_days_on_market: subject.days_on_market,
            area_type,
            neighborhood_rating,
            as_of,
        }
    }
}

/// Composite deal quality with its five sub-scores, each 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealScoreBreakdown {
    pub spread: f64,
    pub repair: f64,
    pub market: f64,
    pub area: f64,
    pub comp_strength: f64,
    pub composite: f64,
}

/// Combine spread, repair burden, market trend, area quality, and comp
/// strength into one 0–100 deal score.
pub fn compose_deal_score(ctx: &DealContext, comps: &[ScoredComp]) -> DealScoreBreakdown {
    let spread = spread_score(ctx.asking_price, ctx.arv);
    let repair = repair_score(ctx.estimated_repairs, ctx.arv);
    let market = market_score(ctx, comps);
    let area = area_score(ctx);
    let comp_strength = comp_strength_score(comps);

    let composite = (spread * SPREAD_WEIGHT
        + repair * REPAIR_WEIGHT
        + market * MARKET_WEIGHT
        + area * AREA_WEIGHT
        + comp_strength * COMP_STRENGTH_WEIGHT)
        .clamp(0.0, 100.0);

    DealScoreBreakdown {
        spread,
        repair,
        market,
        area,
        comp_strength,
        composite,
    }
}

/// A break-even spread centers at 50; every percentage point of spread
/// moves the score two points.
fn spread_score(asking_price: f64, arv: f64) -> f64 {
    if asking_price <= 0.0 {
        return 50.0;
    }
    let spread_percent = (arv - asking_price) / asking_price * 100.0;
    (50.0 + spread_percent * 2.0).clamp(0.0, 100.0)
}

fn repair_score(estimated_repairs: f64, arv: f64) -> f64 {
    if arv <= 0.0 {
        return 0.0;
    }
    let repair_percent = estimated_repairs / arv * 100.0;
    (100.0 - repair_percent * 2.0).max(0.0)
}

/// Blend of the DOM comparison (60%) and the demand signals (40%). When
/// every demand signal is missing the DOM sub-score stands alone.
fn market_score(ctx: &DealContext, comps: &[ScoredComp]) -> f64 {
    let pool_dom = average_pool_dom(comps);
    let dom = dom_score(ctx.subject_days_on_market, pool_dom);

    match demand_score(ctx, comps, pool_dom) {
        Some(demand) => dom * DOM_WEIGHT + demand * DEMAND_WEIGHT,
        None => dom,
    }
}

/// Piecewise-linear anchors for the subject-vs-pool DOM comparison; a
/// subject moving faster than its market scores higher.
const DOM_ANCHORS: [(f64, f64); 5] = [
    (-20.0, 100.0),
    (-10.0, 85.0),
    (0.0, 65.0),
    (20.0, 45.0),
    (50.0, 20.0),
];

fn dom_score(subject_dom: Option<u32>, pool_dom: Option<f64>) -> f64 {
    let subject = f64::from(subject_dom.unwrap_or(DEFAULT_DAYS_ON_MARKET));
    let pool = pool_dom.unwrap_or(f64::from(DEFAULT_DAYS_ON_MARKET));
    if pool <= 0.0 {
        return DOM_ANCHORS[2].1;
    }

    let relative = (subject - pool) / pool * 100.0;
    piecewise_linear(relative, &DOM_ANCHORS)
}

fn piecewise_linear(x: f64, anchors: &[(f64, f64)]) -> f64 {
    let (first_x, first_y) = anchors[0];
    if x <= first_x {
        return first_y;
    }
    for window in anchors.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if x <= x1 {
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    anchors[anchors.len() - 1].1
}

/// Demand from three independently optional signals; missing signals are
/// omitted from the average rather than defaulted.
fn demand_score(ctx: &DealContext, comps: &[ScoredComp], pool_dom: Option<f64>) -> Option<f64> {
    let mut signals: Vec<f64> = Vec::with_capacity(3);

    if let Some(trend) = price_trend_score(ctx.as_of, comps) {
        signals.push(trend);
    }

    if !comps.is_empty() {
        signals.push(inventory_score(comps.len()));
    }

    if let Some(pool) = pool_dom {
        signals.push(velocity_score(pool));
    }

    if signals.is_empty() {
        return None;
    }
    Some(signals.iter().sum::<f64>() / signals.len() as f64)
}

/// Recent-vs-older sale price trend. Needs at least one comp on each side
/// of the six-month split to say anything.
fn price_trend_score(as_of: NaiveDate, comps: &[ScoredComp]) -> Option<f64> {
    let mut recent = Vec::new();
    let mut older = Vec::new();

    for scored in comps {
        let comp = &scored.comp;
        if comp.sale_price <= 0.0 {
            continue;
        }
        match comp.months_since_sale(as_of) {
            Some(months) if months <= TREND_RECENT_MONTHS => recent.push(comp.sale_price),
            Some(_) => older.push(comp.sale_price),
            None => {}
        }
    }

    if recent.is_empty() || older.is_empty() {
        return None;
    }

    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
    let older_avg = older.iter().sum::<f64>() / older.len() as f64;
    if older_avg <= 0.0 {
        return None;
    }

    let trend_percent = (recent_avg - older_avg) / older_avg * 100.0;
    Some((50.0 + trend_percent * 5.0).clamp(0.0, 100.0))
}

/// Pool size as an inventory proxy: a thin pool reads as low inventory and
/// therefore high demand. Known approximation; search breadth is not
/// actual market inventory.
fn inventory_score(pool_size: usize) -> f64 {
    if pool_size <= 5 {
        80.0
    } else if pool_size <= 10 {
        55.0
    } else {
        35.0
    }
}

/// Average comp DOM as a sale-velocity signal; fast-moving markets score
/// highest.
fn velocity_score(average_dom: f64) -> f64 {
    if average_dom <= 30.0 {
        85.0
    } else if average_dom <= 60.0 {
        60.0
    } else if average_dom <= 90.0 {
        45.0
    } else {
        30.0
    }
}

fn average_pool_dom(comps: &[ScoredComp]) -> Option<f64> {
    let values: Vec<f64> = comps
        .iter()
        .filter_map(|scored| scored.comp.days_on_market.map(f64::from))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Externally supplied neighborhood rating when available, otherwise a
/// proxy from area type adjusted by price tier.
fn area_score(ctx: &DealContext) -> f64 {
    if let Some(rating) = ctx.neighborhood_rating {
        if rating > 0.0 {
            return rating.clamp(0.0, 100.0);
        }
    }

    let base: f64 = match ctx.area_type {
        AreaType::Urban => 65.0,
        AreaType::Suburban => 70.0,
        AreaType::Rural => 45.0,
    };

    let tier = if ctx.asking_price > 500_000.0 {
        15.0
    } else if ctx.asking_price > 300_000.0 {
        10.0
    } else if ctx.asking_price > 0.0 && ctx.asking_price < 150_000.0 {
        -10.0
    } else {
        0.0
    };

    (base + tier).clamp(0.0, 100.0)
}

fn comp_strength_score(comps: &[ScoredComp]) -> f64 {
    if comps.is_empty() {
        return 0.0;
    }
    comps.iter().map(|scored| scored.comp_score).sum::<f64>() / comps.len() as f64
}
