use serde::{Deserialize, Serialize};

/// Offer rule determining the percentage of ARV an investor will pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaoRule {
    #[serde(rename = "65%")]
    Percent65,
    #[serde(rename = "70%")]
    Percent70,
    #[serde(rename = "75%")]
    Percent75,
    #[serde(rename = "custom")]
    Custom,
}

impl MaoRule {
    pub const fn label(self) -> &'static str {
        match self {
            MaoRule::Percent65 => "65%",
            MaoRule::Percent70 => "70%",
            MaoRule::Percent75 => "75%",
            MaoRule::Custom => "custom",
        }
    }
}

/// Bounds for the custom rule percentage.
pub const CUSTOM_PERCENT_MIN: f64 = 50.0;
pub const CUSTOM_PERCENT_MAX: f64 = 90.0;

/// Upper bound for any single monetary input; values above this indicate a
/// caller bug rather than an expensive flip.
pub const MONETARY_INPUT_MAX: f64 = 10_000_000.0;

/// Discount applied to the MAO to leave negotiation room.
const NEGOTIATION_BUFFER: f64 = 0.95;

/// Validated cost assumptions for the maximum-allowable-offer calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    pub estimated_repairs: f64,
    pub holding_cost: f64,
    pub closing_cost: f64,
    pub wholesale_fee: f64,
    pub mao_rule: MaoRule,
    /// Required when `mao_rule` is custom; whole-number percent in [50, 90].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mao_rule_percent: Option<f64>,
}

/// Malformed or out-of-range valuation inputs; rejected before the
/// pipeline runs, never silently clamped.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be negative (found {found})")]
    NegativeMonetary { field: &'static str, found: f64 },
    #[error("{field} exceeds the {max} limit (found {found})")]
    MonetaryTooLarge {
        field: &'static str,
        max: f64,
        found: f64,
    },
    #[error("{field} must be a finite number")]
    NonFiniteMonetary { field: &'static str },
    #[error("custom rule percent must be within [{CUSTOM_PERCENT_MIN}, {CUSTOM_PERCENT_MAX}] (found {found})")]
    CustomPercentOutOfRange { found: f64 },
    #[error("custom rule selected without a rule percent")]
    MissingCustomPercent,
}

impl ValuationInputs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("estimated_repairs", self.estimated_repairs),
            ("holding_cost", self.holding_cost),
            ("closing_cost", self.closing_cost),
            ("wholesale_fee", self.wholesale_fee),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteMonetary { field });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeMonetary { field, found: value });
            }
            if value > MONETARY_INPUT_MAX {
                return Err(ValidationError::MonetaryTooLarge {
                    field,
                    max: MONETARY_INPUT_MAX,
                    found: value,
                });
            }
        }

        if self.mao_rule == MaoRule::Custom {
            let percent = self
                .mao_rule_percent
                .ok_or(ValidationError::MissingCustomPercent)?;
            if !percent.is_finite()
                || !(CUSTOM_PERCENT_MIN..=CUSTOM_PERCENT_MAX).contains(&percent)
            {
                return Err(ValidationError::CustomPercentOutOfRange { found: percent });
            }
        }

        Ok(())
    }

    pub fn rule_percent(&self) -> f64 {
        match self.mao_rule {
            MaoRule::Percent65 => 0.65,
            MaoRule::Percent70 => 0.70,
            MaoRule::Percent75 => 0.75,
            MaoRule::Custom => self.mao_rule_percent.unwrap_or(CUSTOM_PERCENT_MIN) / 100.0,
        }
    }

    pub fn total_fees(&self) -> f64 {
        self.estimated_repairs + self.holding_cost + self.closing_cost + self.wholesale_fee
    }
}

/// Maximum-allowable-offer breakdown; all amounts rounded to whole dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaoBreakdown {
    pub arv: f64,
    pub rule_percent: f64,
    pub base_mao: f64,
    pub total_fees: f64,
    pub mao: f64,
    /// 5% below the MAO, never negative.
    pub suggested_offer: f64,
}

/// Apply the offer rule and cost line items. Returns `Ok(None)` when there
/// is no positive ARV to offer against.
pub fn calculate_mao(
    arv: Option<f64>,
    inputs: &ValuationInputs,
) -> Result<Option<MaoBreakdown>, ValidationError> {
    inputs.validate()?;

    let arv = match arv {
        Some(value) if value > 0.0 => value,
        _ => return Ok(None),
    };

    let rule_percent = inputs.rule_percent();
    let base_mao = arv * rule_percent;
    let total_fees = inputs.total_fees();
    let mao = base_mao - total_fees;
    let suggested_offer = (mao * NEGOTIATION_BUFFER).max(0.0);

    Ok(Some(MaoBreakdown {
        arv: arv.round(),
        rule_percent,
        base_mao: base_mao.round(),
        total_fees: total_fees.round(),
        mao: mao.round(),
        suggested_offer: suggested_offer.round(),
    }))
}
