use crate::valuation::mao::{calculate_mao, MaoRule, ValidationError, ValuationInputs};

fn inputs(rule: MaoRule) -> ValuationInputs {
    ValuationInputs {
        estimated_repairs: 30_000.0,
        holding_cost: 5_000.0,
        closing_cost: 4_000.0,
        wholesale_fee: 1_000.0,
        mao_rule: rule,
        mao_rule_percent: None,
    }
}

#[test]
fn fixed_rules_follow_the_offer_formula() {
    for (rule, percent) in [
        (MaoRule::Percent65, 0.65),
        (MaoRule::Percent70, 0.70),
        (MaoRule::Percent75, 0.75),
    ] {
        let breakdown = calculate_mao(Some(200_000.0), &inputs(rule))
            .expect("inputs valid")
            .expect("arv present");

        let expected_mao = 200_000.0 * percent - 40_000.0;
        assert_eq!(breakdown.rule_percent, percent);
        assert_eq!(breakdown.total_fees, 40_000.0);
        assert_eq!(breakdown.mao, expected_mao.round());
        assert_eq!(
            breakdown.suggested_offer,
            (expected_mao * 0.95).max(0.0).round()
        );
    }
}

#[test]
fn custom_rule_uses_the_explicit_percent() {
    let mut custom = inputs(MaoRule::Custom);
    custom.mao_rule_percent = Some(80.0);

    let breakdown = calculate_mao(Some(200_000.0), &custom)
        .expect("inputs valid")
        .expect("arv present");

    assert_eq!(breakdown.rule_percent, 0.80);
    assert_eq!(breakdown.mao, 120_000.0);
}

#[test]
fn custom_percent_outside_bounds_is_rejected_not_clamped() {
    for out_of_range in [49.9, 90.1, -10.0] {
        let mut custom = inputs(MaoRule::Custom);
        custom.mao_rule_percent = Some(out_of_range);

        let error = calculate_mao(Some(200_000.0), &custom).expect_err("rejected");
        match error {
            ValidationError::CustomPercentOutOfRange { found } => {
                assert_eq!(found, out_of_range)
            }
            other => panic!("expected out-of-range error, got {other:?}"),
        }
    }
}

#[test]
fn custom_rule_without_a_percent_is_rejected() {
    let custom = inputs(MaoRule::Custom);
    let error = calculate_mao(Some(200_000.0), &custom).expect_err("rejected");
    match error {
        ValidationError::MissingCustomPercent => {}
        other => panic!("expected missing percent error, got {other:?}"),
    }
}

#[test]
fn negative_monetary_inputs_are_rejected() {
    let mut bad = inputs(MaoRule::Percent70);
    bad.holding_cost = -1.0;

    let error = calculate_mao(Some(200_000.0), &bad).expect_err("rejected");
    match error {
        ValidationError::NegativeMonetary { field, .. } => assert_eq!(field, "holding_cost"),
        other => panic!("expected negative monetary error, got {other:?}"),
    }
}

#[test]
fn absurdly_large_inputs_are_rejected() {
    let mut bad = inputs(MaoRule::Percent70);
    bad.estimated_repairs = 20_000_000.0;

    let error = calculate_mao(Some(200_000.0), &bad).expect_err("rejected");
    match error {
        ValidationError::MonetaryTooLarge { field, .. } => assert_eq!(field, "estimated_repairs"),
        other => panic!("expected too-large error, got {other:?}"),
    }
}

#[test]
fn missing_arv_yields_no_offer() {
    assert!(calculate_mao(None, &inputs(MaoRule::Percent70))
        .expect("inputs valid")
        .is_none());
    assert!(calculate_mao(Some(0.0), &inputs(MaoRule::Percent70))
        .expect("inputs valid")
        .is_none());
}

#[test]
fn suggested_offer_never_goes_negative() {
    let mut heavy = inputs(MaoRule::Percent65);
    heavy.estimated_repairs = 200_000.0;

    let breakdown = calculate_mao(Some(100_000.0), &heavy)
        .expect("inputs valid")
        .expect("arv present");

    assert!(breakdown.mao < 0.0);
    assert_eq!(breakdown.suggested_offer, 0.0);
}

#[test]
fn amounts_round_to_whole_dollars() {
    let breakdown = calculate_mao(Some(123_456.78), &inputs(MaoRule::Percent65))
        .expect("inputs valid")
        .expect("arv present");

    assert_eq!(breakdown.arv, 123_457.0);
    assert_eq!(breakdown.base_mao, (123_456.78_f64 * 0.65).round());
    assert_eq!(breakdown.mao.fract(), 0.0);
    assert_eq!(breakdown.suggested_offer.fract(), 0.0);
}
