use dealscope::error::AppError;
use dealscope::valuation::{AnalysisResult, SubjectProperty};

/// Print the analysis, either as prose for a terminal or as the full
/// serialized result for machine consumption.
pub(crate) fn render_analysis(
    subject: &SubjectProperty,
    result: &AnalysisResult,
    json: bool,
) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "Subject: {} ({} bd / {} ba / {} sqft, asking {})",
        subject.address,
        subject.beds,
        subject.baths,
        subject.sqft,
        money(subject.asking_price)
    );

    if result.comps.is_empty() {
        println!("No usable comparable sales were found.");
    } else {
        let qualifier = if result.comps_filtered_out {
            " (matching filter exhausted; unfiltered pool shown for manual review)"
        } else {
            ""
        };
        println!("Comparable sales, best first{qualifier}:");
        for entry in &result.comps {
            println!(
                "  {:>5.1} | {:.2} mi | {} | {}",
                entry.comp_score,
                entry.comp.distance_miles,
                money(entry.comp.sale_price),
                entry.comp.address
            );
        }
    }

    match (result.arv, result.arv_method) {
        (Some(arv), Some(method)) => println!("ARV: {} ({})", money(arv), method.label()),
        _ => println!("ARV: unavailable with the current comp set"),
    }

    if let Some(mao) = &result.mao {
        println!(
            "MAO at {:.0}% of ARV: {} | fees {} | suggested offer {}",
            mao.rule_percent * 100.0,
            money(mao.mao),
            money(mao.total_fees),
            money(mao.suggested_offer)
        );
    }

    if let Some(deal) = &result.deal_score {
        println!(
            "Deal score: {:.1} (spread {:.0}, repair {:.0}, market {:.0}, area {:.0}, comps {:.0})",
            deal.composite, deal.spread, deal.repair, deal.market, deal.area, deal.comp_strength
        );
    }

    if let Some(recommendation) = &result.recommendation {
        println!(
            "Recommendation: {} — {}",
            recommendation.category.label(),
            recommendation.reason
        );
    }

    println!("Confidence: {:.0}/100", result.confidence);

    Ok(())
}

/// Whole-dollar amount with thousands separators.
pub(crate) fn money(value: f64) -> String {
    let negative = value < 0.0;
    let whole = value.abs().round() as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
