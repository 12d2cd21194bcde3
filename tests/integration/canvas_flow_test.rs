//! Canvas Flow Integration Tests
//!
//! Exercises the model managers and aggregate together: dependency
//! gating, impact chain strictness, order independence of the economic
//! model, and completion behavior.

use social_canvas::models::canvas::IssueKind;
use social_canvas::models::impact_chain::ImpactField;
use social_canvas::services::canvas::{CanvasAggregate, ExportFormat};
use social_canvas::storage::Database;

const LONG: &str = "Content that is comfortably past the twenty character minimum.";

fn aggregate() -> CanvasAggregate {
    let db = Database::new_in_memory().unwrap();
    CanvasAggregate::create(db, "Integration Canvas").unwrap()
}

fn fill_chain(agg: &CanvasAggregate, count: usize) {
    for field in &ImpactField::CHAIN_ORDER[..count] {
        let result = agg
            .update_impact_field(field.as_str(), &format!("{} described here", field))
            .unwrap();
        assert!(result.success, "{} failed: {:?}", field, result.errors);
    }
}

#[test]
fn test_customer_dependency_gating_end_to_end() {
    let agg = aggregate();

    // value_proposition blocked while jobs_to_be_done is empty
    let result = agg.update_section("value_proposition", LONG).unwrap();
    assert!(!result.success);
    assert_eq!(result.errors[0].kind, IssueKind::DependencyUnmet);

    // below-minimum content does not satisfy a dependency
    agg.update_section("customers", LONG).unwrap();
    let short = agg.update_section("jobs_to_be_done", "too short").unwrap();
    assert!(!short.success);
    let result = agg.update_section("value_proposition", LONG).unwrap();
    assert!(!result.success);
    assert_eq!(
        result.errors[0].prerequisite.as_deref(),
        Some("jobs_to_be_done")
    );

    // once both prerequisites hold >= 20 chars, the write succeeds
    agg.update_section("jobs_to_be_done", LONG).unwrap();
    let result = agg.update_section("value_proposition", LONG).unwrap();
    assert!(result.success);
}

#[test]
fn test_impact_chain_strictness() {
    let agg = aggregate();

    // out-of-order write fails
    let result = agg
        .update_impact_field("activities", "Weekly workshops")
        .unwrap();
    assert!(!result.success);

    // in-order writes always succeed
    fill_chain(&agg, 8);

    // the chain's impact value is the canvas's impact content
    let canvas = agg.get_full_canvas().unwrap();
    assert_eq!(canvas.impact_chain.impact, "impact described here");
    assert!(canvas.impact_chain.is_complete());
}

#[test]
fn test_impact_final_field_requires_all_seven_predecessors() {
    let agg = aggregate();
    fill_chain(&agg, 6);

    let result = agg
        .update_impact_field("impact", "Sustainable artisan livelihoods")
        .unwrap();
    assert!(!result.success);
    assert_eq!(
        result.errors[0].prerequisite.as_deref(),
        Some("long_term_outcomes")
    );

    fill_chain(&agg, 7);
    let result = agg
        .update_impact_field("impact", "Sustainable artisan livelihoods")
        .unwrap();
    assert!(result.success);
}

#[test]
fn test_economic_model_order_independence() {
    // every permutation of the four economic sections succeeds
    let permutations: Vec<Vec<&str>> = vec![
        vec!["channels", "revenue", "costs", "advantage"],
        vec!["advantage", "costs", "revenue", "channels"],
        vec!["revenue", "advantage", "channels", "costs"],
        vec!["costs", "channels", "advantage", "revenue"],
    ];
    for order in permutations {
        let agg = aggregate();
        for key in &order {
            let result = agg.update_section(key, LONG).unwrap();
            assert!(result.success, "{} failed in order {:?}", key, order);
        }
    }
}

#[test]
fn test_advantage_without_revenue_is_a_warning_not_an_error() {
    let agg = aggregate();
    let result = agg.update_section("advantage", LONG).unwrap();
    assert!(result.success);
    assert!(!result.warnings.is_empty());

    let report = agg.economic().validate().unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| w.section == "advantage" && w.message.contains("revenue")));
}

#[test]
fn test_completion_percentage_monotonic_to_100() {
    let agg = aggregate();
    let mut previous = 0u8;

    for key in [
        "purpose",
        "customers",
        "jobs_to_be_done",
        "value_proposition",
        "solution",
        "channels",
        "revenue",
        "costs",
        "key_metrics",
        "advantage",
    ] {
        let result = agg.update_section(key, LONG).unwrap();
        assert!(result.success, "{} failed", key);
        assert!(
            result.completion.percentage >= previous,
            "completion decreased after {}",
            key
        );
        previous = result.completion.percentage;
    }
    assert!(previous < 100);

    fill_chain(&agg, 8);
    let completion = agg.get_completion().unwrap();
    assert_eq!(completion.percentage, 100);
    assert!(completion.missing_sections.is_empty());
}

#[test]
fn test_sample_scenario() {
    let agg = aggregate();

    // update_purpose succeeds and completion rises from 0
    let result = agg
        .update_section(
            "purpose",
            "We exist to help under-banked artisans reach global buyers",
        )
        .unwrap();
    assert!(result.success);
    assert!(result.completion.percentage > 0);

    // first impact field succeeds
    let result = agg
        .update_impact_field("issue", "Lack of market access for rural artisans")
        .unwrap();
    assert!(result.success);

    // jumping to the final impact field fails, naming participants
    let result = agg
        .update_impact_field("impact", "Sustainable artisan livelihoods")
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.errors[0].kind, IssueKind::DependencyUnmet);
    assert_eq!(result.errors[0].prerequisite.as_deref(), Some("participants"));
}

#[test]
fn test_export_reflects_live_state() {
    let agg = aggregate();
    agg.update_section("purpose", LONG).unwrap();
    fill_chain(&agg, 2);

    let md = agg.export(ExportFormat::Markdown).unwrap();
    assert!(md.contains("## Purpose"));
    assert!(md.contains(LONG));
    assert!(md.contains("### Participants"));

    let json: serde_json::Value =
        serde_json::from_str(&agg.export(ExportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["impact_chain"][0]["field"], "issue");
    assert_eq!(json["impact_chain"][0]["is_complete"], true);
}
