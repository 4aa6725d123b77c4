use std::io::Write;

use budgetscope::{
    AggregatedSeries, DashboardSession, ImpactAggregator, ImpactDataset, ProvisionId,
    SelectionAction, SelectionState, CATALOG,
};

const HEADER: &str = "constituency_code,constituency_name,year,family_type,income_decile,household_income,two_child_limit,fuel_duty_freeze,rail_fares_freeze,threshold_freeze_extension,freeze_student_loan_thresholds,salary_sacrifice_cap,dividend_tax_increase_2pp,savings_tax_increase_2pp,property_tax_increase_2pp,high_value_council_tax_surcharge,ev_mileage_charge";

fn fixture_csv() -> String {
    format!(
        "{HEADER}\n\
        E14001234,Holborn and St Pancras,2029,couple_with_children,3,31000,520,90,40,-310,-120,-250,-60,-25,-15,0,-30\n\
        E14001234,Holborn and St Pancras,2029,single,6,48000,0,60,85,-420,-200,-150,-80,-40,-35,0,-45\n\
        E14001234,Holborn and St Pancras,2027,single,6,45000,0,70,80,-260,-180,0,-75,-35,-30,0,0\n\
        E14000530,Aldershot,2029,couple,4,36000,260,110,25,-355,-90,-75,-45,-20,-18,0,-60\n\
        E14000530,Aldershot,2029,pensioner_couple,5,29000,0,95,5,-210,0,0,-55,-60,-22,0,-15\n"
    )
}

fn fixture_dataset() -> ImpactDataset {
    ImpactDataset::from_csv_str(&fixture_csv()).unwrap()
}

fn holborn_2029() -> SelectionState {
    SelectionState::from_query("constituency=E14001234")
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn scenario_full_selection_equals_signed_column_sum() {
    let dataset = fixture_dataset();
    let mut state = holborn_2029();
    state.resolve_constituency(&dataset);

    // Row-level sum of every signed per-policy column for Holborn/2029.
    let expected: f64 = dataset
        .rows()
        .iter()
        .filter(|r| {
            r.get("constituency_code") == Some("E14001234") && r.get("year") == Some("2029")
        })
        .map(|r| {
            CATALOG
                .iter()
                .flat_map(|p| p.columns.iter())
                .map(|col| r.number(col).unwrap_or(0.0))
                .sum::<f64>()
        })
        .sum();

    let net = ImpactAggregator::new(&dataset, &state).net_impact();
    assert_close(net, expected);
    assert!(net != 0.0);
}

#[test]
fn scenario_deselecting_salary_sacrifice_cap_removes_its_column() {
    let dataset = fixture_dataset();
    let full = holborn_2029();
    let mut rest = full.clone();
    rest.policies.remove(&ProvisionId::SalarySacrificeCap);

    let cap_column: f64 = dataset
        .rows()
        .iter()
        .filter(|r| {
            r.get("constituency_code") == Some("E14001234") && r.get("year") == Some("2029")
        })
        .map(|r| r.number("salary_sacrifice_cap").unwrap_or(0.0))
        .sum();

    let with_cap = ImpactAggregator::new(&dataset, &full).net_impact();
    let without_cap = ImpactAggregator::new(&dataset, &rest).net_impact();
    assert_close(with_cap - without_cap, cap_column);

    // All other derived shapes shift by the same column, nowhere else.
    let scatter_full = ImpactAggregator::new(&dataset, &full).scatter();
    let scatter_rest = ImpactAggregator::new(&dataset, &rest).scatter();
    assert_eq!(scatter_full.len(), scatter_rest.len());
    for (a, b) in scatter_full.iter().zip(&scatter_rest) {
        assert_close(a.income, b.income);
    }
}

#[test]
fn scenario_empty_selection_collapses_every_series_to_zero() {
    let dataset = fixture_dataset();

    for query in ["constituency=E14001234", "constituency=E14000530", ""] {
        let mut state = SelectionState::from_query(query);
        state.policies.clear();

        let series = AggregatedSeries::compute(&dataset, &state);
        assert!(series.family_breakdown.iter().all(|b| b.total == 0.0));
        assert!(series.trend.iter().all(|p| p.total == 0.0));
        assert!(series.income_distribution.iter().all(|b| b.total == 0.0));
        assert!(series.scatter.iter().all(|p| p.impact == 0.0));
    }
}

#[test]
fn scenario_short_row_affects_only_itself() {
    // Second line is missing everything after family_type.
    let csv = format!(
        "{HEADER}\n\
        E14001234,Holborn and St Pancras,2029,single,3,24000,150,0,0,0,0,-90,0,0,0,0,0\n\
        E14001234,Holborn and St Pancras,2029,couple\n"
    );
    let dataset = ImpactDataset::from_csv_str(&csv).unwrap();
    assert_eq!(dataset.len(), 2);

    let state = holborn_2029();
    let aggregator = ImpactAggregator::new(&dataset, &state);

    // The short row contributes zero impact and no scatter point, the
    // intact row is untouched.
    assert_close(aggregator.net_impact(), 150.0 - 90.0);
    assert_eq!(aggregator.scatter().len(), 1);
}

#[test]
fn scenario_failed_load_renders_empty_not_fatal() {
    let session = DashboardSession::boot("/nonexistent/constituency.csv", "");
    assert!(session.dataset().is_empty());
    assert!(session.dataset().constituencies().is_empty());

    let series = session.series();
    assert!(series.family_breakdown.is_empty());
    assert!(series.income_distribution.is_empty());
    assert!(series.scatter.is_empty());
    assert!(series.trend.iter().all(|p| p.total == 0.0));
}

#[test]
fn session_change_events_track_recomputation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("constituency.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(fixture_csv().as_bytes()).unwrap();

    let mut session = DashboardSession::boot(&path, "constituency=E14001234");
    assert_eq!(
        session.state().constituency.as_ref().unwrap().name,
        "Holborn and St Pancras"
    );

    let watch = session.subscribe();
    let series = session
        .apply(SelectionAction::ToggleProvision(ProvisionId::RailFaresFreeze))
        .unwrap();

    let change = watch.try_recv().unwrap();
    assert!(!change.state.is_selected(ProvisionId::RailFaresFreeze));
    assert_eq!(change.query, session.query_string());

    // The published state derives exactly the series the session returned.
    assert_eq!(
        AggregatedSeries::compute(session.dataset(), &change.state),
        series
    );
}

#[test]
fn constituency_list_is_deduplicated_and_name_sorted() {
    let dataset = fixture_dataset();
    let names: Vec<&str> = dataset
        .constituencies()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Aldershot", "Holborn and St Pancras"]);
}

#[test]
fn series_serialize_for_the_presentation_layer() {
    let dataset = fixture_dataset();
    let state = holborn_2029();

    let series = AggregatedSeries::compute(&dataset, &state);
    let json = serde_json::to_value(&series).unwrap();

    assert!(json["trend"].as_array().unwrap().len() == 5);
    assert!(json["scatter"].as_array().is_some());
    let round_tripped: AggregatedSeries = serde_json::from_value(json).unwrap();
    assert_eq!(round_tripped, series);
}
