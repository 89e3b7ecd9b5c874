use gnb_cli::selftest::{render_outcomes, run_scenarios};

#[test]
fn every_built_in_scenario_passes() {
    let outcomes = run_scenarios();

    assert!(outcomes.len() >= 8);
    for outcome in &outcomes {
        assert!(outcome.passed(), "{}: {:?}", outcome.name, outcome.error);
    }
}

#[test]
fn outcome_table_lists_each_scenario() {
    let outcomes = run_scenarios();
    let mut table = render_outcomes(&outcomes);
    table.force_no_tty();
    let rendered = table.to_string();

    assert!(rendered.contains("PASS"));
    assert!(!rendered.contains("FAIL"));
    assert!(rendered.contains("SRA instrument lookup is strict"));
}
