//! End-to-end runs through the service layer.

use pc_app::{AppError, RunOverrides, run_batch, run_scenario, run_scenario_with, to_csv};
use pc_core::{Tolerances, nearly_equal};
use pc_project::Scenario;

fn with_pole(pole: f64) -> Scenario {
    let mut s = Scenario::template();
    s.name = format!("pole {pole}");
    s.controller.pole = pole;
    s
}

#[test]
fn template_run_settles_on_setpoint() {
    let out = run_scenario(&Scenario::template()).expect("template runs");
    let summary = &out.summary;

    assert_eq!(summary.steps, 3000);
    assert!(!summary.truncated);
    // Initial sample plus every tenth step.
    assert_eq!(summary.record_count, 301);
    assert_eq!(summary.time_range.0, 0.0);
    assert!(nearly_equal(summary.time_range.1, 3.0, Tolerances::default()));
    assert!(nearly_equal(summary.final_state.x1, 0.05, Tolerances::relative(0.01)));
    assert!(summary.position_range.0 >= 0.01);
    assert!(summary.pressure_range.1 <= 1.0e6);

    let settled = summary.settling_time.expect("run ends inside the band");
    assert!(settled > 0.0 && settled < 1.5, "settled at {settled}");
}

#[test]
fn overrides_shorten_the_run() {
    let overrides = RunOverrides {
        stop_time_s: Some(0.5),
        step_size_s: Some(5e-4),
    };
    let out = run_scenario_with(&Scenario::template(), &overrides).expect("run");
    assert_eq!(out.summary.steps, 1000);
    assert!(nearly_equal(out.summary.time_range.1, 0.5, Tolerances::default()));
}

#[test]
fn invalid_scenario_is_reported_before_running() {
    let err = run_scenario(&with_pole(2.0)).unwrap_err();
    assert!(matches!(err, AppError::Scenario(_)), "got {err:?}");
}

#[test]
fn batch_matches_sequential_runs() {
    let scenarios = vec![with_pole(-10.0), with_pole(-4.0), with_pole(2.0), with_pole(-6.0)];
    let batch = run_batch(&scenarios);
    assert_eq!(batch.len(), scenarios.len());

    for (scenario, result) in scenarios.iter().zip(&batch) {
        match (run_scenario(scenario), result) {
            (Ok(seq), Ok(par)) => {
                assert_eq!(seq.summary.name, par.summary.name);
                assert_eq!(seq.record, par.record);
            }
            (Err(_), Err(_)) => {}
            (seq, par) => panic!(
                "{}: sequential {:?} vs batch {:?}",
                scenario.name,
                seq.is_ok(),
                par.is_ok()
            ),
        }
    }
}

#[test]
fn csv_export_has_one_row_per_sample() {
    let out = run_scenario(&Scenario::template()).expect("run");
    let csv = to_csv(&out.record, &out.outputs);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("time_s,position_m,velocity_m_per_s,pressure_pa,flow_m3_per_s,setpoint_m")
    );
    assert_eq!(lines.count(), out.record.len());
}

#[test]
fn write_csv_reports_unwritable_path() {
    let out = run_scenario(&with_pole(-10.0)).expect("run");
    let path = std::path::Path::new("/nonexistent-dir/for/results.csv");
    let err = pc_app::write_csv(path, &out.record, &out.outputs).unwrap_err();
    assert!(matches!(err, AppError::ResultsWrite { .. }));
}
