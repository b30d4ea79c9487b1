//! Closed-loop behaviour of the documented cylinder scenario.

use pc_controls::SetpointSchedule;
use pc_core::{Tolerances, nearly_equal};
use pc_sim::{InstanceConfig, PlantParameters, SimOptions, StepDriver, run_sim};

fn step_to_50mm() -> InstanceConfig {
    InstanceConfig::default().with_setpoint(0.05)
}

fn within_one_percent(actual: f64, target: f64) -> bool {
    nearly_equal(actual, target, Tolerances::relative(0.01))
}

fn within_limits(params: &PlantParameters, x1: f64, x3: f64) -> bool {
    let [x1_min, x1_max] = params.position_limits;
    let [x3_min, x3_max] = params.pressure_limits;
    (x1_min..=x1_max).contains(&x1) && (x3_min..=x3_max).contains(&x3)
}

#[test]
fn position_converges_to_setpoint() {
    let config = step_to_50mm();
    let mut driver = StepDriver::new(config).expect("valid scenario");

    // Twenty settling time constants (1/|λ| = 0.1 s).
    for _ in 0..2000 {
        let out = driver.step().expect("step should succeed");
        assert!(
            within_limits(&config.params, out.position, out.pressure),
            "limits violated at t = {}: {:?}",
            out.time,
            out
        );
    }

    let x = driver.get_state();
    assert!(
        within_one_percent(x.x1, 0.05),
        "final position {} not within 1% of setpoint",
        x.x1
    );
    assert!(x.x2.abs() < 1e-3, "piston still moving: {}", x.x2);

    // At rest the pressure carries the spring: c·x1 = A·x3.
    let expected_p = config.params.equilibrium_pressure(0.05);
    assert!(within_one_percent(x.x3, expected_p));
}

#[test]
fn piston_leaves_lower_stop() {
    // The spring initially pushes the piston onto its lower stop.
    let mut driver = StepDriver::new(step_to_50mm()).unwrap();
    let mut touched_stop = false;
    for _ in 0..300 {
        let out = driver.step().unwrap();
        if out.position == 0.01 {
            touched_stop = true;
            assert!(out.velocity >= 0.0);
        }
    }
    assert!(touched_stop);
    assert!(driver.output() > 0.01);
}

#[test]
fn setpoint_change_is_tracked() {
    let mut driver = StepDriver::new(step_to_50mm()).unwrap();
    let schedule = SetpointSchedule::from_pairs(&[(0.0, 0.05), (2.0, 0.08)]).unwrap();
    let opts = SimOptions {
        t_end: 4.0,
        max_steps: 10_000,
        record_every: 100,
    };

    let record = run_sim(&mut driver, &schedule, &opts).unwrap();

    let at_2s = record
        .t
        .iter()
        .position(|&t| nearly_equal(t, 2.0, Tolerances::default()))
        .expect("sample at t = 2 s");
    assert!(within_one_percent(record.x[at_2s].x1, 0.05));

    let final_x = record.final_state().unwrap();
    assert!(within_one_percent(final_x.x1, 0.08));

    let params = driver.instance().params();
    assert!(record.x.iter().all(|x| within_limits(params, x.x1, x.x3)));
}

#[test]
fn slower_pole_settles_slower() {
    let err_after = |pole: f64| {
        let mut driver = StepDriver::new(step_to_50mm().with_pole(pole)).unwrap();
        for _ in 0..1000 {
            driver.step().unwrap();
        }
        (driver.output() - 0.05).abs()
    };
    assert!(err_after(-10.0) < err_after(-4.0));
}
