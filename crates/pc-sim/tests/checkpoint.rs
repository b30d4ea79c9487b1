//! Determinism and checkpoint/restore of simulation instances.

use pc_sim::{InstanceConfig, PlantState, StepDriver, StepOutput};

fn config() -> InstanceConfig {
    InstanceConfig::default().with_setpoint(0.05)
}

/// Setpoint sequence changing every 100 steps.
fn setpoint_at(step: usize) -> f64 {
    [0.05, 0.07, 0.04, 0.06][(step / 100) % 4]
}

fn run(driver: &mut StepDriver, from: usize, to: usize) -> Vec<StepOutput> {
    (from..to)
        .map(|k| {
            driver.set_setpoint(setpoint_at(k)).unwrap();
            driver.step().unwrap()
        })
        .collect()
}

fn bits(outputs: &[StepOutput]) -> Vec<[u64; 5]> {
    outputs
        .iter()
        .map(|o| {
            [
                o.time.to_bits(),
                o.position.to_bits(),
                o.velocity.to_bits(),
                o.pressure.to_bits(),
                o.input.to_bits(),
            ]
        })
        .collect()
}

#[test]
fn repeated_runs_are_bit_identical() {
    let mut a = StepDriver::new(config()).unwrap();
    let mut b = StepDriver::new(config()).unwrap();
    assert_eq!(bits(&run(&mut a, 0, 800)), bits(&run(&mut b, 0, 800)));
}

#[test]
fn restore_of_own_state_continues_identically() {
    let mut reference = StepDriver::new(config()).unwrap();
    let expected = run(&mut reference, 0, 600);

    let mut driver = StepDriver::new(config()).unwrap();
    let mut actual = run(&mut driver, 0, 250);
    let snapshot = driver.get_state();
    driver.set_state(snapshot).unwrap();
    actual.extend(run(&mut driver, 250, 600));

    assert_eq!(bits(&expected), bits(&actual));
}

#[test]
fn checkpoint_transfers_to_fresh_instance() {
    let mut reference = StepDriver::new(config()).unwrap();
    let expected = run(&mut reference, 0, 500);

    let mut first = StepDriver::new(config()).unwrap();
    run(&mut first, 0, 200);
    let raw: [f64; 3] = first.get_state().to_array();

    // A second instance picks up from the raw state vector.
    let mut second = StepDriver::new(config()).unwrap();
    second.set_state(PlantState::from_array(raw)).unwrap();
    let tail = run(&mut second, 200, 500);

    let expected_tail: Vec<_> = bits(&expected[200..])
        .into_iter()
        .map(|[_, x1, x2, x3, u]| [x1, x2, x3, u])
        .collect();
    let actual_tail: Vec<_> = bits(&tail)
        .into_iter()
        .map(|[_, x1, x2, x3, u]| [x1, x2, x3, u])
        .collect();
    assert_eq!(expected_tail, actual_tail);
}

#[test]
fn rewinding_replays_the_same_trajectory() {
    let mut driver = StepDriver::new(config()).unwrap();
    run(&mut driver, 0, 100);
    let checkpoint = driver.get_state();

    let first: Vec<_> = run(&mut driver, 100, 300).iter().map(|o| o.position).collect();
    driver.set_state(checkpoint).unwrap();
    let second: Vec<_> = run(&mut driver, 100, 300).iter().map(|o| o.position).collect();

    assert_eq!(first, second);
}
