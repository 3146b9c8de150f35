//! Scenario 4 from spec.md §8: two flower tiles on a two-tile line. Stock
//! ratios cross the admit/evict thresholds at different rates; the
//! `FlowersNear` goal set and its field must track the hysteresis exactly.

use hive_nav::test_support::SyntheticWorld;
use hive_nav::{Goal, NavCore, NavParams};

const REFRESH_SECS: f32 = 0.35;

fn seed_cost(stock_ratio: f32, quality: f32, bias: f32) -> f32 {
    let desirability = (0.7 * stock_ratio + 0.3 * quality).clamp(0.0, 1.0);
    bias * (1.0 - desirability)
}

#[test]
fn flower_membership_and_field_track_stock_hysteresis() {
    let mut world = SyntheticWorld::line(2);
    world.set_flower(0, 0.10, 1.0, 0.5); // A
    world.set_flower(1, 0.03, 1.0, 0.5); // B

    let mut params = NavParams::default();
    params.budget_ms = 1_000_000.0;
    let mut core = NavCore::init(&world, params, vec![], vec![]).unwrap();

    // Initial build: only A (0.10 >= theta_on) is admitted.
    let cost_a = seed_cost(0.10, 0.5, 1.0);
    assert_eq!(core.field_dist(Goal::FlowersNear)[0], cost_a);
    assert_eq!(core.field_dist(Goal::FlowersNear)[1], cost_a + 1.0);
    let stamp_1 = core.field_stamp(Goal::FlowersNear);

    // A drops to 0.03 (stays admitted, > theta_off 0.02); B rises to 0.06
    // (newly admitted, >= theta_on 0.05).
    world.set_stock(0, 0.03);
    world.set_stock(1, 0.06);
    core.update(REFRESH_SECS, &world);
    assert_ne!(core.field_stamp(Goal::FlowersNear), stamp_1);
    let stamp_2 = core.field_stamp(Goal::FlowersNear);

    let cost_a2 = seed_cost(0.03, 0.5, 1.0);
    let cost_b2 = seed_cost(0.06, 0.5, 1.0);
    assert_eq!(core.field_dist(Goal::FlowersNear)[0], cost_a2);
    assert_eq!(core.field_dist(Goal::FlowersNear)[1], cost_b2);

    // A drops to 0.01 (<= theta_off): evicted. B is unaffected.
    world.set_stock(0, 0.01);
    core.update(REFRESH_SECS, &world);
    assert_ne!(core.field_stamp(Goal::FlowersNear), stamp_2);

    assert_eq!(core.field_dist(Goal::FlowersNear)[1], cost_b2);
    assert_eq!(core.field_dist(Goal::FlowersNear)[0], cost_b2 + 1.0);
}
