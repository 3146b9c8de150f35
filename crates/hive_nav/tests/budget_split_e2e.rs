//! Scenario 5 from spec.md §8: a forced recompute over many tiles, given a
//! per-frame budget far smaller than the time one full build takes, must
//! spread the build across several `update` calls and still converge to
//! the same result as an unbounded build.

use hive_nav::test_support::SyntheticWorld;
use hive_nav::{Goal, NavCore, NavParams};

#[test]
fn forced_recompute_splits_across_many_update_calls() {
    let world = SyntheticWorld::line(200);
    let mut params = NavParams::default();
    params.budget_ms = 1e-6;
    params.entrance_schedule.cadence_hz = 0.0;
    params.unload_schedule.cadence_hz = 0.0;
    params.flowers_schedule.cadence_hz = 0.0;
    let mut core = NavCore::init(&world, params, vec![199], vec![]).unwrap();

    core.force_full_recompute(Goal::Entrance);

    let mut calls = 0u32;
    loop {
        let swapped = core.update(0.0, &world);
        calls += 1;
        if swapped[Goal::Entrance.index()] {
            break;
        }
        assert!(calls < 100_000, "build never finished");
    }

    assert!(calls > 1, "a near-zero budget must force multiple update() calls");
    assert_eq!(core.last_relaxed(Goal::Entrance), 200);
    assert_eq!(core.field_dist(Goal::Entrance)[0], 199.0);
    assert_eq!(core.field_dist(Goal::Entrance)[199], 0.0);
    assert!(core.last_build_ms(Goal::Entrance) > 0.0);
}
