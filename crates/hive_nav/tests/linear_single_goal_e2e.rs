//! Scenario 1 from spec.md §8: five tiles in a line, one goal at the end.

use hive_nav::test_support::SyntheticWorld;
use hive_nav::{Goal, NavCore, NavParams};

#[test]
fn linear_single_goal_distances_and_directions() {
    let world = SyntheticWorld::line(5);
    let core = NavCore::init(&world, NavParams::default(), vec![4], vec![]).unwrap();

    assert_eq!(core.field_dist(Goal::Entrance), &[4.0, 3.0, 2.0, 1.0, 0.0]);
    assert_eq!(core.field_next(Goal::Entrance)[4], hive_nav::NO_DIRECTION);
    for i in 0..4 {
        assert_eq!(core.field_next(Goal::Entrance)[i], 0u8);
    }
    assert_ne!(core.field_stamp(Goal::Entrance), 0);
}
