//! Scenario 2 from spec.md §8: tiles 0..4 in a line, goals {0,4}, unit
//! costs. The middle tile ties; the stable rule picks the outgoing
//! direction toward the lower-index neighbor.

use hive_nav::test_support::SyntheticWorld;
use hive_nav::{Goal, NavCore, NavParams};

#[test]
fn two_goals_tie_breaks_toward_lower_neighbor() {
    let world = SyntheticWorld::line(5);
    let core = NavCore::init(&world, NavParams::default(), vec![0, 4], vec![]).unwrap();

    assert_eq!(core.field_dist(Goal::Entrance), &[0.0, 1.0, 2.0, 1.0, 0.0]);
    // direction 3 ("west") is the outgoing direction from tile 2 toward tile 1.
    assert_eq!(core.field_next(Goal::Entrance)[2], 3u8);
}
