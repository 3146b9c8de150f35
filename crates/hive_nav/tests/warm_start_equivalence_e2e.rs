//! Scenario 6 from spec.md §8: doubling one tile's effective cost via a
//! hazard sample must dirty it and warm-start a rebuild that converges to
//! the same fixed point as a from-scratch rebuild, while every tile whose
//! distance did not move keeps its prior `next` direction bit-for-bit.

use hive_nav::test_support::SyntheticWorld;
use hive_nav::{Goal, NavCore, NavParams, WorldView};

// A line keeps every tile's shortest path unique, so there is no tie for
// the stable tie-break rule to resolve differently between the
// warm-started rebuild and the from-scratch one.
const TILE_COUNT: usize = 20;

#[test]
fn warm_start_rebuild_matches_full_rebuild_and_preserves_untouched_tiles() {
    let world = SyntheticWorld::line(TILE_COUNT);
    let entrance = world.tile_count() as u32 - 1;
    let hazard_tile = 10u32;

    let mut params = NavParams::default();
    params.budget_ms = 1_000_000.0;
    let mut core = NavCore::init(&world, params.clone(), vec![entrance], vec![]).unwrap();

    let dist_before = core.field_dist(Goal::Entrance).to_vec();
    let next_before = core.field_next(Goal::Entrance).to_vec();

    core.set_hazard(hazard_tile, 1.0);
    assert!(core.dirty_queue_len() > 0);

    let swapped = core.update(0.0, &world);
    assert!(swapped[Goal::Entrance.index()]);

    let dist_after = core.field_dist(Goal::Entrance).to_vec();
    let next_after = core.field_next(Goal::Entrance).to_vec();

    assert!(dist_after[hazard_tile as usize] > dist_before[hazard_tile as usize]);

    for tile in 0..world.tile_count() {
        if (dist_after[tile] - dist_before[tile]).abs() < 1e-6 {
            assert_eq!(next_after[tile], next_before[tile], "tile {tile} untouched but next changed");
        }
    }

    // A from-scratch rebuild on the hazard-updated world must reach the
    // same fixed point via the same stable tie-break rule.
    let mut fresh = NavCore::init(&world, params, vec![entrance], vec![]).unwrap();
    fresh.set_hazard(hazard_tile, 1.0);
    fresh.force_full_recompute(Goal::Entrance);
    fresh.update(0.0, &world);

    assert_eq!(core.field_dist(Goal::Entrance), fresh.field_dist(Goal::Entrance));
    assert_eq!(core.field_next(Goal::Entrance), fresh.field_next(Goal::Entrance));
}
