//! Randomized property check: across many randomly holed-out hex patches, a
//! built field must report a tile reachable exactly when that tile is
//! actually connected to the goal in the underlying graph (checked against
//! an independent plain BFS over the neighbor table, not the field builder
//! itself).

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hive_nav::field::is_unreachable;
use hive_nav::neighbor::NeighborTable;
use hive_nav::test_support::SyntheticWorld;
use hive_nav::{Goal, NavCore, NavParams, WorldView};

fn bfs_reachable(neighbors: &NeighborTable, start: u32) -> HashSet<u32> {
  let mut seen = HashSet::new();
  let mut queue = VecDeque::new();
  seen.insert(start);
  queue.push_back(start);
  while let Some(u) = queue.pop_front() {
    for (_d, v) in neighbors.neighbors(u) {
      if seen.insert(v) {
        queue.push_back(v);
      }
    }
  }
  seen
}

#[test]
fn field_reachability_matches_graph_connectivity_across_random_holes() {
  for seed in 0..20u64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = SyntheticWorld::grid(8);
    let tile_count = world.tile_count();

    for tile in 0..tile_count as u32 {
      if rng.gen_bool(0.25) {
        world.set_impassable(tile);
      }
    }

    let passable: Vec<u32> = (0..tile_count as u32).filter(|&t| world.passable(t)).collect();
    if passable.is_empty() {
      continue;
    }
    let goal = passable[rng.gen_range(0..passable.len())];

    let mut params = NavParams::default();
    params.budget_ms = 1_000_000.0;
    let core = NavCore::init(&world, params, vec![goal], vec![]).unwrap();

    let neighbors = NeighborTable::build(&world).unwrap();
    let reachable = bfs_reachable(&neighbors, goal);

    let dist = core.field_dist(Goal::Entrance);
    for tile in 0..tile_count as u32 {
      let field_says_reachable = !is_unreachable(dist[tile as usize]);
      let graph_says_reachable = reachable.contains(&tile);
      assert_eq!(
        field_says_reachable, graph_says_reachable,
        "seed {seed}: tile {tile} reachability mismatch (goal {goal})"
      );
    }
  }
}
