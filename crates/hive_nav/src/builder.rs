//! Incremental Dijkstra field builder.
//!
//! Builds a goal-rooted shortest-path tree from the goal set toward
//! sources: the edge cost entering tile `v` is `eff[v]`, goals start at
//! their seed cost (default 0). See `spec.md` §4.3.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::coords::{NO_DIRECTION, TileId, opp};
use crate::error::NavError;
use crate::field::{GoalField, clamp_cost_for_relax, is_unreachable};
use crate::goal::GoalData;
use crate::neighbor::NeighborTable;

/// Per-field build state machine. Ephemeral: created at the start of a
/// build, its heap storage retained (not freed) across builds for reuse.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BuildPhase {
  Idle,
  Building,
}

struct HeapEntry {
  dist_bits: u32,
  seq: u64,
  tile: TileId,
}

impl HeapEntry {
  fn new(dist: f32, seq: u64, tile: TileId) -> Self {
    Self { dist_bits: dist.to_bits(), seq, tile }
  }

  fn dist(&self) -> f32 {
    f32::from_bits(self.dist_bits)
  }
}

impl PartialEq for HeapEntry {
  fn eq(&self, other: &Self) -> bool {
    self.dist_bits == other.dist_bits && self.seq == other.seq
  }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

// Reversed so `BinaryHeap` (a max-heap) behaves as a min-heap on
// `(dist, seq)`, giving FIFO-stable tie-breaking on equal dist.
impl Ord for HeapEntry {
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .dist()
      .partial_cmp(&self.dist())
      .unwrap_or(Ordering::Equal)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

/// Ephemeral build state for one goal's field.
pub struct BuildState {
  phase: BuildPhase,
  heap: BinaryHeap<HeapEntry>,
  next_seq: u64,
  warm_seed_ids: Vec<TileId>,
  relaxed_this_build: u64,
  elapsed_ms_this_build: f32,
}

impl BuildState {
  pub fn new() -> Self {
    Self {
      phase: BuildPhase::Idle,
      heap: BinaryHeap::new(),
      next_seq: 0,
      warm_seed_ids: Vec::new(),
      relaxed_this_build: 0,
      elapsed_ms_this_build: 0.0,
    }
  }

  #[inline]
  pub fn phase(&self) -> BuildPhase {
    self.phase
  }

  #[inline]
  pub fn is_building(&self) -> bool {
    self.phase == BuildPhase::Building
  }

  fn push(&mut self, dist: f32, tile: TileId) {
    let seq = self.next_seq;
    self.next_seq = self.next_seq.wrapping_add(1);
    self.heap.push(HeapEntry::new(dist, seq, tile));
  }
}

impl Default for BuildState {
  fn default() -> Self {
    Self::new()
  }
}

/// Outcome of one [`step`] call.
pub struct StepOutcome {
  pub relaxed: u64,
  pub elapsed_ms: f32,
  pub finished: bool,
}

/// Begins a build.
///
/// With no warm-start dirty tiles (first build, or a forced recompute),
/// the build buffer starts from scratch: every tile unreachable except the
/// seeded goals.
///
/// With warm-start dirty tiles, the published snapshot is carried forward
/// into the build buffer wholesale, then every tile whose previous shortest
/// path routed through a dirty tile is invalidated (its old distance simply
/// no longer means anything, in either direction) by walking the dirty
/// tiles' `next`-pointer subtree: `v` is in the subtree of `u` if `v`'s
/// recorded predecessor is `u`, found from `u`'s side by checking whether
/// `active_next[v]` points back at `u`. Everything outside that subtree
/// keeps its prior distance untouched, and the tiles just outside its
/// boundary are pushed to seed relaxation flowing back in with the new
/// effective costs — correct for both cost increases and decreases, unlike
/// reusing a dirty tile's own stale distance, which a strictly
/// distance-decreasing relaxation could never raise.
///
/// Fails with [`NavError::NoSeeds`] if the heap is empty after seeding
/// (every goal id was out of range and no warm-start boundary was
/// reachable).
pub fn start(
  build: &mut BuildState,
  field: &mut GoalField,
  neighbors: &NeighborTable,
  goal_data: &GoalData,
  warm_dirty: &[TileId],
) -> Result<(), NavError> {
  build.heap.clear();
  build.next_seq = 0;
  build.relaxed_this_build = 0;
  build.elapsed_ms_this_build = 0.0;
  build.warm_seed_ids = warm_dirty.to_vec();

  let tile_count = field.tile_count();
  let warm_start = field.stamp() != 0 && !warm_dirty.is_empty();

  if warm_start {
    field.seed_build_from_active();
  } else {
    field.reset_build_buffer();
  }

  if warm_start {
    let active_next = field.active_next().to_vec();
    let mut invalid = vec![false; tile_count];
    let mut queue: std::collections::VecDeque<TileId> = std::collections::VecDeque::new();
    for &tile in warm_dirty {
      if (tile as usize) >= tile_count || invalid[tile as usize] {
        continue;
      }
      invalid[tile as usize] = true;
      queue.push_back(tile);
    }
    while let Some(u) = queue.pop_front() {
      for (d, v) in neighbors.neighbors(u) {
        if invalid[v as usize] {
          continue;
        }
        if active_next[v as usize] == opp(d) {
          invalid[v as usize] = true;
          queue.push_back(v);
        }
      }
    }

    {
      let (dist, next) = field.build_buffers_mut();
      for (i, flag) in invalid.iter().enumerate() {
        if *flag {
          dist[i] = crate::field::UNREACHABLE;
          next[i] = NO_DIRECTION;
        }
      }
    }

    for (i, flag) in invalid.iter().enumerate() {
      if !*flag {
        continue;
      }
      for (_d, boundary) in neighbors.neighbors(i as TileId) {
        if invalid[boundary as usize] {
          continue;
        }
        let boundary_dist = {
          let (dist, _next) = field.build_buffers_mut();
          dist[boundary as usize]
        };
        if is_unreachable(boundary_dist) {
          continue;
        }
        build.push(boundary_dist, boundary);
      }
    }
  }

  {
    let (dist, next) = field.build_buffers_mut();
    for (i, &tile) in goal_data.ids.iter().enumerate() {
      if (tile as usize) >= tile_count {
        continue;
      }
      let seed_cost = goal_data.seed_cost(i);
      dist[tile as usize] = seed_cost;
      next[tile as usize] = NO_DIRECTION;
    }
  }
  for (i, &tile) in goal_data.ids.iter().enumerate() {
    if (tile as usize) >= tile_count {
      continue;
    }
    build.push(goal_data.seed_cost(i), tile);
  }

  if build.heap.is_empty() {
    build.phase = BuildPhase::Idle;
    return Err(NavError::NoSeeds);
  }
  build.phase = BuildPhase::Building;
  Ok(())
}

/// Processes nodes until the heap is empty or `budget_ms` elapses.
///
/// When `budget_ms <= 0`, exactly one node is processed, guaranteeing
/// progress every call regardless of budget exhaustion elsewhere.
pub fn step(
  build: &mut BuildState,
  field: &mut GoalField,
  neighbors: &NeighborTable,
  eff: &[f32],
  budget_ms: f32,
) -> StepOutcome {
  let start_time = Instant::now();
  let mut relaxed = 0u64;

  loop {
    let Some(entry) = build.heap.pop() else {
      break;
    };
    let u = entry.tile;
    let u_dist = entry.dist();

    let is_stale = {
      let (dist, _next) = field.build_buffers_mut();
      u_dist > dist[u as usize]
    };
    if is_stale {
      continue;
    }

    for (d, v) in neighbors.neighbors(u) {
      let eff_v = clamp_cost_for_relax(eff[v as usize]);
      let alt = u_dist + eff_v;
      let should_relax = {
        let (dist, _next) = field.build_buffers_mut();
        alt < dist[v as usize]
      };
      if should_relax {
        let (dist, next) = field.build_buffers_mut();
        dist[v as usize] = alt;
        next[v as usize] = opp(d);
        build.push(alt, v);
      }
    }
    relaxed += 1;

    // `budget_ms <= 0` means "exactly one node, then return" (the
    // `one_step_slack` guarantee), not "unbounded" — callers that want an
    // unbounded synchronous build pass a large positive budget instead.
    if budget_ms <= 0.0 {
      break;
    }
    let elapsed_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    if elapsed_ms >= budget_ms {
      break;
    }
    if build.heap.is_empty() {
      break;
    }
  }

  let elapsed_ms = start_time.elapsed().as_secs_f32() * 1000.0;
  build.relaxed_this_build += relaxed;
  build.elapsed_ms_this_build += elapsed_ms;

  let finished = build.heap.is_empty();
  if finished {
    field.swap();
    build.phase = BuildPhase::Idle;
  }

  StepOutcome { relaxed, elapsed_ms, finished }
}

/// Drops in-progress buffer content, clears the heap and the warm-start
/// seed reference. Returns the warm-start dirty ids so the caller (the
/// scheduler) can requeue them to the cost model.
pub fn cancel(build: &mut BuildState, field: &mut GoalField) -> Vec<TileId> {
  field.reset_build_buffer();
  build.heap.clear();
  build.phase = BuildPhase::Idle;
  std::mem::take(&mut build.warm_seed_ids)
}

/// Stats accumulated over the just-finished (or in-progress) build.
pub fn build_stats(build: &BuildState) -> (f32, u64) {
  (build.elapsed_ms_this_build, build.relaxed_this_build)
}
