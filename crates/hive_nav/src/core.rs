//! The navigation core root object.
//!
//! Owns every subsystem as a field and is passed by reference to every
//! operation — no module-level globals, no init-order hazards, per
//! `spec.md` §9 "Module-level global state in source".

use crate::cost::CostModel;
use crate::error::NavError;
use crate::field::{GoalField, is_unreachable};
use crate::flowers::FlowerGoalMaintainer;
use crate::goal::{ALL_GOALS, Goal, GoalData};
use crate::neighbor::NeighborTable;
use crate::params::{FLOWER_REFRESH_INTERVAL_SECS, NavParams};
use crate::scheduler::{Scheduler, SwapResult};
use crate::world::WorldView;

/// A world-space unit vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction2 {
  pub x: f32,
  pub y: f32,
}

/// Precomputed unit world-space vectors for the six axial directions.
/// Flat-top hex layout: direction `d` points at angle `60*d` degrees.
pub fn direction_table() -> [Direction2; 6] {
  let mut table = [Direction2 { x: 0.0, y: 0.0 }; 6];
  for (d, slot) in table.iter_mut().enumerate() {
    let angle = (d as f32) * std::f32::consts::FRAC_PI_3;
    *slot = Direction2 { x: angle.cos(), y: angle.sin() };
  }
  table
}

/// The tile-graph navigation core: cost model, per-goal fields, scheduler,
/// and the dynamic flower-goal maintainer.
pub struct NavCore {
  tile_count: usize,
  params: NavParams,
  neighbors: NeighborTable,
  directions: [Direction2; 6],
  cost: CostModel,
  fields: [GoalField; ALL_GOALS.len()],
  scheduler: Scheduler,
  flowers: FlowerGoalMaintainer,
}

impl NavCore {
  /// Allocates all buffers, builds the neighbor and direction tables, runs
  /// one synchronous full build for each initial goal set (`goal_ids` for
  /// `Entrance`/`Unload`; `FlowersNear`'s initial set comes from the world's
  /// current flower stock), and binds goal data to the scheduler.
  pub fn init(
    world: &dyn WorldView,
    params: NavParams,
    entrance_ids: Vec<u32>,
    unload_ids: Vec<u32>,
  ) -> Result<Self, NavError> {
    let tile_count = world.tile_count();
    let neighbors = NeighborTable::build(world)?;
    let cost = CostModel::init(world);
    let fields = [GoalField::new(tile_count), GoalField::new(tile_count), GoalField::new(tile_count)];
    let mut flowers = FlowerGoalMaintainer::new(tile_count);
    let (flower_data, _) =
      flowers.refresh(world, params.flower_theta_on, params.flower_theta_off, params.flower_bias);

    let mut core = Self {
      tile_count,
      params,
      neighbors,
      directions: direction_table(),
      cost,
      fields,
      scheduler: Scheduler::new(),
      flowers,
    };

    core.scheduler.set_budget_ms(core.params.budget_ms);
    core.scheduler.set_cadence(Goal::Entrance, core.params.entrance_schedule.cadence_hz);
    core.scheduler.set_cadence(Goal::Unload, core.params.unload_schedule.cadence_hz);
    core.scheduler.set_cadence(Goal::FlowersNear, core.params.flowers_schedule.cadence_hz);
    core.cost.set_coefficients(core.params.cost.alpha, core.params.cost.gamma);
    core.cost.set_ema_lambda(core.params.cost.ema_lambda);
    core.cost.set_dirty_threshold(core.params.cost.dirty_threshold);
    core.cost.consume_dirty(core.cost.dirty_queue_len());

    core.bind_and_build_synchronously(Goal::Entrance, GoalData::new(entrance_ids))?;
    core.bind_and_build_synchronously(Goal::Unload, GoalData::new(unload_ids))?;
    core.bind_and_build_synchronously(Goal::FlowersNear, flower_data)?;

    Ok(core)
  }

  fn bind_and_build_synchronously(&mut self, goal: Goal, data: GoalData) -> Result<(), NavError> {
    self.scheduler.set_goal_data(goal, &mut self.fields[goal.index()], data);
    self.scheduler.force_full_recompute(goal);

    // `step` is invoked with a very large budget until finish, per
    // `spec.md` §6 "synchronous means step is invoked with a very large
    // budget until finish" — temporarily override the configured
    // per-frame budget so init doesn't spread the first build over many
    // calls.
    let configured_budget = self.params.budget_ms;
    self.scheduler.set_budget_ms(f32::MAX / 4.0);
    loop {
      let eff: Vec<f32> = self.cost.eff_slice().to_vec();
      let swapped =
        self.scheduler.update(0.0, &mut self.fields, &self.neighbors, &eff, &mut self.cost);
      if swapped[goal.index()] {
        break;
      }
      if !self.scheduler.is_building(goal) {
        // start_build failed (e.g. NoSeeds): nothing more to do.
        break;
      }
    }
    self.scheduler.set_budget_ms(configured_budget);
    Ok(())
  }

  /// Re-derives the neighbor/direction tables and resizes every per-goal
  /// field and the cost model's arrays for a new tile count, discarding all
  /// build state and published fields (every goal's stamp resets to 0).
  pub fn rebuild(
    &mut self,
    world: &dyn WorldView,
    params: NavParams,
    entrance_ids: Vec<u32>,
    unload_ids: Vec<u32>,
  ) -> Result<(), NavError> {
    *self = Self::init(world, params, entrance_ids, unload_ids)?;
    Ok(())
  }

  /// Releases all resources. Idempotent: calling twice is harmless since
  /// the core is simply dropped.
  pub fn shutdown(self) {}

  // ---- Knobs -----------------------------------------------------------

  pub fn set_budget_ms(&mut self, ms: f32) {
    self.scheduler.set_budget_ms(ms);
  }

  pub fn set_cadence(&mut self, goal: Goal, hz: f32) {
    self.scheduler.set_cadence(goal, hz);
  }

  pub fn force_full_recompute(&mut self, goal: Goal) {
    self.scheduler.force_full_recompute(goal);
  }

  pub fn set_goal_data(&mut self, goal: Goal, data: GoalData) {
    self.scheduler.set_goal_data(goal, &mut self.fields[goal.index()], data);
  }

  pub fn set_coefficients(&mut self, alpha: f32, gamma: f32) {
    self.cost.set_coefficients(alpha, gamma);
  }

  pub fn set_ema_lambda(&mut self, lambda: f32) {
    self.cost.set_ema_lambda(lambda);
  }

  pub fn set_dirty_threshold(&mut self, eps_r: f32) {
    self.cost.set_dirty_threshold(eps_r);
  }

  pub fn set_hazard(&mut self, id: u32, p: f32) {
    self.cost.set_hazard(id, p);
  }

  pub fn add_crowd_samples(&mut self, ids: &[u32], samples: &[f32]) {
    self.cost.add_crowd_samples(ids, samples);
  }

  /// Same as [`add_crowd_samples`](Self::add_crowd_samples), but rejects a
  /// length mismatch up front with [`NavError::InvalidArgs`] instead of
  /// silently ignoring the tail of the longer slice.
  pub fn add_crowd_samples_checked(&mut self, ids: &[u32], samples: &[f32]) -> Result<(), NavError> {
    crate::cost::validate_crowd_samples(ids, samples)?;
    self.cost.add_crowd_samples(ids, samples);
    Ok(())
  }

  pub fn mark_dirty(&mut self, id: u32) {
    self.cost.mark_dirty(id);
  }

  pub fn mark_dirty_many(&mut self, ids: &[u32]) {
    for &id in ids {
      self.cost.mark_dirty(id);
    }
  }

  // ---- Lifecycle ---------------------------------------------------------

  /// Advances all goals within budget; refreshes the dynamic flower goal
  /// set on its own slow clock, forcing a recompute when membership or a
  /// seed cost changed. Returns which goals swapped their published field.
  pub fn update(&mut self, dt_sec: f32, world: &dyn WorldView) -> SwapResult {
    if self.flowers.tick(dt_sec, FLOWER_REFRESH_INTERVAL_SECS) {
      let (data, changed) = self.flowers.refresh(
        world,
        self.params.flower_theta_on,
        self.params.flower_theta_off,
        self.params.flower_bias,
      );
      if changed {
        log::info!("flower goal membership changed, forcing recompute");
        self.scheduler.set_goal_data(Goal::FlowersNear, &mut self.fields[Goal::FlowersNear.index()], data);
        self.scheduler.force_full_recompute(Goal::FlowersNear);
      }
    }

    let eff: Vec<f32> = self.cost.eff_slice().to_vec();
    self.scheduler.update(dt_sec, &mut self.fields, &self.neighbors, &eff, &mut self.cost)
  }

  // ---- Queries -----------------------------------------------------------

  /// World-space unit vector from `tile` toward the next tile on the path
  /// to `goal`. `None` when the tile is the goal, unreachable, or `goal`
  /// has no data bound. `Unload` falls back to `Entrance` when unbound;
  /// `FlowersNear` has no fallback.
  pub fn query_direction(&self, goal: Goal, tile: u32) -> Option<Direction2> {
    if (tile as usize) >= self.tile_count {
      return None;
    }
    if goal == Goal::Unload && self.field_stamp(Goal::Unload) == 0 {
      return self.query_direction_raw(Goal::Entrance, tile);
    }
    self.query_direction_raw(goal, tile)
  }

  fn query_direction_raw(&self, goal: Goal, tile: u32) -> Option<Direction2> {
    let field = &self.fields[goal.index()];
    if field.stamp() == 0 {
      return None;
    }
    let dist = field.active_dist()[tile as usize];
    if is_unreachable(dist) {
      return None;
    }
    let d = field.active_next()[tile as usize];
    if d == crate::coords::NO_DIRECTION {
      return None;
    }
    Some(self.directions[d as usize])
  }

  pub fn field_dist(&self, goal: Goal) -> &[f32] {
    self.fields[goal.index()].active_dist()
  }

  pub fn field_next(&self, goal: Goal) -> &[u8] {
    self.fields[goal.index()].active_next()
  }

  pub fn field_stamp(&self, goal: Goal) -> u32 {
    self.fields[goal.index()].stamp()
  }

  pub fn field_tile_count(&self) -> usize {
    self.tile_count
  }

  // ---- Introspection -------------------------------------------------------

  pub fn last_build_ms(&self, goal: Goal) -> f32 {
    self.scheduler.last_build_ms(goal)
  }

  pub fn last_relaxed(&self, goal: Goal) -> u64 {
    self.scheduler.last_relaxed(goal)
  }

  pub fn last_dirty_processed(&self, goal: Goal) -> usize {
    self.scheduler.last_dirty_processed(goal)
  }

  pub fn dirty_queue_len(&self) -> usize {
    self.cost.dirty_queue_len()
  }

  pub fn is_building(&self, goal: Goal) -> bool {
    self.scheduler.is_building(goal)
  }

  pub fn stamp(&self, goal: Goal) -> u32 {
    self.field_stamp(goal)
  }

  pub fn neighbors(&self) -> &NeighborTable {
    &self.neighbors
  }
}
