//! Cooperative per-frame builder scheduler.
//!
//! Advances builds within a per-frame time budget, honours per-goal
//! cadence, consumes dirty tiles as warm-start seeds, and coordinates
//! contention for the shared dirty batch across goals. See `spec.md` §4.4.

use crate::builder::{self, BuildState, build_stats};
use crate::cost::CostModel;
use crate::field::GoalField;
use crate::goal::{ALL_GOALS, Goal, GoalData};
use crate::neighbor::NeighborTable;

/// `builder::step` treats any `budget_ms <= 0` as "process exactly one node,
/// then return" (`spec.md` §4.3's `one_step_slack` guarantee). A configured
/// per-frame `budget_ms <= 0` means the opposite at this level — "unbounded,
/// process until done" — so an untracked frame budget is translated to this
/// large positive sentinel before reaching `step`.
const UNBOUNDED_BUDGET_MS: f32 = f32::MAX / 4.0;

/// Per-goal scheduling bookkeeping that is not part of the build itself.
struct GoalSlot {
  data: Option<GoalData>,
  build: BuildState,
  cadence_hz: f32,
  cadence_accum: f32,
  pending_force: bool,
  consumed_shared_batch: bool,
  last_build_ms: f32,
  last_relaxed: u64,
  last_dirty_processed: usize,
}

impl GoalSlot {
  fn new() -> Self {
    Self {
      data: None,
      build: BuildState::new(),
      cadence_hz: 0.0,
      cadence_accum: 0.0,
      pending_force: false,
      consumed_shared_batch: false,
      last_build_ms: 0.0,
      last_relaxed: 0,
      last_dirty_processed: 0,
    }
  }
}

/// Result of one [`Scheduler::update`] call: which goals swapped their
/// published field this frame, in [`ALL_GOALS`] order.
pub type SwapResult = [bool; ALL_GOALS.len()];

/// The shared dirty batch: at most one batch of tile ids drained from the
/// cost model per frame, distributed to every data-ready goal at most once.
struct SharedBatch {
  ids: Vec<u32>,
  consumed: [bool; ALL_GOALS.len()],
  resident: bool,
}

impl SharedBatch {
  fn empty() -> Self {
    Self { ids: Vec::new(), consumed: [false; ALL_GOALS.len()], resident: false }
  }
}

/// Advances all goals' field builds cooperatively within a per-frame
/// budget.
pub struct Scheduler {
  budget_ms: f32,
  slots: [GoalSlot; ALL_GOALS.len()],
  batch: SharedBatch,
}

impl Scheduler {
  pub fn new() -> Self {
    Self {
      budget_ms: 0.0,
      slots: [GoalSlot::new(), GoalSlot::new(), GoalSlot::new()],
      batch: SharedBatch::empty(),
    }
  }

  /// Clamps to `>= 0`; total wall-time budget per [`update`](Self::update)
  /// call, shared across all goals.
  pub fn set_budget_ms(&mut self, ms: f32) {
    self.budget_ms = ms.max(0.0);
  }

  /// `<= 0` disables cadence (that goal only builds on dirty tiles or a
  /// forced recompute).
  pub fn set_cadence(&mut self, goal: Goal, hz: f32) {
    self.slots[goal.index()].cadence_hz = hz;
  }

  /// Rebinds a goal's seed data, cancelling any in-flight build for it and
  /// clearing its shared-batch consumed flag.
  pub fn set_goal_data(&mut self, goal: Goal, field: &mut GoalField, data: GoalData) {
    let slot = &mut self.slots[goal.index()];
    if slot.build.is_building() {
      builder::cancel(&mut slot.build, field);
    }
    slot.data = Some(data);
    slot.consumed_shared_batch = false;
  }

  /// Sets `pending_force`: the next [`update`](Self::update) starts this
  /// goal's build without a dirty warm-start.
  pub fn force_full_recompute(&mut self, goal: Goal) {
    self.slots[goal.index()].pending_force = true;
  }

  pub fn last_build_ms(&self, goal: Goal) -> f32 {
    self.slots[goal.index()].last_build_ms
  }

  pub fn last_relaxed(&self, goal: Goal) -> u64 {
    self.slots[goal.index()].last_relaxed
  }

  pub fn last_dirty_processed(&self, goal: Goal) -> usize {
    self.slots[goal.index()].last_dirty_processed
  }

  pub fn is_building(&self, goal: Goal) -> bool {
    self.slots[goal.index()].build.is_building()
  }

  /// Advances every goal within the configured budget.
  ///
  /// `fields[g.index()]` must be the [`GoalField`] bound to goal `g`.
  pub fn update(
    &mut self,
    dt_sec: f32,
    fields: &mut [GoalField; ALL_GOALS.len()],
    neighbors: &NeighborTable,
    eff: &[f32],
    cost_model: &mut CostModel,
  ) -> SwapResult {
    for slot in &mut self.slots {
      if !slot.build.is_building() {
        slot.cadence_accum += dt_sec;
      }
    }

    let budget_tracked = self.budget_ms > 0.0;
    let mut remaining_budget = self.budget_ms;

    if !self.batch.resident && cost_model.dirty_queue_len() > 0 {
      let cap = fields.iter().map(|f| f.tile_count()).max().unwrap_or(0).max(1);
      self.batch.ids = cost_model.consume_dirty(cap);
      self.batch.consumed = [false; ALL_GOALS.len()];
      self.batch.resident = true;
    }

    let mut swapped = [false; ALL_GOALS.len()];

    for &goal in ALL_GOALS.iter() {
      let idx = goal.index();
      let goal_budget = if budget_tracked { remaining_budget.max(0.0) } else { UNBOUNDED_BUDGET_MS };
      let field = &mut fields[idx];
      let slot = &mut self.slots[idx];

      let elapsed_ms = if slot.build.is_building() {
        let outcome = builder::step(&mut slot.build, field, neighbors, eff, goal_budget);
        if outcome.finished {
          let (ms, relaxed) = build_stats(&slot.build);
          slot.last_build_ms = ms;
          slot.last_relaxed = relaxed;
          slot.consumed_shared_batch = false;
          swapped[idx] = true;
        }
        outcome.elapsed_ms
      } else if let Some(data) = slot.data.clone() {
        let warm_dirty: Vec<u32> = if slot.pending_force {
          slot.pending_force = false;
          Vec::new()
        } else if self.batch.resident && !self.batch.consumed[idx] {
          self.batch.consumed[idx] = true;
          slot.consumed_shared_batch = true;
          self.batch.ids.clone()
        } else if slot.cadence_hz > 0.0 && slot.cadence_accum >= 1.0 / slot.cadence_hz {
          slot.cadence_accum = 0.0;
          Vec::new()
        } else {
          // Cadence disabled (`cadence_hz <= 0`) or timer not yet elapsed:
          // this goal only builds on a dirty warm-start batch or a forced
          // recompute (matches the `set_cadence` contract in `spec.md`
          // §4.4, which the per-update bullet list states loosely).
          continue;
        };
        slot.last_dirty_processed = warm_dirty.len();

        match builder::start(&mut slot.build, field, neighbors, &data, &warm_dirty) {
          Ok(()) => {
            slot.cadence_accum = 0.0;
            let outcome = builder::step(&mut slot.build, field, neighbors, eff, goal_budget);
            if outcome.finished {
              let (ms, relaxed) = build_stats(&slot.build);
              slot.last_build_ms = ms;
              slot.last_relaxed = relaxed;
              slot.consumed_shared_batch = false;
              swapped[idx] = true;
            }
            outcome.elapsed_ms
          }
          Err(_) => {
            log::warn!("goal {idx:?} start_build produced no seeds");
            cost_model.requeue(&warm_dirty);
            0.0
          }
        }
      } else {
        continue;
      };

      if budget_tracked {
        remaining_budget -= elapsed_ms;
      }
    }

    if self.batch.resident {
      let all_consumed = ALL_GOALS
        .iter()
        .all(|g| self.slots[g.index()].data.is_none() || self.batch.consumed[g.index()]);
      if all_consumed {
        self.batch.resident = false;
        self.batch.ids.clear();
      }
    }

    swapped
  }
}

impl Default for Scheduler {
  fn default() -> Self {
    Self::new()
  }
}
