//! The closed set of navigation goals.

use crate::coords::TileId;

/// A named multi-source shortest-path target set.
///
/// Closed enum per `spec.md` §3: the set of goals is fixed at
/// construction, but membership of e.g. [`Goal::FlowersNear`] is dynamic.
/// Iteration/array order below is part of the scheduler's contract
/// (`spec.md` §4.4 step 4): tests depend on this exact order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Goal {
  Entrance,
  Unload,
  FlowersNear,
}

/// All goals in the fixed iteration order the scheduler uses.
pub const ALL_GOALS: [Goal; 3] = [Goal::Entrance, Goal::Unload, Goal::FlowersNear];

impl Goal {
  /// Dense index into per-goal arrays, matching [`ALL_GOALS`] order.
  #[inline]
  pub fn index(self) -> usize {
    match self {
      Goal::Entrance => 0,
      Goal::Unload => 1,
      Goal::FlowersNear => 2,
    }
  }
}

/// Bound data for one goal: its seed tile ids and optional per-seed costs.
#[derive(Clone, Debug, Default)]
pub struct GoalData {
  pub ids: Vec<TileId>,
  /// Parallel to `ids`; `None` means every seed costs 0.
  pub seed_costs: Option<Vec<f32>>,
}

impl GoalData {
  pub fn new(ids: Vec<TileId>) -> Self {
    Self { ids, seed_costs: None }
  }

  pub fn with_seed_costs(ids: Vec<TileId>, seed_costs: Vec<f32>) -> Self {
    Self { ids, seed_costs: Some(seed_costs) }
  }

  pub fn seed_cost(&self, i: usize) -> f32 {
    self.seed_costs.as_ref().map(|c| c[i]).unwrap_or(0.0)
  }
}
