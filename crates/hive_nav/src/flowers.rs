//! Dynamic `FlowersNear` goal-set maintenance.
//!
//! Refreshes flower-tile membership on a slow clock using stock-ratio
//! hysteresis, and reports whether membership or any seed cost changed
//! enough to warrant a full recompute. See `spec.md` §4.5.

use crate::coords::TileId;
use crate::goal::GoalData;
use crate::params::FLOWER_CHANGE_EPSILON;
use crate::world::{Terrain, WorldView};

/// Tracks which flower tiles are currently admitted to the goal set and the
/// seed cost the maintainer last assigned each, to cheaply detect change.
pub struct FlowerGoalMaintainer {
  admitted: Vec<bool>,
  seed_lut: Vec<f32>,
  refresh_accum: f32,
}

impl FlowerGoalMaintainer {
  pub fn new(tile_count: usize) -> Self {
    Self {
      admitted: vec![false; tile_count],
      seed_lut: vec![0.0; tile_count],
      refresh_accum: 0.0,
    }
  }

  pub fn resize(&mut self, tile_count: usize) {
    self.admitted = vec![false; tile_count];
    self.seed_lut = vec![0.0; tile_count];
    self.refresh_accum = 0.0;
  }

  /// Accumulates `dt`; when the refresh clock has elapsed, recomputes
  /// membership and returns `Some(GoalData)` if the refresh actually ran
  /// (whether or not anything changed). The caller decides whether to
  /// force a recompute based on `GoalData`'s paired `changed` flag from
  /// [`refresh`](Self::refresh) — this method is the cadence gate only.
  pub fn tick(&mut self, dt_sec: f32, refresh_interval_secs: f32) -> bool {
    self.refresh_accum += dt_sec;
    if self.refresh_accum >= refresh_interval_secs {
      self.refresh_accum = 0.0;
      true
    } else {
      false
    }
  }

  /// Recomputes membership for every flower tile. Returns `(goal_data,
  /// changed)`: `changed` is true if any tile's membership flipped or any
  /// seed cost moved by more than [`FLOWER_CHANGE_EPSILON`].
  pub fn refresh(
    &mut self,
    world: &dyn WorldView,
    theta_on: f32,
    theta_off: f32,
    bias: f32,
  ) -> (GoalData, bool) {
    let mut changed = false;
    let mut ids = Vec::new();
    let mut seed_costs = Vec::new();

    for tile in 0..world.tile_count() as TileId {
      let i = tile as usize;
      if !matches!(world.terrain(tile), Terrain::Flowers) || !world.passable(tile) {
        if self.admitted[i] {
          self.admitted[i] = false;
          changed = true;
        }
        continue;
      }

      let stock = world.nectar_stock(tile);
      let capacity = world.nectar_capacity(tile);
      let stock_ratio = if capacity < f32::EPSILON {
        if stock > 0.0 { 1.0 } else { 0.0 }
      } else {
        (stock / capacity).clamp(0.0, 1.0)
      };

      let was_admitted = self.admitted[i];
      let now_admitted = if was_admitted { stock_ratio > theta_off } else { stock_ratio >= theta_on };
      if now_admitted != was_admitted {
        self.admitted[i] = now_admitted;
        changed = true;
      }

      if !now_admitted {
        continue;
      }

      let quality = world.quality(tile).clamp(0.0, 1.0);
      let desirability = (0.7 * stock_ratio + 0.3 * quality).clamp(0.0, 1.0);
      let seed_cost = bias * (1.0 - desirability);

      if (seed_cost - self.seed_lut[i]).abs() > FLOWER_CHANGE_EPSILON {
        changed = true;
      }
      self.seed_lut[i] = seed_cost;

      ids.push(tile);
      seed_costs.push(seed_cost);
    }

    (GoalData::with_seed_costs(ids, seed_costs), changed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::SyntheticWorld;

  #[test]
  fn hysteresis_admits_at_theta_on_and_evicts_at_theta_off() {
    let mut world = SyntheticWorld::line(2);
    world.set_flower(0, 0.10, 1.0, 0.5); // A
    world.set_flower(1, 0.03, 1.0, 0.5); // B
    let mut maintainer = FlowerGoalMaintainer::new(2);

    // Initial refresh: A admitted (0.10 >= theta_on), B not yet (0.03 < theta_on).
    let (data, changed) = maintainer.refresh(&world, 0.05, 0.02, 1.0);
    assert!(changed);
    assert_eq!(data.ids, vec![0]);

    // A drops to 0.03 (still > theta_off, stays admitted); B rises to 0.06
    // (>= theta_on, newly admitted).
    world.set_stock(0, 0.03);
    world.set_stock(1, 0.06);
    let (data, _) = maintainer.refresh(&world, 0.05, 0.02, 1.0);
    assert_eq!(data.ids, vec![0, 1]);

    // A drops to 0.01 (<= theta_off): ceases. B unaffected.
    world.set_stock(0, 0.01);
    let (data, changed) = maintainer.refresh(&world, 0.05, 0.02, 1.0);
    assert!(changed);
    assert_eq!(data.ids, vec![1]);
  }
}
