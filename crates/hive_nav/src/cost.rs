//! Effective per-tile traversal cost and the dirty-tile queue.
//!
//! See `spec.md` §4.2. Maintains `base`/`crowd` (EMA)/`hazard` ->
//! `eff = clamp(base + alpha*congestion + gamma*hazard)` and reports tiles
//! whose `eff` has drifted past a relative threshold since last reported.

use std::collections::VecDeque;

use crate::coords::TileId;
use crate::error::NavError;
use crate::params::{CostParams, EPS_MAX, EPS_MIN};
use crate::world::{Terrain, WorldView};

/// FIFO, enqueue-once dirty set. Bit-per-tile occupancy plus an append-only
/// queue so `mark_dirty` is idempotent until consumed.
struct DirtyQueue {
  queue: VecDeque<TileId>,
  queued: Vec<bool>,
}

impl DirtyQueue {
  fn new(tile_count: usize) -> Self {
    Self {
      queue: VecDeque::new(),
      queued: vec![false; tile_count],
    }
  }

  fn mark(&mut self, tile: TileId) {
    let slot = &mut self.queued[tile as usize];
    if *slot {
      return;
    }
    *slot = true;
    self.queue.push_back(tile);
  }

  fn drain(&mut self, max: usize) -> Vec<TileId> {
    let n = max.min(self.queue.len());
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
      let tile = self.queue.pop_front().expect("checked len above");
      self.queued[tile as usize] = false;
      out.push(tile);
    }
    out
  }

  fn requeue(&mut self, ids: &[TileId]) {
    for &tile in ids {
      self.mark(tile);
    }
  }

  fn len(&self) -> usize {
    self.queue.len()
  }
}

/// Maintains `base`/`crowd`/`hazard`/`eff` arrays and the dirty queue that
/// reports tiles whose `eff` drifted.
pub struct CostModel {
  params: CostParams,
  base: Vec<f32>,
  crowd: Vec<f32>,
  hazard: Vec<f32>,
  eff: Vec<f32>,
  flow_capacity: Vec<f32>,
  dirty: DirtyQueue,
}

impl CostModel {
  /// Allocates all buffers from the world view and computes the initial
  /// `eff` array.
  pub fn init(world: &dyn WorldView) -> Self {
    let n = world.tile_count();
    let mut base = Vec::with_capacity(n);
    let mut flow_capacity = Vec::with_capacity(n);
    for tile in 0..n as TileId {
      let impassable = matches!(world.terrain(tile), Terrain::Impassable);
      base.push(if impassable { EPS_MAX } else { world.base_cost(tile) });
      flow_capacity.push(world.flow_capacity(tile));
    }

    let mut model = Self {
      params: CostParams::default(),
      base,
      crowd: vec![0.0; n],
      hazard: vec![0.0; n],
      eff: vec![0.0; n],
      flow_capacity,
      dirty: DirtyQueue::new(n),
    };
    for tile in 0..n as TileId {
      model.recompute(tile, true);
    }
    model
  }

  #[inline]
  pub fn tile_count(&self) -> usize {
    self.eff.len()
  }

  #[inline]
  pub fn eff(&self, tile: TileId) -> f32 {
    self.eff[tile as usize]
  }

  #[inline]
  pub fn eff_slice(&self) -> &[f32] {
    &self.eff
  }

  /// Updates `alpha`/`gamma` and forces a recompute of every tile.
  pub fn set_coefficients(&mut self, alpha: f32, gamma: f32) {
    self.params.alpha = alpha.max(0.0);
    self.params.gamma = gamma.max(0.0);
    for tile in 0..self.tile_count() as TileId {
      self.recompute(tile, true);
    }
  }

  /// Clamps and stores the EMA smoothing factor; does not recompute.
  pub fn set_ema_lambda(&mut self, lambda: f32) {
    self.params.ema_lambda = lambda.clamp(0.0, 1.0);
  }

  /// Stores the relative dirty threshold used by future recomputes.
  pub fn set_dirty_threshold(&mut self, eps_r: f32) {
    self.params.dirty_threshold = eps_r.max(0.0);
  }

  /// Updates `hazard[id]` and recomputes `eff[id]`. Out-of-range ids are
  /// silently ignored (hot-path, branch-light per `spec.md` §7).
  pub fn set_hazard(&mut self, id: TileId, p: f32) {
    let Some(slot) = self.hazard.get_mut(id as usize) else {
      return;
    };
    *slot = p.max(0.0);
    self.recompute(id, true);
  }

  /// Applies `c' = c + lambda*(s - c)` for each `(id, sample)` pair and
  /// recomputes the affected `eff`. Out-of-range ids are ignored.
  pub fn add_crowd_samples(&mut self, ids: &[TileId], samples: &[f32]) {
    for (&id, &s) in ids.iter().zip(samples.iter()) {
      let Some(slot) = self.crowd.get_mut(id as usize) else {
        continue;
      };
      let s = s.max(0.0);
      *slot += self.params.ema_lambda * (s - *slot);
      self.recompute(id, false);
    }
  }

  /// Unconditional enqueue.
  pub fn mark_dirty(&mut self, id: TileId) {
    if (id as usize) < self.tile_count() {
      self.dirty.mark(id);
    }
  }

  /// Drains up to `n` dirty ids in FIFO order, clearing their flags.
  pub fn consume_dirty(&mut self, n: usize) -> Vec<TileId> {
    self.dirty.drain(n)
  }

  /// Re-enqueues previously drained ids, e.g. when a build aborts.
  pub fn requeue(&mut self, ids: &[TileId]) {
    self.dirty.requeue(ids);
  }

  /// Current dirty queue length.
  pub fn dirty_queue_len(&self) -> usize {
    self.dirty.len()
  }

  /// Recomputes `eff[tile]` from `base`/`crowd`/`hazard` and enqueues it if
  /// the delta crosses the relative threshold (or `force` is set).
  fn recompute(&mut self, tile: TileId, force: bool) {
    let i = tile as usize;
    let old = self.eff[i];

    let capacity = self.flow_capacity[i];
    let rho = if capacity > 0.0 { self.crowd[i] / capacity } else { 0.0 };
    let congestion = (rho - 1.0).max(0.0).powi(2);
    let raw = self.base[i] + self.params.alpha * congestion + self.params.gamma * self.hazard[i];
    let new = if raw.is_finite() { raw.clamp(EPS_MIN, EPS_MAX) } else { EPS_MAX };
    self.eff[i] = new;

    let reference = old.abs().max(1e-4);
    if force || (new - old).abs() >= reference * self.params.dirty_threshold {
      self.dirty.mark(tile);
    }
  }
}

/// Validates a crowd-sample ingestion call's array lengths without mutating
/// anything. Kept separate from the hot-path `add_crowd_samples` so callers
/// that want a synchronous error (rather than a silent truncation) can
/// opt in.
pub fn validate_crowd_samples(ids: &[TileId], samples: &[f32]) -> Result<(), NavError> {
  if ids.len() != samples.len() {
    return Err(NavError::invalid_args(format!(
      "ids.len()={} != samples.len()={}",
      ids.len(),
      samples.len()
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::SyntheticWorld;

  #[test]
  fn init_pins_impassable_tiles_to_eps_max() {
    let world = SyntheticWorld::line(3).with_impassable(1);
    let model = CostModel::init(&world);
    assert_eq!(model.eff(1), EPS_MAX);
    assert_eq!(model.eff(0), 1.0);
  }

  #[test]
  fn eff_is_always_in_bounds() {
    let world = SyntheticWorld::line(1);
    let mut model = CostModel::init(&world);
    model.set_coefficients(1e9, 1e9);
    model.set_hazard(0, f32::INFINITY);
    assert!(model.eff(0) >= EPS_MIN && model.eff(0) <= EPS_MAX);
  }

  #[test]
  fn mark_dirty_is_idempotent_until_consumed() {
    let world = SyntheticWorld::line(3);
    let mut model = CostModel::init(&world);
    let before = model.dirty_queue_len();
    model.consume_dirty(before);
    model.mark_dirty(0);
    let len_after_one = model.dirty_queue_len();
    model.mark_dirty(0);
    model.mark_dirty(0);
    assert_eq!(model.dirty_queue_len(), len_after_one);
  }

  #[test]
  fn congestion_raises_cost_and_dirties_tile() {
    let world = SyntheticWorld::line(3);
    let mut model = CostModel::init(&world);
    model.consume_dirty(model.dirty_queue_len());
    let before = model.eff(1);
    model.add_crowd_samples(&[1], &[100.0]);
    assert!(model.eff(1) > before);
    assert!(model.dirty_queue_len() > 0);
  }

  #[test]
  fn out_of_range_ids_are_ignored_not_panicking() {
    let world = SyntheticWorld::line(1);
    let mut model = CostModel::init(&world);
    model.set_hazard(999, 5.0);
    model.add_crowd_samples(&[999], &[5.0]);
  }

  #[test]
  fn validate_crowd_samples_rejects_length_mismatch() {
    let err = validate_crowd_samples(&[0, 1], &[1.0]).unwrap_err();
    assert_eq!(err, NavError::invalid_args("ids.len()=2 != samples.len()=1"));
    assert!(validate_crowd_samples(&[0, 1], &[1.0, 2.0]).is_ok());
  }
}
