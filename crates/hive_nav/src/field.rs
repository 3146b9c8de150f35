//! Per-goal double-buffered distance/direction field storage.
//!
//! See `spec.md` §3 "Field (per goal)". One buffer is the published
//! ("active") snapshot readers see; the other is the in-progress build
//! target. `stamp` increments on every swap and skips zero.

use crate::coords::NO_DIRECTION;
use crate::params::EPS_MAX;

/// Distance sentinel for "unreachable". Per `spec.md` §9, `FLT_MAX/4` kept
/// well above `eps_max * N` for any realistic tile count while staying
/// finite and sum-safe.
pub const UNREACHABLE: f32 = f32::MAX / 4.0;

#[derive(Clone)]
struct Buffer {
  dist: Vec<f32>,
  next: Vec<u8>,
}

impl Buffer {
  fn new(n: usize) -> Self {
    Self {
      dist: vec![UNREACHABLE; n],
      next: vec![NO_DIRECTION; n],
    }
  }

  fn reset(&mut self) {
    self.dist.fill(UNREACHABLE);
    self.next.fill(NO_DIRECTION);
  }
}

/// One goal's published field plus its in-progress build target.
pub struct GoalField {
  buffers: [Buffer; 2],
  active: usize,
  stamp: u32,
}

impl GoalField {
  pub fn new(tile_count: usize) -> Self {
    Self {
      buffers: [Buffer::new(tile_count), Buffer::new(tile_count)],
      active: 0,
      stamp: 0,
    }
  }

  #[inline]
  pub fn tile_count(&self) -> usize {
    self.buffers[0].dist.len()
  }

  #[inline]
  pub fn stamp(&self) -> u32 {
    self.stamp
  }

  /// Read-only view of the published snapshot.
  #[inline]
  pub fn active_dist(&self) -> &[f32] {
    &self.buffers[self.active].dist
  }

  #[inline]
  pub fn active_next(&self) -> &[u8] {
    &self.buffers[self.active].next
  }

  #[inline]
  pub(crate) fn build_index(&self) -> usize {
    1 - self.active
  }

  pub(crate) fn build_buffers_mut(&mut self) -> (&mut Vec<f32>, &mut Vec<u8>) {
    let idx = self.build_index();
    let buf = &mut self.buffers[idx];
    (&mut buf.dist, &mut buf.next)
  }

  pub(crate) fn reset_build_buffer(&mut self) {
    let idx = self.build_index();
    self.buffers[idx].reset();
  }

  /// Copies the published snapshot into the build buffer, so a warm-start
  /// can carry forward everything not touched by invalidation instead of
  /// rediscovering it from scratch.
  pub(crate) fn seed_build_from_active(&mut self) {
    let active_idx = self.active;
    let build_idx = self.build_index();
    let dist = self.buffers[active_idx].dist.clone();
    let next = self.buffers[active_idx].next.clone();
    self.buffers[build_idx].dist = dist;
    self.buffers[build_idx].next = next;
  }

  /// Swaps build -> active and bumps the stamp, skipping zero.
  pub(crate) fn swap(&mut self) {
    self.active = self.build_index();
    self.stamp = self.stamp.wrapping_add(1);
    if self.stamp == 0 {
      self.stamp = 1;
    }
  }

  /// Resizes both buffers for a world rebuild, discarding all content and
  /// resetting the stamp to 0 ("never built").
  pub fn resize(&mut self, tile_count: usize) {
    self.buffers = [Buffer::new(tile_count), Buffer::new(tile_count)];
    self.active = 0;
    self.stamp = 0;
  }
}

#[inline]
pub fn is_unreachable(dist: f32) -> bool {
  dist >= UNREACHABLE * 0.5
}

#[inline]
pub fn clamp_cost_for_relax(eff: f32) -> f32 {
  eff.max(0.0).min(EPS_MAX)
}
