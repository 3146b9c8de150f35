//! Tunable parameters for the navigation core.
//!
//! Mirrors the `PixelWorldConfig`/`CullingConfig` pattern elsewhere in this
//! codebase: a plain, `Default`-able, serializable struct the host can load
//! from its own config file (this crate performs no file I/O itself).

use serde::{Deserialize, Serialize};

/// Minimum effective cost a tile can report.
pub const EPS_MIN: f32 = 1e-3;
/// Maximum effective cost a tile can report; impassable tiles are pinned
/// here. Also used to build the "unreachable" distance sentinel.
pub const EPS_MAX: f32 = 1e6;
/// Flower tile becomes a goal once `stock_ratio >= THETA_ON`.
pub const THETA_ON: f32 = 0.05;
/// Flower tile stops being a goal once `stock_ratio <= THETA_OFF`.
pub const THETA_OFF: f32 = 0.02;
/// Default per-goal flower seed bias.
pub const DEFAULT_FLOWER_BIAS: f32 = 1.0;
/// Minimum accumulated time between flower-goal membership refreshes.
pub const FLOWER_REFRESH_INTERVAL_SECS: f32 = 0.35;
/// Minimum change in seed cost or membership considered significant.
pub const FLOWER_CHANGE_EPSILON: f32 = 1e-4;

/// Tunables for the cost model.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CostParams {
  /// Congestion coefficient `alpha`.
  pub alpha: f32,
  /// Hazard coefficient `gamma`.
  pub gamma: f32,
  /// Crowd EMA smoothing factor, clamped to `[0,1]`.
  pub ema_lambda: f32,
  /// Relative dirty threshold `eps_r`.
  pub dirty_threshold: f32,
}

impl Default for CostParams {
  fn default() -> Self {
    Self {
      alpha: 1.0,
      gamma: 1.0,
      ema_lambda: 0.2,
      dirty_threshold: 0.05,
    }
  }
}

/// Per-goal scheduling tunables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalScheduleParams {
  /// Cadence in Hz; `<= 0` disables cadence (builds only on dirty/force).
  pub cadence_hz: f32,
}

impl Default for GoalScheduleParams {
  fn default() -> Self {
    Self { cadence_hz: 2.0 }
  }
}

/// Top-level parameters passed to [`crate::NavCore::init`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NavParams {
  /// Cost model tunables.
  pub cost: CostParams,
  /// Per-frame wall-time budget shared across all goals' build steps, in
  /// milliseconds. `<= 0` means unbounded (process until done).
  pub budget_ms: f32,
  /// Scheduling tunables for [`crate::goal::Goal::Entrance`].
  pub entrance_schedule: GoalScheduleParams,
  /// Scheduling tunables for [`crate::goal::Goal::Unload`].
  pub unload_schedule: GoalScheduleParams,
  /// Scheduling tunables for [`crate::goal::Goal::FlowersNear`].
  pub flowers_schedule: GoalScheduleParams,
  /// Flower hysteresis admit threshold.
  pub flower_theta_on: f32,
  /// Flower hysteresis evict threshold.
  pub flower_theta_off: f32,
  /// Flower seed cost bias.
  pub flower_bias: f32,
}

impl Default for NavParams {
  fn default() -> Self {
    Self {
      cost: CostParams::default(),
      budget_ms: 1.0,
      entrance_schedule: GoalScheduleParams::default(),
      unload_schedule: GoalScheduleParams::default(),
      flowers_schedule: GoalScheduleParams::default(),
      flower_theta_on: THETA_ON,
      flower_theta_off: THETA_OFF,
      flower_bias: DEFAULT_FLOWER_BIAS,
    }
  }
}
