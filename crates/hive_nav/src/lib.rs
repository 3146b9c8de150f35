//! hive_nav - incremental, budget-scheduled multi-goal shortest-path
//! navigation over a hex tile graph.
//!
//! This crate is the tile-graph navigation core of an interactive
//! bee-foraging simulator: a cost model, a goal-rooted incremental
//! Dijkstra field builder, a cooperative per-frame scheduler, and a
//! dynamic flower-goal maintainer. It owns no rendering, UI, physics, or
//! I/O — the host implements [`WorldView`] over its own hex world and
//! drives [`NavCore::update`] once per frame.

pub mod builder;
pub mod core;
pub mod cost;
pub mod coords;
pub mod error;
pub mod field;
pub mod flowers;
pub mod goal;
pub mod neighbor;
pub mod params;
pub mod scheduler;
#[cfg(any(test, feature = "test-util"))]
pub mod test_support;
pub mod world;

pub use core::{Direction2, NavCore, direction_table};
pub use coords::{NO_DIRECTION, NUM_DIRECTIONS, TileId, opp};
pub use error::NavError;
pub use field::UNREACHABLE;
pub use goal::{ALL_GOALS, Goal, GoalData};
pub use params::{CostParams, GoalScheduleParams, NavParams};
pub use scheduler::SwapResult;
pub use world::{Terrain, WorldView};
