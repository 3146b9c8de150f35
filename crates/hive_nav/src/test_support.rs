//! Synthetic worlds for unit and integration tests.
//!
//! Exposed behind the `test-util` feature so integration tests under
//! `tests/` can build the same fixtures as the inline `#[cfg(test)]` suites.

use std::collections::HashMap;

use crate::coords::TileId;
use crate::world::{Terrain, WorldView};

/// A small hand-built world: explicit per-tile terrain, cost, capacity,
/// stock and quality, plus an explicit axial adjacency map.
///
/// Construct with [`SyntheticWorld::line`] or [`SyntheticWorld::grid`] and
/// mutate fields before handing it to [`crate::NavCore::init`].
pub struct SyntheticWorld {
  axial: Vec<(i32, i32)>,
  by_axial: HashMap<(i32, i32), TileId>,
  terrain: Vec<Terrain>,
  base_cost: Vec<f32>,
  flow_capacity: Vec<f32>,
  nectar_stock: Vec<f32>,
  nectar_capacity: Vec<f32>,
  quality: Vec<f32>,
}

impl SyntheticWorld {
  /// `n` tiles in a straight line along `q`, unit base cost, ample flow
  /// capacity, all passable ground.
  pub fn line(n: usize) -> Self {
    let axial: Vec<(i32, i32)> = (0..n as i32).map(|q| (q, 0)).collect();
    Self::from_axial(axial)
  }

  /// A roughly-square hex patch of `side * side` tiles.
  pub fn grid(side: i32) -> Self {
    let mut axial = Vec::with_capacity((side * side) as usize);
    for q in 0..side {
      for r in 0..side {
        axial.push((q, r));
      }
    }
    Self::from_axial(axial)
  }

  fn from_axial(axial: Vec<(i32, i32)>) -> Self {
    let n = axial.len();
    let mut by_axial = HashMap::with_capacity(n);
    for (i, &pos) in axial.iter().enumerate() {
      by_axial.insert(pos, i as TileId);
    }
    Self {
      axial,
      by_axial,
      terrain: vec![Terrain::Ground; n],
      base_cost: vec![1.0; n],
      flow_capacity: vec![10.0; n],
      nectar_stock: vec![0.0; n],
      nectar_capacity: vec![1.0; n],
      quality: vec![0.5; n],
    }
  }

  /// Marks a tile impassable.
  pub fn with_impassable(mut self, tile: TileId) -> Self {
    self.terrain[tile as usize] = Terrain::Impassable;
    self
  }

  pub fn set_impassable(&mut self, tile: TileId) {
    self.terrain[tile as usize] = Terrain::Impassable;
  }

  pub fn set_base_cost(&mut self, tile: TileId, cost: f32) {
    self.base_cost[tile as usize] = cost;
  }

  pub fn set_flow_capacity(&mut self, tile: TileId, cap: f32) {
    self.flow_capacity[tile as usize] = cap;
  }

  pub fn set_flower(&mut self, tile: TileId, stock: f32, capacity: f32, quality: f32) {
    self.terrain[tile as usize] = Terrain::Flowers;
    self.nectar_stock[tile as usize] = stock;
    self.nectar_capacity[tile as usize] = capacity;
    self.quality[tile as usize] = quality;
  }

  pub fn set_stock(&mut self, tile: TileId, stock: f32) {
    self.nectar_stock[tile as usize] = stock;
  }
}

impl WorldView for SyntheticWorld {
  fn tile_count(&self) -> usize {
    self.axial.len()
  }

  fn axial(&self, tile: TileId) -> (i32, i32) {
    self.axial[tile as usize]
  }

  fn tile_at(&self, q: i32, r: i32) -> Option<TileId> {
    self.by_axial.get(&(q, r)).copied()
  }

  fn terrain(&self, tile: TileId) -> Terrain {
    self.terrain[tile as usize]
  }

  fn base_cost(&self, tile: TileId) -> f32 {
    self.base_cost[tile as usize]
  }

  fn flow_capacity(&self, tile: TileId) -> f32 {
    self.flow_capacity[tile as usize]
  }

  fn nectar_stock(&self, tile: TileId) -> f32 {
    self.nectar_stock[tile as usize]
  }

  fn nectar_capacity(&self, tile: TileId) -> f32 {
    self.nectar_capacity[tile as usize]
  }

  fn quality(&self, tile: TileId) -> f32 {
    self.quality[tile as usize]
  }
}

/// Alias kept for readability at call sites that only ever build lines.
pub type LineWorld = SyntheticWorld;

impl LineWorld {
  /// See [`SyntheticWorld::line`]; kept as an inherent `new` for the
  /// neighbor-table unit tests that predate the grid constructor.
  pub fn new(n: usize) -> Self {
    Self::line(n)
  }
}
