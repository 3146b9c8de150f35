//! Six-way adjacency over the hex grid.
//!
//! Built once per world (or world rebuild) from tile terrain and axial
//! coordinates. See `spec.md` §4.1.

use crate::coords::{AXIAL_OFFSETS, NO_NEIGHBOR, NUM_DIRECTIONS, TileId, opp};
use crate::error::NavError;
use crate::world::WorldView;

/// Dense `6*N` array of signed tile ids; `-1` encodes "no edge".
pub struct NeighborTable {
  tile_count: usize,
  edges: Vec<i64>,
}

impl NeighborTable {
  /// Builds the table from a world view.
  ///
  /// Impassable source tiles yield an all-`-1` row; an edge `a -> b` in
  /// direction `d` always implies `b -> a` in direction `opp(d)`, since
  /// both endpoints are derived from the same axial adjacency. Fails if
  /// `world.tile_count()` is so large the `6*N` row count overflows `usize`.
  pub fn build(world: &dyn WorldView) -> Result<Self, NavError> {
    let tile_count = world.tile_count();
    let row_count = tile_count
      .checked_mul(NUM_DIRECTIONS)
      .ok_or_else(|| NavError::allocation_failed(format!("tile_count={tile_count} overflows edge row count")))?;
    let mut edges = vec![NO_NEIGHBOR; row_count];

    for tile in 0..tile_count as TileId {
      if !world.passable(tile) {
        continue;
      }
      let (q, r) = world.axial(tile);
      for (d, (dq, dr)) in AXIAL_OFFSETS.iter().enumerate() {
        let Some(n) = world.tile_at(q + dq, r + dr) else {
          continue;
        };
        if world.passable(n) {
          edges[tile as usize * NUM_DIRECTIONS + d] = n as i64;
        }
      }
    }

    let table = Self { tile_count, edges };
    debug_assert!(table.check_opposite_law(world), "neighbor table violates opposite-direction law");
    Ok(table)
  }

  /// Number of tiles the table was built for.
  #[inline]
  pub fn tile_count(&self) -> usize {
    self.tile_count
  }

  /// Neighbor of `tile` in direction `d`, or `None` if there is no edge.
  #[inline]
  pub fn get(&self, tile: TileId, d: u8) -> Option<TileId> {
    let v = self.edges[tile as usize * NUM_DIRECTIONS + d as usize];
    if v < 0 { None } else { Some(v as TileId) }
  }

  /// Iterates over `(direction, neighbor)` pairs with an edge from `tile`.
  pub fn neighbors(&self, tile: TileId) -> impl Iterator<Item = (u8, TileId)> + '_ {
    (0..NUM_DIRECTIONS as u8).filter_map(move |d| self.get(tile, d).map(|n| (d, n)))
  }

  fn check_opposite_law(&self, world: &dyn WorldView) -> bool {
    for tile in 0..self.tile_count as TileId {
      for d in 0..NUM_DIRECTIONS as u8 {
        if let Some(n) = self.get(tile, d)
          && self.get(n, opp(d)) != Some(tile)
        {
          log::warn!(
            "opposite-direction law violated: tile {tile} dir {d} -> {n}, but {n} has no return edge (q,r)={:?}",
            world.axial(tile)
          );
          return false;
        }
      }
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::LineWorld;

  #[test]
  fn impassable_tile_has_no_outgoing_edges() {
    let world = LineWorld::new(3).with_impassable(1);
    let table = NeighborTable::build(&world).unwrap();
    for d in 0..6u8 {
      assert_eq!(table.get(1, d), None);
    }
  }

  #[test]
  fn linear_world_edges_are_symmetric() {
    let world = LineWorld::new(5);
    let table = NeighborTable::build(&world).unwrap();
    assert_eq!(table.get(0, 0), Some(1));
    assert_eq!(table.get(1, opp(0)), Some(0));
  }
}
