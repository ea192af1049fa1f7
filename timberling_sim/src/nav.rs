// Minimal navigator — the movement collaborator the harvest behavior drives.
//
// Real pathfinding is out of scope for this crate; the navigator only
// validates that a requested destination is a cell a creature could stand in
// (in bounds, open, solid support below) and records the active request.
// The host advances the creature toward the destination each tick (see
// `sim.rs`).
//
// That validation is what makes "path straight to the trunk cell" fail —
// the trunk is solid — which triggers the behavior's raycast fallback onto
// the open cell beside the hit face.
//
// See also: `harvest.rs` for the approach logic, `world.rs` for the grid
// queries used by the standability check.
//
// **Critical constraint: determinism.** The navigator is plain data; path
// acceptance depends only on world state at the time of the request.

use crate::types::CellPos;
use crate::world::VoxelWorld;
use serde::{Deserialize, Serialize};

/// An accepted path request: walk toward `dest` at `speed` (a multiplier on
/// the creature's base movement).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRequest {
    pub dest: [f32; 3],
    pub speed: f32,
}

/// Per-creature navigation state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Navigator {
    path: Option<PathRequest>,
}

/// A creature can stand in an open cell with solid support directly below.
pub fn is_standable(world: &VoxelWorld, cell: CellPos) -> bool {
    world.in_bounds(cell) && !world.get(cell).is_solid() && world.get(cell.down()).is_solid()
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a path to the given world-space point. Returns `false` (and
    /// leaves any previous request untouched) if the destination cell is not
    /// standable.
    pub fn request_path(&mut self, world: &VoxelWorld, x: f32, y: f32, z: f32, speed: f32) -> bool {
        let cell = CellPos::new(x.floor() as i32, y.floor() as i32, z.floor() as i32);
        if !is_standable(world, cell) {
            return false;
        }
        self.path = Some(PathRequest {
            dest: [x, y, z],
            speed,
        });
        true
    }

    /// Abandon the active request.
    pub fn clear(&mut self) {
        self.path = None;
    }

    pub fn active_path(&self) -> Option<PathRequest> {
        self.path
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockKind, TreeSpecies};

    fn floored_world() -> VoxelWorld {
        let mut world = VoxelWorld::new(16, 16, 16);
        for x in 0..16 {
            for z in 0..16 {
                world.set(CellPos::new(x, 0, z), BlockKind::ForestFloor);
            }
        }
        world
    }

    #[test]
    fn standable_requires_open_cell_with_support() {
        let world = floored_world();
        assert!(is_standable(&world, CellPos::new(4, 1, 4)));
        // No support two cells up.
        assert!(!is_standable(&world, CellPos::new(4, 2, 4)));
    }

    #[test]
    fn standable_rejects_solid_cell() {
        let mut world = floored_world();
        world.set(CellPos::new(4, 1, 4), BlockKind::Trunk(TreeSpecies::Oak));
        assert!(!is_standable(&world, CellPos::new(4, 1, 4)));
    }

    #[test]
    fn request_path_to_open_cell_succeeds() {
        let world = floored_world();
        let mut nav = Navigator::new();
        assert!(nav.request_path(&world, 4.5, 1.0, 4.5, 1.25));
        let path = nav.active_path().unwrap();
        assert_eq!(path.speed, 1.25);
        nav.clear();
        assert!(nav.is_idle());
    }

    #[test]
    fn request_path_into_trunk_fails() {
        let mut world = floored_world();
        world.set(CellPos::new(4, 1, 4), BlockKind::Trunk(TreeSpecies::Oak));
        let mut nav = Navigator::new();
        assert!(!nav.request_path(&world, 4.5, 1.0, 4.5, 1.25));
        assert!(nav.is_idle());
    }

    #[test]
    fn request_path_out_of_bounds_fails() {
        let world = floored_world();
        let mut nav = Navigator::new();
        assert!(!nav.request_path(&world, -3.5, 1.0, 4.5, 1.0));
    }
}
