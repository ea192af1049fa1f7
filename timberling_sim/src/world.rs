// Dense 3D voxel grid for the game world.
//
// The world is stored as a flat `Vec<BlockKind>` indexed by
// `x + z * size_x + y * size_x * size_z`, giving O(1) read/write access.
// Out-of-bounds reads return `Air`; out-of-bounds writes are no-ops.
//
// Also provides `raycast()`, a 3D DDA (Amanatides & Woo) voxel traversal that
// finds the first solid cell on a segment and reports the face through which
// the ray entered it. The harvest behavior uses the hit face to pick an open
// cell to stand in when the target cell itself cannot be pathed to.
//
// The world is rebuilt from config at load time, so it skips serialization
// (`#[serde(skip)]` on `SimState.world`). The `Default` impl creates a
// zero-sized empty world; `SimState::new()` constructs the real one from
// `config.world_size`.
//
// See also: `tree_gen.rs` for populating the world with tree geometry,
// `target.rs` for the trunk/foliage predicates layered on top of `get()`,
// `sim.rs` which owns the `VoxelWorld` as part of `SimState`.
//
// **Critical constraint: determinism.** All world modifications go through
// sim logic invoked from the tick loop. No concurrent mutation.

use crate::types::{BlockKind, CellPos, Face};

/// Dense 3D voxel grid.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    cells: Vec<BlockKind>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

/// The first solid cell a ray crossed, and the face it entered through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
    pub cell: CellPos,
    pub face: Face,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            cells: vec![BlockKind::Air; total],
            size_x,
            size_y,
            size_z,
        }
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: CellPos) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    /// Vertical extent of the world in cells. Upward column walks must stop
    /// here even in degenerate worlds.
    pub fn height(&self) -> i32 {
        self.size_y as i32
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: CellPos) -> Option<usize> {
        if self.in_bounds(coord) {
            let x = coord.x as usize;
            let y = coord.y as usize;
            let z = coord.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    /// Read a cell. Returns `Air` for out-of-bounds coordinates.
    pub fn get(&self, coord: CellPos) -> BlockKind {
        self.index(coord)
            .map(|i| self.cells[i])
            .unwrap_or(BlockKind::Air)
    }

    /// Write a cell. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: CellPos, kind: BlockKind) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = kind;
        }
    }

    /// Clear a cell to `Air`, returning the displaced block. The caller
    /// decides what (if anything) drops from it.
    pub fn remove(&mut self, coord: CellPos) -> BlockKind {
        let prev = self.get(coord);
        self.set(coord, BlockKind::Air);
        prev
    }

    /// Topmost occupied cell of the column containing `pos`: walk upward while
    /// the cell above is solid, bounded by world height.
    pub fn top_of_column(&self, pos: CellPos) -> CellPos {
        let mut top = pos;
        while self.get(top.up()).is_solid() && top.y < self.height() {
            top = top.up();
        }
        top
    }

    /// 3D DDA raycast: returns the first solid cell on the segment from
    /// `from` to `to` (both in world-space floats) and the face the ray
    /// entered it through, or `None` if the segment crosses only air.
    ///
    /// Uses the Amanatides & Woo voxel traversal algorithm. The cell
    /// containing `from` is not tested (the creature casting the ray stands
    /// there); the destination cell IS tested, since rays are aimed at the
    /// center of the cell the creature wants to reach.
    pub fn raycast(&self, from: [f32; 3], to: [f32; 3]) -> Option<RayHit> {
        let dir = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];

        // Current voxel coordinates.
        let mut voxel = [
            from[0].floor() as i32,
            from[1].floor() as i32,
            from[2].floor() as i32,
        ];

        let end_voxel = [
            to[0].floor() as i32,
            to[1].floor() as i32,
            to[2].floor() as i32,
        ];

        // Step direction (+1 or -1) and tMax/tDelta for each axis.
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];

        for axis in 0..3 {
            if dir[axis] > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / dir[axis];
                t_max[axis] = ((voxel[axis] as f32 + 1.0) - from[axis]) / dir[axis];
            } else if dir[axis] < 0.0 {
                step[axis] = -1;
                t_delta[axis] = 1.0 / (-dir[axis]);
                t_max[axis] = (from[axis] - voxel[axis] as f32) / (-dir[axis]);
            }
            // If dir[axis] == 0, step/t_max/t_delta stay at 0/INF/INF — axis never advances.
        }

        // March through voxels until a solid hit, the destination, or t > 1.
        loop {
            // Advance along the axis with the smallest t_max.
            let min_axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
                0
            } else if t_max[1] <= t_max[2] {
                1
            } else {
                2
            };

            // If t_max exceeds 1.0, the segment ends inside the current voxel.
            if t_max[min_axis] > 1.0 {
                return None;
            }

            voxel[min_axis] += step[min_axis];
            t_max[min_axis] += t_delta[min_axis];

            let cell = CellPos::new(voxel[0], voxel[1], voxel[2]);
            if self.get(cell).is_solid() {
                return Some(RayHit {
                    cell,
                    face: entry_face(min_axis, step[min_axis]),
                });
            }
            if voxel == end_voxel {
                return None;
            }
        }
    }
}

/// The face of the newly-entered cell that a ray stepping along `axis` in
/// direction `step` crossed: stepping east enters through the west face, etc.
fn entry_face(axis: usize, step: i32) -> Face {
    match (axis, step > 0) {
        (0, true) => Face::West,
        (0, false) => Face::East,
        (1, true) => Face::Down,
        (1, false) => Face::Up,
        (2, true) => Face::North,
        _ => Face::South,
    }
}
