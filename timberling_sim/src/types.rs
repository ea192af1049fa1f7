// Core types shared across the simulation.
//
// Defines the integer grid coordinate (`CellPos`), block materials
// (`BlockKind` / `TreeSpecies`), raycast hit faces (`Face`), and the compact
// creature identifier. All types derive `Serialize` and `Deserialize` for
// save/load.
//
// Trunk and foliage are distinct `BlockKind` variants, so the classification
// predicates in `target.rs` are mutually exclusive by construction.
//
// **Critical constraint: determinism.** Creature IDs are sequential integers
// assigned by the sim in spawn order. No UUIDs, no OS entropy.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in cell units.
///
/// The coordinate system uses right-handed conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell displaced by the given deltas.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly above.
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The cell directly below.
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The face-adjacent cell in the given direction.
    pub const fn neighbor(self, face: Face) -> Self {
        let (dx, dy, dz) = face.delta();
        self.offset(dx, dy, dz)
    }

    /// World-space center of this cell.
    pub fn center(self) -> [f32; 3] {
        [
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        ]
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Squared Euclidean distance between two world-space points.
pub fn dist_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// One of the six axis-aligned cell faces. A raycast reports the face through
/// which it entered the hit cell; the cell adjacent to that face is the open
/// spot to stand in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    East,  // +x
    West,  // -x
    Up,    // +y
    Down,  // -y
    South, // +z
    North, // -z
}

impl Face {
    /// Unit delta pointing out of the face.
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::East => (1, 0, 0),
            Face::West => (-1, 0, 0),
            Face::Up => (0, 1, 0),
            Face::Down => (0, -1, 0),
            Face::South => (0, 0, 1),
            Face::North => (0, 0, -1),
        }
    }
}

// ---------------------------------------------------------------------------
// Block materials
// ---------------------------------------------------------------------------

/// Tree species tag carried by trunk and foliage cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreeSpecies {
    Oak,
    Birch,
    Spruce,
}

/// The material of a single cell in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Air,
    /// Woody structure of a tree — trunk or branch.
    Trunk(TreeSpecies),
    /// Leaf material at the crown.
    Foliage(TreeSpecies),
    ForestFloor,
    Stone,
}

impl BlockKind {
    /// Anything that occupies the cell. Creatures cannot stand inside a solid
    /// cell, and rays stop at the first solid cell.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Air)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Items a creature can hold in its main hand or that drop from felled cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Log(TreeSpecies),
    Sapling(TreeSpecies),
    Stick,
}

// ---------------------------------------------------------------------------
// Creature IDs — sequential integers, assigned in spawn order.
// ---------------------------------------------------------------------------

/// Compact identifier for a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CreatureId({})", self.0)
    }
}
