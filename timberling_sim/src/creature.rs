// Creature entities — the autonomous agents that harvest trees.
//
// A single `Creature` struct covers every individual; behavioral gating
// (tamed, caged, command, upgrades, held item) is data on the struct, read by
// the harvest goal's guards. There are no per-kind creature subtypes.
//
// Positions are world-space floats; `cell()` gives the grid cell the creature
// occupies. Distances to target cells are measured to the cell's minimum
// corner; the harvest range thresholds (2.5 / 0.6 squared) are calibrated
// against corner distance, not center distance.
//
// See also: `harvest.rs` for the goal that reads these fields, `nav.rs` for
// the embedded navigator, `sim.rs` for the registry and movement integration.
//
// **Critical constraint: determinism.** Creature state changes only inside
// the tick loop, in registry iteration order.

use crate::nav::Navigator;
use crate::types::{CellPos, CreatureId, ItemKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The standing order a creature is following.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureCommand {
    Wander,
    Sit,
    Follow,
    Harvest,
}

/// Equippable capability upgrades. The harvest goal requires `Lumberjack`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Upgrade {
    Lumberjack,
    Miner,
    Gatherer,
}

/// A creature entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    /// World-space position (feet).
    pub position: [f32; 3],
    /// Eye height above `position`, used for ray origins and distance ranking.
    pub eye_height: f32,
    /// Current velocity, zeroed when the creature arrives at a chop spot.
    pub motion: [f32; 3],
    pub tamed: bool,
    pub caged: bool,
    pub sitting: bool,
    pub command: CreatureCommand,
    pub upgrades: BTreeSet<Upgrade>,
    /// Item in the main hand. Harvesting requires an empty hand and stops the
    /// moment something lands in it.
    pub held_item: Option<ItemKind>,
    /// Scales the arrival threshold — larger creatures stop farther out.
    pub reach_modifier: f32,
    /// Half-extent of the cubic tree-search volume.
    pub search_radius: i32,
    /// Where tree searches are centered. `None` means the creature's own cell
    /// (an assigned anchor pins a worker to a grove).
    pub search_anchor: Option<CellPos>,
    /// Set when a tree comes down — the creature runs from this cell.
    pub flee_from: Option<CellPos>,
    pub nav: Navigator,
}

impl Creature {
    pub fn new(id: CreatureId, position: [f32; 3]) -> Self {
        Self {
            id,
            position,
            eye_height: 0.4,
            motion: [0.0; 3],
            tamed: false,
            caged: false,
            sitting: false,
            command: CreatureCommand::Wander,
            upgrades: BTreeSet::new(),
            held_item: None,
            reach_modifier: 1.0,
            search_radius: 16,
            search_anchor: None,
            flee_from: None,
            nav: Navigator::new(),
        }
    }

    /// The grid cell containing the creature's feet.
    pub fn cell(&self) -> CellPos {
        CellPos::new(
            self.position[0].floor() as i32,
            self.position[1].floor() as i32,
            self.position[2].floor() as i32,
        )
    }

    /// World-space eye position.
    pub fn eye_pos(&self) -> [f32; 3] {
        [
            self.position[0],
            self.position[1] + self.eye_height,
            self.position[2],
        ]
    }

    /// Center of the cubic tree-search volume.
    pub fn search_center(&self) -> CellPos {
        self.search_anchor.unwrap_or_else(|| self.cell())
    }

    /// Whether the creature is currently free to move at all.
    pub fn can_move(&self) -> bool {
        !self.caged && !self.sitting
    }

    /// Squared distance from the creature to a cell's minimum corner.
    pub fn distance_sq_to(&self, cell: CellPos) -> f32 {
        let dx = self.position[0] - cell.x as f32;
        let dy = self.position[1] - cell.y as f32;
        let dz = self.position[2] - cell.z as f32;
        dx * dx + dy * dy + dz * dz
    }

    pub fn zero_motion(&mut self) {
        self.motion = [0.0; 3];
    }

    /// Advance toward the active path destination. Ground creatures walk:
    /// only x/z integrate, feet stay at terrain height. Arrival snaps to the
    /// destination's x/z and clears the path.
    pub fn advance_along_path(&mut self, move_per_tick: f32) {
        let Some(path) = self.nav.active_path() else {
            return;
        };
        let dx = path.dest[0] - self.position[0];
        let dz = path.dest[2] - self.position[2];
        let dist = (dx * dx + dz * dz).sqrt();
        let step = move_per_tick * path.speed;
        if dist <= step {
            self.position[0] = path.dest[0];
            self.position[2] = path.dest[2];
            self.zero_motion();
            self.nav.clear();
        } else {
            let mx = dx / dist * step;
            let mz = dz / dist * step;
            self.position[0] += mx;
            self.position[2] += mz;
            self.motion = [mx, 0.0, mz];
        }
    }
}
