// Data-driven game configuration.
//
// All tunable simulation parameters live here in `GameConfig`, loadable from
// JSON. The sim never uses magic numbers — it reads from the config. This
// enables balance iteration without recompilation.
//
// Harvest behavior parameters are grouped into `HarvestConfig`; the defaults
// give the standard creature feel (160-tick chop, 10 visual break stages,
// swing feedback every 10 ticks).
//
// See also: `sim.rs` which owns the `GameConfig` as part of `SimState`,
// `harvest.rs` / `target.rs` / `feller.rs` which read `HarvestConfig`,
// `tree_gen.rs` which reads `TreePlan` entries at world construction.
//
// **Critical constraint: determinism.** Config values feed directly into
// simulation logic. Two runs with identical configs and commands produce
// identical states.

use crate::types::{CellPos, TreeSpecies};
use serde::{Deserialize, Serialize};

/// Parameters of the tree-harvesting behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Ticks of chopping required to fell a tree.
    pub chop_ticks_total: u32,
    /// Number of discrete visual break-progress stages.
    pub break_stages: u32,
    /// A swing/hit sound pair is emitted every this many chop ticks.
    pub swing_sound_interval: u32,
    /// Squared distance within which chopping begins.
    pub chop_range_sq: f32,
    /// Squared distance (scaled by the creature's reach modifier) within
    /// which the creature has arrived: motion is zeroed and the path cleared.
    pub arrive_range_sq: f32,
    /// Movement speed factor used when pathing toward the target.
    pub approach_speed: f32,
    /// Horizontal half-extent of the stump-resolution window.
    pub stump_window_horizontal: i32,
    /// Downward extent of the stump-resolution window.
    pub stump_window_depth: i32,
    /// Maximum descent steps during stump resolution. Each step moves at
    /// least one cell down, so this bounds the loop on malformed worlds.
    pub stump_max_descent: u32,
    /// Horizontal half-extent of the felling scan window around the cursor.
    pub fell_window_radius: i32,
    /// Upward extent of the felling scan window above the cursor.
    pub fell_window_height: i32,
    /// Hard cap on cells collected by one felling pass. Without it a
    /// pathological world (a solid trunk slab) would make a single fell
    /// arbitrarily large.
    pub max_felled_cells: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            chop_ticks_total: 160,
            break_stages: 10,
            swing_sound_interval: 10,
            chop_range_sq: 2.5,
            arrive_range_sq: 0.6,
            approach_speed: 1.25,
            stump_window_horizontal: 4,
            stump_window_depth: 4,
            stump_max_descent: 64,
            fell_window_radius: 8,
            fell_window_height: 2,
            max_felled_cells: 2048,
        }
    }
}

/// A tree to grow at world construction time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreePlan {
    pub base: CellPos,
    pub trunk_height: i32,
    pub species: TreeSpecies,
    /// Horizontal drift applied once halfway up the trunk, producing a
    /// leaning trunk. (0, 0) grows a straight column.
    pub lean: (i32, i32),
}

/// Complete game configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// World grid dimensions (x, y, z).
    pub world_size: (u32, u32, u32),
    /// Y level of the forest floor layer. Trees grow on top of it.
    pub floor_y: i32,
    /// Base creature movement per tick, in cells. Multiplied by the speed
    /// factor of the active path request.
    pub move_per_tick: f32,
    /// Trees grown at construction.
    pub trees: Vec<TreePlan>,
    pub harvest: HarvestConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_size: (64, 48, 64),
            floor_y: 0,
            move_per_tick: 0.05,
            trees: Vec::new(),
            harvest: HarvestConfig::default(),
        }
    }
}

impl GameConfig {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_harvest_tuning() {
        let config = HarvestConfig::default();
        assert_eq!(config.chop_ticks_total, 160);
        assert_eq!(config.break_stages, 10);
        assert_eq!(config.swing_sound_interval, 10);
        assert_eq!(config.stump_window_horizontal, 4);
        assert_eq!(config.fell_window_radius, 8);
        assert_eq!(config.fell_window_height, 2);
    }

    #[test]
    fn config_json_roundtrip() {
        let mut config = GameConfig::default();
        config.trees.push(TreePlan {
            base: CellPos::new(10, 1, 10),
            trunk_height: 5,
            species: TreeSpecies::Oak,
            lean: (0, 0),
        });
        let json = config.to_json().unwrap();
        let restored = GameConfig::from_json(&json).unwrap();
        assert_eq!(restored.world_size, config.world_size);
        assert_eq!(restored.trees.len(), 1);
        assert_eq!(restored.harvest.chop_ticks_total, 160);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(GameConfig::from_json("not json").is_err());
    }
}
