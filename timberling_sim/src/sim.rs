// Core simulation state and tick loop.
//
// `SimState` is the single source of truth: it owns the voxel world, the
// creature registry, each creature's harvest goal, and the game config. The
// sim advances one tick at a time; a step is a pure function of prior state,
// returning the feedback events emitted during it.
//
// ## Goal scheduling
//
// Each creature has one `HarvestGoal`. Per tick, in creature registry order,
// the scheduler:
//
//   1. Integrates movement along the creature's active path request.
//   2. If the goal is inactive, runs its entry guard (`can_start`) and
//      activates it on success.
//   3. If the goal is active but its continue guard fails — target gone,
//      hand filled — or the creature's standing order is no longer Harvest
//      or it can no longer move, the goal is stopped (which also re-scans,
//      so it resumes instantly when re-enabled).
//   4. Otherwise the goal runs one tick of harvesting.
//
// Calls are strictly sequential within a tick; the goal is never reentered
// for the same creature.
//
// ## Save/load
//
// `SimState` serializes via serde. The voxel world is `#[serde(skip)]` and
// rebuilt from config plus the recorded list of removed cells
// (`rebuild_world()`), the same rebuild-transient-state pattern used for
// world geometry everywhere else in this crate. `to_json()` / `from_json()`
// wrap the full cycle.
//
// See also: `harvest.rs` for the goal state machine, `creature.rs` for
// movement integration, `config.rs` for `GameConfig`, `tree_gen.rs` for the
// geometry grown at construction, `event.rs` for the emitted events.
//
// **Critical constraint: determinism.** Creatures are stored in a `BTreeMap`
// and processed in key order. No randomness, no system time.

use crate::config::GameConfig;
use crate::creature::{Creature, CreatureCommand};
use crate::event::{SimEvent, SimEventKind};
use crate::harvest::HarvestGoal;
use crate::tree_gen;
use crate::types::{CellPos, CreatureId};
use crate::world::VoxelWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level simulation state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimState {
    /// Current simulation tick.
    pub tick: u64,

    /// Game configuration (immutable after initialization).
    pub config: GameConfig,

    /// All creatures, keyed by ID. BTreeMap for deterministic iteration.
    pub creatures: BTreeMap<CreatureId, Creature>,

    /// Each creature's harvest goal, keyed by the same ID.
    pub goals: BTreeMap<CreatureId, HarvestGoal>,

    /// Next creature ID to assign. IDs are sequential in spawn order.
    next_creature_id: u32,

    /// Cells removed from the as-configured world (felled trunks). Replayed
    /// by `rebuild_world()` after load.
    removed_cells: Vec<CellPos>,

    /// The 3D voxel grid. Rebuilt from config + removals, not serialized.
    #[serde(skip)]
    pub world: VoxelWorld,
}

/// The result of advancing the simulation.
pub struct StepResult {
    /// Feedback events emitted during this step, for the host to render.
    pub events: Vec<SimEvent>,
}

impl SimState {
    /// Create a new simulation: build the world, lay the forest floor, and
    /// grow the configured trees.
    pub fn new(config: GameConfig) -> Self {
        let mut state = Self {
            tick: 0,
            config,
            creatures: BTreeMap::new(),
            goals: BTreeMap::new(),
            next_creature_id: 0,
            removed_cells: Vec::new(),
            world: VoxelWorld::default(),
        };
        state.rebuild_world();
        state
    }

    /// Reconstruct the voxel world from config, then replay removals.
    pub fn rebuild_world(&mut self) {
        let (sx, sy, sz) = self.config.world_size;
        let mut world = VoxelWorld::new(sx, sy, sz);
        tree_gen::lay_forest_floor(&mut world, self.config.floor_y);
        for plan in &self.config.trees {
            tree_gen::grow_tree(&mut world, plan);
        }
        for &cell in &self.removed_cells {
            world.remove(cell);
        }
        self.world = world;
    }

    /// Spawn a creature at the given position with default (wild) state.
    /// Callers tame/equip/command it through `creature_mut`.
    pub fn spawn_creature(&mut self, position: [f32; 3]) -> CreatureId {
        let id = CreatureId(self.next_creature_id);
        self.next_creature_id += 1;
        self.creatures.insert(id, Creature::new(id, position));
        self.goals.insert(id, HarvestGoal::new());
        id
    }

    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn goal(&self, id: CreatureId) -> Option<&HarvestGoal> {
        self.goals.get(&id)
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) -> StepResult {
        self.tick += 1;
        let mut events = Vec::new();

        let ids: Vec<CreatureId> = self.creatures.keys().copied().collect();
        for id in ids {
            let Some(creature) = self.creatures.get_mut(&id) else {
                continue;
            };
            creature.advance_along_path(self.config.move_per_tick);

            let Some(goal) = self.goals.get_mut(&id) else {
                continue;
            };
            if !goal.active {
                if goal.can_start(&self.world, creature, &self.config.harvest) {
                    goal.active = true;
                }
            } else if !goal.can_continue(creature)
                || !creature.can_move()
                || creature.command != CreatureCommand::Harvest
            {
                goal.active = false;
                goal.stop(&self.world, creature, &self.config.harvest);
            } else {
                goal.tick(
                    &mut self.world,
                    creature,
                    &self.config.harvest,
                    self.tick,
                    &mut events,
                );
            }
        }

        // Record removals so the world can be rebuilt after load.
        for event in &events {
            if let SimEventKind::BlockBroken { cell, .. } = event.kind {
                self.removed_cells.push(cell);
            }
        }

        StepResult { events }
    }

    /// Advance `n` ticks, collecting all emitted events.
    pub fn step_n(&mut self, n: u64) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.step().events);
        }
        events
    }

    /// Serialize the full state (minus the rebuildable world).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore state from JSON and rebuild the world.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut state: SimState = serde_json::from_str(json)?;
        state.rebuild_world();
        Ok(state)
    }
}
