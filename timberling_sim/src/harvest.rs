// The tree-harvesting goal — a per-tick chop state machine.
//
// One `HarvestGoal` per creature, driven by the scheduler in `sim.rs`:
//
//   idle --can_start--> approaching/chopping --completion/interruption--> idle
//
// `can_start` gates on the creature (free to move, tamed, ordered to harvest,
// not caged, lumberjack upgrade, empty hand) and then scans for a target;
// `can_continue` holds while a target exists and the hand stays empty. Every
// failure is soft: the goal falls back to idle and the next tick's scan is
// the retry.
//
// Per tick the goal paths toward the target (falling back to the cell beside
// a raycast hit face when the target cell itself cannot be stood in),
// re-validates that the target is still trunk, accumulates chop progress in
// range, emits swing/hit sounds every few ticks and a break-progress stage
// only when the stage value changes, and on reaching the chop threshold
// fells the tree, tells the creature to flee the collapse point, and
// immediately re-scans.
//
// See also: `target.rs` for selection, `feller.rs` for felling, `sim.rs` for
// the scheduler that calls these methods, `event.rs` for feedback output.
//
// **Critical constraint: determinism.** Goal state changes only inside
// `can_start`/`tick`/`stop`, invoked in creature registry order.

use crate::config::HarvestConfig;
use crate::creature::{Creature, CreatureCommand, Upgrade};
use crate::event::{CreatureVisualState, SimEvent, SimEventKind, SoundKind};
use crate::feller;
use crate::target::{is_trunk, select_target};
use crate::types::CellPos;
use crate::world::VoxelWorld;
use serde::{Deserialize, Serialize};

/// Sentinel for "no stage reported yet" — the first computed stage always
/// differs from it, so a fresh chop re-broadcasts stage 0.
const STAGE_RESET: i32 = -1;

/// Per-creature tree-harvesting state machine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HarvestGoal {
    /// Whether the scheduler currently runs this goal. Managed by `sim.rs`.
    pub active: bool,
    /// The stump being harvested, if any. At most one at a time.
    target: Option<CellPos>,
    /// Elapsed chop ticks against the current target.
    chop_ticks: u32,
    /// Last break-progress stage broadcast, or `STAGE_RESET`.
    prev_stage: i32,
    /// True while the creature is in chop range and swinging.
    chopping: bool,
}

impl HarvestGoal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<CellPos> {
        self.target
    }

    pub fn chop_ticks(&self) -> u32 {
        self.chop_ticks
    }

    pub fn is_chopping(&self) -> bool {
        self.chopping
    }

    /// Entry guard. The creature must be free to move, tamed, ordered to
    /// harvest, out of any cage, carrying the lumberjack upgrade, and have an
    /// empty main hand — then a scan must actually find a tree.
    pub fn can_start(
        &mut self,
        world: &VoxelWorld,
        creature: &Creature,
        config: &HarvestConfig,
    ) -> bool {
        if !creature.can_move()
            || !creature.tamed
            || creature.command != CreatureCommand::Harvest
            || creature.caged
            || !creature.upgrades.contains(&Upgrade::Lumberjack)
        {
            return false;
        }
        if creature.held_item.is_some() {
            return false;
        }
        self.target = select_target(world, creature, config);
        self.target.is_some()
    }

    /// Continue guard: a target still exists and the hand is still empty.
    pub fn can_continue(&self, creature: &Creature) -> bool {
        self.target.is_some() && creature.held_item.is_none()
    }

    /// Interruption/reset: abandon the path, zero progress, and re-scan so
    /// the goal can resume the moment it is re-enabled.
    pub fn stop(&mut self, world: &VoxelWorld, creature: &mut Creature, config: &HarvestConfig) {
        creature.nav.clear();
        self.chop_ticks = 0;
        self.prev_stage = STAGE_RESET;
        self.chopping = false;
        self.target = select_target(world, creature, config);
    }

    /// One tick of harvesting.
    pub fn tick(
        &mut self,
        world: &mut VoxelWorld,
        creature: &mut Creature,
        config: &HarvestConfig,
        now: u64,
        events: &mut Vec<SimEvent>,
    ) {
        let Some(target) = self.target else {
            return;
        };

        // Approach: path to the target cell's center; if that cell cannot be
        // stood in, raycast at it and path to the open cell beside the hit
        // face instead.
        let direct = creature.nav.request_path(
            world,
            target.x as f32 + 0.5,
            target.y as f32,
            target.z as f32 + 0.5,
            config.approach_speed,
        );
        if !direct {
            if let Some(hit) = world.raycast(creature.position, target.center()) {
                let side = hit.cell.neighbor(hit.face);
                creature.nav.request_path(
                    world,
                    side.x as f32 + 0.5,
                    side.y as f32 + 0.5,
                    side.z as f32 + 0.5,
                    config.approach_speed,
                );
            }
        }

        // Re-validate: the tree may have vanished since the last tick.
        if !is_trunk(world, target) {
            creature.flee_from = Some(target);
            self.target = None;
            self.stop(world, creature, config);
            return;
        }

        let distance = creature.distance_sq_to(target);
        if distance >= config.chop_range_sq {
            return;
        }

        if !self.chopping {
            self.chopping = true;
            events.push(SimEvent {
                tick: now,
                kind: SimEventKind::VisualState {
                    creature: creature.id,
                    state: CreatureVisualState::Chopping,
                },
            });
        }

        // Arrived: stand still instead of jittering against the trunk.
        if distance < config.arrive_range_sq * creature.reach_modifier {
            creature.zero_motion();
            creature.nav.clear();
        }

        self.chop_ticks += 1;
        let stage = (self.chop_ticks as f32 / config.chop_ticks_total as f32
            * config.break_stages as f32) as i32;

        if self.chop_ticks % config.swing_sound_interval == 0 {
            events.push(sound(now, creature, SoundKind::WoodHit, 1.0, 1.0));
            events.push(sound(now, creature, SoundKind::SweepSwing, 1.0, 0.5));
        }

        if stage != self.prev_stage {
            events.push(SimEvent {
                tick: now,
                kind: SimEventKind::BreakProgress {
                    creature: creature.id,
                    cell: target,
                    stage: stage.max(0) as u32,
                },
            });
            self.prev_stage = stage;
        }

        if self.chop_ticks == config.chop_ticks_total {
            events.push(SimEvent {
                tick: now,
                kind: SimEventKind::VisualState {
                    creature: creature.id,
                    state: CreatureVisualState::ChopFinished,
                },
            });
            events.push(sound(now, creature, SoundKind::WoodBreak, 1.0, 1.0));
            self.chop_ticks = 0;
            self.prev_stage = STAGE_RESET;

            let removed = feller::fell_tree(world, target, config, now, events);
            events.push(SimEvent {
                tick: now,
                kind: SimEventKind::TreeFelled {
                    creature: creature.id,
                    stump: target,
                    cells_removed: removed,
                },
            });

            creature.flee_from = Some(target);
            self.target = None;
            self.chopping = false;
            self.stop(world, creature, config);
        }
    }
}

fn sound(tick: u64, creature: &Creature, sound: SoundKind, volume: f32, pitch: f32) -> SimEvent {
    SimEvent {
        tick,
        kind: SimEventKind::Sound {
            creature: creature.id,
            sound,
            volume,
            pitch,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreePlan;
    use crate::tree_gen;
    use crate::types::{BlockKind, CreatureId, ItemKind, TreeSpecies};

    fn world_with_tree() -> VoxelWorld {
        let mut world = VoxelWorld::new(48, 32, 48);
        tree_gen::lay_forest_floor(&mut world, 0);
        tree_gen::grow_tree(
            &mut world,
            &TreePlan {
                base: CellPos::new(10, 1, 10),
                trunk_height: 4,
                species: TreeSpecies::Oak,
                lean: (0, 0),
            },
        );
        world
    }

    fn lumberjack_at(x: f32, y: f32, z: f32) -> Creature {
        let mut c = Creature::new(CreatureId(7), [x, y, z]);
        c.tamed = true;
        c.command = CreatureCommand::Harvest;
        c.upgrades.insert(Upgrade::Lumberjack);
        c
    }

    /// Creature standing in chop range beside the stump.
    fn chopper() -> Creature {
        lumberjack_at(9.5, 1.0, 10.5)
    }

    #[test]
    fn entry_guard_requires_full_eligibility() {
        let world = world_with_tree();
        let config = HarvestConfig::default();

        let mut goal = HarvestGoal::new();
        assert!(goal.can_start(&world, &chopper(), &config));

        let mut wild = chopper();
        wild.tamed = false;
        assert!(!goal.can_start(&world, &wild, &config));

        let mut wrong_command = chopper();
        wrong_command.command = CreatureCommand::Wander;
        assert!(!goal.can_start(&world, &wrong_command, &config));

        let mut caged = chopper();
        caged.caged = true;
        assert!(!goal.can_start(&world, &caged, &config));

        let mut sitting = chopper();
        sitting.sitting = true;
        assert!(!goal.can_start(&world, &sitting, &config));

        let mut no_upgrade = chopper();
        no_upgrade.upgrades.clear();
        assert!(!goal.can_start(&world, &no_upgrade, &config));

        let mut full_hand = chopper();
        full_hand.held_item = Some(ItemKind::Stick);
        assert!(!goal.can_start(&world, &full_hand, &config));
    }

    #[test]
    fn entry_fails_without_a_tree_in_range() {
        let mut world = VoxelWorld::new(48, 32, 48);
        tree_gen::lay_forest_floor(&mut world, 0);
        let mut goal = HarvestGoal::new();
        assert!(!goal.can_start(&world, &chopper(), &HarvestConfig::default()));
        assert_eq!(goal.target(), None);
    }

    #[test]
    fn continue_guard_breaks_when_hand_fills() {
        let world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));
        assert!(goal.can_continue(&creature));
        creature.held_item = Some(ItemKind::Log(TreeSpecies::Oak));
        assert!(!goal.can_continue(&creature));
    }

    #[test]
    fn chop_ticks_accumulate_in_range() {
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        let mut last = 0;
        for now in 0..20 {
            goal.tick(&mut world, &mut creature, &config, now, &mut events);
            assert!(goal.chop_ticks() >= last, "counter must not decrease");
            last = goal.chop_ticks();
        }
        assert_eq!(goal.chop_ticks(), 20);
        assert!(goal.is_chopping());
    }

    #[test]
    fn out_of_range_does_not_accumulate() {
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        // 5 cells from the stump — outside chop range.
        let mut creature = lumberjack_at(5.5, 1.0, 10.5);
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        goal.tick(&mut world, &mut creature, &config, 0, &mut events);
        assert_eq!(goal.chop_ticks(), 0);
        assert!(!goal.is_chopping());
    }

    #[test]
    fn failed_direct_path_falls_back_to_raycast_side_cell() {
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        // Due west of the trunk: the direct request targets the solid trunk
        // cell and fails; the ray hits the trunk's west face.
        let mut creature = lumberjack_at(7.5, 1.0, 10.5);
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        goal.tick(&mut world, &mut creature, &config, 0, &mut events);

        let path = creature.nav.active_path().expect("fallback path expected");
        assert_eq!(path.dest, [9.5, 1.5, 10.5]);
        assert_eq!(path.speed, config.approach_speed);
    }

    #[test]
    fn arrival_zeroes_motion_and_clears_path() {
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        creature.motion = [0.3, 0.0, 0.1];
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        goal.tick(&mut world, &mut creature, &config, 0, &mut events);
        assert_eq!(creature.motion, [0.0; 3]);
        assert!(creature.nav.is_idle());
    }

    #[test]
    fn sounds_fire_every_tenth_tick() {
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        for now in 0..30 {
            goal.tick(&mut world, &mut creature, &config, now, &mut events);
        }
        let hits = events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::Sound {
                        sound: SoundKind::WoodHit,
                        ..
                    }
                )
            })
            .count();
        let sweeps = events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::Sound {
                        sound: SoundKind::SweepSwing,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(hits, 3);
        assert_eq!(sweeps, 3);
    }

    #[test]
    fn break_progress_broadcasts_only_on_stage_change() {
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        // 40 ticks: stage goes 0 -> 1 (tick 16) -> 2 (tick 32).
        for now in 0..40 {
            goal.tick(&mut world, &mut creature, &config, now, &mut events);
        }
        let stages: Vec<u32> = events
            .iter()
            .filter_map(|e| match e.kind {
                SimEventKind::BreakProgress { stage, .. } => Some(stage),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![1, 2]);
    }

    #[test]
    fn completion_fells_once_and_resets() {
        // Exactly 160 ticks of valid chopping must fell the tree once.
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));
        let stump = goal.target().unwrap();
        assert_eq!(stump, CellPos::new(10, 1, 10));

        let mut events = Vec::new();
        for now in 0..160 {
            goal.tick(&mut world, &mut creature, &config, now, &mut events);
        }

        let fells = events
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::TreeFelled { .. }))
            .count();
        assert_eq!(fells, 1);
        assert_eq!(goal.chop_ticks(), 0);
        assert!(!goal.is_chopping());
        // Only tree is gone, so the post-fell re-scan finds nothing.
        assert_eq!(goal.target(), None);
        assert_eq!(creature.flee_from, Some(stump));
        // The whole trunk came down.
        for y in 1..5 {
            assert_eq!(world.get(CellPos::new(10, y, 10)), BlockKind::Air);
        }
        // Finish feedback was emitted.
        assert!(events.iter().any(|e| matches!(
            e.kind,
            SimEventKind::VisualState {
                state: CreatureVisualState::ChopFinished,
                ..
            }
        )));
        assert!(events.iter().any(|e| matches!(
            e.kind,
            SimEventKind::Sound {
                sound: SoundKind::WoodBreak,
                ..
            }
        )));
    }

    #[test]
    fn vanished_target_aborts_without_felling() {
        // The trunk stops being trunk mid-chop.
        let mut world = world_with_tree();
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));
        let stump = goal.target().unwrap();

        let mut events = Vec::new();
        for now in 0..50 {
            goal.tick(&mut world, &mut creature, &config, now, &mut events);
        }
        assert_eq!(goal.chop_ticks(), 50);

        // Something else removed the whole tree.
        for y in 1..7 {
            for x in 9..=11 {
                for z in 9..=11 {
                    world.remove(CellPos::new(x, y, z));
                }
            }
        }
        goal.tick(&mut world, &mut creature, &config, 50, &mut events);

        assert!(!events
            .iter()
            .any(|e| matches!(e.kind, SimEventKind::TreeFelled { .. })));
        assert_eq!(goal.chop_ticks(), 0);
        assert!(!goal.is_chopping());
        assert_eq!(goal.target(), None);
        assert_eq!(creature.flee_from, Some(stump));
    }

    #[test]
    fn stop_resets_counters_and_rescans() {
        let mut world = world_with_tree();
        // Second tree for the re-scan to find.
        tree_gen::grow_tree(
            &mut world,
            &TreePlan {
                base: CellPos::new(14, 1, 10),
                trunk_height: 4,
                species: TreeSpecies::Birch,
                lean: (0, 0),
            },
        );
        let config = HarvestConfig::default();
        let mut goal = HarvestGoal::new();
        let mut creature = chopper();
        assert!(goal.can_start(&world, &creature, &config));

        let mut events = Vec::new();
        for now in 0..30 {
            goal.tick(&mut world, &mut creature, &config, now, &mut events);
        }
        assert!(goal.chop_ticks() > 0);

        goal.stop(&world, &mut creature, &config);
        assert_eq!(goal.chop_ticks(), 0);
        assert!(!goal.is_chopping());
        assert!(creature.nav.is_idle());
        // Ready to resume instantly: a target is already lined up.
        assert!(goal.target().is_some());
    }
}
