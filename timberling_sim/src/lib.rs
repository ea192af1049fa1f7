// timberling_sim — pure Rust simulation library.
//
// Autonomous tree-harvesting creatures in a voxel world: a creature ordered
// to harvest scans for a nearby tree, walks to its stump, chops it over time
// with sound and break-progress feedback, fells the whole connected trunk in
// one pass, and flees the collapse point before scanning for the next tree.
// The crate is headless and deterministic; it can be tested and run without
// any rendering or audio host.
//
// Module overview:
// - `sim.rs`:      Top-level SimState, tick loop, goal scheduling, save/load.
// - `world.rs`:    Dense 3D voxel grid + DDA raycast with hit faces.
// - `types.rs`:    CellPos, BlockKind, Face, ItemKind, creature IDs.
// - `config.rs`:   GameConfig / HarvestConfig — all tunable parameters.
// - `event.rs`:    SimEvent feedback output (sounds, break progress, drops).
// - `creature.rs`: Creature entity — flags, upgrades, held item, movement.
// - `nav.rs`:      Minimal navigator (path requests, standability).
// - `target.rs`:   Trunk/foliage predicates, tree scan, stump resolution, ranking.
// - `harvest.rs`:  The per-tick chop state machine (HarvestGoal).
// - `feller.rs`:   Bounded-window flood fill that drops a whole trunk.
// - `tree_gen.rs`: Deterministic fixture tree growth.
//
// **Critical constraint: determinism.** The simulation is a pure function of
// prior state: creatures live in `BTreeMap`s and are processed in key order,
// the only hash set in the crate is membership-only, and there is no
// randomness, system time, or OS entropy anywhere.

pub mod config;
pub mod creature;
pub mod event;
pub mod feller;
pub mod harvest;
pub mod nav;
pub mod sim;
pub mod target;
pub mod tree_gen;
pub mod types;
pub mod world;
