// Felling — removes a whole connected trunk in one batch.
//
// A moving-window flood fill: a cursor starts at the stump and climbs the
// trunk. At each level it sweeps a ±8 horizontal / 0..+2 vertical window for
// more trunk cells (side branches, forks), enqueueing each once. When the
// column above the cursor ends but a windowed cell continues upward, the
// cursor re-points to that cell — this is how leaning and offset trunks are
// followed to the top. Once the cursor runs out of trunk, the pending queue
// drains: every collected cell is removed with a drop.
//
// There is deliberately no global visited set; the membership check on the
// pending queue is the only guard against revisits. The batch is capped at
// `max_felled_cells` and the climb is bounded by world height, so a
// pathological trunk slab still terminates.
//
// See also: `harvest.rs` which invokes this on chop completion, `target.rs`
// for the is_trunk predicate, `event.rs` for `BlockBroken`.
//
// **Critical constraint: determinism.** Removal order is queue insertion
// order. The hash set is membership-only and never iterated, so hashing
// cannot influence sim state.

use crate::config::HarvestConfig;
use crate::event::{SimEvent, SimEventKind};
use crate::target::is_trunk;
use crate::types::{BlockKind, CellPos, ItemKind};
use crate::world::VoxelWorld;
use rustc_hash::FxHashSet;

/// Fell the connected trunk rooted at `start`: collect every trunk cell
/// reachable through the climbing window, then remove them all, emitting a
/// `BlockBroken` event (with a log drop) per cell. Returns the number of
/// cells removed.
///
/// A `start` that is not trunk is a no-op returning 0.
pub fn fell_tree(
    world: &mut VoxelWorld,
    start: CellPos,
    config: &HarvestConfig,
    tick: u64,
    events: &mut Vec<SimEvent>,
) -> usize {
    let r = config.fell_window_radius;
    let h = config.fell_window_height;
    let cap = config.max_felled_cells;

    let mut pending: Vec<CellPos> = Vec::new();
    let mut members: FxHashSet<CellPos> = FxHashSet::default();

    let mut cursor = start;
    while is_trunk(world, cursor) && pending.len() < cap && cursor.y <= world.height() {
        if members.insert(cursor) {
            pending.push(cursor);
        }

        // Sweep the window around the current cursor level. The window is
        // anchored where the cursor was at sweep start; re-pointing below
        // does not re-anchor the sweep.
        let anchor = cursor;
        'sweep: for dx in -r..=r {
            for dy in 0..=h {
                for dz in -r..=r {
                    let pos = anchor.offset(dx, dy, dz);
                    if !is_trunk(world, pos) || members.contains(&pos) {
                        continue;
                    }
                    // The trunk continues upward through `pos` while the
                    // column above the cursor does not: follow the trunk's
                    // actual vertical continuation.
                    if is_trunk(world, pos.up()) && !is_trunk(world, cursor.up()) {
                        cursor = pos;
                    }
                    members.insert(pos);
                    pending.push(pos);
                    if pending.len() >= cap {
                        break 'sweep;
                    }
                }
            }
        }

        cursor = cursor.up();
    }

    let removed = pending.len();
    for cell in pending {
        let kind = world.remove(cell);
        let drop = match kind {
            BlockKind::Trunk(species) => Some(ItemKind::Log(species)),
            _ => None,
        };
        events.push(SimEvent {
            tick,
            kind: SimEventKind::BlockBroken { cell, kind, drop },
        });
    }
    removed
}
