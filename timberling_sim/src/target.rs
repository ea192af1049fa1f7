// Tree target selection — predicates, the cubic scan, and candidate ranking.
//
// Three layers, leaves first:
// - `is_trunk` / `is_foliage`: stateless cell classification.
// - `resolve_stump`: follow a trunk (leaning, buttressed, or branching) down
//   to its lowest connected cell — the harvesting target.
// - `select_target`: scan a cubic volume around the creature's search center,
//   confirm trunk columns topped by foliage as real trees, resolve each to
//   its stump, and rank.
//
// Ranking is a pure function of a position snapshot taken before the sort —
// the comparator cannot observe the creature moving mid-sort. Primary key is
// vertical distance from the creature (a tree at the creature's own height
// beats a nearer one up or down a slope); squared eye-to-center distance
// breaks exact ties.
//
// See also: `harvest.rs` for the goal that consumes the selected target,
// `world.rs` for `top_of_column`, `config.rs` for the window sizes.
//
// **Critical constraint: determinism.** Scan order is fixed (x, then y, then
// z), ranking uses `total_cmp`, and the sort is stable, so identical world
// state always yields the identical target.

use crate::config::HarvestConfig;
use crate::creature::Creature;
use crate::types::{dist_sq, BlockKind, CellPos};
use crate::world::VoxelWorld;
use smallvec::SmallVec;

/// True if the cell is part of a tree's woody structure.
pub fn is_trunk(world: &VoxelWorld, pos: CellPos) -> bool {
    matches!(world.get(pos), BlockKind::Trunk(_))
}

/// True if the cell is leaf material.
pub fn is_foliage(world: &VoxelWorld, pos: CellPos) -> bool {
    matches!(world.get(pos), BlockKind::Foliage(_))
}

/// Follow a trunk downward to its lowest connected cell.
///
/// From `start`, scan a ±`stump_window_horizontal` / −`stump_window_depth`..0
/// window; if any cell in it sits directly above trunk or foliage, descend to
/// that lower cell and repeat. The window lets the walk track leaning and
/// buttressed trunks instead of assuming a straight column.
///
/// Every step moves at least one cell down, and the loop is additionally
/// capped at `stump_max_descent` iterations so malformed world data cannot
/// spin it.
pub fn resolve_stump(world: &VoxelWorld, start: CellPos, config: &HarvestConfig) -> CellPos {
    let h = config.stump_window_horizontal;
    let d = config.stump_window_depth;

    let mut cur = start;
    'descend: for _ in 0..config.stump_max_descent {
        if cur.y <= 0 {
            break;
        }
        for dx in -h..=h {
            for dy in -d..=0 {
                for dz in -h..=h {
                    let below = cur.offset(dx, dy, dz).down();
                    if is_trunk(world, below) || is_foliage(world, below) {
                        cur = below;
                        continue 'descend;
                    }
                }
            }
        }
        break;
    }
    cur
}

/// Order candidates by the harvest ranking: primary |Δy| from the creature's
/// feet to the candidate's center, secondary squared distance from the eye to
/// the candidate's center. Smaller wins both keys; exact primary ties fall
/// through to the secondary.
///
/// Takes position snapshots, not the creature, so the ordering is a pure
/// function of its arguments.
pub fn rank_candidates(feet: [f32; 3], eye: [f32; 3], candidates: &mut [CellPos]) {
    candidates.sort_by(|a, b| {
        let ya = (a.y as f32 + 0.5 - feet[1]).abs();
        let yb = (b.y as f32 + 0.5 - feet[1]).abs();
        ya.total_cmp(&yb)
            .then_with(|| dist_sq(eye, a.center()).total_cmp(&dist_sq(eye, b.center())))
    });
}

/// Scan the cubic volume around the creature's search center for trees and
/// return the best stump to harvest, or `None` when no tree is in range.
///
/// A trunk cell only counts once its column top is foliage — a bare post or
/// a stripped trunk is not a tree. All confirmed columns resolve to stumps,
/// stumps are deduplicated (one tree, one candidate), and the ranked first
/// entry wins.
pub fn select_target(
    world: &VoxelWorld,
    creature: &Creature,
    config: &HarvestConfig,
) -> Option<CellPos> {
    let center = creature.search_center();
    let r = creature.search_radius;

    let mut candidates: SmallVec<[CellPos; 16]> = SmallVec::new();
    for dx in -r..=r {
        for dy in -r..=r {
            for dz in -r..=r {
                let pos = center.offset(dx, dy, dz);
                if !is_trunk(world, pos) {
                    continue;
                }
                let top = world.top_of_column(pos);
                if !is_foliage(world, top) {
                    continue;
                }
                let stump = resolve_stump(world, top, config);
                // Stump descent can bottom out on foliage (a floating leaf
                // clump); only trunk cells are valid targets.
                if is_trunk(world, stump) && !candidates.contains(&stump) {
                    candidates.push(stump);
                }
            }
        }
    }

    rank_candidates(creature.position, creature.eye_pos(), &mut candidates);
    candidates.first().copied()
}
