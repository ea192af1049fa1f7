// Tree growth — places tree geometry into the voxel world.
//
// Deliberately simple: a `TreePlan` grows a trunk column (optionally leaning
// once at its midpoint), topped by a small foliage crown. This is fixture
// geometry for the harvest behavior, not procedural forestry — the only
// requirements are that every trunk column is topped by foliage (so the
// target selector confirms it as a tree) and that leaning trunks stay within
// the stump-resolution window.
//
// See also: `config.rs` for `TreePlan`, `sim.rs` which grows configured
// trees at construction, `target.rs` / `feller.rs` whose tests lean on this.
//
// **Critical constraint: determinism.** Growth is a pure function of the
// plan; no randomness.

use crate::config::TreePlan;
use crate::types::{BlockKind, CellPos};
use crate::world::VoxelWorld;

/// Fill one horizontal layer with forest floor.
pub fn lay_forest_floor(world: &mut VoxelWorld, y: i32) {
    for x in 0..world.size_x as i32 {
        for z in 0..world.size_z as i32 {
            world.set(CellPos::new(x, y, z), BlockKind::ForestFloor);
        }
    }
}

/// Grow a tree from its plan: trunk column with an optional midpoint lean,
/// then a 3x3 foliage crown with a single cap cell above the trunk top.
pub fn grow_tree(world: &mut VoxelWorld, plan: &TreePlan) {
    let trunk = BlockKind::Trunk(plan.species);
    let foliage = BlockKind::Foliage(plan.species);
    let (lean_x, lean_z) = plan.lean;

    let mut top = plan.base;
    for i in 0..plan.trunk_height {
        let (dx, dz) = if i >= plan.trunk_height / 2 {
            (lean_x, lean_z)
        } else {
            (0, 0)
        };
        top = CellPos::new(plan.base.x + dx, plan.base.y + i, plan.base.z + dz);
        world.set(top, trunk);
    }

    // Crown: 3x3 layer above the trunk top, capped by one more cell. Every
    // trunk column ends in foliage, which is what confirms it as a tree.
    let crown_y = top.y + 1;
    for dx in -1..=1 {
        for dz in -1..=1 {
            world.set(CellPos::new(top.x + dx, crown_y, top.z + dz), foliage);
        }
    }
    world.set(CellPos::new(top.x, crown_y + 1, top.z), foliage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TreeSpecies;

    fn plan(base: CellPos, height: i32, lean: (i32, i32)) -> TreePlan {
        TreePlan {
            base,
            trunk_height: height,
            species: TreeSpecies::Oak,
            lean,
        }
    }

    #[test]
    fn straight_tree_has_trunk_topped_by_foliage() {
        let mut world = VoxelWorld::new(16, 16, 16);
        grow_tree(&mut world, &plan(CellPos::new(8, 1, 8), 4, (0, 0)));

        for y in 1..5 {
            assert_eq!(
                world.get(CellPos::new(8, y, 8)),
                BlockKind::Trunk(TreeSpecies::Oak)
            );
        }
        assert_eq!(
            world.get(CellPos::new(8, 5, 8)),
            BlockKind::Foliage(TreeSpecies::Oak)
        );
        // Column top resolves to foliage, not trunk.
        let top = world.top_of_column(CellPos::new(8, 1, 8));
        assert!(matches!(world.get(top), BlockKind::Foliage(_)));
    }

    #[test]
    fn leaning_tree_shifts_upper_half() {
        let mut world = VoxelWorld::new(16, 16, 16);
        grow_tree(&mut world, &plan(CellPos::new(8, 1, 8), 6, (1, 0)));

        // Lower half at the base column.
        assert_eq!(
            world.get(CellPos::new(8, 1, 8)),
            BlockKind::Trunk(TreeSpecies::Oak)
        );
        // Upper half displaced east.
        assert_eq!(
            world.get(CellPos::new(9, 5, 8)),
            BlockKind::Trunk(TreeSpecies::Oak)
        );
        assert_eq!(world.get(CellPos::new(8, 5, 8)), BlockKind::Air);
    }

    #[test]
    fn forest_floor_fills_layer() {
        let mut world = VoxelWorld::new(8, 8, 8);
        lay_forest_floor(&mut world, 0);
        assert_eq!(world.get(CellPos::new(0, 0, 0)), BlockKind::ForestFloor);
        assert_eq!(world.get(CellPos::new(7, 0, 7)), BlockKind::ForestFloor);
        assert_eq!(world.get(CellPos::new(3, 1, 3)), BlockKind::Air);
    }
}
