// Feedback events emitted by the simulation.
//
// The sim is headless: it never plays audio or draws particles itself.
// Instead every piece of audible/visible feedback — chop sounds, break
// progress overlays, the chopping animation state, blocks shattering into
// drops — is emitted as a `SimEvent` from `SimState::step()`. A host
// (renderer, audio layer, test harness) consumes the event list.
//
// See also: `harvest.rs` for the chop feedback cadence, `feller.rs` for
// block-broken events, `sim.rs` which collects events into `StepResult`.
//
// **Critical constraint: determinism.** Event order within a step follows
// creature registry order and emission order inside each tick.

use crate::types::{BlockKind, CellPos, CreatureId, ItemKind};
use serde::{Deserialize, Serialize};

/// A feedback event emitted by the simulation for the host to render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub tick: u64,
    pub kind: SimEventKind,
}

/// Sound effects the behavior can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    /// Axe biting into wood.
    WoodHit,
    /// The swing itself.
    SweepSwing,
    /// A trunk section giving way.
    WoodBreak,
}

/// Whole-creature visual states broadcast to watchers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureVisualState {
    /// Play the chopping animation.
    Chopping,
    /// Chop finished — play the completion flourish.
    ChopFinished,
}

/// Types of feedback events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventKind {
    /// Play a sound at the creature's position.
    Sound {
        creature: CreatureId,
        sound: SoundKind,
        volume: f32,
        pitch: f32,
    },
    /// Broadcast a creature animation state change.
    VisualState {
        creature: CreatureId,
        state: CreatureVisualState,
    },
    /// Break-progress overlay update for one cell, keyed by the creature
    /// doing the breaking. `stage` counts 0..break_stages.
    BreakProgress {
        creature: CreatureId,
        cell: CellPos,
        stage: u32,
    },
    /// A block was removed from the world. `drop` is the item it shattered
    /// into, if drops were enabled for the removal.
    BlockBroken {
        cell: CellPos,
        kind: BlockKind,
        drop: Option<ItemKind>,
    },
    /// A whole connected trunk was felled.
    TreeFelled {
        creature: CreatureId,
        stump: CellPos,
        cells_removed: usize,
    },
}
