//! Slot-filling state machine.
//!
//! One call to `apply_turn` per user message. The slot that was pending when the
//! message arrived is the only slot the message may fill, so a turn advances the
//! flow by at most one step.

use crate::conversation::intent::Intent;
use crate::conversation::state::{ConversationState, Slot, TurnFlags};

/// Result of applying one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Slot pending when the turn started.
    pub pending_at_start: Option<Slot>,
    /// Slot filled by this turn, if any.
    pub filled: Option<Slot>,
    pub flags: TurnFlags,
}

pub fn apply_turn(state: &mut ConversationState, intent: &Intent) -> TurnOutcome {
    let pending_at_start = state.pending;

    if intent.topic {
        state.topic_engaged = true;
        if state.pending.is_none() && state.area.is_none() {
            state.pending = Some(Slot::Area);
        }
    }

    let filled = match pending_at_start {
        Some(Slot::Area) => fill_area(state, intent),
        Some(Slot::Modality) => fill_modality(state, intent),
        Some(Slot::Location) => fill_location(state, intent),
        None => None,
    };

    // Re-enter the flow if job talk started but the area is still unknown.
    if state.topic_engaged && state.area.is_none() && state.pending.is_none() {
        state.pending = Some(Slot::Area);
    }

    TurnOutcome {
        pending_at_start,
        filled,
        flags: state.flags(),
    }
}

fn fill_area(state: &mut ConversationState, intent: &Intent) -> Option<Slot> {
    let area = intent.area_candidate.clone()?;
    state.area = Some(area);
    state.pending = Some(Slot::Modality);
    Some(Slot::Area)
}

fn fill_modality(state: &mut ConversationState, intent: &Intent) -> Option<Slot> {
    let modality = intent.modality?;
    state.modality = Some(modality);
    state.pending = if modality.requires_location() {
        Some(Slot::Location)
    } else {
        None
    };
    Some(Slot::Modality)
}

fn fill_location(state: &mut ConversationState, intent: &Intent) -> Option<Slot> {
    let location = intent.location_candidate.clone()?;
    state.location = Some(location);
    state.pending = None;
    Some(Slot::Location)
}
