//! Prompt assembler: renders a session's state, résumé and the listings into the
//! system prompt sent with every chat turn. Pure templating, no I/O.

use crate::conversation::prompts::{
    AREA_FROM_RESUME, LISTINGS_UNAVAILABLE, LISTINGS_WITHHELD, NO_RESUME, SYSTEM_PROMPT_TEMPLATE,
    UNSET,
};
use crate::conversation::state::{AreaChoice, ConversationState, LocationChoice, TurnFlags};
use crate::listings::ListingStore;
use crate::llm_client::prompts::{render_template, GROUNDING_INSTRUCTION, RESPONSE_STYLE};

pub fn build_system_prompt(
    state: &ConversationState,
    flags: &TurnFlags,
    listings: &ListingStore,
) -> String {
    let area = match &state.area {
        Some(AreaChoice::FromResume) => AREA_FROM_RESUME,
        Some(AreaChoice::Stated(text)) => text.as_str(),
        None => UNSET,
    };
    let location = match &state.location {
        Some(LocationChoice::Any) => "any",
        Some(LocationChoice::Stated(text)) => text.as_str(),
        None => UNSET,
    };
    let listings_text = if !flags.topic_engaged {
        LISTINGS_WITHHELD
    } else if listings.is_empty() {
        LISTINGS_UNAVAILABLE
    } else {
        listings.as_str()
    };

    render_template(
        SYSTEM_PROMPT_TEMPLATE,
        &[
            ("topic_engaged", yes_no(flags.topic_engaged)),
            ("area", area),
            ("modality", state.modality.map_or(UNSET, |m| m.as_str())),
            ("location", location),
            ("pending_slot", state.pending.map_or("none", |s| s.as_str())),
            ("ask_area", yes_no(flags.ask_area)),
            ("ask_modality", yes_no(flags.ask_modality)),
            ("ask_location", yes_no(flags.ask_location)),
            ("ready_to_recommend", yes_no(flags.ready_to_recommend)),
            ("resume", state.resume.as_deref().unwrap_or(NO_RESUME)),
            ("listings", listings_text),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("response_style", RESPONSE_STYLE),
        ],
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
