//! Conversation state: the slots collected so far and the derived stage of the flow.

use serde::Serialize;

/// The three slots of the recommendation flow, asked strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Area,
    Modality,
    Location,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Area => "area",
            Slot::Modality => "modality",
            Slot::Location => "location",
        }
    }
}

/// Work-mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Remote,
    Hybrid,
    Onsite,
    /// The user does not mind; every modality qualifies.
    Any,
}

impl Modality {
    /// Hybrid and on-site work need a place; remote and "any" do not.
    pub fn requires_location(&self) -> bool {
        matches!(self, Modality::Hybrid | Modality::Onsite)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Remote => "remote",
            Modality::Hybrid => "hybrid",
            Modality::Onsite => "onsite",
            Modality::Any => "any",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AreaChoice {
    /// Infer the area from the uploaded résumé.
    FromResume,
    Stated(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocationChoice {
    Any,
    Stated(String),
}

/// Where the flow currently stands. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "slot", rename_all = "snake_case")]
pub enum Stage {
    /// Job talk has not started, or nothing is pending yet.
    Idle,
    Asking(Slot),
    ReadyToRecommend,
}

/// Per-session conversation record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub resume: Option<String>,
    pub topic_engaged: bool,
    pub area: Option<AreaChoice>,
    pub modality: Option<Modality>,
    pub location: Option<LocationChoice>,
    /// The slot the next user turn should fill. Single source of truth for what to ask.
    pub pending: Option<Slot>,
}

impl ConversationState {
    /// Clears every preference. The résumé survives only when `keep_resume` is set.
    pub fn reset(&mut self, keep_resume: bool) {
        let resume = if keep_resume { self.resume.take() } else { None };
        *self = ConversationState {
            resume,
            ..ConversationState::default()
        };
    }

    /// A new résumé starts a new conversation.
    pub fn replace_resume(&mut self, resume: String) {
        self.reset(false);
        self.resume = Some(resume);
    }

    pub fn location_required(&self) -> bool {
        self.modality.is_some_and(|m| m.requires_location())
    }

    pub fn ready_to_recommend(&self) -> bool {
        self.topic_engaged
            && self.area.is_some()
            && self.modality.is_some()
            && (self.location.is_some() || !self.location_required())
            && self.pending.is_none()
    }

    pub fn stage(&self) -> Stage {
        match self.pending {
            Some(slot) => Stage::Asking(slot),
            None if self.ready_to_recommend() => Stage::ReadyToRecommend,
            None => Stage::Idle,
        }
    }

    pub fn flags(&self) -> TurnFlags {
        TurnFlags {
            topic_engaged: self.topic_engaged,
            ask_area: self.pending == Some(Slot::Area),
            ask_modality: self.pending == Some(Slot::Modality),
            ask_location: self.pending == Some(Slot::Location),
            ready_to_recommend: self.ready_to_recommend(),
        }
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            has_resume: self.resume.is_some(),
            topic_engaged: self.topic_engaged,
            area: self.area.clone(),
            modality: self.modality,
            location: self.location.clone(),
            pending_slot: self.pending,
            stage: self.stage(),
            flags: self.flags(),
        }
    }
}

/// Booleans handed to the prompt assembler. All of them are computed from
/// `ConversationState`, so they can never disagree with `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnFlags {
    pub topic_engaged: bool,
    pub ask_area: bool,
    pub ask_modality: bool,
    pub ask_location: bool,
    pub ready_to_recommend: bool,
}

/// Serializable view of a session, without the résumé body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    pub has_resume: bool,
    pub topic_engaged: bool,
    pub area: Option<AreaChoice>,
    pub modality: Option<Modality>,
    pub location: Option<LocationChoice>,
    pub pending_slot: Option<Slot>,
    pub stage: Stage,
    pub flags: TurnFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(modality: Modality) -> ConversationState {
        ConversationState {
            resume: Some("ten years of SQL".to_string()),
            topic_engaged: true,
            area: Some(AreaChoice::Stated("data".to_string())),
            modality: Some(modality),
            location: None,
            pending: None,
        }
    }

    #[test]
    fn test_default_is_empty_and_idle() {
        let state = ConversationState::default();
        assert_eq!(state.stage(), Stage::Idle);
        assert!(!state.ready_to_recommend());
        assert!(state.resume.is_none());
    }

    #[test]
    fn test_ready_without_location_for_remote_and_any() {
        assert!(filled(Modality::Remote).ready_to_recommend());
        assert!(filled(Modality::Any).ready_to_recommend());
    }

    #[test]
    fn test_not_ready_without_location_for_hybrid_and_onsite() {
        assert!(!filled(Modality::Hybrid).ready_to_recommend());
        assert!(!filled(Modality::Onsite).ready_to_recommend());

        let mut state = filled(Modality::Onsite);
        state.location = Some(LocationChoice::Stated("Valparaíso".to_string()));
        assert!(state.ready_to_recommend());
    }

    #[test]
    fn test_not_ready_while_a_slot_is_pending() {
        let mut state = filled(Modality::Remote);
        state.pending = Some(Slot::Modality);
        assert!(!state.ready_to_recommend());
        assert_eq!(state.stage(), Stage::Asking(Slot::Modality));
    }

    #[test]
    fn test_not_ready_without_topic() {
        let mut state = filled(Modality::Remote);
        state.topic_engaged = false;
        assert!(!state.ready_to_recommend());
    }

    #[test]
    fn test_flags_follow_pending() {
        let mut state = ConversationState {
            topic_engaged: true,
            pending: Some(Slot::Location),
            ..Default::default()
        };
        let flags = state.flags();
        assert!(flags.ask_location);
        assert!(!flags.ask_area && !flags.ask_modality && !flags.ready_to_recommend);

        state.pending = None;
        let flags = state.flags();
        assert!(!flags.ask_area && !flags.ask_modality && !flags.ask_location);
    }

    #[test]
    fn test_reset_keeps_resume_only_when_asked() {
        let mut state = filled(Modality::Hybrid);
        state.pending = Some(Slot::Location);

        state.reset(true);
        assert_eq!(state.resume.as_deref(), Some("ten years of SQL"));
        assert!(!state.topic_engaged);
        assert!(state.area.is_none() && state.modality.is_none());
        assert!(state.location.is_none() && state.pending.is_none());

        state.reset(false);
        assert_eq!(state, ConversationState::default());
    }

    #[test]
    fn test_replace_resume_clears_preferences() {
        let mut state = filled(Modality::Remote);
        state.replace_resume("brand new résumé text".to_string());
        assert_eq!(state.resume.as_deref(), Some("brand new résumé text"));
        assert!(!state.topic_engaged);
        assert!(state.area.is_none() && state.modality.is_none() && state.pending.is_none());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut state = filled(Modality::Hybrid);
        state.pending = Some(Slot::Location);
        let value = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(value["hasResume"], true);
        assert_eq!(value["pendingSlot"], "location");
        assert_eq!(value["modality"], "hybrid");
        assert_eq!(value["area"]["kind"], "stated");
        assert_eq!(value["stage"]["stage"], "asking");
        assert_eq!(value["stage"]["slot"], "location");
    }
}
