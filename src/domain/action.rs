use serde::{Deserialize, Serialize};

/// What a combatant chose to do this round.
///
/// Only `Attack` carries resolution rules; `Defend` and `Special` are valid,
/// queueable placeholders that resolve to nothing for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Attack,
    Defend,
    Special,
}

/// One submitted (or auto-filled) action, alive for a single round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatAction {
    pub participant_id: String,
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CombatAction {
    /// Shorthand for the only action kind with resolution semantics.
    pub fn attack(participant_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            action_type: ActionType::Attack,
            target_id: Some(target_id.into()),
            description: None,
        }
    }
}
