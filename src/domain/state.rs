// Round-level outputs and read-only state snapshots.

use std::time::Duration;

use serde::Serialize;

use crate::domain::CombatAction;

/// Outcome of one resolved attack.
#[derive(Debug, Clone, Serialize)]
pub struct CombatResult {
    pub attacker: String,
    pub target: String,
    pub damage: i32,
    pub target_health_remaining: i32,
    pub defeated: bool,
}

/// Defensive copy of the scheduler's round state.
///
/// `queued_actions` lists manual submissions first, then auto-filled actions,
/// which is also the order they resolve in.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub is_active: bool,
    pub window_open: bool,
    pub round_number: u32,
    /// Time since the current round's window opened, if a round has begun.
    pub window_elapsed: Option<Duration>,
    pub queued_actions: Vec<CombatAction>,
}
