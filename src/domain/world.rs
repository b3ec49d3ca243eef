// Seam to externally-owned world state. The scheduler never owns entity or
// combatant lifecycle; it reads through these types and writes health back
// through the handle's mutation entry point.

use std::collections::HashMap;
use std::sync::Arc;

/// Live entity surface supplied by the world layer.
pub trait EntityHandle: Send + Sync {
    fn current_health(&self) -> i32;
    fn set_health(&self, health: i32);
}

/// Entity lookup result, keyed by stable entity id.
pub type EntityMap = HashMap<String, Arc<dyn EntityHandle>>;

/// Active combatant ids for the current encounter, split by side.
#[derive(Debug, Clone, Default)]
pub struct CombatantRoster {
    pub players: Vec<String>,
    pub npcs: Vec<String>,
}
