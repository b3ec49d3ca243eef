// Domain layer: core combat types and resolution rules.

pub mod action;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use action::{ActionType, CombatAction};
pub use state::{CombatResult, RoundSnapshot};
pub use tuning::DamageTuning;
pub use world::{CombatantRoster, EntityHandle, EntityMap};
