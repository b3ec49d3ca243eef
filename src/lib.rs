pub mod domain;
pub mod frameworks;
pub mod use_cases;

pub use domain::{
    ActionType, CombatAction, CombatResult, CombatantRoster, DamageTuning, EntityHandle,
    EntityMap, RoundSnapshot,
};
pub use frameworks::config::{ConfigError, RoundConfig};
pub use use_cases::{RoundScheduler, SchedulerHooks};
