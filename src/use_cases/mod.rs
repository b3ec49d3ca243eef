// Use cases layer: the round/window workflow over the domain rules.

pub mod round;

pub use round::{RoundScheduler, SchedulerHooks};
