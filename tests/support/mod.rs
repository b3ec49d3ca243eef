// Shared fixtures for round scheduler integration tests.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use round_scheduler::{CombatResult, CombatantRoster, EntityHandle, EntityMap, SchedulerHooks};

/// Opt-in log output for debugging test runs, e.g.
/// `RUST_LOG=round_scheduler=debug cargo test -- --nocapture`.
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .compact()
            .try_init();
    });
}

/// Entity with interior-mutable health, standing in for world-owned state.
pub struct TestEntity {
    pub id: String,
    health: AtomicI32,
}

impl TestEntity {
    pub fn new(id: &str, health: i32) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            health: AtomicI32::new(health),
        })
    }

    pub fn health(&self) -> i32 {
        self.health.load(Ordering::SeqCst)
    }
}

impl EntityHandle for TestEntity {
    fn current_health(&self) -> i32 {
        self.health.load(Ordering::SeqCst)
    }

    fn set_health(&self, health: i32) {
        self.health.store(health, Ordering::SeqCst)
    }
}

pub fn entity_map(entities: &[Arc<TestEntity>]) -> EntityMap {
    entities
        .iter()
        .map(|e| (e.id.clone(), e.clone() as Arc<dyn EntityHandle>))
        .collect()
}

/// Records every hook invocation for later assertions.
#[derive(Default)]
pub struct Recorder {
    pub result_batches: Mutex<Vec<Vec<CombatResult>>>,
    pub end_signals: Mutex<Vec<Vec<CombatResult>>>,
    pub auto_actions: Mutex<Vec<(String, String, bool)>>,
}

/// Wires every hook to the recorder, with a fixed entity map and roster.
pub fn recording_hooks(
    recorder: &Arc<Recorder>,
    entities: Vec<Arc<TestEntity>>,
    players: &[&str],
    npcs: &[&str],
) -> SchedulerHooks {
    let results_rec = recorder.clone();
    let end_rec = recorder.clone();
    let auto_rec = recorder.clone();
    let players: Vec<String> = players.iter().map(|s| s.to_string()).collect();
    let npcs: Vec<String> = npcs.iter().map(|s| s.to_string()).collect();

    SchedulerHooks {
        on_combat_results: Some(Box::new(move |results| {
            results_rec
                .result_batches
                .lock()
                .unwrap()
                .push(results.to_vec());
        })),
        on_combat_end: Some(Box::new(move |results| {
            end_rec.end_signals.lock().unwrap().push(results.to_vec());
        })),
        on_auto_action: Some(Box::new(move |actor, target, is_player| {
            auto_rec.auto_actions.lock().unwrap().push((
                actor.to_string(),
                target.to_string(),
                is_player,
            ));
        })),
        entities: Some(Box::new(move || entity_map(&entities))),
        combatants: Some(Box::new(move || CombatantRoster {
            players: players.clone(),
            npcs: npcs.clone(),
        })),
    }
}
