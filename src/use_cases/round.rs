// Round/window scheduling for real-time combat.
//
// One round is: window opens (submissions accepted) -> window-close timer
// fires (auto-fill + resolution) -> round-advance timer fires (next round).
// Both timers are armed together when the round begins and both handles are
// retained so stop() can cancel a round mid-flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use rand::seq::IndexedRandom;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::systems::resolution::resolve_actions;
use crate::domain::{
    ActionType, CombatAction, CombatResult, CombatantRoster, DamageTuning, EntityMap,
    RoundSnapshot,
};
use crate::frameworks::config::RoundConfig;

pub type ResultsHook = Box<dyn Fn(&[CombatResult]) + Send + Sync>;
pub type AutoActionHook = Box<dyn Fn(&str, &str, bool) + Send + Sync>;
pub type EntityLookup = Box<dyn Fn() -> EntityMap + Send + Sync>;
pub type RosterLookup = Box<dyn Fn() -> CombatantRoster + Send + Sync>;

/// Collaborator wiring supplied at construction.
///
/// Every hook is optional. A missing `entities` lookup degrades resolution to
/// a no-op round; a missing `combatants` lookup disables auto-fill. The
/// scheduler never reaches into ambient world state outside these hooks.
#[derive(Default)]
pub struct SchedulerHooks {
    /// Invoked once per round with all results, when there are any.
    pub on_combat_results: Option<ResultsHook>,
    /// Invoked when any result defeated its target. Signal only; the owner
    /// decides whether and when to call `stop()`.
    pub on_combat_end: Option<ResultsHook>,
    /// Invoked for each auto-filled action as `(actor, target, is_player)`.
    pub on_auto_action: Option<AutoActionHook>,
    /// Resolves entity ids to live handles at resolution time.
    pub entities: Option<EntityLookup>,
    /// Lists the active combatant roster at window close.
    pub combatants: Option<RosterLookup>,
}

struct RoundState {
    is_active: bool,
    window_open: bool,
    round_number: u32,
    window_opened_at: Option<Instant>,
    // Two-phase queue: manual submissions always resolve before auto-filled
    // actions of the same round.
    manual_actions: Vec<CombatAction>,
    auto_actions: Vec<CombatAction>,
}

impl RoundState {
    fn has_action_for(&self, participant_id: &str) -> bool {
        self.manual_actions
            .iter()
            .chain(self.auto_actions.iter())
            .any(|a| a.participant_id == participant_id)
    }
}

#[derive(Default)]
struct Timers {
    window_close: Option<JoinHandle<()>>,
    round_advance: Option<JoinHandle<()>>,
}

struct Inner {
    config: RoundConfig,
    tuning: DamageTuning,
    hooks: SchedulerHooks,
    state: Mutex<RoundState>,
    timers: Mutex<Timers>,
}

/// Turns asynchronous action submissions into a fixed-cadence sequence of
/// resolved combat rounds. Must live inside a tokio runtime; the two per-round
/// timers are spawned tasks.
pub struct RoundScheduler {
    inner: Arc<Inner>,
}

// A panicking hook must not wedge the scheduler, so poisoned locks are
// recovered rather than propagated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RoundScheduler {
    pub fn new(config: RoundConfig, hooks: SchedulerHooks) -> Self {
        Self::with_tuning(config, hooks, DamageTuning::default())
    }

    pub fn with_tuning(config: RoundConfig, hooks: SchedulerHooks, tuning: DamageTuning) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                tuning,
                hooks,
                state: Mutex::new(RoundState {
                    is_active: false,
                    window_open: false,
                    round_number: 0,
                    window_opened_at: None,
                    manual_actions: Vec::new(),
                    auto_actions: Vec::new(),
                }),
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    /// Activates the scheduler and opens round 1's submission window.
    /// Warns and does nothing if already running.
    pub fn start(&self) {
        {
            let mut state = lock(&self.inner.state);
            if state.is_active {
                warn!("round scheduler already running");
                return;
            }
            state.is_active = true;
            state.round_number = 0;
        }
        info!(
            window_ms = self.inner.config.window_duration().as_millis() as u64,
            round_ms = self.inner.config.round_duration().as_millis() as u64,
            "combat started"
        );
        begin_round(self.inner.clone());
    }

    /// Deactivates the scheduler, clears the queue and cancels both pending
    /// timers so no stale round fires after shutdown. Safe to call twice.
    pub fn stop(&self) {
        {
            let mut state = lock(&self.inner.state);
            if !state.is_active {
                warn!("round scheduler already stopped");
                return;
            }
            state.is_active = false;
            state.window_open = false;
            state.window_opened_at = None;
            state.manual_actions.clear();
            state.auto_actions.clear();
        }
        cancel_timers(&self.inner);
        info!("combat stopped");
    }

    /// Queues an action for the current round. Accepted only while the
    /// submission window is open; a later submission from the same
    /// participant replaces the earlier one. Rejection is a silent `false`,
    /// with nothing mutated; submission timing is advisory for callers.
    pub fn queue_action(&self, action: CombatAction) -> bool {
        let mut state = lock(&self.inner.state);
        if !state.is_active || !state.window_open {
            debug!(participant = %action.participant_id, "action rejected, window closed");
            return false;
        }
        state
            .manual_actions
            .retain(|a| a.participant_id != action.participant_id);
        debug!(
            participant = %action.participant_id,
            action = ?action.action_type,
            "action queued"
        );
        state.manual_actions.push(action);
        true
    }

    /// Returns a defensive copy of the current round state.
    pub fn current_state(&self) -> RoundSnapshot {
        let state = lock(&self.inner.state);
        let mut queued = state.manual_actions.clone();
        queued.extend(state.auto_actions.iter().cloned());
        RoundSnapshot {
            is_active: state.is_active,
            window_open: state.window_open,
            round_number: state.round_number,
            window_elapsed: state.window_opened_at.map(|opened| opened.elapsed()),
            queued_actions: queued,
        }
    }

    pub fn is_window_open(&self) -> bool {
        lock(&self.inner.state).window_open
    }

    /// Time left before the current window closes, zero once it has.
    pub fn window_time_remaining(&self) -> Duration {
        let state = lock(&self.inner.state);
        match state.window_opened_at {
            Some(opened) if state.window_open => self
                .inner
                .config
                .window_duration()
                .saturating_sub(opened.elapsed()),
            _ => Duration::ZERO,
        }
    }
}

impl Drop for RoundScheduler {
    fn drop(&mut self) {
        // The timer tasks hold their own Arc<Inner>; without this they would
        // keep cycling rounds after the scheduler is gone.
        cancel_timers(&self.inner);
    }
}

fn cancel_timers(inner: &Inner) {
    let mut timers = lock(&inner.timers);
    if let Some(handle) = timers.window_close.take() {
        handle.abort();
    }
    if let Some(handle) = timers.round_advance.take() {
        handle.abort();
    }
}

/// Opens the next round's window and arms both one-shot timers relative to
/// this instant. Timer bodies re-check `is_active` under the state lock, so a
/// handle that slips past `stop()`'s abort can never mutate state.
fn begin_round(inner: Arc<Inner>) {
    // With window == round pacing the previous round's close timer shares
    // this deadline and may not have fired yet. Flush that window here so the
    // round still resolves, then drop the stale task so it cannot close the
    // window we are about to open.
    close_window(&inner);
    let stale_close = lock(&inner.timers).window_close.take();
    if let Some(handle) = stale_close {
        handle.abort();
    }

    let round_number = {
        let mut state = lock(&inner.state);
        if !state.is_active {
            return;
        }
        state.round_number += 1;
        state.window_open = true;
        state.window_opened_at = Some(Instant::now());
        state.manual_actions.clear();
        state.auto_actions.clear();
        state.round_number
    };
    debug!(round = round_number, "round window open");

    let window = inner.config.window_duration();
    let round = inner.config.round_duration();

    let mut timers = lock(&inner.timers);
    let window_inner = inner.clone();
    timers.window_close = Some(tokio::spawn(async move {
        tokio::time::sleep(window).await;
        close_window(&window_inner);
    }));
    let advance_inner = inner.clone();
    timers.round_advance = Some(tokio::spawn(async move {
        tokio::time::sleep(round).await;
        begin_round(advance_inner);
    }));
}

/// The once-per-round pipeline: close the window, auto-fill missing actions,
/// resolve the queue in order, emit results. Result hooks run outside the
/// state lock so they may re-enter the scheduler (including calling `stop()`).
fn close_window(inner: &Inner) {
    {
        let mut state = lock(&inner.state);
        if !state.is_active || !state.window_open {
            return;
        }
        state.window_open = false;
    }

    let roster = inner
        .hooks
        .combatants
        .as_ref()
        .map(|list| list())
        .unwrap_or_default();

    let (round_number, actions, auto_notices) = {
        let mut state = lock(&inner.state);
        if !state.is_active {
            return;
        }
        let auto_notices = auto_fill(&roster, &mut state);
        let mut actions = std::mem::take(&mut state.manual_actions);
        actions.append(&mut state.auto_actions);
        (state.round_number, actions, auto_notices)
    };

    for (actor, target, is_player) in &auto_notices {
        if let Some(hook) = &inner.hooks.on_auto_action {
            hook(actor, target, *is_player);
        }
    }

    let Some(entities_fn) = &inner.hooks.entities else {
        info!(
            round = round_number,
            queued = actions.len(),
            "no entity lookup wired, skipping resolution"
        );
        return;
    };
    let entities = entities_fn();

    let mut rng = rand::rng();
    let results = resolve_actions(&actions, &entities, inner.tuning, &mut rng);
    debug!(
        round = round_number,
        actions = actions.len(),
        results = results.len(),
        "round resolved"
    );

    // Entity health is already written back at this point; if the scheduler
    // was stopped while we resolved, suppress the now-stale notifications.
    if !lock(&inner.state).is_active {
        return;
    }

    if !results.is_empty() {
        if let Some(hook) = &inner.hooks.on_combat_results {
            hook(&results);
        }
    }
    if results.iter().any(|r| r.defeated) {
        if let Some(hook) = &inner.hooks.on_combat_end {
            hook(&results);
        }
    }
}

/// Synthesizes attack actions for combatants that did not act this round, so
/// every living combatant acts exactly once. Idle players swing at a random
/// NPC, but only when an NPC is on the field; with none present they simply
/// sit the round out. NPCs always act when at least one player exists.
/// Returns `(actor, target, is_player)` notices for the auto-action hook.
fn auto_fill(roster: &CombatantRoster, state: &mut RoundState) -> Vec<(String, String, bool)> {
    let mut rng = rand::rng();
    let mut notices = Vec::new();

    if !roster.npcs.is_empty() {
        for player in &roster.players {
            if state.has_action_for(player) {
                continue;
            }
            let Some(target) = roster.npcs.choose(&mut rng) else {
                continue;
            };
            push_auto_attack(state, player, target);
            debug!(actor = %player, target = %target, "auto action for idle player");
            notices.push((player.clone(), target.clone(), true));
        }
    }

    if !roster.players.is_empty() {
        for npc in &roster.npcs {
            if state.has_action_for(npc) {
                continue;
            }
            let Some(target) = roster.players.choose(&mut rng) else {
                continue;
            };
            push_auto_attack(state, npc, target);
            debug!(actor = %npc, target = %target, "auto action for npc");
            notices.push((npc.clone(), target.clone(), false));
        }
    }

    notices
}

fn push_auto_attack(state: &mut RoundState, actor: &str, target: &str) {
    state.auto_actions.push(CombatAction {
        participant_id: actor.to_string(),
        action_type: ActionType::Attack,
        target_id: Some(target.to_string()),
        description: None,
    });
}
