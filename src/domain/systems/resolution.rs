use rand::Rng;
use tracing::info;

use crate::domain::{ActionType, CombatAction, CombatResult, DamageTuning, EntityMap};

/// Resolves queued actions in order against current entity state.
///
/// Only attack actions produce results. An action whose attacker or target no
/// longer resolves to a live entity is skipped; a stale reference mid-round is
/// expected, not an error. Health is clamped at zero and written back through
/// the target's handle.
pub fn resolve_actions(
    actions: &[CombatAction],
    entities: &EntityMap,
    tuning: DamageTuning,
    rng: &mut impl Rng,
) -> Vec<CombatResult> {
    let mut results = Vec::new();

    for action in actions {
        if action.action_type != ActionType::Attack {
            // Defend/special carry no resolution rules yet.
            continue;
        }
        let Some(target_id) = action.target_id.as_deref() else {
            continue;
        };
        if !entities.contains_key(action.participant_id.as_str()) {
            continue;
        }
        let Some(target) = entities.get(target_id) else {
            continue;
        };

        let damage = rng.random_range(tuning.min_damage..=tuning.max_damage);
        let new_health = (target.current_health() - damage).max(0);
        target.set_health(new_health);
        let defeated = new_health <= 0;

        info!(
            attacker = %action.participant_id,
            target = %target_id,
            damage,
            target_health = new_health,
            defeated,
            "attack resolved"
        );

        results.push(CombatResult {
            attacker: action.participant_id.clone(),
            target: target_id.to_string(),
            damage,
            target_health_remaining: new_health,
            defeated,
        });
    }

    results
}
