// Gameplay tuning (not runtime/server configuration).

/// Damage roll bounds for attack resolution, inclusive on both ends.
#[derive(Debug, Clone, Copy)]
pub struct DamageTuning {
    pub min_damage: i32,
    pub max_damage: i32,
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self {
            min_damage: 1,
            max_damage: 10,
        }
    }
}
