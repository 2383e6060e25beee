/// Combat tuning shared by every skill handler and the prop dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Knockback counter value at which a creature counts as knocked down.
    pub knockdown_threshold: i32,
    /// Amount a single bolt hit adds to the target's knockback counter.
    pub knockback_increment: i32,
    /// Maximum distance for hitting (and, advisory only, touching) a prop.
    pub prop_interaction_range: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of descriptors a single pack may carry.
    pub const MAX_PACK_ACTIONS: usize = 8;
    /// Number of distinct training conditions tracked per skill.
    pub const MAX_TRAINING_CONDITIONS: usize = 9;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_KNOCKDOWN_THRESHOLD: i32 = 100;
    pub const DEFAULT_KNOCKBACK_INCREMENT: i32 = 45;
    pub const DEFAULT_PROP_INTERACTION_RANGE: u32 = 1500;

    pub fn new() -> Self {
        Self {
            knockdown_threshold: Self::DEFAULT_KNOCKDOWN_THRESHOLD,
            knockback_increment: Self::DEFAULT_KNOCKBACK_INCREMENT,
            prop_interaction_range: Self::DEFAULT_PROP_INTERACTION_RANGE,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
