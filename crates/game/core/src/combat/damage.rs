//! Damage rolls.

use crate::env::RngOracle;

/// Rolls magic damage.
///
/// # Formula
///
/// ```text
/// roll   = uniform(min, max) + implement_bonus
/// damage = roll * (1 + magic_attack / 100)
/// ```
///
/// `magic_attack` below zero is treated as zero.
pub fn magic_damage(
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
    min: f32,
    max: f32,
    implement_bonus: f32,
    magic_attack: f32,
) -> f32 {
    let roll = rng.range_f32(seed, min, max) + implement_bonus.max(0.0);
    let multiplier = 1.0 + magic_attack.max(0.0) / 100.0;
    (roll * multiplier).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedRng;

    #[test]
    fn bonus_scales_roll() {
        assert_eq!(magic_damage(&FixedRng::MIN, 0, 10.0, 20.0, 0.0, 0.0), 10.0);
        assert_eq!(magic_damage(&FixedRng::MAX, 0, 10.0, 20.0, 0.0, 50.0), 30.0);
        assert_eq!(magic_damage(&FixedRng::MIN, 0, 10.0, 20.0, 5.0, 100.0), 30.0);
    }

    #[test]
    fn negative_inputs_never_go_below_zero() {
        assert_eq!(magic_damage(&FixedRng::MIN, 0, -5.0, -1.0, 0.0, -50.0), 0.0);
    }
}
