use crate::skill::SkillRank::{self, *};
use crate::training::{Fact, PowerRating, RankSpan, TrainingRule};

use Fact::{Always, KnockedDown, TargetDead};
use PowerRating::{Awful, Boss, Normal, Strong};

const fn rule(
    from: SkillRank,
    to: SkillRank,
    rating: Option<PowerRating>,
    requires: Fact,
    condition: u8,
) -> TrainingRule {
    TrainingRule::new(RankSpan::new(from, to), rating, requires, condition)
}

/// Icebolt training conditions, rank F through rank 1.
#[rustfmt::skip]
pub static ICEBOLT_RULES: &[TrainingRule] = &[
    // Rank F
    rule(RF, RF, None, Always, 1),                  // attack anything
    rule(RF, RF, None, Always, 2),                  // attack an enemy
    rule(RF, RF, None, KnockedDown, 3),
    rule(RF, RF, None, TargetDead, 4),

    // Rank E
    rule(RE, RE, None, KnockedDown, 1),
    rule(RE, RE, None, TargetDead, 2),
    rule(RE, RE, Some(Normal), Always, 3),
    rule(RE, RE, Some(Normal), KnockedDown, 4),
    rule(RE, RE, Some(Normal), TargetDead, 5),
    rule(RE, RE, Some(Strong), KnockedDown, 6),
    rule(RE, RE, Some(Strong), TargetDead, 7),

    // Rank D
    rule(RD, RD, None, Always, 1),
    rule(RD, RD, None, KnockedDown, 2),
    rule(RD, RD, None, TargetDead, 3),
    rule(RD, RD, Some(Normal), Always, 4),
    rule(RD, RD, Some(Normal), KnockedDown, 5),
    rule(RD, RD, Some(Normal), TargetDead, 6),
    rule(RD, RD, Some(Strong), KnockedDown, 7),
    rule(RD, RD, Some(Strong), TargetDead, 8),

    // Rank C - B
    rule(RC, RB, Some(Normal), Always, 1),
    rule(RC, RB, Some(Normal), KnockedDown, 2),
    rule(RC, RB, Some(Normal), TargetDead, 3),
    rule(RC, RB, Some(Strong), KnockedDown, 4),
    rule(RC, RB, Some(Strong), TargetDead, 5),
    rule(RC, RB, Some(Awful), KnockedDown, 6),
    rule(RC, RB, Some(Awful), TargetDead, 7),

    // Rank A - 9
    rule(RA, R9, Some(Normal), KnockedDown, 1),
    rule(RA, R9, Some(Normal), TargetDead, 2),
    rule(RA, R9, Some(Strong), KnockedDown, 3),
    rule(RA, R9, Some(Strong), TargetDead, 4),
    rule(RA, R9, Some(Awful), KnockedDown, 5),
    rule(RA, R9, Some(Awful), TargetDead, 6),

    // Rank 8
    rule(R8, R8, Some(Normal), KnockedDown, 1),
    rule(R8, R8, Some(Normal), TargetDead, 2),
    rule(R8, R8, Some(Strong), KnockedDown, 3),
    rule(R8, R8, Some(Strong), TargetDead, 4),
    rule(R8, R8, Some(Awful), KnockedDown, 5),
    rule(R8, R8, Some(Awful), TargetDead, 6),
    rule(R8, R8, Some(Boss), KnockedDown, 7),
    rule(R8, R8, Some(Boss), TargetDead, 8),

    // Rank 7
    rule(R7, R7, Some(Normal), TargetDead, 1),
    rule(R7, R7, Some(Strong), KnockedDown, 2),
    rule(R7, R7, Some(Strong), TargetDead, 3),
    rule(R7, R7, Some(Awful), KnockedDown, 4),
    rule(R7, R7, Some(Awful), TargetDead, 5),
    rule(R7, R7, Some(Boss), KnockedDown, 6),
    rule(R7, R7, Some(Boss), TargetDead, 7),

    // Rank 6 - 1
    rule(R6, R1, Some(Strong), KnockedDown, 1),
    rule(R6, R1, Some(Strong), TargetDead, 2),
    rule(R6, R1, Some(Awful), KnockedDown, 3),
    rule(R6, R1, Some(Awful), TargetDead, 4),
    rule(R6, R1, Some(Boss), KnockedDown, 5),
    rule(R6, R1, Some(Boss), TargetDead, 6),
];
