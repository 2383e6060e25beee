use std::fmt;

/// Unique identifier for any entity (creature or prop) tracked in a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl EntityId {
    /// Reserved identifier for server-originated actions.
    pub const SYSTEM: Self = Self(u64::MAX);

    /// Returns true if this entity represents the server itself.
    #[inline]
    pub const fn is_system(self) -> bool {
        self.0 == Self::SYSTEM.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// Identifier of a region (map instance) owning a set of entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// Planar world position in distance units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean planar distance to `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Returns true if `other` lies within `max_distance`, boundary included.
    ///
    /// Compared on squared integers so the boundary is exact.
    pub fn in_range(&self, other: &Position, max_distance: u32) -> bool {
        let max = max_distance as i64;
        self.distance_squared(other) <= max * max
    }

    /// Position reached by pushing `self` directly away from `origin`.
    ///
    /// When both positions coincide there is no direction to push in and the
    /// position is returned unchanged.
    pub fn pushed_away_from(&self, origin: &Position, distance: u32) -> Position {
        let dx = (self.x as i64 - origin.x as i64) as f64;
        let dy = (self.y as i64 - origin.y as i64) as f64;
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return *self;
        }

        let scale = distance as f64 / length;
        Position {
            x: shift(self.x, dx * scale),
            y: shift(self.y, dy * scale),
        }
    }

    fn distance_squared(&self, other: &Position) -> i64 {
        let dx = (self.x as i64) - (other.x as i64);
        let dy = (self.y as i64) - (other.y as i64);
        dx * dx + dy * dy
    }
}

/// Adds a rounded offset, saturating at the coordinate bounds.
fn shift(coord: i32, offset: f64) -> i32 {
    let shifted = coord as i64 + offset.round() as i64;
    shifted.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Floating-point resource meter (life, mana) tracked per creature.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub current: f32,
    pub maximum: f32,
}

impl Meter {
    pub const fn new(current: f32, maximum: f32) -> Self {
        Self { current, maximum }
    }

    pub const fn full(maximum: f32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_boundary_is_inclusive() {
        let origin = Position::ORIGIN;
        assert!(origin.in_range(&Position::new(1500, 0), 1500));
        assert!(!origin.in_range(&Position::new(1501, 0), 1500));
        assert!(origin.in_range(&Position::new(300, 400), 500));
        assert!(!origin.in_range(&Position::new(300, 401), 500));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(100, 100);
        let b = Position::new(400, 500);
        assert_eq!(a.distance(&b), 500.0);
        assert_eq!(b.distance(&a), 500.0);
    }

    #[test]
    fn push_moves_along_attack_axis() {
        let attacker = Position::new(0, 0);
        let target = Position::new(300, 400);
        assert_eq!(
            target.pushed_away_from(&attacker, 400),
            Position::new(540, 720)
        );
    }

    #[test]
    fn push_without_direction_keeps_position() {
        let p = Position::new(10, 10);
        assert_eq!(p.pushed_away_from(&p, 400), p);
    }

    #[test]
    fn push_saturates_at_coordinate_bounds() {
        let attacker = Position::new(i32::MIN, 0);
        let target = Position::new(i32::MAX - 100, 0);
        assert_eq!(
            target.pushed_away_from(&attacker, 400),
            Position::new(i32::MAX, 0)
        );

        let attacker = Position::new(0, i32::MAX);
        let target = Position::new(0, i32::MIN + 10);
        assert_eq!(
            target.pushed_away_from(&attacker, 400),
            Position::new(0, i32::MIN)
        );
    }

    #[test]
    fn entity_id_displays_as_hex() {
        assert_eq!(EntityId(0x10F0000000001).to_string(), "00010F0000000001");
    }
}
