//! Experience and level progression
//!
//! Pure functions only. Level feeds back into behavior through the speed
//! and yield multipliers.

/// Experience needed per level step: level N needs `N * XP_PER_LEVEL`
pub const XP_PER_LEVEL: u32 = 50;

const SPEED_PER_LEVEL: f32 = 0.25;
const YIELD_PER_LEVEL: f32 = 0.5;

pub fn required_xp(level: u32) -> u32 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Add experience and apply every level-up it pays for, carrying the
/// surplus forward. Returns the number of levels gained.
pub fn grant_xp(xp: &mut u32, level: &mut u32, amount: u32) -> u32 {
    *xp = xp.saturating_add(amount);
    let mut gained = 0;
    // required_xp(0) would be zero and never terminate
    *level = (*level).max(1);
    while *xp >= required_xp(*level) {
        *xp -= required_xp(*level);
        *level += 1;
        gained += 1;
    }
    gained
}

pub fn speed_multiplier(level: u32) -> f32 {
    1.0 + level as f32 * SPEED_PER_LEVEL
}

pub fn yield_multiplier(level: u32) -> f32 {
    1.0 + level as f32 * YIELD_PER_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_xp_scales_with_level() {
        assert_eq!(required_xp(1), 50);
        assert_eq!(required_xp(2), 100);
        assert_eq!(required_xp(5), 250);
    }

    #[test]
    fn test_single_level_up_keeps_surplus() {
        let (mut xp, mut level) = (40, 1);
        assert_eq!(grant_xp(&mut xp, &mut level, 25), 1);
        assert_eq!(level, 2);
        assert_eq!(xp, 15);
    }

    #[test]
    fn test_multi_level_gain_in_one_grant() {
        // 50 for level 1 -> 2, 100 for level 2 -> 3, 20 left over
        let (mut xp, mut level) = (0, 1);
        assert_eq!(grant_xp(&mut xp, &mut level, 170), 2);
        assert_eq!(level, 3);
        assert_eq!(xp, 20);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let (mut xp, mut level) = (0, 1);
        assert_eq!(grant_xp(&mut xp, &mut level, 49), 0);
        assert_eq!(level, 1);
        assert_eq!(xp, 49);
    }

    #[test]
    fn test_multipliers_at_level_one() {
        assert!((speed_multiplier(1) - 1.25).abs() < f32::EPSILON);
        assert!((yield_multiplier(1) - 1.5).abs() < f32::EPSILON);
    }
}
