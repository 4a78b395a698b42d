//! Simulation clock for the day/night cycle
//!
//! Time is tracked as a fraction of the current day. Each wrap starts a new
//! day and raises the wave counter that scales night raids.

use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;

/// Boundaries crossed during one `advance` call
///
/// A single long step can pass several boundaries, so each is counted
/// rather than inferred from the night flag before and after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTransition {
    /// Times daylight began
    pub dawns: u32,
    /// Times night fell
    pub dusks: u32,
    /// Midnights passed
    pub new_days: u32,
}

impl ClockTransition {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    time_fraction: f32,
    day: u32,
    wave: u32,
    is_night: bool,
    day_length: Seconds,
    day_start: f32,
    day_end: f32,
}

impl SimulationClock {
    /// `day_start..day_end` is the daylight band as a fraction of the day.
    pub fn new(day_length: Seconds, day_start: f32, day_end: f32, start_fraction: f32) -> Self {
        let time_fraction = start_fraction.rem_euclid(1.0);
        Self {
            time_fraction,
            day: 1,
            wave: 1,
            is_night: is_night_at(time_fraction, day_start, day_end),
            day_length: day_length.max(f32::EPSILON),
            day_start,
            day_end,
        }
    }

    pub fn advance(&mut self, dt: Seconds) -> ClockTransition {
        let start = self.time_fraction;
        let end = start + dt.max(0.0) / self.day_length;

        let transition = ClockTransition {
            dawns: crossings(start, end, self.day_start),
            dusks: crossings(start, end, self.day_end),
            new_days: crossings(start, end, 0.0),
        };

        self.time_fraction = end - transition.new_days as f32;
        while self.time_fraction >= 1.0 {
            self.time_fraction -= 1.0;
        }
        self.time_fraction = self.time_fraction.max(0.0);
        self.day += transition.new_days;
        self.wave += transition.new_days;

        self.is_night = is_night_at(self.time_fraction, self.day_start, self.day_end);
        transition
    }

    pub fn time_fraction(&self) -> f32 {
        self.time_fraction
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn hour(&self) -> u32 {
        ((self.time_fraction * 24.0) as u32).min(23)
    }

    pub fn minute(&self) -> u32 {
        ((self.time_fraction * 24.0 * 60.0) as u32) % 60
    }
}

fn is_night_at(fraction: f32, day_start: f32, day_end: f32) -> bool {
    !(day_start..day_end).contains(&fraction)
}

/// Number of points `mark + k` (any integer `k`) in `(start, end]`
fn crossings(start: f32, end: f32, mark: f32) -> u32 {
    let (start, end, mark) = (f64::from(start), f64::from(end), f64::from(mark));
    ((end - mark).floor() - (start - mark).floor()).max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_wraps_into_next_day() {
        let mut clock = SimulationClock::new(100.0, 0.2, 0.65, 0.0);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.wave(), 1);

        clock.advance(99.0);
        assert_eq!(clock.day(), 1);

        clock.advance(2.0);
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.wave(), 2);
        assert!((clock.time_fraction() - 0.01).abs() < 0.001);
    }

    #[test]
    fn test_night_band() {
        let mut clock = SimulationClock::new(100.0, 0.2, 0.65, 0.0);
        assert!(clock.is_night(), "midnight is night");

        let dawn = clock.advance(21.0);
        assert_eq!((dawn.dawns, dawn.dusks), (1, 0));
        assert!(!clock.is_night());

        assert!(clock.advance(42.0).is_empty(), "0.63 is still day");
        assert!(!clock.is_night());

        let dusk = clock.advance(3.0);
        assert_eq!((dusk.dawns, dusk.dusks), (0, 1));
        assert!(clock.is_night());
    }

    #[test]
    fn test_negative_dt_is_clamped() {
        let mut clock = SimulationClock::new(100.0, 0.2, 0.65, 0.5);
        assert!(clock.advance(-50.0).is_empty());
        assert!((clock.time_fraction() - 0.5).abs() < f32::EPSILON);
        assert_eq!(clock.day(), 1);
    }

    #[test]
    fn test_large_step_wraps_several_days() {
        let mut clock = SimulationClock::new(10.0, 0.2, 0.65, 0.0);
        let transition = clock.advance(35.0);
        assert_eq!(clock.day(), 4);
        assert_eq!(clock.wave(), 4);
        // 0.0 -> 3.5 passes dawn and dusk on each of days 1 to 3 and dawn on day 4
        assert_eq!(
            transition,
            ClockTransition {
                dawns: 4,
                dusks: 3,
                new_days: 3
            }
        );
    }

    #[test]
    fn test_full_day_step_from_night_reports_dawn() {
        // 0.9 -> 1.9: night to night, but daylight came and went in between
        let mut clock = SimulationClock::new(100.0, 0.2, 0.65, 0.9);
        let transition = clock.advance(100.0);

        assert!(clock.is_night());
        assert_eq!(clock.day(), 2);
        assert_eq!(
            transition,
            ClockTransition {
                dawns: 1,
                dusks: 1,
                new_days: 1
            }
        );
    }

    #[test]
    fn test_landing_exactly_on_dawn_counts_once() {
        let mut clock = SimulationClock::new(100.0, 0.25, 0.75, 0.0);
        assert_eq!(clock.advance(25.0).dawns, 1);
        assert!(!clock.is_night());
        assert_eq!(clock.advance(10.0).dawns, 0);
    }

    #[test]
    fn test_identical_inputs_are_deterministic() {
        let mut a = SimulationClock::new(16.6, 0.2, 0.65, 0.25);
        let mut b = SimulationClock::new(16.6, 0.2, 0.65, 0.25);
        for i in 0..500 {
            let dt = 0.016 + (i % 7) as f32 * 0.001;
            a.advance(dt);
            b.advance(dt);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_wall_clock() {
        let clock = SimulationClock::new(100.0, 0.2, 0.65, 0.5);
        assert_eq!(clock.hour(), 12);
        assert_eq!(clock.minute(), 0);
    }
}
