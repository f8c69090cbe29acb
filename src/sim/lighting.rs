//! Day/night cycle

use crate::consts::{DAY_NIGHT_STEP, NIGHT_COLOR};
use crate::lerp;

/// Phase of the day: 0 is full day, 1 is full night
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayNight {
    pub phase: f32,
}

impl DayNight {
    /// Advance one tick, wrapping back to day after night
    pub fn advance(&mut self) {
        self.phase += DAY_NIGHT_STEP;
        if self.phase > 1.0 {
            self.phase = 0.0;
        }
    }

    /// Sky color blended from the level's day color toward night
    pub fn background(&self, day: [u8; 3]) -> [u8; 3] {
        let mut out = [0u8; 3];
        for (c, (d, n)) in out.iter_mut().zip(day.iter().zip(NIGHT_COLOR.iter())) {
            *c = lerp(*d as f32, *n as f32, self.phase).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Global brightness applied to every world layer
    pub fn intensity(&self) -> f32 {
        1.0 - self.phase * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wraps() {
        let mut cycle = DayNight { phase: 0.9985 };
        cycle.advance();
        assert!(cycle.phase > 0.999);
        cycle.advance();
        assert_eq!(cycle.phase, 0.0);
    }

    #[test]
    fn test_background_endpoints() {
        let day = [0x87, 0xce, 0xeb];
        assert_eq!(DayNight { phase: 0.0 }.background(day), day);
        assert_eq!(DayNight { phase: 1.0 }.background(day), NIGHT_COLOR);
        let mid = DayNight { phase: 0.5 }.background([0, 100, 200]);
        assert_eq!(mid, [13, 63, 123]);
    }

    #[test]
    fn test_intensity_halves_at_night() {
        assert_eq!(DayNight { phase: 0.0 }.intensity(), 1.0);
        assert_eq!(DayNight { phase: 1.0 }.intensity(), 0.5);
        assert_eq!(DayNight { phase: 0.5 }.intensity(), 0.75);
    }
}
