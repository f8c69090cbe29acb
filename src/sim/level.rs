//! Level catalog
//!
//! Levels are 1-based. Anything past the end of the catalog keeps using the
//! last entry.

/// Immutable per-level tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub name: &'static str,
    /// Chance per tick that an obstacle spawns
    pub obstacle_rate: f32,
    pub max_speed: f32,
    pub curve_intensity: f32,
    /// Daytime sky color
    pub background: [u8; 3],
}

pub const LEVELS: [Level; 5] = [
    Level {
        name: "Beginner",
        obstacle_rate: 0.01,
        max_speed: 8.0,
        curve_intensity: 0.5,
        background: [0x87, 0xce, 0xeb],
    },
    Level {
        name: "Amateur",
        obstacle_rate: 0.015,
        max_speed: 10.0,
        curve_intensity: 0.8,
        background: [0x98, 0xfb, 0x98],
    },
    Level {
        name: "Pro",
        obstacle_rate: 0.02,
        max_speed: 12.0,
        curve_intensity: 1.2,
        background: [0xf0, 0xe6, 0x8c],
    },
    Level {
        name: "Expert",
        obstacle_rate: 0.025,
        max_speed: 14.0,
        curve_intensity: 1.5,
        background: [0xff, 0xb6, 0xc1],
    },
    Level {
        name: "Master",
        obstacle_rate: 0.03,
        max_speed: 16.0,
        curve_intensity: 2.0,
        background: [0xdd, 0xa0, 0xdd],
    },
];

impl Level {
    /// Look up a 1-based level number, clamped to the catalog
    pub fn get(number: u32) -> &'static Level {
        let idx = (number.max(1) as usize - 1).min(LEVELS.len() - 1);
        &LEVELS[idx]
    }

    /// Whether `number` has its own catalog entry
    pub fn exists(number: u32) -> bool {
        number >= 1 && number as usize <= LEVELS.len()
    }
}
