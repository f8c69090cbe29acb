//! Obstacles and collectibles

use glam::Vec2;

/// What happens when the car touches an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleEffect {
    /// Costs a life, obstacle is destroyed
    Crash,
    /// Degrades grip, obstacle stays
    Slippery,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Static,
    MovingVehicle,
    OilSlick,
    Roadblock,
}

impl ObstacleKind {
    /// Spawn catalog, picked from uniformly
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Static,
        ObstacleKind::MovingVehicle,
        ObstacleKind::OilSlick,
        ObstacleKind::Roadblock,
    ];

    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Static => Vec2::new(40.0, 40.0),
            ObstacleKind::MovingVehicle => Vec2::new(35.0, 45.0),
            ObstacleKind::OilSlick => Vec2::new(60.0, 60.0),
            ObstacleKind::Roadblock => Vec2::new(80.0, 30.0),
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            ObstacleKind::Static => [0xff, 0x00, 0x00],
            ObstacleKind::MovingVehicle => [0xff, 0x66, 0x00],
            ObstacleKind::OilSlick => [0x33, 0x33, 0x33],
            ObstacleKind::Roadblock => [0xff, 0xaa, 0x00],
        }
    }

    pub fn effect(self) -> ObstacleEffect {
        match self {
            ObstacleKind::OilSlick => ObstacleEffect::Slippery,
            _ => ObstacleEffect::Crash,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObstacleKind::Static => "static",
            ObstacleKind::MovingVehicle => "moving vehicle",
            ObstacleKind::OilSlick => "oil slick",
            ObstacleKind::Roadblock => "roadblock",
        }
    }
}

/// Side-to-side drift for moving vehicles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weave {
    /// +1 or -1
    pub direction: f32,
}

/// An obstacle on the road
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Center, in screen space
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward pixels per tick
    pub speed: f32,
    /// Render rotation (radians)
    pub angle: f32,
    pub weave: Option<Weave>,
}

impl Obstacle {
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    pub fn effect(&self) -> ObstacleEffect {
        self.kind.effect()
    }
}

/// What a collectible does when picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleEffect {
    Score,
    Nitro,
    Shield,
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Coin,
    Star,
    Fuel,
    Shield,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 4] = [
        CollectibleKind::Coin,
        CollectibleKind::Star,
        CollectibleKind::Fuel,
        CollectibleKind::Shield,
    ];

    pub fn radius(self) -> f32 {
        match self {
            CollectibleKind::Coin => 12.0,
            CollectibleKind::Star => 15.0,
            CollectibleKind::Fuel => 10.0,
            CollectibleKind::Shield => 18.0,
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            CollectibleKind::Coin => [0xff, 0xd7, 0x00],
            CollectibleKind::Star => [0xff, 0x69, 0xb4],
            CollectibleKind::Fuel => [0x00, 0xff, 0x00],
            CollectibleKind::Shield => [0x41, 0x69, 0xe1],
        }
    }

    /// Points for score pickups, nitro units for fuel
    pub fn value(self) -> u32 {
        match self {
            CollectibleKind::Coin => 50,
            CollectibleKind::Star => 100,
            CollectibleKind::Fuel => 25,
            CollectibleKind::Shield => 0,
        }
    }

    pub fn effect(self) -> CollectibleEffect {
        match self {
            CollectibleKind::Coin | CollectibleKind::Star => CollectibleEffect::Score,
            CollectibleKind::Fuel => CollectibleEffect::Nitro,
            CollectibleKind::Shield => CollectibleEffect::Shield,
        }
    }
}

/// A pickup floating down the road
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub radius: f32,
    pub value: u32,
    pub speed: f32,
    pub angle: f32,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, pos: Vec2, speed: f32) -> Self {
        Self {
            kind,
            pos,
            radius: kind.radius(),
            value: kind.value(),
            speed,
            angle: 0.0,
        }
    }

    pub fn effect(&self) -> CollectibleEffect {
        self.kind.effect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_oil_is_slippery() {
        for kind in ObstacleKind::ALL {
            let slippery = kind.effect() == ObstacleEffect::Slippery;
            assert_eq!(slippery, kind == ObstacleKind::OilSlick, "{}", kind.name());
        }
    }

    #[test]
    fn test_collectible_catalog() {
        assert_eq!(CollectibleKind::Coin.value(), 50);
        assert_eq!(CollectibleKind::Star.value(), 100);
        assert_eq!(CollectibleKind::Fuel.effect(), CollectibleEffect::Nitro);
        assert_eq!(CollectibleKind::Shield.effect(), CollectibleEffect::Shield);
        let c = Collectible::new(CollectibleKind::Star, Vec2::ZERO, 2.0);
        assert_eq!(c.radius, 15.0);
        assert_eq!(c.value, 100);
    }
}
