//! Logical driving controls
//!
//! Keyboard and touch each feed their own `Controls`; the frame sees the
//! OR of every source so holding a key and a touch button never fight.

use std::ops::BitOr;

/// The six driving actions, held or not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub boost: bool,
}

/// A single driving action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Brake,
    Boost,
}

impl Action {
    /// Map a DOM `KeyboardEvent.key` value to an action
    pub fn from_key(key: &str) -> Option<Action> {
        match key.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Action::Forward),
            "s" | "arrowdown" => Some(Action::Back),
            "a" | "arrowleft" => Some(Action::Left),
            "d" | "arrowright" => Some(Action::Right),
            " " | "spacebar" => Some(Action::Brake),
            "shift" => Some(Action::Boost),
            _ => None,
        }
    }

    /// Map an on-screen button id to an action
    pub fn from_button(id: &str) -> Option<Action> {
        match id {
            "btn-up" => Some(Action::Forward),
            "btn-down" => Some(Action::Back),
            "btn-left" => Some(Action::Left),
            "btn-right" => Some(Action::Right),
            "btn-brake" => Some(Action::Brake),
            "btn-boost" => Some(Action::Boost),
            _ => None,
        }
    }
}

impl Controls {
    /// Press or release one action
    pub fn set(&mut self, action: Action, held: bool) {
        let slot = match action {
            Action::Forward => &mut self.forward,
            Action::Back => &mut self.back,
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Brake => &mut self.brake,
            Action::Boost => &mut self.boost,
        };
        *slot = held;
    }

    pub fn merge(self, other: Controls) -> Controls {
        Controls {
            forward: self.forward || other.forward,
            back: self.back || other.back,
            left: self.left || other.left,
            right: self.right || other.right,
            brake: self.brake || other.brake,
            boost: self.boost || other.boost,
        }
    }
}

impl BitOr for Controls {
    type Output = Controls;

    fn bitor(self, rhs: Controls) -> Controls {
        self.merge(rhs)
    }
}

/// Held state per input source
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub keyboard: Controls,
    pub touch: Controls,
}

impl InputState {
    /// Handle a key event. Returns true if the key drives the car, so the
    /// host can suppress the browser default (page scroll on arrows/space).
    pub fn key(&mut self, key: &str, held: bool) -> bool {
        match Action::from_key(key) {
            Some(action) => {
                self.keyboard.set(action, held);
                true
            }
            None => false,
        }
    }

    /// Handle an on-screen button press or release
    pub fn button(&mut self, id: &str, held: bool) -> bool {
        match Action::from_button(id) {
            Some(action) => {
                self.touch.set(action, held);
                true
            }
            None => false,
        }
    }

    /// Release everything (window blur, run restart)
    pub fn clear(&mut self) {
        *self = InputState::default();
    }

    /// Controls the next tick sees
    pub fn controls(&self) -> Controls {
        self.keyboard | self.touch
    }
}
