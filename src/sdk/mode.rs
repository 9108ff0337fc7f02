use super::markers::Role;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    None,
    Start,
    Way,
    Goal,
}

impl Mode {
    /// Marker role a click places in this mode.
    pub fn role(self) -> Option<Role> {
        match self {
            Mode::None => None,
            Mode::Start => Some(Role::Start),
            Mode::Way => Some(Role::Waypoint),
            Mode::Goal => Some(Role::Goal),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::None => "NONE",
            Mode::Start => "START",
            Mode::Way => "WAY",
            Mode::Goal => "GOAL",
        };
        f.write_str(name)
    }
}

/// Placement mode. It stays selected after a click until switched or cleared.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` if the mode actually changed.
    pub fn select(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    pub fn reset(&mut self) {
        self.mode = Mode::None;
    }

    /// Role for a map click, or `None` when clicks are ignored.
    pub fn on_click(&self) -> Option<Role> {
        self.mode.role()
    }
}
