use std::fmt;

use glam::{Vec2, vec2};

/// Store-issued window identifier. Ids are strictly increasing and never
/// reused for the lifetime of the issuing store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u64);

impl WindowId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct WindowConfig {
    pub initial_x: Option<f32>,
    pub initial_y: Option<f32>,
}

impl WindowConfig {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            initial_x: Some(x),
            initial_y: Some(y),
        }
    }
}

/// Immutable identity record, created once at push time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindowEntity {
    pub id: WindowId,
    pub initial_x: Option<f32>,
    pub initial_y: Option<f32>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindowState {
    pub is_hovered: bool,
    pub is_pressed: bool,
    pub pos: Vec2,
}

impl WindowState {
    // Axes fall back to the viewport centre independently, so a config may
    // pin one coordinate and centre the other.
    pub(crate) fn initial(entity: &WindowEntity, viewport: Vec2) -> Self {
        Self {
            is_hovered: false,
            is_pressed: false,
            pos: vec2(
                entity.initial_x.unwrap_or(viewport.x / 2.0),
                entity.initial_y.unwrap_or(viewport.y / 2.0),
            ),
        }
    }
}
