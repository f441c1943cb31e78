use glam::Vec2;
use winit::event::MouseButton;

use crate::store::{WindowId, WindowState, WindowStore};

/// Drives hover and drag state for window surfaces.
///
/// Dragging is gated on the window's own pressed flag: the primary button
/// goes down over the surface, every subsequent cursor sample translates the
/// window by the frame-to-frame delta, and releasing (or leaving the
/// surface) ends the drag. Positions move by deltas only, so the window
/// never jumps to the cursor.
pub struct DragController {
    store: WindowStore,
    last_cursor: Option<Vec2>,
}

impl DragController {
    pub fn new(store: WindowStore) -> Self {
        Self {
            store,
            last_cursor: None,
        }
    }

    pub fn pointer_down(&mut self, id: WindowId, button: MouseButton, pos: Vec2) {
        if button != MouseButton::Left {
            return;
        }
        // Seed the sample so the first move is measured from the press.
        self.last_cursor = Some(pos);
        self.store.update_state(id, |s| WindowState {
            is_pressed: true,
            ..s
        });
    }

    pub fn pointer_move(&mut self, id: WindowId, pos: Vec2) {
        let delta = match self.last_cursor {
            Some(prev) => pos - prev,
            None => Vec2::ZERO,
        };
        self.last_cursor = Some(pos);

        let Ok(state) = self.store.state_snapshot(id) else {
            return;
        };
        if !state.is_pressed || delta == Vec2::ZERO {
            return;
        }
        self.store.update_state(id, |s| WindowState {
            pos: s.pos + delta,
            ..s
        });
    }

    pub fn pointer_up(&mut self, id: WindowId, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        self.store.update_state(id, |s| WindowState {
            is_pressed: false,
            ..s
        });
    }

    pub fn pointer_over(&mut self, id: WindowId) {
        self.store.update_state(id, |s| WindowState {
            is_hovered: true,
            ..s
        });
    }

    /// Leaving the surface ends both hover and any drag in progress.
    pub fn pointer_out(&mut self, id: WindowId) {
        self.store.update_state(id, |s| WindowState {
            is_hovered: false,
            is_pressed: false,
            ..s
        });
    }
}
