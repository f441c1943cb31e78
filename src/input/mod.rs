mod chord;

pub use chord::KeyChord;

use std::{cell::Cell, rc::Rc};

use glam::{Vec2, vec2};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{Key, ModifiersState},
};

/// Shared handle onto the current viewport size. Clones observe the same
/// cell, so the tracker can update it while the store samples it at push
/// time.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    size: Rc<Cell<Vec2>>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Rc::new(Cell::new(vec2(width, height))),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size.get()
    }

    pub fn set_size(&self, size: Vec2) {
        self.size.set(size);
    }

    pub fn center(&self) -> Vec2 {
        self.size.get() / 2.0
    }
}

/// Which mouse buttons are currently held.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerButtons {
    pub left: bool,
    pub wheel: bool,
    pub right: bool,
}

/// Ambient input state fed from the window event stream: held modifiers,
/// held keys, held mouse buttons, and the viewport size.
pub struct InputTracker {
    pub modifiers: ModifiersState,
    pub pressed_keys: Vec<Key>,
    pub buttons: PointerButtons,
    viewport: Viewport,
}

impl InputTracker {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            pressed_keys: Vec::new(),
            buttons: PointerButtons::default(),
            viewport,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.record_key(
                event.logical_key.clone(),
                event.state == ElementState::Pressed,
            ),
            WindowEvent::MouseInput { state, button, .. } => {
                self.record_button(*button, state.is_pressed())
            }
            WindowEvent::Resized(size) => self.record_resize(*size),
            _ => {}
        }
    }

    fn record_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            // Auto-repeat delivers the same key again while held.
            if !self.pressed_keys.contains(&key) {
                self.pressed_keys.push(key);
            }
        } else {
            self.pressed_keys.retain(|k| *k != key);
        }
    }

    fn record_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.buttons.left = pressed,
            MouseButton::Middle => self.buttons.wheel = pressed,
            MouseButton::Right => self.buttons.right = pressed,
            _ => {}
        }
    }

    fn record_resize(&mut self, size: PhysicalSize<u32>) {
        self.viewport
            .set_size(vec2(size.width as f32, size.height as f32));
    }
}
