pub mod bindings;
pub mod input;
pub mod interact;
pub mod store;

pub use bindings::{StateBinding, WindowsBinding};
pub use input::{InputTracker, KeyChord, PointerButtons, Viewport};
pub use interact::DragController;
pub use store::{
    Scope, StoreError, Subscription, WindowConfig, WindowEntity, WindowId, WindowState,
    WindowStore,
};

pub use glam::{Vec2, vec2};
pub use winit::event::{ElementState, MouseButton, WindowEvent};
pub use winit::keyboard::{Key, ModifiersState, NamedKey};

pub type Result<T> = std::result::Result<T, StoreError>;

pub fn init_logging() {
    env_logger::init();
}
