use winit::keyboard::{Key, ModifiersState};

/// A key plus the exact modifier set it must arrive with. A chord asking for
/// plain `c` rejects `ctrl+c`, and vice versa.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: Key,
}

impl KeyChord {
    pub fn bare(key: Key) -> Self {
        Self {
            ctrl: false,
            shift: false,
            meta: false,
            key,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::bare(key)
        }
    }

    pub fn matches(&self, modifiers: ModifiersState, key: &Key) -> bool {
        modifiers.control_key() == self.ctrl
            && modifiers.shift_key() == self.shift
            && modifiers.super_key() == self.meta
            && *key == self.key
    }
}
