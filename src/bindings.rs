use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::store::{
    Scope, StoreError, Subscription, WindowConfig, WindowEntity, WindowId, WindowState,
    WindowStore,
};

/// Collection-scoped store binding for a rendering layer.
///
/// The listener only flips a dirty flag; the snapshot is recomputed lazily on
/// the next read and then handed out as the same `Rc` until the next global
/// notification. A renderer comparing snapshots across frames therefore sees
/// a stable value between notifications and never a half-updated one.
pub struct WindowsBinding {
    store: WindowStore,
    dirty: Rc<Cell<bool>>,
    cached: RefCell<Rc<Vec<WindowEntity>>>,
    _sub: Subscription,
}

impl WindowsBinding {
    pub fn new(store: &WindowStore) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let sub = store.subscribe(Scope::Global, {
            let dirty = dirty.clone();
            move || dirty.set(true)
        });
        Self {
            store: store.clone(),
            dirty,
            cached: RefCell::new(Rc::new(store.snapshot())),
            _sub: sub,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn snapshot(&self) -> Rc<Vec<WindowEntity>> {
        if self.dirty.replace(false) {
            *self.cached.borrow_mut() = Rc::new(self.store.snapshot());
        }
        self.cached.borrow().clone()
    }

    pub fn push(&self, config: WindowConfig) -> WindowId {
        self.store.push_window(config)
    }

    pub fn pop(&self, id: WindowId) -> Option<WindowEntity> {
        self.store.pop_window(id)
    }
}

/// Single-window binding: subscribes to one window's scope and exposes its
/// state plus a bound update action. Reads between notifications return the
/// same cached value.
pub struct StateBinding {
    store: WindowStore,
    id: WindowId,
    dirty: Rc<Cell<bool>>,
    cached: Cell<WindowState>,
    _sub: Subscription,
}

impl StateBinding {
    pub fn new(store: &WindowStore, id: WindowId) -> Result<Self, StoreError> {
        let initial = store.state_snapshot(id)?;
        let dirty = Rc::new(Cell::new(false));
        let sub = store.subscribe(Scope::Window(id), {
            let dirty = dirty.clone();
            move || dirty.set(true)
        });
        Ok(Self {
            store: store.clone(),
            id,
            dirty,
            cached: Cell::new(initial),
            _sub: sub,
        })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn snapshot(&self) -> WindowState {
        if self.dirty.replace(false) {
            if let Ok(state) = self.store.state_snapshot(self.id) {
                self.cached.set(state);
            }
        }
        self.cached.get()
    }

    pub fn update(&self, f: impl FnOnce(WindowState) -> WindowState) {
        self.store.update_state(self.id, f);
    }
}
