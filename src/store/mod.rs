mod state;

pub use state::{WindowConfig, WindowEntity, WindowId, WindowState};

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::{Rc, Weak},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::input::Viewport;

/// How many tombstones are kept around for late reads before the oldest are
/// evicted.
pub const DEFAULT_TOMBSTONE_CAP: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("window {0} was never issued by this store, or its tombstone was evicted")]
    WindowNotFound(WindowId),
}

/// Notification scope a listener registers against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Membership changes: any push or pop. A global notification reaches
    /// every listener of every scope.
    Global,
    /// State changes of a single window.
    Window(WindowId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct ListenerId(u64);

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);
impl ListenerId {
    fn new() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type Listener = Rc<dyn Fn()>;

struct StoreInner {
    next_id: u64,
    tombstone_cap: usize,
    viewport: Viewport,
    windows: Vec<WindowEntity>,
    undeads: VecDeque<WindowEntity>,
    states: HashMap<WindowId, WindowState>,
    listeners: HashMap<Scope, Vec<(ListenerId, Listener)>>,
}

/// Single source of truth for window entities and their per-window UI state.
///
/// The handle is a cheap clone; all clones share one underlying store. It is
/// single-threaded by construction: mutations and notifications run
/// synchronously inside the calling event turn.
#[derive(Clone)]
pub struct WindowStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl WindowStore {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                next_id: 0,
                tombstone_cap: DEFAULT_TOMBSTONE_CAP,
                viewport,
                windows: Vec::new(),
                undeads: VecDeque::new(),
                states: HashMap::new(),
                listeners: HashMap::new(),
            })),
        }
    }

    pub fn with_tombstone_cap(self, cap: usize) -> Self {
        // A cap of zero would defeat the grace window for late reads.
        self.inner.borrow_mut().tombstone_cap = cap.max(1);
        self
    }

    /// Appends a new window and notifies the global scope. Never fails.
    pub fn push_window(&self, config: WindowConfig) -> WindowId {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            let id = WindowId(inner.next_id);
            let entity = WindowEntity {
                id,
                initial_x: config.initial_x,
                initial_y: config.initial_y,
            };
            let state = WindowState::initial(&entity, inner.viewport.size());
            inner.states.insert(id, state);
            inner.windows.push(entity);
            id
        };
        log::debug!("pushed window {id}");
        self.notify_update(Scope::Global);
        id
    }

    /// Moves a live window to the tombstone set and notifies the global
    /// scope. Popping an id that is not live returns `None` and notifies
    /// nobody, so repeated pops are harmless.
    pub fn pop_window(&self, id: WindowId) -> Option<WindowEntity> {
        let popped = {
            let mut inner = self.inner.borrow_mut();
            let idx = inner.windows.iter().position(|w| w.id == id)?;
            let entity = inner.windows.remove(idx);
            inner.undeads.push_back(entity);
            while inner.undeads.len() > inner.tombstone_cap {
                if let Some(evicted) = inner.undeads.pop_front() {
                    inner.states.remove(&evicted.id);
                    log::debug!("evicted tombstone {}", evicted.id);
                }
            }
            entity
        };
        log::debug!("popped window {id}");
        self.notify_update(Scope::Global);
        Some(popped)
    }

    /// Full state replace. A write for an id that is not live is dropped
    /// silently and notifies nobody; state changes only reach listeners of
    /// that window's scope, never the global one.
    pub fn set_state(&self, id: WindowId, state: WindowState) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.windows.iter().any(|w| w.id == id) {
                log::debug!("dropped state write for non-live window {id}");
                return;
            }
            log::trace!("window {id} state -> {state:?}");
            inner.states.insert(id, state);
        }
        self.notify_update(Scope::Window(id));
    }

    /// Reads the current state (live or tombstoned), applies a pure
    /// transform, and writes the result back through the [`set_state`] path.
    ///
    /// [`set_state`]: WindowStore::set_state
    pub fn update_state(&self, id: WindowId, f: impl FnOnce(WindowState) -> WindowState) {
        let Ok(current) = self.state_snapshot(id) else {
            log::debug!("ignored state update for unknown window {id}");
            return;
        };
        self.set_state(id, f(current));
    }

    /// Registers a listener against a scope. The listener stays registered
    /// until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, scope: Scope, listener: impl Fn() + 'static) -> Subscription {
        let id = ListenerId::new();
        self.inner
            .borrow_mut()
            .listeners
            .entry(scope)
            .or_default()
            .push((id, Rc::new(listener)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            scope,
            id,
        }
    }

    /// Fans out to the listeners of `scope`. A global notification means
    /// "anything may have changed" and reaches every listener of every
    /// scope. Listeners run after the internal borrow is released, so they
    /// may read the store synchronously; re-mutating the same scope from a
    /// listener is not supported.
    pub fn notify_update(&self, scope: Scope) {
        let to_call: Vec<Listener> = {
            let inner = self.inner.borrow();
            match scope {
                Scope::Window(_) => inner
                    .listeners
                    .get(&scope)
                    .map(|entries| entries.iter().map(|(_, l)| l.clone()).collect())
                    .unwrap_or_default(),
                Scope::Global => inner
                    .listeners
                    .values()
                    .flatten()
                    .map(|(_, l)| l.clone())
                    .collect(),
            }
        };
        for listener in &to_call {
            listener();
        }
    }

    /// Ordered identity view of the live set. Insertion order is render
    /// order and is never reshuffled by interaction.
    pub fn snapshot(&self) -> Vec<WindowEntity> {
        self.inner.borrow().windows.clone()
    }

    /// State for a live or tombstoned window. Fails only for ids this store
    /// never issued, or whose tombstone aged out past the cap.
    pub fn state_snapshot(&self, id: WindowId) -> Result<WindowState, StoreError> {
        self.inner
            .borrow()
            .states
            .get(&id)
            .copied()
            .ok_or(StoreError::WindowNotFound(id))
    }

    /// First live window (in insertion order) whose state is hovered.
    pub fn hovered_window(&self) -> Option<WindowId> {
        let inner = self.inner.borrow();
        inner
            .windows
            .iter()
            .find(|w| inner.states.get(&w.id).is_some_and(|s| s.is_hovered))
            .map(|w| w.id)
    }

    #[cfg(test)]
    fn undead_count(&self) -> usize {
        self.inner.borrow().undeads.len()
    }
}

/// Listener registration guard. Dropping it removes exactly the listener
/// instance it was returned for; other listeners on the same scope are
/// untouched.
pub struct Subscription {
    store: Weak<RefCell<StoreInner>>,
    scope: Scope,
    id: ListenerId,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            if let Some(entries) = inner.borrow_mut().listeners.get_mut(&self.scope) {
                entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::cell::Cell;

    fn store() -> WindowStore {
        WindowStore::new(Viewport::new(800.0, 600.0))
    }

    fn counter() -> (Rc<Cell<usize>>, impl Fn()) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn ids_are_unique_and_strictly_increasing() {
        let store = store();
        let ids: Vec<WindowId> = (0..5)
            .map(|_| store.push_window(WindowConfig::default()))
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

        let parsed: Vec<u64> = ids
            .iter()
            .map(|id| id.to_string().parse().unwrap())
            .collect();
        assert!(parsed.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn push_then_pop_round_trip() {
        let store = store();
        let id = store.push_window(WindowConfig::at(50.0, 60.0));
        assert!(store.snapshot().iter().any(|w| w.id == id));

        let popped = store.pop_window(id).unwrap();
        assert_eq!(popped.id, id);
        assert!(!store.snapshot().iter().any(|w| w.id == id));

        // Late reads against the tombstone still resolve to the last state.
        let state = store.state_snapshot(id).unwrap();
        assert_eq!(state.pos, vec2(50.0, 60.0));
    }

    #[test]
    fn pop_is_idempotent() {
        let store = store();
        let id = store.push_window(WindowConfig::default());

        assert!(store.pop_window(id).is_some());
        assert!(store.pop_window(id).is_none());
        assert_eq!(store.undead_count(), 1);
    }

    #[test]
    fn second_pop_does_not_notify() {
        let store = store();
        let id = store.push_window(WindowConfig::default());
        store.pop_window(id);

        let (count, listener) = counter();
        let _sub = store.subscribe(Scope::Global, listener);
        store.pop_window(id);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn default_position_is_half_the_viewport() {
        let viewport = Viewport::new(1024.0, 768.0);
        let store = WindowStore::new(viewport.clone());

        let id = store.push_window(WindowConfig::default());
        assert_eq!(store.state_snapshot(id).unwrap().pos, vec2(512.0, 384.0));

        // The viewport is sampled at push time, not at read time.
        viewport.set_size(vec2(200.0, 100.0));
        assert_eq!(store.state_snapshot(id).unwrap().pos, vec2(512.0, 384.0));
        let id = store.push_window(WindowConfig::default());
        assert_eq!(store.state_snapshot(id).unwrap().pos, vec2(100.0, 50.0));
    }

    #[test]
    fn state_writes_to_non_live_ids_are_dropped() {
        let store = store();
        let id = store.push_window(WindowConfig::at(1.0, 2.0));
        store.pop_window(id);

        let (count, listener) = counter();
        let _sub = store.subscribe(Scope::Window(id), listener);

        let mut state = store.state_snapshot(id).unwrap();
        state.pos = vec2(99.0, 99.0);
        store.set_state(id, state);

        assert_eq!(store.state_snapshot(id).unwrap().pos, vec2(1.0, 2.0));
        assert_eq!(count.get(), 0);

        // update_state follows the same path and is equally silent.
        store.update_state(id, |s| WindowState {
            is_hovered: true,
            ..s
        });
        assert!(!store.state_snapshot(id).unwrap().is_hovered);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn scoped_notifications_do_not_cross_windows() {
        let store = store();
        let a = store.push_window(WindowConfig::default());
        let b = store.push_window(WindowConfig::default());

        let (count_a, listener_a) = counter();
        let _sub = store.subscribe(Scope::Window(a), listener_a);

        store.update_state(b, |s| WindowState {
            is_hovered: true,
            ..s
        });
        assert_eq!(count_a.get(), 0);

        store.update_state(a, |s| WindowState {
            is_hovered: true,
            ..s
        });
        assert_eq!(count_a.get(), 1);
    }

    #[test]
    fn state_changes_do_not_reach_global_listeners() {
        let store = store();
        let id = store.push_window(WindowConfig::default());

        let (count, listener) = counter();
        let _sub = store.subscribe(Scope::Global, listener);

        store.update_state(id, |s| WindowState {
            is_pressed: true,
            ..s
        });
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn membership_changes_reach_every_listener() {
        let store = store();
        let a = store.push_window(WindowConfig::default());

        let (count_scoped, listener_scoped) = counter();
        let (count_global, listener_global) = counter();
        let _sub_a = store.subscribe(Scope::Window(a), listener_scoped);
        let _sub_g = store.subscribe(Scope::Global, listener_global);

        let b = store.push_window(WindowConfig::default());
        assert_eq!(count_scoped.get(), 1);
        assert_eq!(count_global.get(), 1);

        store.pop_window(b);
        assert_eq!(count_scoped.get(), 2);
        assert_eq!(count_global.get(), 2);
    }

    #[test]
    fn dropping_a_subscription_removes_only_that_listener() {
        let store = store();
        let (count_a, listener_a) = counter();
        let (count_b, listener_b) = counter();

        let sub_a = store.subscribe(Scope::Global, listener_a);
        let _sub_b = store.subscribe(Scope::Global, listener_b);

        store.push_window(WindowConfig::default());
        assert_eq!(count_a.get(), 1);
        assert_eq!(count_b.get(), 1);

        sub_a.unsubscribe();
        store.push_window(WindowConfig::default());
        assert_eq!(count_a.get(), 1);
        assert_eq!(count_b.get(), 2);
    }

    #[test]
    fn tombstones_are_evicted_past_the_cap() {
        let store = WindowStore::new(Viewport::new(800.0, 600.0)).with_tombstone_cap(2);

        let ids: Vec<WindowId> = (0..3)
            .map(|_| store.push_window(WindowConfig::default()))
            .collect();
        for id in &ids {
            store.pop_window(*id);
        }

        assert_eq!(store.undead_count(), 2);
        assert_eq!(
            store.state_snapshot(ids[0]),
            Err(StoreError::WindowNotFound(ids[0]))
        );
        assert!(store.state_snapshot(ids[1]).is_ok());
        assert!(store.state_snapshot(ids[2]).is_ok());
    }

    #[test]
    fn reading_an_unissued_id_fails() {
        let store = store();
        let err = store.state_snapshot(WindowId(999)).unwrap_err();
        assert_eq!(err, StoreError::WindowNotFound(WindowId(999)));
    }

    #[test]
    fn hovered_window_follows_insertion_order() {
        let store = store();
        let a = store.push_window(WindowConfig::default());
        let b = store.push_window(WindowConfig::default());

        assert_eq!(store.hovered_window(), None);

        store.update_state(b, |s| WindowState {
            is_hovered: true,
            ..s
        });
        assert_eq!(store.hovered_window(), Some(b));

        store.update_state(a, |s| WindowState {
            is_hovered: true,
            ..s
        });
        assert_eq!(store.hovered_window(), Some(a));
    }

    #[test]
    fn listeners_may_read_the_store_synchronously() {
        let store = store();
        let seen = Rc::new(Cell::new(0usize));
        let _sub = {
            let reader = store.clone();
            let seen = seen.clone();
            store.subscribe(Scope::Global, move || {
                seen.set(reader.snapshot().len());
            })
        };

        store.push_window(WindowConfig::default());
        assert_eq!(seen.get(), 1);
        store.push_window(WindowConfig::default());
        assert_eq!(seen.get(), 2);
    }
}
