//! Scoped keyboard bindings for the presentation view.
//!
//! A [`KeyBinding`] is acquired when a view starts presenting a deck and
//! deregisters its listener when dropped. Listeners only hold a weak handle to
//! the deck they drive, so a stale binding can never navigate a deck that has
//! been replaced or torn down.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::deck::SlideDeck;

/// The two directional keys consumed by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Forward,
    Backward,
}

type Listener = Rc<dyn Fn(NavKey) -> bool>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

#[derive(Default)]
pub struct KeyDispatcher {
    registry: Rc<RefCell<Registry>>,
}

impl KeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the navigation keys to `deck`. The binding stays active until the
    /// returned guard is released or dropped.
    pub fn bind<C: 'static>(&self, deck: &Rc<RefCell<SlideDeck<C>>>) -> KeyBinding {
        let target: Weak<RefCell<SlideDeck<C>>> = Rc::downgrade(deck);
        self.bind_handler(move |key| {
            let Some(deck) = target.upgrade() else {
                return false;
            };
            let Ok(mut deck) = deck.try_borrow_mut() else {
                log::warn!("deck is busy, dropping {key:?} key press");
                return false;
            };
            match key {
                NavKey::Forward => deck.next(),
                NavKey::Backward => deck.previous(),
            }
            true
        })
    }

    /// Register an arbitrary key handler. The handler returns whether it
    /// consumed the key.
    pub fn bind_handler(&self, handler: impl Fn(NavKey) -> bool + 'static) -> KeyBinding {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(handler)));
        log::debug!("key binding {id} registered");
        KeyBinding {
            id,
            registry: Rc::downgrade(&self.registry),
            released: false,
        }
    }

    /// Deliver a key press to every active binding. Returns how many
    /// listeners handled it.
    pub fn dispatch(&self, key: NavKey) -> usize {
        // Snapshot so listeners may release bindings mid-dispatch
        let snapshot: Vec<(u64, Listener)> = self.registry.borrow().listeners.clone();
        let mut handled = 0;
        for (id, listener) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            if listener(key) {
                handled += 1;
            }
        }
        handled
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Guard for one registered listener.
pub struct KeyBinding {
    id: u64,
    registry: Weak<RefCell<Registry>>,
    released: bool,
}

impl KeyBinding {
    /// Deregister the listener. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.id) {
                log::debug!("key binding {} released", self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        !self.released
            && self
                .registry
                .upgrade()
                .is_some_and(|r| r.borrow().contains(self.id))
    }
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::SlideDescriptor;
    use std::cell::Cell;

    fn shared_deck(n: usize) -> Rc<RefCell<SlideDeck<()>>> {
        let slides = (0..n)
            .map(|i| SlideDescriptor::new(format!("Slide {i}"), "bg", ()))
            .collect();
        Rc::new(RefCell::new(SlideDeck::new(slides).unwrap()))
    }

    #[test]
    fn test_keys_drive_bound_deck() {
        let dispatcher = KeyDispatcher::new();
        let deck = shared_deck(3);
        let _binding = dispatcher.bind(&deck);

        assert_eq!(dispatcher.dispatch(NavKey::Forward), 1);
        assert_eq!(deck.borrow().current_index(), 1);

        dispatcher.dispatch(NavKey::Backward);
        dispatcher.dispatch(NavKey::Backward);
        assert_eq!(deck.borrow().current_index(), 2);
    }

    #[test]
    fn test_drop_deregisters() {
        let dispatcher = KeyDispatcher::new();
        let deck = shared_deck(3);
        {
            let binding = dispatcher.bind(&deck);
            assert!(binding.is_active());
            assert_eq!(dispatcher.listener_count(), 1);
        }
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(dispatcher.dispatch(NavKey::Forward), 0);
        assert_eq!(deck.borrow().current_index(), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let dispatcher = KeyDispatcher::new();
        let deck = shared_deck(2);
        let mut first = dispatcher.bind(&deck);
        let second = dispatcher.bind(&deck);

        first.release();
        first.release();
        assert!(!first.is_active());
        assert!(second.is_active());
        assert_eq!(dispatcher.listener_count(), 1);

        drop(first);
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn test_dropped_deck_is_skipped() {
        let dispatcher = KeyDispatcher::new();
        let deck = shared_deck(3);
        let _binding = dispatcher.bind(&deck);
        drop(deck);

        assert_eq!(dispatcher.dispatch(NavKey::Forward), 0);
    }

    #[test]
    fn test_rebinding_targets_new_deck() {
        let dispatcher = KeyDispatcher::new();
        let old_deck = shared_deck(3);
        let mut binding = dispatcher.bind(&old_deck);

        let new_deck = shared_deck(5);
        binding = {
            drop(binding);
            dispatcher.bind(&new_deck)
        };

        dispatcher.dispatch(NavKey::Forward);
        assert_eq!(old_deck.borrow().current_index(), 0);
        assert_eq!(new_deck.borrow().current_index(), 1);
        assert!(binding.is_active());
    }

    #[test]
    fn test_release_during_dispatch() {
        let dispatcher = KeyDispatcher::new();
        let slot: Rc<RefCell<Option<KeyBinding>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        // First listener tears down the second one while the event is in flight
        let teardown_slot = Rc::clone(&slot);
        let _first = dispatcher.bind_handler(move |_| {
            teardown_slot.borrow_mut().take();
            true
        });
        let counter = Rc::clone(&calls);
        *slot.borrow_mut() = Some(dispatcher.bind_handler(move |_| {
            counter.set(counter.get() + 1);
            true
        }));

        assert_eq!(dispatcher.dispatch(NavKey::Forward), 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn test_binding_outlives_dispatcher() {
        let deck = shared_deck(2);
        let mut binding = {
            let dispatcher = KeyDispatcher::new();
            dispatcher.bind(&deck)
        };
        assert!(!binding.is_active());
        binding.release();
    }
}
