//! The player's inventory: every clue banked across rooms.
//!
//! The inventory is the session-level listener on the coordination bus. It
//! records `update-bank` broadcasts and answers `check-key` requests, either
//! over the bus or through a direct [`KeyAuthority`] call.

use std::cell::RefCell;
use std::rc::Rc;

use escapade_bus::{ClueId, CoordinationBus, Message, Subscription, Topic};

/// Answers "does the player hold this item?" with a direct call.
pub trait KeyAuthority {
    fn holds(&self, item: &ClueId) -> bool;
}

/// Banked clues in the order they were first banked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<ClueId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = ClueId>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            inventory.bank(item);
        }
        inventory
    }

    /// Adds `item`. Returns `false` if it was already banked.
    pub fn bank(&mut self, item: ClueId) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        tracing::info!(%item, "item banked");
        self.items.push(item);
        true
    }

    pub fn holds(&self, item: &ClueId) -> bool {
        self.items.contains(item)
    }

    pub fn items(&self) -> &[ClueId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subscribes a shared inventory to `update-bank` and `check-key`.
    ///
    /// The `check-key` handler replies with `confirmation-check` on the same
    /// bus, inside the requester's publish.
    pub fn attach(inventory: &Rc<RefCell<Self>>, bus: &CoordinationBus) -> Vec<Subscription> {
        let bank = {
            let inventory = Rc::clone(inventory);
            bus.subscribe(Topic::UpdateBank, move |msg| {
                if let Message::UpdateBank(clue) = msg {
                    inventory.borrow_mut().bank(clue.clone());
                }
            })
        };

        let check = {
            let inventory = Rc::clone(inventory);
            let reply_to = bus.downgrade();
            bus.subscribe(Topic::CheckKey, move |msg| {
                let Message::CheckKey(item) = msg else {
                    return;
                };
                let held = inventory.borrow().holds(item);
                tracing::debug!(%item, held, "key check answered");
                let Some(bus) = reply_to.upgrade() else {
                    return;
                };
                if let Err(e) = bus.publish(Message::ConfirmationCheck(held)) {
                    tracing::error!(error = %e, %item, "confirmation reply failed");
                }
            })
        };

        vec![bank, check]
    }
}

impl KeyAuthority for RefCell<Inventory> {
    fn holds(&self, item: &ClueId) -> bool {
        self.borrow().holds(item)
    }
}
