//! The game session: everything that outlives a single room.
//!
//! A [`Session`] is created once when the game starts. It owns both
//! channels, the global countdown, the inventory, and the room selector,
//! plus the subscriptions that wire them together. Rooms never reach for
//! any of this as global state; they receive a [`SessionLinks`] bundle when
//! they are built.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use escapade_bus::{ClueId, CompletionFeed, CoordinationBus, Message, RoomId, Subscription};
use escapade_tick::GlobalTimer;

use crate::{
    Draw, HandshakeMode, Inventory, KeyAuthority, RoomSelector, SessionConfig, SessionError,
};

// ---------------------------------------------------------------------------
// SessionLinks
// ---------------------------------------------------------------------------

/// The session-level handles a room is built with.
///
/// All fields are cheap clones of shared handles.
#[derive(Clone)]
pub struct SessionLinks {
    pub bus: CoordinationBus,
    pub feed: CompletionFeed,
    pub global: GlobalTimer,
    /// Direct key authority. `None` means rooms use the bus handshake.
    pub authority: Option<Rc<dyn KeyAuthority>>,
}

impl SessionLinks {
    /// Links with fresh channels and no key authority, for running a room
    /// outside a full session.
    pub fn standalone(global: GlobalTimer) -> Self {
        Self {
            bus: CoordinationBus::new(),
            feed: CompletionFeed::new(),
            global,
            authority: None,
        }
    }

    pub fn with_authority(mut self, authority: Rc<dyn KeyAuthority>) -> Self {
        self.authority = Some(authority);
        self
    }
}

impl fmt::Debug for SessionLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLinks")
            .field("bus", &self.bus)
            .field("feed", &self.feed)
            .field("global", &self.global)
            .field("direct_authority", &self.authority.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Session-wide state, created once per game.
pub struct Session {
    config: SessionConfig,
    bus: CoordinationBus,
    feed: CompletionFeed,
    global: GlobalTimer,
    inventory: Rc<RefCell<Inventory>>,
    selector: Rc<RefCell<RoomSelector>>,
    /// Held so the listeners stay subscribed for the session's lifetime.
    _subscriptions: Vec<Subscription>,
}

impl Session {
    /// Starts a session over the given rooms.
    ///
    /// Subscribes the inventory to the coordination bus and the selector to
    /// the completion feed, then starts the global countdown.
    pub fn new(config: SessionConfig, rooms: impl IntoIterator<Item = RoomId>) -> Self {
        let bus = CoordinationBus::new();
        let feed = CompletionFeed::new();
        let global = GlobalTimer::from_secs(config.session_secs);

        let inventory = Rc::new(RefCell::new(Inventory::with_items(
            config.starting_items.iter().cloned(),
        )));
        let selector = Rc::new(RefCell::new(RoomSelector::new(&config.selector, rooms)));

        let mut subscriptions = Inventory::attach(&inventory, &bus);
        subscriptions.push(RoomSelector::attach(&selector, &feed));

        tracing::info!(
            session_secs = config.session_secs,
            handshake = ?config.handshake,
            rooms = selector.borrow().open_rooms().len(),
            "session started"
        );

        Self {
            config,
            bus,
            feed,
            global,
            inventory,
            selector,
            _subscriptions: subscriptions,
        }
    }

    /// Handles for building a room in this session.
    pub fn links(&self) -> SessionLinks {
        let authority: Option<Rc<dyn KeyAuthority>> = match self.config.handshake {
            HandshakeMode::Direct => Some(self.inventory.clone()),
            HandshakeMode::Bus => None,
        };
        SessionLinks {
            bus: self.bus.clone(),
            feed: self.feed.clone(),
            global: self.global.clone(),
            authority,
        }
    }

    /// Rolls the dice for the next room.
    pub fn roll(&self) -> Draw {
        self.selector.borrow_mut().choose()
    }

    /// Advances the session countdown by one frame.
    pub fn tick(&self, dt: Duration) {
        self.global.tick(dt);
    }

    /// Banks an item from outside any room (a reward, a cheat, a test
    /// fixture) by broadcasting it like a room would.
    pub fn bank(&self, item: ClueId) -> Result<(), SessionError> {
        self.bus.publish(Message::UpdateBank(item))?;
        Ok(())
    }

    pub fn holds(&self, item: &ClueId) -> bool {
        self.inventory.borrow().holds(item)
    }

    pub fn inventory(&self) -> Vec<ClueId> {
        self.inventory.borrow().items().to_vec()
    }

    pub fn weight(&self, room: RoomId) -> Result<u32, SessionError> {
        self.selector
            .borrow()
            .weight(room)
            .ok_or(SessionError::UnknownRoom(room))
    }

    pub fn is_solved(&self, room: RoomId) -> bool {
        self.selector.borrow().completions(room) > 0
    }

    pub fn all_solved(&self) -> bool {
        self.selector.borrow().is_exhausted()
    }

    pub fn bus(&self) -> &CoordinationBus {
        &self.bus
    }

    pub fn feed(&self) -> &CompletionFeed {
        &self.feed
    }

    pub fn global(&self) -> &GlobalTimer {
        &self.global
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("global", &self.global)
            .field("inventory", &self.inventory.borrow().items())
            .field("open_rooms", &self.selector.borrow().open_rooms())
            .finish()
    }
}
