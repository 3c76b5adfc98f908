//! Integration tests for rooms running inside a session, using a
//! recording stage in place of the scene runtime.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use escapade_bus::{ClueId, Destination, FixtureId, RoomId};
use escapade_room::{
    AddOutcome, ClueLedger, ClueSpec, FixtureSpec, LedgerError, Placement, Room, RoomConfig,
    RoomCtx, RoomError, RoomHooks, RoomPhase, Stage, Step, TriggerOutcome,
};
use escapade_session::{HandshakeMode, SelectorConfig, Session, SessionConfig, SessionLinks};
use escapade_tick::GlobalTimer;

// =========================================================================
// Recording stage
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Message(String, Placement),
    Popup(String),
    Dismiss(String),
    Sound(String),
    Advance(Destination),
}

#[derive(Debug, Default)]
struct Recorder {
    shown: Vec<Shown>,
    countdown: Option<Duration>,
}

impl Recorder {
    fn advances(&self) -> Vec<Destination> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Advance(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    fn saw(&self, item: &Shown) -> bool {
        self.shown.contains(item)
    }
}

impl Stage for Recorder {
    fn show_message(&mut self, text: &str, placement: Placement) {
        self.shown.push(Shown::Message(text.to_string(), placement));
    }

    fn show_popup(&mut self, image: &str) {
        self.shown.push(Shown::Popup(image.to_string()));
    }

    fn dismiss_popup(&mut self, image: &str) {
        self.shown.push(Shown::Dismiss(image.to_string()));
    }

    fn play_sound(&mut self, cue: &str) {
        self.shown.push(Shown::Sound(cue.to_string()));
    }

    fn advance_to(&mut self, destination: Destination) {
        self.shown.push(Shown::Advance(destination));
    }

    fn update_countdown(&mut self, remaining: Duration) {
        self.countdown = Some(remaining);
    }
}

// =========================================================================
// Rooms
// =========================================================================

fn clue(id: &str) -> ClueId {
    ClueId::new(id)
}

fn collect(id: &str) -> Step {
    Step::Collect { clue: clue(id) }
}

fn message(text: &str, placement: Placement) -> Step {
    Step::Message {
        text: text.to_string(),
        placement,
    }
}

fn to_hub() -> Step {
    Step::AdvanceTo {
        destination: Destination::Hub,
    }
}

fn morgue() -> RoomConfig {
    let mut config = RoomConfig::new(RoomId(7), "Morgue", 4);
    config.clues = vec![
        ClueSpec::new("password").with_popup("password").with_sound("photo"),
        ClueSpec::new("toeTag").with_popup("toeTag"),
        ClueSpec::new("bone saw").silent(),
        ClueSpec::new("ghostDrawer").silent(),
    ];
    config.fixtures = vec![
        FixtureSpec::new(
            "notebook",
            vec![
                Step::Sound {
                    cue: "notebook".into(),
                },
                message("On the back... who's this??", Placement::Top),
                Step::Wait { ms: 3000 },
                collect("password"),
                to_hub(),
            ],
        ),
        FixtureSpec::new(
            "lockedDrawer",
            vec![
                Step::Sound {
                    cue: "body locker".into(),
                },
                Step::CheckKey {
                    item: clue("key"),
                    unlocked: vec![
                        message("The key from the pharmacy fits.", Placement::Top),
                        Step::Wait { ms: 3000 },
                        collect("toeTag"),
                        to_hub(),
                    ],
                    locked: vec![
                        message("Why would a body drawer need to be locked?", Placement::Center),
                        to_hub(),
                    ],
                },
            ],
        ),
        FixtureSpec::new(
            "ghostDrawer",
            vec![
                message("How dare you bother the dead?", Placement::Center),
                Step::Penalize { secs: 300 },
                collect("ghostDrawer"),
                to_hub(),
            ],
        ),
        FixtureSpec::new(
            "boneSaw",
            vec![
                message("To be sawed or not to be?", Placement::Center),
                collect("bone saw"),
                to_hub(),
            ],
        ),
    ];
    config.on_expire = vec![message("Time's up!", Placement::Center), to_hub()];
    config
}

fn surgery() -> RoomConfig {
    let mut config = RoomConfig::new(RoomId(1), "Surgery", 4);
    config.clues = vec![
        ClueSpec::new("glove").with_popup("glove"),
        ClueSpec::new("gasCannister").silent(),
        ClueSpec::new("soap").with_popup("soap"),
        ClueSpec::new("scapel").with_popup("scapel"),
    ];
    config.fixtures = vec![
        FixtureSpec::new("gurney", vec![collect("glove"), to_hub()]),
        FixtureSpec::new(
            "cabinet",
            vec![Step::CheckKey {
                item: clue("key"),
                unlocked: vec![message("The cabinet opens.", Placement::Top)],
                locked: vec![message("It's locked.", Placement::Center), to_hub()],
            }],
        ),
    ];
    config
}

fn session(handshake: HandshakeMode, starting: &[&str]) -> Session {
    let config = SessionConfig {
        session_secs: 120,
        handshake,
        starting_items: starting.iter().map(|s| clue(s)).collect(),
        selector: SelectorConfig {
            seed: Some(1),
            ..SelectorConfig::default()
        },
    };
    Session::new(config, [RoomId(1), RoomId(7)])
}

fn feed_log(session: &Session) -> (Rc<RefCell<Vec<RoomId>>>, escapade_bus::Subscription) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sub = {
        let log = Rc::clone(&log);
        session.feed().subscribe(move |room| log.borrow_mut().push(*room))
    };
    (log, sub)
}

/// One visit: enter, touch `fixture`, let scripts play out, leave.
fn visit(
    links: SessionLinks,
    config: &RoomConfig,
    ledger: ClueLedger,
    fixture: &str,
    stage: &mut Recorder,
) -> Room {
    let mut room = Room::resume(config.clone(), links, ledger).unwrap();
    let outcome = room.trigger(&FixtureId::from(fixture), stage).unwrap();
    assert_eq!(outcome, TriggerOutcome::Handled);
    for _ in 0..10 {
        room.tick(Duration::from_millis(500), stage).unwrap();
    }
    room
}

// =========================================================================
// Completion
// =========================================================================

#[test]
fn test_morgue_completes_on_fourth_clue_only() {
    let session = session(HandshakeMode::Direct, &["key"]);
    let (completions, _sub) = feed_log(&session);
    let config = morgue();
    let mut stage = Recorder::default();

    let mut ledger = ClueLedger::new(4);
    for fixture in ["notebook", "lockedDrawer", "boneSaw"] {
        let room = visit(session.links(), &config, ledger, fixture, &mut stage);
        assert_eq!(room.phase(), RoomPhase::Exited);
        assert!(!room.is_complete());
        ledger = room.into_ledger();
    }
    assert_eq!(
        ledger.clues(),
        &[clue("password"), clue("toeTag"), clue("bone saw")]
    );
    assert!(completions.borrow().is_empty());
    assert_eq!(session.weight(RoomId(7)).unwrap(), 1);

    let room = visit(session.links(), &config, ledger, "ghostDrawer", &mut stage);
    assert!(room.is_complete());
    assert_eq!(*completions.borrow(), vec![RoomId(7)]);
    assert_eq!(session.weight(RoomId(7)).unwrap(), 0);

    // Only broadcast clues reached the inventory.
    assert!(session.holds(&clue("password")));
    assert!(session.holds(&clue("toeTag")));
    assert!(!session.holds(&clue("bone saw")));
    assert_eq!(stage.advances().len(), 4);
}

#[test]
fn test_completion_fires_once_across_revisits() {
    let session = session(HandshakeMode::Direct, &[]);
    let (completions, _sub) = feed_log(&session);
    let mut config = morgue();
    config.required_clues = 1;
    let mut stage = Recorder::default();

    let room = visit(session.links(), &config, ClueLedger::new(1), "boneSaw", &mut stage);
    let ledger = room.into_ledger();

    // Touching the same fixture again is a duplicate, not a second completion.
    let room = visit(session.links(), &config, ledger, "boneSaw", &mut stage);
    assert!(room.is_complete());
    assert_eq!(*completions.borrow(), vec![RoomId(7)]);
}

#[test]
fn test_new_clue_on_full_ledger_fails_loudly() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut config = morgue();
    config.required_clues = 1;
    let mut stage = Recorder::default();

    let room = visit(session.links(), &config, ClueLedger::new(1), "boneSaw", &mut stage);
    let ledger = room.into_ledger();

    let mut room = Room::resume(config, session.links(), ledger).unwrap();
    let err = room
        .trigger(&FixtureId::from("ghostDrawer"), &mut stage)
        .unwrap_err();
    assert!(matches!(
        err,
        RoomError::Ledger(LedgerError::Overflow { required: 1, .. })
    ));
}

#[test]
fn test_refused_clue_has_no_effect_and_room_leaves() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut config = morgue();
    config.required_clues = 1;
    config.fixtures.push(FixtureSpec::new(
        "drawer",
        vec![Step::Penalize { secs: 10 }, collect("toeTag"), to_hub()],
    ));
    let mut stage = Recorder::default();

    let room = visit(session.links(), &config, ClueLedger::new(1), "notebook", &mut stage);
    let ledger = room.into_ledger();
    assert_eq!(ledger.clues(), &[clue("password")]);

    let mut stage = Recorder::default();
    let mut room = Room::resume(config, session.links(), ledger).unwrap();
    let err = room.trigger(&FixtureId::from("drawer"), &mut stage).unwrap_err();
    assert!(matches!(
        err,
        RoomError::Ledger(LedgerError::Overflow { required: 1, .. })
    ));

    // Nothing about toeTag leaked out of the room.
    assert!(!session.holds(&clue("toeTag")));
    assert!(!stage.saw(&Shown::Popup("toeTag".into())));
    assert_eq!(room.ledger().clues(), &[clue("password")]);

    // The room handed control back instead of sitting frozen.
    assert_eq!(room.phase(), RoomPhase::Exited);
    assert_eq!(room.exit(), Some(Destination::Hub));
    assert_eq!(stage.advances(), vec![Destination::Hub]);
}

// =========================================================================
// Key checks
// =========================================================================

#[test]
fn test_bus_check_key_without_listener_takes_locked_branch() {
    let links = SessionLinks::standalone(GlobalTimer::from_secs(60));
    assert!(links.authority.is_none());
    let mut stage = Recorder::default();

    let mut room = Room::new(surgery(), links).unwrap();
    room.trigger(&FixtureId::from("cabinet"), &mut stage).unwrap();

    assert!(stage.saw(&Shown::Message("It's locked.".into(), Placement::Center)));
    assert_eq!(stage.advances(), vec![Destination::Hub]);
    assert_eq!(room.phase(), RoomPhase::Exited);
}

#[test]
fn test_bus_check_key_with_inventory_listener() {
    let session = session(HandshakeMode::Bus, &["key"]);
    let mut stage = Recorder::default();

    let mut room = Room::new(surgery(), session.links()).unwrap();
    room.trigger(&FixtureId::from("cabinet"), &mut stage).unwrap();

    assert!(stage.saw(&Shown::Message("The cabinet opens.".into(), Placement::Top)));
    assert!(stage.advances().is_empty());
    assert_eq!(room.phase(), RoomPhase::Running);
}

#[test]
fn test_direct_check_key_without_item_is_locked() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();

    let room = visit(session.links(), &morgue(), ClueLedger::new(4), "lockedDrawer", &mut stage);
    assert!(room.ledger().is_empty());
    assert!(stage.saw(&Shown::Message(
        "Why would a body drawer need to be locked?".into(),
        Placement::Center
    )));
}

// =========================================================================
// Triggers, deferred actions, expiry
// =========================================================================

#[test]
fn test_first_trigger_freezes_input() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();
    let mut room = Room::new(morgue(), session.links()).unwrap();

    let notebook = FixtureId::from("notebook");
    assert_eq!(room.trigger(&notebook, &mut stage).unwrap(), TriggerOutcome::Handled);
    assert!(room.is_frozen());
    assert_eq!(room.trigger(&notebook, &mut stage).unwrap(), TriggerOutcome::Ignored);
    assert_eq!(
        room.trigger(&FixtureId::from("boneSaw"), &mut stage).unwrap(),
        TriggerOutcome::Ignored
    );
    assert!(room.ledger().is_empty());
}

#[test]
fn test_teardown_cancels_pending_script() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();
    let mut room = Room::new(morgue(), session.links()).unwrap();

    room.trigger(&FixtureId::from("notebook"), &mut stage).unwrap();
    assert_eq!(room.pending(), 1);

    // Leave before the wait elapses: the password is never handed out.
    let ledger = room.into_ledger();
    assert!(ledger.is_empty());
    assert!(!session.holds(&clue("password")));
    assert!(!stage.saw(&Shown::Popup("password".into())));
}

#[test]
fn test_wait_resumes_script_and_exit_drops_popup_dismissal() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();
    let mut room = Room::new(morgue(), session.links()).unwrap();

    room.trigger(&FixtureId::from("notebook"), &mut stage).unwrap();
    room.tick(Duration::from_millis(2999), &mut stage).unwrap();
    assert!(room.ledger().is_empty());

    room.tick(Duration::from_millis(1), &mut stage).unwrap();
    assert_eq!(room.ledger().clues(), &[clue("password")]);
    assert!(stage.saw(&Shown::Sound("photo".into())));
    assert!(stage.saw(&Shown::Popup("password".into())));
    assert_eq!(room.exit(), Some(Destination::Hub));
    assert_eq!(room.pending(), 0);

    room.tick(Duration::from_secs(5), &mut stage).unwrap();
    assert!(!stage.saw(&Shown::Dismiss("password".into())));
}

#[test]
fn test_popup_dismissed_after_delay() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut config = surgery();
    config.fixtures.push(FixtureSpec::new(
        "sink",
        vec![Step::Popup {
            image: "soap".into(),
            dismiss_after_ms: 1000,
        }],
    ));
    let mut stage = Recorder::default();
    let mut room = Room::new(config, session.links()).unwrap();

    room.trigger(&FixtureId::from("sink"), &mut stage).unwrap();
    room.tick(Duration::from_millis(999), &mut stage).unwrap();
    assert!(!stage.saw(&Shown::Dismiss("soap".into())));
    room.tick(Duration::from_millis(1), &mut stage).unwrap();
    assert!(stage.saw(&Shown::Dismiss("soap".into())));
}

#[test]
fn test_expiry_runs_on_expire_script_once() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut config = morgue();
    config.countdown_secs = 1;
    config.on_expire = vec![
        message("Time's up!", Placement::Center),
        Step::Wait { ms: 1000 },
        to_hub(),
    ];
    let mut stage = Recorder::default();
    let mut room = Room::new(config, session.links()).unwrap();

    room.tick(Duration::from_millis(500), &mut stage).unwrap();
    assert_eq!(stage.countdown, Some(Duration::from_millis(500)));
    room.tick(Duration::from_millis(500), &mut stage).unwrap();
    assert_eq!(room.phase(), RoomPhase::Expired);
    assert_eq!(stage.countdown, Some(Duration::ZERO));

    // Triggers are ignored once the countdown ran out.
    assert_eq!(
        room.trigger(&FixtureId::from("boneSaw"), &mut stage).unwrap(),
        TriggerOutcome::Ignored
    );

    room.tick(Duration::from_millis(1000), &mut stage).unwrap();
    assert_eq!(room.phase(), RoomPhase::Exited);
    assert_eq!(stage.advances(), vec![Destination::Hub]);

    let times_up = Shown::Message("Time's up!".into(), Placement::Center);
    assert_eq!(stage.shown.iter().filter(|s| **s == times_up).count(), 1);
}

#[test]
fn test_expiry_without_script_returns_to_hub() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut config = morgue();
    config.countdown_secs = 1;
    config.on_expire = Vec::new();
    let mut stage = Recorder::default();
    let mut room = Room::new(config, session.links()).unwrap();

    room.tick(Duration::from_secs(5), &mut stage).unwrap();

    assert_eq!(room.phase(), RoomPhase::Exited);
    assert_eq!(room.exit(), Some(Destination::Hub));
    assert_eq!(stage.advances(), vec![Destination::Hub]);
}

#[test]
fn test_ghost_drawer_penalty_goes_negative() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();

    visit(session.links(), &morgue(), ClueLedger::new(4), "ghostDrawer", &mut stage);

    assert_eq!(session.global().remaining_secs(), 120 - 300);
    assert!(session.global().is_expired());
}

#[test]
fn test_trigger_after_exit_is_invalid() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();
    let mut room = visit(session.links(), &morgue(), ClueLedger::new(4), "boneSaw", &mut stage);

    let err = room
        .trigger(&FixtureId::from("notebook"), &mut stage)
        .unwrap_err();
    assert!(matches!(err, RoomError::InvalidState(_)));
}

#[test]
fn test_unknown_fixture_and_config_errors() {
    let session = session(HandshakeMode::Direct, &[]);
    let mut stage = Recorder::default();
    let mut room = Room::new(morgue(), session.links()).unwrap();

    let err = room.trigger(&FixtureId::from("elevator"), &mut stage).unwrap_err();
    assert!(matches!(err, RoomError::UnknownFixture(RoomId(7), _)));

    let mut broken = morgue();
    broken.required_clues = 9;
    assert!(matches!(
        Room::new(broken, session.links()).unwrap_err(),
        RoomError::Config(_)
    ));

    let err = Room::resume(morgue(), session.links(), ClueLedger::new(2)).unwrap_err();
    assert!(matches!(err, RoomError::InvalidState(_)));
}

// =========================================================================
// Custom hooks
// =========================================================================

#[derive(Default)]
struct Counting {
    completions: Rc<RefCell<u32>>,
}

impl RoomHooks for Counting {
    fn on_trigger(&mut self, fixture: &FixtureId, ctx: &mut RoomCtx<'_>) -> Result<(), RoomError> {
        // Every fixture in this room hands out every clue at once.
        if fixture.0 == "gurney" {
            for id in ["glove", "gasCannister", "soap", "scapel", "glove"] {
                ctx.collect(&clue(id))?;
            }
            return Ok(());
        }
        let script = ctx.fixture_script(fixture)?;
        ctx.run(&script)
    }

    fn on_complete(&mut self, ctx: &mut RoomCtx<'_>) -> Result<(), RoomError> {
        *self.completions.borrow_mut() += 1;
        assert!(ctx.ledger().is_complete());
        ctx.show("Surgery solved", Placement::Top);
        ctx.advance_to(Destination::Hub);
        Ok(())
    }
}

#[test]
fn test_custom_hooks_see_completion_once() {
    let session = session(HandshakeMode::Direct, &[]);
    let (feed, _sub) = feed_log(&session);
    let hooks = Counting::default();
    let completions = Rc::clone(&hooks.completions);
    let mut stage = Recorder::default();

    let mut room = Room::new(surgery(), session.links()).unwrap().with_hooks(hooks);
    room.trigger(&FixtureId::from("gurney"), &mut stage).unwrap();

    assert_eq!(*completions.borrow(), 1);
    assert_eq!(*feed.borrow(), vec![RoomId(1)]);
    assert_eq!(room.exit(), Some(Destination::Hub));
    assert!(stage.saw(&Shown::Message("Surgery solved".into(), Placement::Top)));
    assert!(session.holds(&clue("scapel")));
    assert!(!session.holds(&clue("gasCannister")));
}

#[test]
fn test_ctx_collect_reports_outcome() {
    struct Outcomes(Rc<RefCell<Vec<AddOutcome>>>);
    impl RoomHooks for Outcomes {
        fn on_trigger(&mut self, _: &FixtureId, ctx: &mut RoomCtx<'_>) -> Result<(), RoomError> {
            let first = ctx.collect(&clue("glove"))?;
            let again = ctx.collect(&clue("glove"))?;
            self.0.borrow_mut().extend([first, again]);
            Ok(())
        }
    }

    let session = session(HandshakeMode::Direct, &[]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut stage = Recorder::default();
    let mut room = Room::new(surgery(), session.links())
        .unwrap()
        .with_hooks(Outcomes(Rc::clone(&seen)));

    room.trigger(&FixtureId::from("gurney"), &mut stage).unwrap();
    assert_eq!(*seen.borrow(), vec![AddOutcome::Added, AddOutcome::Duplicate]);
}
