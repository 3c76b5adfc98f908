use escapade::prelude::*;

// ---------------------------------------------------------------------------
// Console stage
// ---------------------------------------------------------------------------

/// Prints what a scene runtime would draw and play.
#[derive(Default)]
struct Console {
    last_second: Option<u64>,
}

impl Stage for Console {
    fn show_message(&mut self, text: &str, placement: Placement) {
        tracing::info!(?placement, "{text}");
    }

    fn show_popup(&mut self, image: &str) {
        tracing::info!(image, "popup shown");
    }

    fn dismiss_popup(&mut self, image: &str) {
        tracing::debug!(image, "popup dismissed");
    }

    fn play_sound(&mut self, cue: &str) {
        tracing::debug!(cue, "sound");
    }

    fn advance_to(&mut self, destination: Destination) {
        self.last_second = None;
        tracing::info!(%destination, "scene change");
    }

    fn update_countdown(&mut self, remaining: std::time::Duration) {
        let secs = remaining.as_secs();
        if self.last_second != Some(secs) && secs % 10 == 0 {
            tracing::debug!(room_timer = %format_clock(remaining), "tick");
        }
        self.last_second = Some(secs);
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

/// One thing the scripted player knows how to do in a room.
struct Move {
    room: RoomId,
    fixture: &'static str,
    yields: &'static str,
    needs: Option<&'static str>,
}

const PLAN: &[Move] = &[
    Move { room: RoomId(1), fixture: "gurney", yields: "glove", needs: None },
    Move { room: RoomId(1), fixture: "gasCannister", yields: "gasCannister", needs: None },
    Move { room: RoomId(1), fixture: "sink", yields: "soap", needs: None },
    Move { room: RoomId(1), fixture: "table", yields: "scapel", needs: None },
    Move { room: RoomId(3), fixture: "shelf", yields: "key", needs: None },
    Move { room: RoomId(7), fixture: "notebook", yields: "password", needs: None },
    Move { room: RoomId(7), fixture: "lockedDrawer", yields: "toeTag", needs: Some("key") },
    Move { room: RoomId(7), fixture: "boneSaw", yields: "bone saw", needs: None },
    Move { room: RoomId(7), fixture: "ghostDrawer", yields: "ghostDrawer", needs: None },
];

/// The next fixture to touch in `room`: the first unfinished move the
/// player can complete, else the first unfinished one.
fn next_move(game: &Game<Console>, room: RoomId) -> Option<&'static Move> {
    let done = |m: &Move| {
        game.ledger(room)
            .is_some_and(|l| l.contains(&ClueId::new(m.yields)))
    };
    let pending: Vec<&Move> = PLAN
        .iter()
        .filter(|m| m.room == room && !done(*m))
        .collect();
    pending
        .iter()
        .find(|m| m.needs.is_none_or(|item| game.session().holds(&ClueId::new(item))))
        .or(pending.first())
        .copied()
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

const MAX_VISITS: usize = 64;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    escapade::telemetry::init();

    let catalog = RoomCatalog::from_json(include_str!("../rooms.json"))?;
    let config = SessionConfig {
        selector: SelectorConfig {
            seed: std::env::var("ESCAPADE_SEED").ok().and_then(|s| s.parse().ok()),
            ..SelectorConfig::default()
        },
        ..SessionConfig::default()
    };
    let mut game = Game::new(config, catalog, Console::default());
    let mut clock = FrameClock::with_rate(60);

    for _ in 0..MAX_VISITS {
        if game.outcome().is_some() {
            break;
        }
        let Draw::Room(room) = game.roll()? else {
            break;
        };

        match next_move(&game, room) {
            Some(m) => {
                game.trigger(&FixtureId::from(m.fixture))?;
            }
            None => tracing::warn!(room_id = %room, "nothing left to do, waiting it out"),
        }

        // Let deferred steps play out until the room hands control back.
        while game.room().is_some() && game.outcome().is_none() {
            game.run(&mut clock, 1).await?;
        }
    }

    let status = game.status();
    match game.outcome() {
        Some(outcome) => tracing::info!(?outcome, "game over"),
        None => tracing::warn!(visits = MAX_VISITS, "walkthrough gave up"),
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
