//! Fixed-rate frame clock.
//!
//! The scene runtime normally owns the frame loop and calls the core once
//! per frame. When the core runs on its own (the demo, headless tests) the
//! [`FrameClock`] plays that role on top of Tokio's timer.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a frame fires late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    /// Schedule the next frame from now. Missed frames are skipped and
    /// reported in [`FrameInfo::frames_skipped`].
    #[default]
    Skip,
    /// Keep the nominal cadence; late frames fire back to back until the
    /// clock has caught up.
    Keep,
}

/// Configuration for a [`FrameClock`].
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Frames per second. 0 = manual mode (the clock never fires).
    pub frame_rate_hz: u32,
    /// Late-frame handling.
    pub policy: FramePolicy,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            policy: FramePolicy::default(),
        }
    }
}

impl FrameConfig {
    /// Maximum supported frame rate.
    pub const MAX_FRAME_RATE_HZ: u32 = 240;

    pub fn with_rate(frame_rate_hz: u32) -> Self {
        Self {
            frame_rate_hz,
            ..Default::default()
        }
    }

    /// Duration of one frame, or `None` in manual mode.
    pub fn frame_duration(&self) -> Option<Duration> {
        match self.frame_rate_hz {
            0 => None,
            hz => Some(Duration::from_secs_f64(1.0 / hz.min(Self::MAX_FRAME_RATE_HZ) as f64)),
        }
    }
}

// ---------------------------------------------------------------------------
// FrameInfo
// ---------------------------------------------------------------------------

/// What the clock reports for each frame.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Fixed delta for this frame. Timers tick by this amount, never by
    /// wall-clock time, so a run is reproducible.
    pub dt: Duration,
    /// `true` if the frame fired more than 10% of a frame late.
    pub late: bool,
    /// Frames dropped before this one under [`FramePolicy::Skip`].
    pub frames_skipped: u64,
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Drives the per-frame tick of a running game.
pub struct FrameClock {
    config: FrameConfig,
    frame_duration: Option<Duration>,
    frame_count: u64,
    next_frame: Option<Instant>,
    paused: bool,
}

impl FrameClock {
    pub fn new(config: FrameConfig) -> Self {
        if config.frame_rate_hz > FrameConfig::MAX_FRAME_RATE_HZ {
            warn!(
                rate = config.frame_rate_hz,
                max = FrameConfig::MAX_FRAME_RATE_HZ,
                "frame rate exceeds maximum, clamping"
            );
        }
        let frame_duration = config.frame_duration();
        let next_frame = frame_duration.map(|d| Instant::now() + d);

        debug!(
            rate_hz = config.frame_rate_hz,
            policy = ?config.policy,
            "frame clock created"
        );

        Self {
            config,
            frame_duration,
            frame_count: 0,
            next_frame,
            paused: false,
        }
    }

    pub fn with_rate(frame_rate_hz: u32) -> Self {
        Self::new(FrameConfig::with_rate(frame_rate_hz))
    }

    /// Waits for the next frame.
    ///
    /// In manual mode or while paused this never resolves; use it inside
    /// `tokio::select!` next to other branches.
    pub async fn next_frame(&mut self) -> FrameInfo {
        let (due, dt) = match (self.next_frame, self.frame_duration) {
            (Some(due), Some(dt)) if !self.paused => (due, dt),
            _ => std::future::pending().await,
        };

        time::sleep_until(due).await;

        let now = Instant::now();
        self.frame_count += 1;

        let late_by = now.saturating_duration_since(due);
        let late = late_by > dt / 10;
        let mut frames_skipped = 0;

        self.next_frame = Some(match self.config.policy {
            FramePolicy::Skip => {
                if late {
                    frames_skipped = (late_by.as_nanos() / dt.as_nanos()) as u64;
                    if frames_skipped > 0 {
                        warn!(
                            frame = self.frame_count,
                            skipped = frames_skipped,
                            late_ms = late_by.as_secs_f64() * 1000.0,
                            "frame overrun, skipping ahead"
                        );
                    }
                }
                now + dt
            }
            FramePolicy::Keep => due + dt,
        });

        trace!(frame = self.frame_count, late, "frame");

        FrameInfo {
            frame: self.frame_count,
            dt,
            late,
            frames_skipped,
        }
    }

    /// Stops frames until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(frame = self.frame_count, "frame clock paused");
        }
    }

    /// Resumes after a pause, one full frame from now, with no burst of
    /// catch-up frames for the paused time.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if let Some(dt) = self.frame_duration {
                self.next_frame = Some(Instant::now() + dt);
            }
            debug!(frame = self.frame_count, "frame clock resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_manual(&self) -> bool {
        self.frame_duration.is_none()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_rate_hz(&self) -> u32 {
        self.config.frame_rate_hz
    }

    pub fn frame_duration(&self) -> Option<Duration> {
        self.frame_duration
    }
}
