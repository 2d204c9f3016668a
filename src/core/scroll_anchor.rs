//! Per-page scroll offset persistence.
//!
//! The anchor is a small state machine driven by the host's event loop:
//! `on_tick` after the first layout, `on_frame` on the next paint, `on_scroll`
//! for every scroll event and `poll` whenever the debounce deadline passes.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{Namespace, TimeBoxedStateStore};
use crate::constants::SCROLL_DEBOUNCE_MS;

/// The scrollable surface a page lives in.
pub trait Viewport {
    fn scroll_offset(&self) -> f64;

    fn scroll_to(&mut self, offset: f64);
}

/// How the user arrived at a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEntry {
    /// Followed a link or typed the address: start from the top.
    Fresh,
    /// Came back through history: put the page back where it was.
    Revisit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorPhase {
    /// Waiting for the first tick so content can lay out.
    PendingRestore,
    /// Offset forced once; reapplied on the next frame.
    Restoring { offset: f64 },
    Idle,
}

#[derive(Debug)]
pub struct ScrollAnchor {
    key: String,
    store: TimeBoxedStateStore,
    phase: AnchorPhase,
    debounce: Duration,
    save_deadline: Option<Instant>,
}

impl ScrollAnchor {
    /// Start tracking `key`. A fresh entry resets to the top immediately; a
    /// revisit schedules a restore for the next tick.
    pub fn attach(
        key: impl Into<String>,
        store: &TimeBoxedStateStore,
        entry: NavigationEntry,
        viewport: &mut impl Viewport,
    ) -> Self {
        let key = key.into();
        let phase = match entry {
            NavigationEntry::Fresh => {
                viewport.scroll_to(0.0);
                AnchorPhase::Idle
            }
            NavigationEntry::Revisit => AnchorPhase::PendingRestore,
        };
        debug!("Scroll anchor attached to {} ({:?})", key, entry);

        Self {
            key,
            store: store.in_namespace(Namespace::Scroll),
            phase,
            debounce: Duration::from_millis(SCROLL_DEBOUNCE_MS),
            save_deadline: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> AnchorPhase {
        self.phase
    }

    pub fn is_restoring(&self) -> bool {
        !matches!(self.phase, AnchorPhase::Idle)
    }

    /// The deferred restore attempt.
    pub fn on_tick(&mut self, viewport: &mut impl Viewport) {
        if self.phase != AnchorPhase::PendingRestore {
            return;
        }

        match self.store.load::<f64>(&self.key) {
            Some(offset) if offset.is_finite() && offset >= 0.0 => {
                debug!("Restoring {} to offset {}", self.key, offset);
                self.save_deadline = None;
                viewport.scroll_to(offset);
                self.phase = AnchorPhase::Restoring { offset };
            }
            _ => self.phase = AnchorPhase::Idle,
        }
    }

    /// Reapply the restored offset once layout has caught up, then go idle.
    pub fn on_frame(&mut self, viewport: &mut impl Viewport) {
        if let AnchorPhase::Restoring { offset } = self.phase {
            viewport.scroll_to(offset);
            self.phase = AnchorPhase::Idle;
        }
    }

    /// A scroll event. Schedules a debounced save unless a restore is under
    /// way. Returns whether a save is now scheduled.
    pub fn on_scroll(&mut self, now: Instant) -> bool {
        if self.is_restoring() {
            return false;
        }
        self.save_deadline = Some(now + self.debounce);
        true
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.save_deadline
    }

    /// Persist the offset if the debounce window has elapsed.
    pub fn poll(&mut self, now: Instant, viewport: &impl Viewport) -> bool {
        match self.save_deadline {
            Some(deadline) if deadline <= now && !self.is_restoring() => {
                self.save_deadline = None;
                self.save(viewport.scroll_offset());
                true
            }
            _ => false,
        }
    }

    /// Last-chance save on teardown: immediate, bypassing the debounce.
    pub fn flush(&mut self, viewport: &impl Viewport) {
        self.save_deadline = None;
        self.save(viewport.scroll_offset());
    }

    /// Navigating away: flush and stop tracking.
    pub fn detach(mut self, viewport: &impl Viewport) {
        self.flush(viewport);
        debug!("Scroll anchor detached from {}", self.key);
    }

    fn save(&self, offset: f64) {
        self.store.save(&self.key, &offset.max(0.0));
    }
}
