//! Autoplaying hero carousel as an explicit state machine.
//!
//! Time is passed in rather than read, so every transition can be exercised
//! with synthetic instants. An async driver lives in
//! `viewmodels::carousel_view_model`.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::constants::{
    AUTOPLAY_DELAY_MS, CONTENT_FADE_MS, MIN_AUTOPLAY_DELAY_MS, SLIDE_DURATION_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    /// Idle time before advancing on its own.
    pub autoplay: Duration,
    /// Delay from transition start until the new index is committed.
    pub content_fade: Duration,
    /// Total transition length.
    pub slide: Duration,
}

impl CarouselTiming {
    /// Same timings with the autoplay delay raised to the minimum, so an
    /// autoplay tick always lands strictly after the one before it.
    pub fn clamped(self) -> Self {
        Self {
            autoplay: self
                .autoplay
                .max(Duration::from_millis(MIN_AUTOPLAY_DELAY_MS)),
            ..self
        }
    }
}

impl Default for CarouselTiming {
    fn default() -> Self {
        Self {
            autoplay: Duration::from_millis(AUTOPLAY_DELAY_MS),
            content_fade: Duration::from_millis(CONTENT_FADE_MS),
            slide: Duration::from_millis(SLIDE_DURATION_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselPhase {
    Idle,
    Transitioning {
        target: usize,
        started_at: Instant,
        committed: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    /// `current_index` now points at `index`; its detail should be fetched.
    IndexChanged { index: usize },
    /// Transition finished, autoplay re-armed.
    Settled { index: usize },
}

#[derive(Debug, Clone)]
pub struct CarouselMachine<F> {
    items: Vec<F>,
    current: usize,
    phase: CarouselPhase,
    direction: Direction,
    timing: CarouselTiming,
    autoplay_at: Option<Instant>,
    stopped: bool,
}

impl<F> CarouselMachine<F> {
    pub fn new(items: Vec<F>, timing: CarouselTiming, now: Instant) -> Self {
        let timing = timing.clamped();
        let autoplay_at = (!items.is_empty()).then(|| now + timing.autoplay);
        Self {
            items,
            current: 0,
            phase: CarouselPhase::Idle,
            direction: Direction::Forward,
            timing,
            autoplay_at,
            stopped: false,
        }
    }

    pub fn items(&self) -> &[F] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> Option<&F> {
        self.items.get(self.current)
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, CarouselPhase::Transitioning { .. })
    }

    /// Direction of the latest transition, for animation.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn timing(&self) -> CarouselTiming {
        self.timing
    }

    pub fn next(&mut self, now: Instant) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let target = (self.current + 1) % self.items.len();
        self.start(target, Direction::Forward, now)
    }

    pub fn prev(&mut self, now: Instant) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let len = self.items.len();
        let target = (self.current + len - 1) % len;
        self.start(target, Direction::Backward, now)
    }

    /// Jump straight to an indicator.
    pub fn select(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.items.len() {
            return false;
        }
        let direction = if index > self.current {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.start(index, direction, now)
    }

    /// Cancel autoplay for good; used on teardown.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.autoplay_at = None;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// When `poll` next has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            CarouselPhase::Transitioning {
                started_at,
                committed,
                ..
            } => {
                if committed {
                    Some(started_at + self.timing.slide)
                } else {
                    Some(started_at + self.timing.content_fade.min(self.timing.slide))
                }
            }
            CarouselPhase::Idle => self.autoplay_at,
        }
    }

    /// Run every transition due at or before `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<CarouselEvent> {
        let mut events = Vec::new();

        loop {
            match self.phase {
                CarouselPhase::Transitioning {
                    target,
                    started_at,
                    committed,
                } => {
                    let settle_at = started_at + self.timing.slide;
                    if !committed && (now >= started_at + self.timing.content_fade || now >= settle_at)
                    {
                        self.current = target;
                        self.phase = CarouselPhase::Transitioning {
                            target,
                            started_at,
                            committed: true,
                        };
                        events.push(CarouselEvent::IndexChanged { index: target });
                        continue;
                    }
                    if committed && now >= settle_at {
                        self.phase = CarouselPhase::Idle;
                        if !self.stopped {
                            self.rearm(settle_at, now);
                        }
                        events.push(CarouselEvent::Settled { index: self.current });
                        continue;
                    }
                    break;
                }
                CarouselPhase::Idle => match self.autoplay_at {
                    Some(at) if now >= at => {
                        debug!("Autoplay advancing from {}", self.current);
                        let target = (self.current + 1) % self.items.len().max(1);
                        if !self.start(target, Direction::Forward, at) {
                            self.rearm(at, now);
                        }
                    }
                    _ => break,
                },
            }
        }

        events
    }

    /// Schedule the next autoplay tick one delay after `from`. Ticks missed
    /// while nobody polled are dropped rather than replayed.
    fn rearm(&mut self, from: Instant, now: Instant) {
        let next = from + self.timing.autoplay;
        self.autoplay_at = Some(if next > now {
            next
        } else {
            now + self.timing.autoplay
        });
    }

    fn start(&mut self, target: usize, direction: Direction, now: Instant) -> bool {
        if self.is_transitioning() || target == self.current {
            return false;
        }

        debug!("Carousel {} -> {} ({:?})", self.current, target, direction);
        self.direction = direction;
        self.autoplay_at = None;
        self.phase = CarouselPhase::Transitioning {
            target,
            started_at: now,
            committed: false,
        };
        true
    }
}
