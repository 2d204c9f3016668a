//! Boundary sensors: turn "the end of the list came into view" into signals.
//!
//! Consumers only ever see [`BoundarySignals`]; whether the signals come from
//! viewport geometry ([`VisibilityTrigger`]) or are fired by hand
//! ([`ManualTrigger`]) is up to whoever builds the sensor.

use tokio::sync::mpsc;
use tracing::debug;

use crate::constants::{SENTINEL_ROOT_MARGIN_PX, SENTINEL_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    /// Pixels added above and below the viewport, so the sentinel counts as
    /// visible before it is actually on screen.
    pub root_margin: f64,
    /// Minimum fraction of the sentinel that must intersect.
    pub threshold: f64,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            root_margin: SENTINEL_ROOT_MARGIN_PX,
            threshold: SENTINEL_THRESHOLD,
        }
    }
}

/// Vertical extent in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
}

impl Span {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn expanded(&self, margin: f64) -> Self {
        Self::new(self.top - margin, self.bottom + margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySignal {
    /// 1-based count of signals emitted by the sensor.
    pub sequence: u64,
}

/// Receiving end of a boundary sensor.
#[derive(Debug)]
pub struct BoundarySignals {
    receiver: mpsc::UnboundedReceiver<BoundarySignal>,
}

impl BoundarySignals {
    fn channel() -> (mpsc::UnboundedSender<BoundarySignal>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }

    /// Next signal, or `None` once the sensor is gone.
    pub async fn next(&mut self) -> Option<BoundarySignal> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<BoundarySignal> {
        self.receiver.try_recv().ok()
    }
}

/// Geometry-driven sentinel watcher. Fires once per transition into view.
#[derive(Debug)]
pub struct VisibilityTrigger {
    options: VisibilityOptions,
    sender: mpsc::UnboundedSender<BoundarySignal>,
    visible: bool,
    fired: u64,
}

impl VisibilityTrigger {
    pub fn new(options: VisibilityOptions) -> (Self, BoundarySignals) {
        let (sender, signals) = BoundarySignals::channel();
        (
            Self {
                options,
                sender,
                visible: false,
                fired: 0,
            },
            signals,
        )
    }

    /// Fraction of the sentinel inside the margin-expanded viewport.
    pub fn intersection_ratio(&self, viewport: Span, sentinel: Span) -> f64 {
        let root = viewport.expanded(self.options.root_margin);
        let overlap = root.bottom.min(sentinel.bottom) - root.top.max(sentinel.top);

        if sentinel.height() <= 0.0 {
            return if sentinel.top >= root.top && sentinel.top <= root.bottom {
                1.0
            } else {
                0.0
            };
        }
        (overlap / sentinel.height()).clamp(0.0, 1.0)
    }

    /// Feed the latest viewport and sentinel positions. Returns `true` when
    /// this observation emitted a signal.
    pub fn observe(&mut self, viewport: Span, sentinel: Span) -> bool {
        let ratio = self.intersection_ratio(viewport, sentinel);
        let visible = ratio > 0.0 && ratio >= self.options.threshold;
        let entered = visible && !self.visible;
        self.visible = visible;

        if entered {
            self.fired += 1;
            debug!("Sentinel entered view (ratio {:.2})", ratio);
            return self
                .sender
                .send(BoundarySignal {
                    sequence: self.fired,
                })
                .is_ok();
        }
        false
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}

/// Sensor fired explicitly, for tests and non-visual front ends.
#[derive(Debug)]
pub struct ManualTrigger {
    sender: mpsc::UnboundedSender<BoundarySignal>,
    fired: u64,
}

impl ManualTrigger {
    pub fn new() -> (Self, BoundarySignals) {
        let (sender, signals) = BoundarySignals::channel();
        (Self { sender, fired: 0 }, signals)
    }

    /// Returns `false` if nobody is listening any more.
    pub fn fire(&mut self) -> bool {
        self.fired += 1;
        self.sender
            .send(BoundarySignal {
                sequence: self.fired,
            })
            .is_ok()
    }
}
