use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Property, PropertySubscriber};
use crate::backends::MetadataSource;
use crate::core::carousel::{CarouselEvent, CarouselMachine, CarouselTiming, Direction};
use crate::models::{MediaDetails, MediaSummary};
use crate::utils::TransportError;

/// What the hero carousel shows right now.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState {
    pub items: Vec<MediaSummary>,
    pub current_index: usize,
    pub transitioning: bool,
    pub direction: Direction,
    /// Detail of the focused item, once fetched. Keeps the previous value
    /// when a fetch fails.
    pub current_detail: Option<MediaDetails>,
}

impl CarouselState {
    pub fn current_item(&self) -> Option<&MediaSummary> {
        self.items.get(self.current_index)
    }

    /// The play-trailer control is enabled only for the detail of the item
    /// actually in focus.
    pub fn can_play_trailer(&self) -> bool {
        self.trailer_url().is_some()
    }

    pub fn trailer_url(&self) -> Option<url::Url> {
        let detail = self.current_detail.as_ref()?;
        let current = self.current_item()?;
        if detail.summary.id != current.id {
            return None;
        }
        detail.trailer().and_then(|video| video.watch_url())
    }
}

struct Inner {
    source: Arc<dyn MetadataSource>,
    machine: Mutex<CarouselMachine<MediaSummary>>,
    state: Property<CarouselState>,
    wake: Notify,
    detail_request: AtomicU64,
    cancel: CancellationToken,
}

/// Drives a [`CarouselMachine`] on real timers and keeps the focused item's
/// detail up to date.
pub struct CarouselViewModel {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CarouselViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselViewModel")
            .field("state", &self.inner.state)
            .field("cancelled", &self.inner.cancel.is_cancelled())
            .finish()
    }
}

impl CarouselViewModel {
    pub fn new(
        source: Arc<dyn MetadataSource>,
        items: Vec<MediaSummary>,
        timing: CarouselTiming,
    ) -> Self {
        let state = CarouselState {
            items: items.clone(),
            current_index: 0,
            transitioning: false,
            direction: Direction::Forward,
            current_detail: None,
        };

        Self {
            inner: Arc::new(Inner {
                source,
                machine: Mutex::new(CarouselMachine::new(items, timing, Instant::now())),
                state: Property::new(state, "carousel_state"),
                wake: Notify::new(),
                detail_request: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Load the featured list from `source` and build a carousel over it.
    pub async fn load(
        source: Arc<dyn MetadataSource>,
        timing: CarouselTiming,
        limit: Option<usize>,
    ) -> Result<Self, TransportError> {
        let mut items = source.fetch_featured().await?;
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        info!("Loaded {} featured items", items.len());
        Ok(Self::new(source, items, timing))
    }

    pub fn state(&self) -> CarouselState {
        self.inner.state.get()
    }

    pub fn property(&self) -> &Property<CarouselState> {
        &self.inner.state
    }

    pub fn subscribe(&self) -> PropertySubscriber<CarouselState> {
        self.inner.state.subscribe()
    }

    pub fn trailer_url(&self) -> Option<url::Url> {
        self.inner.state.with(CarouselState::trailer_url)
    }

    /// Spawn the timer loop and fetch the first item's detail.
    pub fn start(&self) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let first = inner.machine.lock().await.current_item().cloned();
            if let Some(item) = first {
                inner.fetch_detail(0, item);
            }
            inner.run().await;
        })
    }

    pub async fn next(&self) -> bool {
        self.navigate(|m, now| m.next(now)).await
    }

    pub async fn prev(&self) -> bool {
        self.navigate(|m, now| m.prev(now)).await
    }

    pub async fn select(&self, index: usize) -> bool {
        self.navigate(|m, now| m.select(index, now)).await
    }

    /// Stop autoplay and the timer loop. Detail fetches still in flight are
    /// discarded when they land.
    pub async fn shutdown(&self) {
        self.inner.machine.lock().await.stop();
        self.inner.cancel.cancel();
        debug!("Carousel shut down");
    }

    async fn navigate(
        &self,
        action: impl FnOnce(&mut CarouselMachine<MediaSummary>, Instant) -> bool,
    ) -> bool {
        if self.inner.cancel.is_cancelled() {
            return false;
        }

        let started = {
            let mut machine = self.inner.machine.lock().await;
            let started = action(&mut *machine, Instant::now());
            if started {
                self.inner.publish(&machine);
            }
            started
        };

        if started {
            self.inner.wake.notify_one();
        }
        started
    }
}

impl Drop for CarouselViewModel {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl Inner {
    async fn run(self: Arc<Self>) {
        loop {
            let deadline = self.machine.lock().await.next_deadline();

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = self.wake.notified() => {}
                _ = sleep_until_some(deadline) => {}
            }

            let changed = {
                let mut machine = self.machine.lock().await;
                let events = machine.poll(Instant::now());
                if !events.is_empty() {
                    self.publish(&machine);
                }

                events
                    .into_iter()
                    .filter_map(|event| match event {
                        CarouselEvent::IndexChanged { index } => {
                            machine.items().get(index).cloned().map(|item| (index, item))
                        }
                        CarouselEvent::Settled { .. } => None,
                    })
                    .collect::<Vec<_>>()
            };

            for (index, item) in changed {
                self.fetch_detail(index, item);
            }
        }
        debug!("Carousel driver stopped");
    }

    fn publish(&self, machine: &CarouselMachine<MediaSummary>) {
        let index = machine.current_index();
        let transitioning = machine.is_transitioning();
        let direction = machine.direction();

        self.state.update_if(|state| {
            let changed = state.current_index != index
                || state.transitioning != transitioning
                || state.direction != direction;
            state.current_index = index;
            state.transitioning = transitioning;
            state.direction = direction;
            changed
        });
    }

    fn fetch_detail(self: &Arc<Self>, index: usize, item: MediaSummary) {
        let request = self.detail_request.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.clone();

        tokio::spawn(async move {
            debug!("Fetching detail for {} ({})", item.title, item.id);
            let detail = match inner.source.fetch_detail(item.kind, item.id).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!("Error fetching detail for {}: {}", item.id, e);
                    return;
                }
            };

            // hold the machine so the index cannot move while committing
            let machine = inner.machine.lock().await;
            let latest = inner.detail_request.load(Ordering::SeqCst) == request;
            if inner.cancel.is_cancelled() || !latest || machine.current_index() != index {
                debug!("Discarding detail for {}, focus has moved on", item.id);
                return;
            }
            inner.state.update(|state| state.current_detail = Some(detail));
        });
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
