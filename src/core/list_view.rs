//! Headless list surface: fixed-height rows in a scrollable viewport, with
//! the load-more sentinel just below the last row.
//!
//! `ListView` ties the surface to a [`ScrollAnchor`] and a
//! [`VisibilityTrigger`] so a front end without real layout can still drive
//! scroll persistence and boundary signals the same way a graphical one does.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::TimeBoxedStateStore;
use crate::constants::{LIST_ROW_HEIGHT_PX, LIST_VIEWPORT_HEIGHT_PX, SCROLL_DEBOUNCE_MS};
use crate::core::scroll_anchor::{NavigationEntry, ScrollAnchor, Viewport};
use crate::core::visibility::{BoundarySignals, Span, VisibilityOptions, VisibilityTrigger};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    pub row_height: f64,
    pub viewport_height: f64,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            row_height: LIST_ROW_HEIGHT_PX,
            viewport_height: LIST_VIEWPORT_HEIGHT_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListViewOptions {
    pub layout: ListLayout,
    pub visibility: VisibilityOptions,
    pub scroll_debounce: Duration,
}

impl Default for ListViewOptions {
    fn default() -> Self {
        Self {
            layout: ListLayout::default(),
            visibility: VisibilityOptions::default(),
            scroll_debounce: Duration::from_millis(SCROLL_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListSurface {
    layout: ListLayout,
    rows: usize,
    offset: f64,
}

impl ListSurface {
    pub fn new(layout: ListLayout, rows: usize) -> Self {
        Self {
            layout,
            rows,
            offset: 0.0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn content_height(&self) -> f64 {
        self.rows as f64 * self.layout.row_height
    }

    pub fn max_offset(&self) -> f64 {
        (self.content_height() - self.layout.viewport_height).max(0.0)
    }

    pub fn visible(&self) -> Span {
        Span::new(self.offset, self.offset + self.layout.viewport_height)
    }

    pub fn sentinel(&self) -> Span {
        let top = self.content_height();
        Span::new(top, top + 1.0)
    }
}

impl Viewport for ListSurface {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset());
    }
}

#[derive(Debug)]
pub struct ListView {
    surface: ListSurface,
    anchor: ScrollAnchor,
    trigger: VisibilityTrigger,
}

impl ListView {
    /// Lay out `rows` rows and attach scroll persistence under `key`. A
    /// revisit gets its saved offset back before this returns.
    pub fn open(
        key: impl Into<String>,
        store: &TimeBoxedStateStore,
        entry: NavigationEntry,
        rows: usize,
        options: ListViewOptions,
    ) -> (Self, BoundarySignals) {
        let mut surface = ListSurface::new(options.layout, rows);
        let mut anchor = ScrollAnchor::attach(key, store, entry, &mut surface)
            .with_debounce(options.scroll_debounce);
        anchor.on_tick(&mut surface);
        anchor.on_frame(&mut surface);

        let (trigger, signals) = VisibilityTrigger::new(options.visibility);
        (
            Self {
                surface,
                anchor,
                trigger,
            },
            signals,
        )
    }

    pub fn surface(&self) -> &ListSurface {
        &self.surface
    }

    pub fn offset(&self) -> f64 {
        self.surface.scroll_offset()
    }

    pub fn trigger(&self) -> &VisibilityTrigger {
        &self.trigger
    }

    /// Re-check the sentinel against the current layout. Returns whether a
    /// boundary signal went out.
    pub fn observe(&mut self) -> bool {
        self.trigger
            .observe(self.surface.visible(), self.surface.sentinel())
    }

    /// New row count after items were appended or restored.
    pub fn set_rows(&mut self, rows: usize) -> bool {
        self.surface.rows = rows;
        let offset = self.surface.offset;
        self.surface.scroll_to(offset);
        self.observe()
    }

    pub fn scroll_by(&mut self, delta: f64, now: Instant) -> bool {
        let offset = self.surface.offset + delta;
        self.surface.scroll_to(offset);
        self.anchor.on_scroll(now);
        self.anchor.poll(now, &self.surface);
        self.observe()
    }

    pub fn scroll_to_end(&mut self, now: Instant) -> bool {
        let delta = self.surface.max_offset() - self.surface.offset;
        debug!("Scrolling to end ({} rows)", self.surface.rows);
        self.scroll_by(delta, now)
    }

    /// Save the offset once the debounce window has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.anchor.poll(now, &self.surface)
    }

    /// Navigating away. Returns the offset that was saved.
    pub fn close(self) -> f64 {
        let offset = self.surface.scroll_offset();
        self.anchor.detach(&self.surface);
        offset
    }
}
