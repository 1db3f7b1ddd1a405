// src/carousel.rs
//! Looping event carousel: a pure, testable state machine plus a small
//! Tokio driver for autoplay and the wraparound teleport.
//!
//! The rendered strip is the item list padded on both ends (last
//! `visible_count` items prepended, first `visible_count` appended), so a
//! transition can run past either edge onto duplicated content and the index
//! is then silently mapped back into the real range with animation off.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::events::types::DisplayEvent;

/// Production autoplay cadence.
pub const AUTO_SCROLL_DELAY: Duration = Duration::from_secs(5);
/// How long a slide transition runs before an out-of-range index may be
/// teleported back without visible movement.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(500);

/// Cards shown simultaneously for a viewport width. Fixed breakpoints; a
/// change resets the carousel to the first item rather than trying to keep
/// mid-resize continuity.
pub fn visible_count_for(width: u32) -> usize {
    if width < 640 {
        1
    } else if width < 1024 {
        2
    } else {
        3
    }
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselView {
    pub window: Vec<DisplayEvent>,
    pub index: usize,
    pub visible_count: usize,
    pub active_dot: usize,
    pub animate: bool,
}

#[derive(Debug, Clone)]
pub struct CarouselState {
    items: Vec<DisplayEvent>,
    visible_count: usize,
    /// Position over the padded strip. Signed: user input may transiently
    /// run past either pad before the teleport settles it.
    index: isize,
    paused: bool,
    animate: bool,
}

impl CarouselState {
    pub fn new(items: Vec<DisplayEvent>, visible_count: usize) -> Self {
        let visible_count = visible_count.max(1);
        Self {
            items,
            visible_count,
            index: visible_count as isize,
            paused: false,
            animate: true,
        }
    }

    pub fn with_viewport(items: Vec<DisplayEvent>, width: u32) -> Self {
        Self::new(items, visible_count_for(width))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn animate(&self) -> bool {
        self.animate
    }

    /// Navigation is disabled when every item already fits in the window.
    pub fn nav_enabled(&self) -> bool {
        self.items.len() > self.visible_count
    }

    /// Advance one slide. Returns `false` as a no-op signal when navigation
    /// is disabled.
    pub fn next(&mut self) -> bool {
        if !self.nav_enabled() {
            return false;
        }
        self.animate = true;
        self.index += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.nav_enabled() {
            return false;
        }
        self.animate = true;
        self.index -= 1;
        true
    }

    /// Jump straight to item `i` (dot navigation). `i` is an item index in
    /// `[0, len)`; the stored index is offset by the left pad.
    pub fn jump_to(&mut self, i: usize) {
        if self.items.is_empty() {
            return;
        }
        self.animate = true;
        self.index = (i % self.items.len() + self.visible_count) as isize;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// True while the index sits on padded (duplicated) content.
    pub fn needs_teleport(&self) -> bool {
        let len = self.items.len() as isize;
        let vc = self.visible_count as isize;
        len > 0 && (self.index >= len + vc || self.index < vc)
    }

    /// Map an out-of-range index back to the equivalent real position, with
    /// animation off so the reset is invisible. Idempotent when in range.
    pub fn teleport(&mut self) {
        let len = self.items.len() as isize;
        let vc = self.visible_count as isize;
        if len == 0 {
            return;
        }
        let mut moved = false;
        while self.index >= len + vc {
            self.index -= len;
            moved = true;
        }
        while self.index < vc {
            self.index += len;
            moved = true;
        }
        if moved {
            self.animate = false;
        }
    }

    /// Recompute the window size for a new viewport width. A changed window
    /// resets to the first item; same width bucket is a no-op.
    pub fn on_resize(&mut self, width: u32) {
        let vc = visible_count_for(width);
        if vc != self.visible_count {
            self.visible_count = vc;
            self.index = vc as isize;
            self.animate = true;
        }
    }

    /// Pagination indicator, always in `[0, len)` even while the index is
    /// transiently out of range.
    pub fn active_dot(&self) -> usize {
        let len = self.items.len() as isize;
        if len == 0 {
            return 0;
        }
        (self.index - self.visible_count as isize).rem_euclid(len) as usize
    }

    /// Item behind a padded-strip position.
    fn slide_item(&self, padded_pos: isize) -> &DisplayEvent {
        let len = self.items.len() as isize;
        let real = (padded_pos - self.visible_count as isize).rem_euclid(len) as usize;
        &self.items[real]
    }

    pub fn view(&self) -> CarouselView {
        let window = if self.items.is_empty() {
            Vec::new()
        } else {
            (self.index..self.index + self.visible_count as isize)
                .map(|p| self.slide_item(p).clone())
                .collect()
        };
        CarouselView {
            window,
            index: self.index.max(0) as usize,
            visible_count: self.visible_count,
            active_dot: self.active_dot(),
            animate: self.animate,
        }
    }
}

type SharedState = Arc<Mutex<CarouselState>>;

/// Owns the autoplay interval and the pending teleport for one mounted
/// carousel. Dropping the driver aborts both tasks, so nothing touches the
/// state after disposal.
pub struct CarouselDriver {
    state: SharedState,
    transition: Duration,
    autoplay: JoinHandle<()>,
    pending_teleport: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl CarouselDriver {
    /// Production cadence: 5 s autoplay, 500 ms transition.
    pub fn spawn_default(state: CarouselState) -> Self {
        Self::spawn(state, AUTO_SCROLL_DELAY, TRANSITION_DELAY)
    }

    pub fn spawn(state: CarouselState, autoplay_every: Duration, transition: Duration) -> Self {
        let state: SharedState = Arc::new(Mutex::new(state));
        let pending_teleport: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));

        let autoplay = tokio::spawn({
            let state = Arc::clone(&state);
            let pending = Arc::clone(&pending_teleport);
            async move {
                let mut ticker = tokio::time::interval(autoplay_every);
                // The first tick of `interval` completes immediately; swallow
                // it so the first advance happens one full period in.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let advanced = {
                        let mut s = state.lock().expect("carousel state poisoned");
                        if s.paused() {
                            false
                        } else {
                            s.next()
                        }
                    };
                    if advanced {
                        schedule_teleport(&state, &pending, transition);
                    }
                }
            }
        });

        Self {
            state,
            transition,
            autoplay,
            pending_teleport,
        }
    }

    pub fn next(&self) -> bool {
        let advanced = self.lock().next();
        if advanced {
            schedule_teleport(&self.state, &self.pending_teleport, self.transition);
        }
        advanced
    }

    pub fn previous(&self) -> bool {
        let advanced = self.lock().previous();
        if advanced {
            schedule_teleport(&self.state, &self.pending_teleport, self.transition);
        }
        advanced
    }

    pub fn jump_to(&self, i: usize) {
        self.lock().jump_to(i);
        schedule_teleport(&self.state, &self.pending_teleport, self.transition);
    }

    /// Hover pause toggle, the only autoplay cancellation mechanism.
    pub fn set_paused(&self, paused: bool) {
        self.lock().set_paused(paused);
    }

    pub fn resize(&self, width: u32) {
        self.lock().on_resize(width);
        schedule_teleport(&self.state, &self.pending_teleport, self.transition);
    }

    pub fn view(&self) -> CarouselView {
        self.lock().view()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CarouselState> {
        self.state.lock().expect("carousel state poisoned")
    }
}

/// Replace any pending teleport with a fresh one when the index sits on
/// padded content; cancel it otherwise (a later action may have brought the
/// index back in range).
fn schedule_teleport(
    state: &SharedState,
    pending: &Arc<Mutex<Option<JoinHandle<()>>>>,
    transition: Duration,
) {
    let needs = state
        .lock()
        .expect("carousel state poisoned")
        .needs_teleport();

    let mut slot = pending.lock().expect("teleport slot poisoned");
    if let Some(h) = slot.take() {
        h.abort();
    }
    if !needs {
        return;
    }
    let state = Arc::clone(state);
    *slot = Some(tokio::spawn(async move {
        tokio::time::sleep(transition).await;
        state.lock().expect("carousel state poisoned").teleport();
    }));
}

impl Drop for CarouselDriver {
    fn drop(&mut self) {
        self.autoplay.abort();
        if let Ok(mut slot) = self.pending_teleport.lock() {
            if let Some(h) = slot.take() {
                h.abort();
            }
        }
    }
}
