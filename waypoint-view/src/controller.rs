//! Per-page-load dashboard state: the cached trip list, the open trip, the
//! render generation and the tab flags all live here instead of in globals.

use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};
use waypoint_core::Clock;
use waypoint_shared::{CacheEntry, Trip, TripMutation};
use waypoint_store::{CacheGateway, FetchError, SwrOutcome, TripSource};
use waypoint_store::app_config::RenderConfig;

use crate::adapter::{tab_blocks, today_view, trip_cards};
use crate::generation::{Epoch, RenderGenerationGuard};
use crate::sink::{Block, Container, RenderSink};
use crate::tabs::{Tab, TabLazyRenderer};

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Trip not found: {0}")]
    TripNotFound(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Work postponed to the next frame. It carries the epoch it was scheduled
/// under and does nothing once a newer render has started.
#[derive(Debug)]
pub struct DeferredRender {
    pub epoch: Epoch,
    pub container: Container,
    pub blocks: Vec<Block>,
}

impl DeferredRender {
    pub fn run<K: RenderSink>(self, guard: &RenderGenerationGuard, sink: &mut K) -> bool {
        if !guard.is_current(self.epoch) {
            debug!(
                "Discarding superseded render (epoch {}, current {})",
                self.epoch.value(),
                guard.current().value()
            );
            return false;
        }
        sink.append(self.container, self.blocks);
        sink.apply_locale(self.container);
        true
    }
}

pub struct DashboardController<K: RenderSink> {
    gateway: CacheGateway,
    source: Arc<dyn TripSource>,
    clock: Arc<dyn Clock>,
    sink: K,
    guard: RenderGenerationGuard,
    tabs: TabLazyRenderer,
    frames: VecDeque<DeferredRender>,
    entry: Option<CacheEntry>,
    open_trip: Option<Trip>,
    active_tab: Tab,
    lang: String,
    config: RenderConfig,
}

impl<K: RenderSink> DashboardController<K> {
    pub fn new(
        gateway: CacheGateway,
        source: Arc<dyn TripSource>,
        clock: Arc<dyn Clock>,
        sink: K,
        config: RenderConfig,
    ) -> Self {
        Self {
            gateway,
            source,
            clock,
            sink,
            guard: RenderGenerationGuard::new(),
            tabs: TabLazyRenderer::new(),
            frames: VecDeque::new(),
            entry: None,
            open_trip: None,
            active_tab: Tab::Activities,
            lang: config.default_language.clone(),
            config,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn guard(&self) -> &RenderGenerationGuard {
        &self.guard
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn open_trip_data(&self) -> Option<&Trip> {
        self.open_trip.as_ref()
    }

    pub fn language(&self) -> &str {
        &self.lang
    }

    /// Full reload of the today panel and trip list. Paints the cached list
    /// first and repaints only if the network brings something different.
    pub async fn reload(&mut self) -> SwrOutcome {
        let source = Arc::clone(&self.source);
        let now = self.clock.now();
        self.tabs.reset();

        let Self {
            gateway,
            sink,
            guard,
            frames,
            entry,
            lang,
            config,
            ..
        } = &mut *self;

        let outcome = gateway
            .render_with_stale_while_revalidate(
                || async move { source.fetch_trips().await },
                |data| {
                    paint_dashboard(
                        data,
                        now,
                        lang.as_str(),
                        config.first_batch_size,
                        guard,
                        sink,
                        frames,
                    );
                    *entry = Some(data.clone());
                },
            )
            .await;

        if let SwrOutcome::Unavailable(err) = &outcome {
            warn!("No trips to show: {}", err);
            // Nothing cached backs the old data any more
            self.entry = None;
            self.guard.begin_render();
            self.replace(Container::TodayPanel, Vec::new());
            self.replace(Container::TripList, vec![Block::notice("trips.load_failed")]);
        }

        self.refresh_open_trip();
        outcome
    }

    /// Re-reads the open trip from the painted entry and re-renders its
    /// active tab. Without an entry the current copy stays on screen.
    fn refresh_open_trip(&mut self) {
        let (Some(entry), Some(open)) = (self.entry.as_ref(), self.open_trip.as_ref()) else {
            return;
        };

        let fresh = entry.find_trip(&open.id).cloned();
        if fresh.is_none() {
            info!("Open trip {} is gone after reload", open.id);
        }
        self.open_trip = fresh;
        self.render_active_tab();
    }

    /// Runs every deferred render queued so far. Returns how many touched
    /// the sink; superseded ones are dropped.
    pub fn run_frame(&mut self) -> usize {
        let mut ran = 0;
        while let Some(frame) = self.frames.pop_front() {
            if frame.run(&self.guard, &mut self.sink) {
                ran += 1;
            }
        }
        ran
    }

    /// Switches the display language and repaints what is on screen.
    pub fn set_language(&mut self, lang: &str) {
        if self.lang == lang {
            return;
        }
        self.lang = lang.to_string();
        if let Some(entry) = self.entry.clone() {
            self.paint(&entry);
        }
        self.tabs.reset();
        self.render_active_tab();
    }

    /// Opens a trip on the activities tab. Trips come from the dashboard data,
    /// or from the cache/network if nothing was loaded yet.
    pub async fn open_trip(&mut self, trip_id: &str) -> Result<(), ViewError> {
        if self.entry.is_none() {
            let source = Arc::clone(&self.source);
            let entry = self
                .gateway
                .read_through(|| async move { source.fetch_trips().await })
                .await?;
            self.entry = Some(entry);
        }

        let trip = self
            .entry
            .as_ref()
            .and_then(|entry| entry.find_trip(trip_id))
            .cloned()
            .ok_or_else(|| ViewError::TripNotFound(trip_id.to_string()))?;

        info!("Opening trip {}", trip.id);
        self.open_trip = Some(trip);
        self.active_tab = Tab::Activities;
        self.tabs.reset();
        self.render_active_tab();
        Ok(())
    }

    /// Returns whether the tab had to be rendered.
    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        self.active_tab = tab;
        self.render_active_tab()
    }

    pub fn render_active_tab(&mut self) -> bool {
        let Self {
            tabs,
            sink,
            open_trip,
            active_tab,
            ..
        } = &mut *self;

        let Some(trip) = open_trip.as_ref() else {
            return false;
        };

        tabs.ensure_rendered(*active_tab, |tab| {
            let container = Container::Tab(tab);
            sink.replace(container, tab_blocks(trip, tab));
            sink.apply_locale(container);
        })
    }

    /// Sends `mutation` to the backend and mirrors it locally. The session
    /// cache is dropped whether or not the backend accepted it.
    pub async fn apply_mutation(&mut self, mutation: TripMutation) -> Result<(), ViewError> {
        let result = self.source.apply(&mutation).await;
        if let Err(err) = self.gateway.invalidate().await {
            warn!("Failed to invalidate trip cache after mutation: {}", err);
        }
        result?;

        if let Some(entry) = self.entry.as_mut() {
            apply_to_entry(entry, &mutation);
        }

        match mutation.affected_kind() {
            Some(kind) => {
                if let Some(trip) = self
                    .open_trip
                    .as_mut()
                    .filter(|trip| trip.id == mutation.trip_id())
                {
                    apply_to_trip(trip, &mutation);
                    self.tabs.invalidate_for(kind);
                    self.render_active_tab();
                }
            }
            None => match &mutation {
                TripMutation::DeleteTrip { trip_id }
                    if self.open_trip.as_ref().is_some_and(|t| &t.id == trip_id) =>
                {
                    self.open_trip = None;
                    self.tabs.reset();
                }
                _ => {
                    if let Some(trip) = self
                        .open_trip
                        .as_mut()
                        .filter(|trip| trip.id == mutation.trip_id())
                    {
                        apply_to_trip(trip, &mutation);
                    }
                }
            },
        }

        // Today panel and trip cards both derive from the entry
        if let Some(entry) = self.entry.clone() {
            self.paint(&entry);
        }
        Ok(())
    }

    fn paint(&mut self, entry: &CacheEntry) {
        let now = self.clock.now();
        paint_dashboard(
            entry,
            now,
            &self.lang,
            self.config.first_batch_size,
            &self.guard,
            &mut self.sink,
            &mut self.frames,
        );
    }

    fn replace(&mut self, container: Container, blocks: Vec<Block>) {
        self.sink.replace(container, blocks);
        self.sink.apply_locale(container);
    }
}

/// One dashboard paint under a fresh epoch. The first batch of trip cards
/// goes out now; the remainder waits for the next frame.
fn paint_dashboard<K: RenderSink>(
    entry: &CacheEntry,
    now: NaiveDateTime,
    lang: &str,
    first_batch: usize,
    guard: &RenderGenerationGuard,
    sink: &mut K,
    frames: &mut VecDeque<DeferredRender>,
) {
    let epoch = guard.begin_render();

    sink.replace(
        Container::TodayPanel,
        today_view(&entry.today_trips, now, lang).into_blocks(),
    );
    sink.apply_locale(Container::TodayPanel);

    let mut cards: Vec<Block> = trip_cards(&entry.trips, now.date(), lang)
        .into_iter()
        .map(Block::TripCard)
        .collect();

    if cards.is_empty() {
        sink.replace(Container::TripList, vec![Block::notice("trips.empty")]);
        sink.apply_locale(Container::TripList);
        return;
    }

    let rest = cards.split_off(first_batch.min(cards.len()));
    sink.replace(Container::TripList, cards);
    sink.apply_locale(Container::TripList);

    if !rest.is_empty() {
        debug!("Deferring {} trip cards (epoch {})", rest.len(), epoch.value());
        frames.push_back(DeferredRender {
            epoch,
            container: Container::TripList,
            blocks: rest,
        });
    }
}

fn apply_to_entry(entry: &mut CacheEntry, mutation: &TripMutation) {
    if let TripMutation::DeleteTrip { trip_id } = mutation {
        entry.trips.retain(|t| &t.id != trip_id);
        entry.today_trips.retain(|t| &t.id != trip_id);
        return;
    }
    for trip in entry
        .trips
        .iter_mut()
        .chain(entry.today_trips.iter_mut())
        .filter(|t| t.id == mutation.trip_id())
    {
        apply_to_trip(trip, mutation);
    }
}

fn apply_to_trip(trip: &mut Trip, mutation: &TripMutation) {
    match mutation {
        TripMutation::RenameTrip { title, .. } => trip.title = title.clone(),
        TripMutation::AddBooking { booking, .. } | TripMutation::EditBooking { booking, .. } => {
            trip.upsert_booking(booking.clone())
        }
        TripMutation::DeleteBooking {
            kind, booking_id, ..
        } => {
            if !trip.remove_booking(*kind, booking_id) {
                debug!("Booking {} already gone from trip {}", booking_id, trip.id);
            }
        }
        TripMutation::DeleteTrip { .. } => {}
    }
}
