use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};
use waypoint_core::FixedClock;
use waypoint_shared::{
    Airport, Booking, CacheEntry, Flight, Hotel, LocalizedText, StayPoint, Trip, TripMutation,
};
use waypoint_store::app_config::RenderConfig;
use waypoint_store::{
    CacheGateway, FetchError, MemoryStorage, SessionStorage, SwrOutcome, TripSource,
    DEFAULT_CACHE_KEY,
};
use waypoint_view::{Block, Container, DashboardController, MemorySink, SinkOp, Tab};

struct StubSource {
    entry: Mutex<Option<CacheEntry>>,
    applied: Mutex<Vec<TripMutation>>,
    reject_mutations: bool,
}

impl StubSource {
    fn serving(entry: Option<CacheEntry>) -> Self {
        Self {
            entry: Mutex::new(entry),
            applied: Mutex::new(Vec::new()),
            reject_mutations: false,
        }
    }
}

#[async_trait]
impl TripSource for StubSource {
    async fn fetch_trips(&self) -> Result<CacheEntry, FetchError> {
        self.entry
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| FetchError::Unavailable("offline".to_string()))
    }

    async fn apply(&self, mutation: &TripMutation) -> Result<(), FetchError> {
        if self.reject_mutations {
            return Err(FetchError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        self.applied.lock().unwrap().push(mutation.clone());
        Ok(())
    }
}

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-06-02 10:00", "%Y-%m-%d %H:%M").unwrap()
}

fn trip(id: &str, start: &str, end: &str) -> Trip {
    Trip {
        id: id.to_string(),
        title: LocalizedText::new("en", id),
        start_date: start.to_string(),
        end_date: end.to_string(),
        cover_photo: None,
        flights: Vec::new(),
        hotels: Vec::new(),
        activities: Vec::new(),
    }
}

fn hotel(id: &str, check_in: &str, check_out: &str) -> Hotel {
    Hotel {
        id: id.to_string(),
        name: format!("Hotel {}", id),
        check_in: Some(StayPoint {
            date: check_in.to_string(),
            time: None,
        }),
        check_out: Some(StayPoint {
            date: check_out.to_string(),
            time: None,
        }),
        address: None,
        guests: None,
        confirmation_number: None,
    }
}

fn entry() -> CacheEntry {
    let mut current = trip("lisbon", "2024-06-01", "2024-06-04");
    current.hotels.push(hotel("h1", "2024-06-01", "2024-06-04"));
    CacheEntry {
        trips: vec![
            current.clone(),
            trip("rome", "2024-07-01", "2024-07-05"),
            trip("oslo", "2024-08-01", "2024-08-03"),
            trip("paris", "2024-01-01", "2024-01-03"),
        ],
        today_trips: vec![current],
    }
}

fn gateway() -> CacheGateway {
    let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
    CacheGateway::new(storage, DEFAULT_CACHE_KEY)
}

fn controller(
    gateway: CacheGateway,
    source: Arc<StubSource>,
) -> DashboardController<MemorySink> {
    let config = RenderConfig {
        first_batch_size: 2,
        ..RenderConfig::default()
    };
    DashboardController::new(
        gateway,
        source,
        Arc::new(FixedClock(now())),
        MemorySink::new(),
        config,
    )
}

fn trip_ids(sink: &MemorySink) -> Vec<String> {
    sink.content(Container::TripList)
        .iter()
        .filter_map(|block| match block {
            Block::TripCard(card) => Some(card.trip_id.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_first_batch_then_deferred_remainder() {
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gateway(), source);

    let outcome = ctl.reload().await;
    assert!(matches!(outcome, SwrOutcome::Refreshed { had_stale: false }));
    assert_eq!(trip_ids(ctl.sink()), vec!["lisbon", "rome"]);
    assert_eq!(ctl.pending_frames(), 1);

    assert_eq!(ctl.run_frame(), 1);
    assert_eq!(trip_ids(ctl.sink()), vec!["lisbon", "rome", "oslo", "paris"]);
    assert!(matches!(
        ctl.sink().content(Container::TodayPanel),
        [Block::TodayHotel(_)]
    ));
}

#[tokio::test]
async fn test_back_to_back_reloads_run_one_deferred_phase() {
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gateway(), source);

    ctl.reload().await;
    ctl.reload().await;
    assert_eq!(ctl.pending_frames(), 2);

    assert_eq!(ctl.run_frame(), 1);
    assert_eq!(ctl.sink().count(&SinkOp::Append(Container::TripList)), 1);
    assert_eq!(trip_ids(ctl.sink()).len(), 4);
}

#[tokio::test]
async fn test_fetch_failure_keeps_cached_render() {
    let cached = gateway();
    cached.store(&entry()).await.unwrap();
    let mut stale = controller(cached, Arc::new(StubSource::serving(None)));
    let outcome = stale.reload().await;
    stale.run_frame();
    assert!(matches!(outcome, SwrOutcome::StaleRetained));

    let mut fresh = controller(gateway(), Arc::new(StubSource::serving(Some(entry()))));
    fresh.reload().await;
    fresh.run_frame();

    for container in [Container::TodayPanel, Container::TripList] {
        assert_eq!(
            stale.sink().content(container),
            fresh.sink().content(container)
        );
    }
}

#[tokio::test]
async fn test_fetch_failure_without_cache_shows_notice() {
    let mut ctl = controller(gateway(), Arc::new(StubSource::serving(None)));

    let outcome = ctl.reload().await;
    assert!(matches!(outcome, SwrOutcome::Unavailable(_)));
    assert_eq!(
        ctl.sink().content(Container::TripList),
        &[Block::notice("trips.load_failed")]
    );
    assert_eq!(ctl.pending_frames(), 0);
}

#[tokio::test]
async fn test_empty_trip_list_shows_notice() {
    let source = Arc::new(StubSource::serving(Some(CacheEntry::default())));
    let mut ctl = controller(gateway(), source);

    ctl.reload().await;
    assert_eq!(
        ctl.sink().content(Container::TripList),
        &[Block::notice("trips.empty")]
    );
}

#[tokio::test]
async fn test_tabs_render_lazily_and_invalidate_on_mutation() {
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gateway(), Arc::clone(&source));
    ctl.reload().await;

    ctl.open_trip("lisbon").await.unwrap();
    assert!(ctl.switch_tab(Tab::Flights));
    assert!(!ctl.switch_tab(Tab::Activities));
    assert!(!ctl.switch_tab(Tab::Flights));

    ctl.switch_tab(Tab::Activities);
    ctl.apply_mutation(TripMutation::AddBooking {
        trip_id: "lisbon".to_string(),
        booking: Booking::Hotel(hotel("h2", "2024-06-02", "2024-06-03")),
    })
    .await
    .unwrap();

    let sink = ctl.sink();
    assert_eq!(sink.count(&SinkOp::Replace(Container::Tab(Tab::Activities))), 2);
    assert_eq!(sink.count(&SinkOp::Replace(Container::Tab(Tab::Flights))), 1);
    assert_eq!(ctl.open_trip_data().unwrap().hotels.len(), 2);
    assert_eq!(source.applied.lock().unwrap().len(), 1);

    // Flights were untouched, so their render survives; hotels never rendered.
    assert!(!ctl.switch_tab(Tab::Flights));
    assert!(ctl.switch_tab(Tab::Hotels));
}

#[tokio::test]
async fn test_reload_refreshes_open_trip() {
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gateway(), Arc::clone(&source));
    ctl.reload().await;
    ctl.open_trip("lisbon").await.unwrap();
    ctl.switch_tab(Tab::Hotels);

    let mut updated = entry();
    updated.trips[0].hotels.push(hotel("h2", "2024-06-03", "2024-06-04"));
    *source.entry.lock().unwrap() = Some(updated);

    let outcome = ctl.reload().await;
    assert!(matches!(outcome, SwrOutcome::Refreshed { had_stale: true }));
    assert_eq!(ctl.open_trip_data().unwrap().hotels.len(), 2);

    let cards = ctl
        .sink()
        .content(Container::Tab(Tab::Hotels))
        .iter()
        .filter(|block| matches!(block, Block::HotelCard(_)))
        .count();
    assert_eq!(cards, 2);
}

#[tokio::test]
async fn test_reload_closes_trip_removed_by_backend() {
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gateway(), Arc::clone(&source));
    ctl.reload().await;
    ctl.open_trip("rome").await.unwrap();

    let mut updated = entry();
    updated.trips.retain(|t| t.id != "rome");
    *source.entry.lock().unwrap() = Some(updated);

    ctl.reload().await;
    assert!(ctl.open_trip_data().is_none());
}

#[tokio::test]
async fn test_language_switch_keeps_load_failure_visible() {
    let gw = gateway();
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gw.clone(), Arc::clone(&source));
    ctl.reload().await;

    gw.invalidate().await.unwrap();
    *source.entry.lock().unwrap() = None;
    assert!(matches!(ctl.reload().await, SwrOutcome::Unavailable(_)));

    ctl.set_language("pt");
    assert_eq!(
        ctl.sink().content(Container::TripList),
        &[Block::notice("trips.load_failed")]
    );
    assert!(ctl.sink().content(Container::TodayPanel).is_empty());
}

#[tokio::test]
async fn test_booking_mutation_repaints_today_panel() {
    let source = Arc::new(StubSource::serving(Some(entry())));
    let mut ctl = controller(gateway(), source);
    ctl.reload().await;
    assert!(matches!(
        ctl.sink().content(Container::TodayPanel),
        [Block::TodayHotel(_)]
    ));

    let flight = Flight {
        id: "f1".to_string(),
        date: "2024-06-02".to_string(),
        departure_time: "18:00".to_string(),
        arrival_time: "20:30".to_string(),
        arrival_next_day: false,
        departure: Airport::default(),
        arrival: Airport::default(),
        flight_number: "TP123".to_string(),
        booking_reference: String::new(),
        passengers: Vec::new(),
    };
    ctl.apply_mutation(TripMutation::AddBooking {
        trip_id: "lisbon".to_string(),
        booking: Booking::Flight(flight),
    })
    .await
    .unwrap();

    assert!(matches!(
        ctl.sink().content(Container::TodayPanel),
        [Block::TodayFlight(_), Block::TodayHotel(_)]
    ));
}

#[tokio::test]
async fn test_mutation_invalidates_cache_even_when_rejected() {
    let gw = gateway();
    gw.store(&entry()).await.unwrap();
    let source = Arc::new(StubSource {
        reject_mutations: true,
        ..StubSource::serving(Some(entry()))
    });
    let mut ctl = controller(gw.clone(), source);

    let result = ctl
        .apply_mutation(TripMutation::DeleteTrip {
            trip_id: "rome".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert!(gw.load().await.is_none());
}

#[tokio::test]
async fn test_open_unknown_trip() {
    let mut ctl = controller(gateway(), Arc::new(StubSource::serving(Some(entry()))));
    let err = ctl.open_trip("nowhere").await.unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}
