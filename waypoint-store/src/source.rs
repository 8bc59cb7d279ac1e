//! The remote trip API, as seen by the itinerary views. Only the two calls the
//! views need: fetch the trip list, and persist a user edit.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use waypoint_shared::{Booking, CacheEntry, LocalizedText, TripMutation};

use crate::app_config::ApiConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Trip source unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TripSource: Send + Sync {
    /// The user's trips plus the subset with something happening today.
    async fn fetch_trips(&self) -> Result<CacheEntry, FetchError>;

    async fn apply(&self, mutation: &TripMutation) -> Result<(), FetchError>;
}

/// [`TripSource`] over the backend's JSON API.
pub struct HttpTripSource {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Serialize)]
struct RenameBody<'a> {
    title: &'a LocalizedText,
}

impl HttpTripSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut source = Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds))?;
        source.auth_token = config.auth_token.clone();
        Ok(source)
    }

    pub fn with_auth(mut self, token: String) -> Self {
        self.auth_token = Some(token);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn booking_request(&self, req: reqwest::RequestBuilder, booking: &Booking) -> reqwest::RequestBuilder {
        match booking {
            Booking::Flight(flight) => req.json(flight),
            Booking::Hotel(hotel) => req.json(hotel),
            Booking::Activity(activity) => req.json(activity),
        }
    }

    fn mutation_request(&self, mutation: &TripMutation) -> reqwest::RequestBuilder {
        match mutation {
            TripMutation::RenameTrip { trip_id, title } => self
                .client
                .patch(self.url(&format!("/trips/{}", trip_id)))
                .json(&RenameBody { title }),
            TripMutation::DeleteTrip { trip_id } => {
                self.client.delete(self.url(&format!("/trips/{}", trip_id)))
            }
            TripMutation::AddBooking { trip_id, booking } => {
                let path = format!("/trips/{}/{}", trip_id, booking.kind().collection());
                self.booking_request(self.client.post(self.url(&path)), booking)
            }
            TripMutation::EditBooking { trip_id, booking } => {
                let path = format!(
                    "/trips/{}/{}/{}",
                    trip_id,
                    booking.kind().collection(),
                    booking.id()
                );
                self.booking_request(self.client.put(self.url(&path)), booking)
            }
            TripMutation::DeleteBooking {
                trip_id,
                kind,
                booking_id,
            } => {
                let path = format!("/trips/{}/{}/{}", trip_id, kind.collection(), booking_id);
                self.client.delete(self.url(&path))
            }
        }
    }
}

#[async_trait]
impl TripSource for HttpTripSource {
    async fn fetch_trips(&self) -> Result<CacheEntry, FetchError> {
        let resp = self.authorize(self.client.get(self.url("/trips"))).send().await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    async fn apply(&self, mutation: &TripMutation) -> Result<(), FetchError> {
        let resp = self.authorize(self.mutation_request(mutation)).send().await?;
        ensure_success(resp).await?;
        info!("Trip {} updated", mutation.trip_id());
        Ok(())
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(FetchError::Status {
        status: status.as_u16(),
        body,
    })
}
