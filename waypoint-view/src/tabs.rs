use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use waypoint_shared::BookingKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// The day-by-day timeline, derived from every booking kind.
    Activities,
    Flights,
    Hotels,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Activities, Tab::Flights, Tab::Hotels];

    /// Tab that lists bookings of `kind`.
    pub fn for_kind(kind: BookingKind) -> Tab {
        match kind {
            BookingKind::Flight => Tab::Flights,
            BookingKind::Hotel => Tab::Hotels,
            BookingKind::Activity => Tab::Activities,
        }
    }
}

/// Renders each tab at most once per version of the trip data.
#[derive(Debug, Default)]
pub struct TabLazyRenderer {
    rendered: HashSet<Tab>,
}

impl TabLazyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_rendered(&self, tab: Tab) -> bool {
        self.rendered.contains(&tab)
    }

    /// Runs `render` unless `tab` is already up to date. Returns whether it ran.
    pub fn ensure_rendered<F>(&mut self, tab: Tab, render: F) -> bool
    where
        F: FnOnce(Tab),
    {
        if self.rendered.contains(&tab) {
            return false;
        }
        render(tab);
        self.rendered.insert(tab);
        true
    }

    pub fn invalidate(&mut self, tab: Tab) {
        self.rendered.remove(&tab);
    }

    /// A change to `kind` bookings stales that kind's tab and the timeline,
    /// which is built from all of them. Other tabs keep their render.
    pub fn invalidate_for(&mut self, kind: BookingKind) {
        self.invalidate(Tab::for_kind(kind));
        self.invalidate(Tab::Activities);
    }

    pub fn reset(&mut self) {
        self.rendered.clear();
    }
}
