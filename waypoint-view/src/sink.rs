//! The rendering surface. Implementations turn [`Block`]s into markup and
//! resolve the localized strings referenced by message keys.

use serde::Serialize;
use std::collections::HashMap;

use crate::adapter::{DayView, FlightCard, HotelCard, TodayFlightView, TodayHotelView, TripCard};
use crate::tabs::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    TodayPanel,
    TripList,
    Tab(Tab),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    TripCard(TripCard),
    TodayFlight(TodayFlightView),
    TodayHotel(TodayHotelView),
    Day(DayView),
    FlightCard(FlightCard),
    HotelCard(HotelCard),
    /// Placeholder text, e.g. an empty list or a load failure.
    Notice { message_key: String },
}

impl Block {
    pub fn notice(message_key: &str) -> Self {
        Block::Notice {
            message_key: message_key.to_string(),
        }
    }
}

pub trait RenderSink {
    fn replace(&mut self, container: Container, blocks: Vec<Block>);

    fn append(&mut self, container: Container, blocks: Vec<Block>);

    /// Resolves message keys inside `container` for the current language.
    fn apply_locale(&mut self, container: Container);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    Replace(Container),
    Append(Container),
    ApplyLocale(Container),
}

/// Sink that keeps rendered blocks in memory and logs every call.
#[derive(Debug, Default)]
pub struct MemorySink {
    content: HashMap<Container, Vec<Block>>,
    ops: Vec<SinkOp>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, container: Container) -> &[Block] {
        self.content.get(&container).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    pub fn count(&self, op: &SinkOp) -> usize {
        self.ops.iter().filter(|o| *o == op).count()
    }
}

impl RenderSink for MemorySink {
    fn replace(&mut self, container: Container, blocks: Vec<Block>) {
        self.content.insert(container, blocks);
        self.ops.push(SinkOp::Replace(container));
    }

    fn append(&mut self, container: Container, blocks: Vec<Block>) {
        self.content.entry(container).or_default().extend(blocks);
        self.ops.push(SinkOp::Append(container));
    }

    fn apply_locale(&mut self, container: Container) {
        self.ops.push(SinkOp::ApplyLocale(container));
    }
}
