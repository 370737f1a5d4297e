//! Recitals, competitions, workshops and other studio events.

mod core;
mod endpoints;
mod events_page;

pub use core::{
    Event, EventId, EventStatus, EventType, NewEvent, create_event, create_event_table,
    delete_event, get_events, get_upcoming_events,
};
pub use endpoints::{create_event_endpoint, delete_event_endpoint};
pub(crate) use events_page::{event_status_badge, event_time};
pub use events_page::get_events_page;
