//! Studio events such as recitals and competitions.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Time};

use crate::{
    Error,
    database_id::DatabaseId,
    money::{parse_amount, serialize_amount, to_storage},
    text_enum::text_enum,
};

pub type EventId = DatabaseId;

text_enum! {
    /// What kind of event it is.
    pub enum EventType("event type") {
        /// An end of term show.
        Recital => ("recital", "Recital"),
        /// A judged competition.
        Competition => ("competition", "Competition"),
        /// A one off class or masterclass.
        Workshop => ("workshop", "Workshop"),
        /// A performance outside the studio.
        Performance => ("performance", "Performance"),
        /// Anything else.
        Other => ("other", "Other"),
    }
}

text_enum! {
    /// Where an event is up to.
    #[derive(Default)]
    pub enum EventStatus("event status") {
        /// Planned for the future.
        #[default]
        Scheduled => ("scheduled", "Scheduled"),
        /// Happening now.
        InProgress => ("in-progress", "In Progress"),
        /// Finished.
        Completed => ("completed", "Completed"),
        /// Called off.
        Cancelled => ("cancelled", "Cancelled"),
    }
}

/// An event as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub event_type: EventType,
    pub event_date: Date,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub location: Option<String>,
    #[serde(serialize_with = "serialize_optional_amount")]
    pub cost: Option<Decimal>,
    pub status: EventStatus,
    pub description: Option<String>,
}

fn serialize_optional_amount<S>(amount: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match amount {
        Some(amount) => serialize_amount(amount, serializer),
        None => serializer.serialize_none(),
    }
}

/// An event that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// The event's name, e.g. "Winter Recital".
    pub name: String,
    /// What kind of event it is.
    pub event_type: EventType,
    /// The day the event happens.
    pub event_date: Date,
    /// When the event starts, if known.
    pub start_time: Option<Time>,
    /// When the event ends, if known. Must be after `start_time`.
    pub end_time: Option<Time>,
    /// Where the event is held.
    pub location: Option<String>,
    /// The cost to the studio or the entry fee in dollars.
    pub cost: Option<Decimal>,
    /// Where the event is up to.
    pub status: EventStatus,
    /// Free text details.
    pub description: Option<String>,
}

impl NewEvent {
    /// Check the event's name and times.
    ///
    /// # Errors
    /// Returns [Error::EmptyField] if the name is blank, or
    /// [Error::InvalidTimeRange] if it ends before it starts.
    pub fn validate(self) -> Result<Self, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::EmptyField("Event name"));
        }

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(Error::InvalidTimeRange { start, end });
            }
        }

        Ok(self)
    }
}

const EVENT_COLUMNS: &str = "id, name, event_type, event_date, start_time, end_time, location, \
    cost, status, description";

/// Create the event table.
pub fn create_event_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS event (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            event_type TEXT NOT NULL CHECK (event_type IN
                ('recital', 'competition', 'workshop', 'performance', 'other')),
            event_date TEXT NOT NULL,
            start_time TEXT,
            end_time TEXT,
            location TEXT,
            cost TEXT,
            status TEXT NOT NULL DEFAULT 'scheduled'
                CHECK (status IN ('scheduled', 'in-progress', 'completed', 'cancelled')),
            description TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_event_date ON event(event_date);",
    )
}

/// Save a new event to the database.
///
/// # Errors
/// Returns an error if the event fails [NewEvent::validate].
pub fn create_event(event: NewEvent, connection: &Connection) -> Result<Event, Error> {
    let event = event.validate()?;

    connection.execute(
        "INSERT INTO event (name, event_type, event_date, start_time, end_time, location, cost, \
            status, description) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.name,
            event.event_type,
            event.event_date,
            event.start_time,
            event.end_time,
            event.location,
            event.cost.map(to_storage),
            event.status,
            event.description,
        ],
    )?;

    Ok(Event {
        id: connection.last_insert_rowid(),
        name: event.name,
        event_type: event.event_type,
        event_date: event.event_date,
        start_time: event.start_time,
        end_time: event.end_time,
        location: event.location,
        cost: event.cost,
        status: event.status,
        description: event.description,
    })
}

/// Get every event, soonest first.
pub fn get_events(connection: &Connection) -> Result<Vec<Event>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM event ORDER BY event_date ASC, start_time ASC, id ASC"
        ))?
        .query_map([], map_row_to_event)?
        .map(|maybe_event| maybe_event.map_err(Error::from))
        .collect()
}

/// Get up to `limit` events on or after `today`, soonest first.
pub fn get_upcoming_events(
    today: Date,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Event>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM event WHERE event_date >= ?1 \
            ORDER BY event_date ASC, start_time ASC, id ASC LIMIT ?2"
        ))?
        .query_map(params![today, limit], map_row_to_event)?
        .map(|maybe_event| maybe_event.map_err(Error::from))
        .collect()
}

/// Delete an event.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the event does not exist.
pub fn delete_event(id: EventId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM event WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("event"));
    }

    Ok(())
}

fn map_row_to_event(row: &Row) -> Result<Event, rusqlite::Error> {
    let cost: Option<String> = row.get(7)?;

    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        event_type: row.get(2)?,
        event_date: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        location: row.get(6)?,
        cost: cost.as_deref().map(parse_amount),
        status: row.get(8)?,
        description: row.get(9)?,
    })
}
