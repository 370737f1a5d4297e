//! Class sessions and the database queries for them.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Time;

use crate::{
    Error,
    database_id::DatabaseId,
    db::get_count,
    money::{parse_amount, to_storage},
    staff::StaffId,
    text_enum::text_enum,
};

pub type ClassId = DatabaseId;

text_enum! {
    /// The day of the week a class runs on.
    pub enum DayOfWeek("day of the week") {
        Monday => ("monday", "Monday"),
        Tuesday => ("tuesday", "Tuesday"),
        Wednesday => ("wednesday", "Wednesday"),
        Thursday => ("thursday", "Thursday"),
        Friday => ("friday", "Friday"),
        Saturday => ("saturday", "Saturday"),
        Sunday => ("sunday", "Sunday"),
    }
}

text_enum! {
    /// Whether a class is running and taking students.
    #[derive(Default)]
    pub enum ClassStatus("class status") {
        #[default]
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        Full => ("full", "Full"),
    }
}

/// A weekly class as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSession {
    pub id: ClassId,
    pub name: String,
    pub class_type: String,
    pub level: Option<String>,
    pub instructor_id: Option<StaffId>,
    pub day_of_week: DayOfWeek,
    pub start_time: Time,
    pub end_time: Time,
    pub room: Option<String>,
    pub capacity: i64,
    pub tuition_fee: Option<Decimal>,
    pub status: ClassStatus,
}

/// A validated class that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClassSession {
    /// The class's display name, e.g. "Ballet I".
    pub name: String,
    /// The dance style, e.g. "Ballet".
    pub class_type: String,
    /// The skill level the class is aimed at.
    pub level: Option<String>,
    /// The staff member teaching the class.
    pub instructor_id: Option<StaffId>,
    /// The day the class runs each week.
    pub day_of_week: DayOfWeek,
    /// When the class starts.
    pub start_time: Time,
    /// When the class ends, after `start_time`.
    pub end_time: Time,
    /// Where the class is held.
    pub room: Option<String>,
    /// The maximum number of enrolled students, must be positive.
    pub capacity: i64,
    /// The fee per term in dollars.
    pub tuition_fee: Option<Decimal>,
    /// Whether the class is running.
    pub status: ClassStatus,
}

impl NewClassSession {
    /// Check the capacity is positive and the class ends after it starts.
    ///
    /// # Errors
    /// Returns [Error::InvalidCapacity] or [Error::InvalidTimeRange].
    pub fn validate(self) -> Result<Self, Error> {
        if self.capacity <= 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }

        if self.end_time <= self.start_time {
            return Err(Error::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }

        Ok(self)
    }
}

/// A class with its instructor's name and the number of students enrolled.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassListing {
    pub class: ClassSession,
    pub instructor_name: Option<String>,
    pub enrolled: u64,
}

/// How many students a class can take and how many are enrolled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCapacity {
    pub capacity: i64,
    pub enrolled: u64,
}

const CLASS_COLUMNS: &str = "class.id, class.name, class.class_type, class.level, \
    class.instructor_id, class.day_of_week, class.start_time, class.end_time, class.room, \
    class.capacity, class.tuition_fee, class.status";

/// Counts the distinct students with an active enrollment in `class.id`.
const ENROLLED_COUNT: &str = "(SELECT COUNT(DISTINCT enrollment.student_id) FROM enrollment \
    WHERE enrollment.class_id = class.id AND enrollment.status = 'active')";

/// Create the class table.
pub fn create_class_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS class (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            class_type TEXT NOT NULL,
            level TEXT,
            instructor_id INTEGER REFERENCES staff(id) ON DELETE SET NULL,
            day_of_week TEXT NOT NULL
                CHECK (day_of_week IN ('monday', 'tuesday', 'wednesday', 'thursday', 'friday', 'saturday', 'sunday')),
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            room TEXT,
            capacity INTEGER NOT NULL CHECK (capacity > 0),
            tuition_fee TEXT,
            status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'inactive', 'full'))
        );

        CREATE INDEX IF NOT EXISTS idx_class_instructor ON class(instructor_id);",
    )
}

/// Save a new class to the database.
///
/// # Errors
/// Returns a validation error if the class is invalid, or
/// [Error::InvalidForeignKey] if the instructor does not exist.
pub fn create_class(
    class: NewClassSession,
    connection: &Connection,
) -> Result<ClassSession, Error> {
    let class = class.validate()?;

    connection.execute(
        "INSERT INTO class (name, class_type, level, instructor_id, day_of_week, start_time, \
            end_time, room, capacity, tuition_fee, status) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            class.name,
            class.class_type,
            class.level,
            class.instructor_id,
            class.day_of_week,
            class.start_time,
            class.end_time,
            class.room,
            class.capacity,
            class.tuition_fee.map(to_storage),
            class.status,
        ],
    )?;

    Ok(ClassSession {
        id: connection.last_insert_rowid(),
        name: class.name,
        class_type: class.class_type,
        level: class.level,
        instructor_id: class.instructor_id,
        day_of_week: class.day_of_week,
        start_time: class.start_time,
        end_time: class.end_time,
        room: class.room,
        capacity: class.capacity,
        tuition_fee: class.tuition_fee,
        status: class.status,
    })
}

/// Retrieve every class with its instructor's name and enrollment count,
/// ordered by name.
pub fn get_classes(connection: &Connection) -> Result<Vec<ClassListing>, Error> {
    connection
        .prepare(&format!(
            "SELECT {CLASS_COLUMNS}, staff.first_name || ' ' || staff.last_name, {ENROLLED_COUNT} \
            FROM class LEFT JOIN staff ON staff.id = class.instructor_id \
            ORDER BY class.name ASC"
        ))?
        .query_map([], |row| {
            Ok(ClassListing {
                class: map_row_to_class(row)?,
                instructor_name: row.get(12)?,
                enrolled: get_count(row, 13)?,
            })
        })?
        .map(|maybe_listing| maybe_listing.map_err(Error::from))
        .collect()
}

/// Retrieve the active classes with their enrollment counts, ordered by name.
pub fn get_active_classes(connection: &Connection) -> Result<Vec<ClassListing>, Error> {
    Ok(get_classes(connection)?
        .into_iter()
        .filter(|listing| listing.class.status == ClassStatus::Active)
        .collect())
}

/// Get the capacity of a class and the number of distinct students enrolled.
///
/// # Errors
/// Returns [Error::NotFound] if the class does not exist.
pub fn get_class_capacity_and_enrollment(
    id: ClassId,
    connection: &Connection,
) -> Result<ClassCapacity, Error> {
    connection
        .query_row(
            &format!("SELECT class.capacity, {ENROLLED_COUNT} FROM class WHERE class.id = ?1"),
            [id],
            |row| {
                Ok(ClassCapacity {
                    capacity: row.get(0)?,
                    enrolled: get_count(row, 1)?,
                })
            },
        )
        .map_err(Error::from)
}

/// Delete a class along with its enrollments and attendance.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the class does not exist.
pub fn delete_class(id: ClassId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM class WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("class"));
    }

    Ok(())
}

fn map_row_to_class(row: &Row) -> Result<ClassSession, rusqlite::Error> {
    let tuition_fee: Option<String> = row.get(10)?;

    Ok(ClassSession {
        id: row.get(0)?,
        name: row.get(1)?,
        class_type: row.get(2)?,
        level: row.get(3)?,
        instructor_id: row.get(4)?,
        day_of_week: row.get(5)?,
        start_time: row.get(6)?,
        end_time: row.get(7)?,
        room: row.get(8)?,
        capacity: row.get(9)?,
        tuition_fee: tuition_fee.as_deref().map(parse_amount),
        status: row.get(11)?,
    })
}
