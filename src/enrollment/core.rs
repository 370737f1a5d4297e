//! Enrollments link students to the classes they attend.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{
    Error, class::ClassId, database_id::DatabaseId, student::StudentId, text_enum::text_enum,
};

pub type EnrollmentId = DatabaseId;

text_enum! {
    /// Whether the student is still taking the class.
    pub enum EnrollmentStatus("enrollment status") {
        Active => ("active", "Active"),
        Dropped => ("dropped", "Dropped"),
        Completed => ("completed", "Completed"),
    }
}

text_enum! {
    /// Whether the tuition for an enrollment has been paid.
    pub enum EnrollmentPaymentStatus("enrollment payment status") {
        Pending => ("pending", "Pending"),
        Paid => ("paid", "Paid"),
        Partial => ("partial", "Partial"),
        Overdue => ("overdue", "Overdue"),
    }
}

/// An enrollment as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub enrollment_date: Date,
    pub status: EnrollmentStatus,
    pub payment_status: EnrollmentPaymentStatus,
}

/// An enrollment with the student's and class's names for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentListing {
    pub id: EnrollmentId,
    pub student_name: String,
    pub class_name: String,
    pub enrollment_date: Date,
    pub status: EnrollmentStatus,
    pub payment_status: EnrollmentPaymentStatus,
}

/// A student on a class's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
}

impl RosterEntry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create the enrollment table.
///
/// Enrollments are deleted along with their student or class.
pub fn create_enrollment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS enrollment (
            id INTEGER PRIMARY KEY,
            student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
            class_id INTEGER NOT NULL REFERENCES class(id) ON DELETE CASCADE,
            enrollment_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'dropped', 'completed')),
            payment_status TEXT NOT NULL DEFAULT 'pending'
                CHECK (payment_status IN ('pending', 'paid', 'partial', 'overdue')),
            UNIQUE (student_id, class_id)
        );

        CREATE INDEX IF NOT EXISTS idx_enrollment_class ON enrollment(class_id);
        CREATE INDEX IF NOT EXISTS idx_enrollment_date ON enrollment(enrollment_date);",
    )
}

/// Enroll a student in a class. The enrollment starts active with tuition pending.
///
/// # Errors
/// Returns [Error::DuplicateEnrollment] if the student is already enrolled in
/// the class, or [Error::InvalidForeignKey] if the student or class does not exist.
pub fn create_enrollment(
    student_id: StudentId,
    class_id: ClassId,
    enrollment_date: Date,
    connection: &Connection,
) -> Result<Enrollment, Error> {
    let status = EnrollmentStatus::Active;
    let payment_status = EnrollmentPaymentStatus::Pending;

    connection.execute(
        "INSERT INTO enrollment (student_id, class_id, enrollment_date, status, payment_status) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![student_id, class_id, enrollment_date, status, payment_status],
    )?;

    Ok(Enrollment {
        id: connection.last_insert_rowid(),
        student_id,
        class_id,
        enrollment_date,
        status,
        payment_status,
    })
}

/// Get the students actively enrolled in a class, ordered by last name then first name.
pub fn get_roster(class_id: ClassId, connection: &Connection) -> Result<Vec<RosterEntry>, Error> {
    connection
        .prepare(
            "SELECT student.id, student.first_name, student.last_name \
            FROM enrollment INNER JOIN student ON student.id = enrollment.student_id \
            WHERE enrollment.class_id = ?1 AND enrollment.status = 'active' \
            ORDER BY student.last_name ASC, student.first_name ASC, student.id ASC",
        )?
        .query_map([class_id], |row| {
            Ok(RosterEntry {
                student_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

const LISTING_QUERY: &str = "SELECT enrollment.id, \
        student.first_name || ' ' || student.last_name, class.name, \
        enrollment.enrollment_date, enrollment.status, enrollment.payment_status \
    FROM enrollment \
    INNER JOIN student ON student.id = enrollment.student_id \
    INNER JOIN class ON class.id = enrollment.class_id";

/// Get every enrollment, newest first.
pub fn get_enrollments(connection: &Connection) -> Result<Vec<EnrollmentListing>, Error> {
    connection
        .prepare(&format!(
            "{LISTING_QUERY} ORDER BY enrollment.enrollment_date DESC, enrollment.id DESC"
        ))?
        .query_map([], map_row_to_listing)?
        .map(|maybe_listing| maybe_listing.map_err(Error::from))
        .collect()
}

/// Get the `limit` most recent enrollments, newest first.
pub fn get_recent_enrollments(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<EnrollmentListing>, Error> {
    connection
        .prepare(&format!(
            "{LISTING_QUERY} ORDER BY enrollment.enrollment_date DESC, enrollment.id DESC LIMIT ?1"
        ))?
        .query_map([limit], map_row_to_listing)?
        .map(|maybe_listing| maybe_listing.map_err(Error::from))
        .collect()
}

/// Delete an enrollment.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the enrollment does not exist.
pub fn delete_enrollment(id: EnrollmentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM enrollment WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("enrollment"));
    }

    Ok(())
}

fn map_row_to_listing(row: &Row) -> Result<EnrollmentListing, rusqlite::Error> {
    Ok(EnrollmentListing {
        id: row.get(0)?,
        student_name: row.get(1)?,
        class_name: row.get(2)?,
        enrollment_date: row.get(3)?,
        status: row.get(4)?,
        payment_status: row.get(5)?,
    })
}
