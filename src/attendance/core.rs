//! Attendance records and the database queries for them.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, class::ClassId, database_id::DatabaseId, student::StudentId, text_enum::text_enum,
};

pub type AttendanceId = DatabaseId;

text_enum! {
    /// Whether a student showed up to a class.
    pub enum AttendanceStatus("attendance status") {
        /// The student attended.
        Present => ("present", "Present"),
        /// The student did not attend. Students without a record are treated as absent.
        Absent => ("absent", "Absent"),
        /// The student attended but arrived late.
        Late => ("late", "Late"),
        /// The student was absent with a reason.
        Excused => ("excused", "Excused"),
    }
}

/// A persisted attendance record for one student, class and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub attendance_date: Date,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Create the attendance table.
///
/// There is at most one record per student, class and date. Records are
/// deleted along with their student or class.
pub fn create_attendance_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS attendance (
            id INTEGER PRIMARY KEY,
            student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
            class_id INTEGER NOT NULL REFERENCES class(id) ON DELETE CASCADE,
            attendance_date TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('present', 'absent', 'late', 'excused')),
            notes TEXT,
            UNIQUE (student_id, class_id, attendance_date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_class_date
            ON attendance(class_id, attendance_date);
        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(attendance_date);",
    )
}

/// Get the attendance records for a class on `date`.
pub fn get_attendance(
    class_id: ClassId,
    date: Date,
    connection: &Connection,
) -> Result<Vec<AttendanceRecord>, Error> {
    connection
        .prepare(
            "SELECT id, student_id, class_id, attendance_date, status, notes \
            FROM attendance WHERE class_id = ?1 AND attendance_date = ?2 ORDER BY id",
        )?
        .query_map(params![class_id, date], map_row_to_record)?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

/// Record a student's attendance and return the new record's id.
///
/// # Errors
/// Returns [Error::DuplicateAttendance] if the student already has a record
/// for the class on `date`, or [Error::InvalidForeignKey] if the student or
/// class does not exist.
pub fn insert_attendance(
    class_id: ClassId,
    student_id: StudentId,
    date: Date,
    status: AttendanceStatus,
    connection: &Connection,
) -> Result<AttendanceId, Error> {
    connection.execute(
        "INSERT INTO attendance (student_id, class_id, attendance_date, status) \
        VALUES (?1, ?2, ?3, ?4)",
        params![student_id, class_id, date, status],
    )?;

    Ok(connection.last_insert_rowid())
}

/// Overwrite the status of an existing attendance record.
///
/// # Errors
/// Returns [Error::UpdateMissing] if there is no record with `id`.
pub fn update_attendance_status(
    id: AttendanceId,
    status: AttendanceStatus,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE attendance SET status = ?1 WHERE id = ?2",
        params![status, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing("attendance record"));
    }

    Ok(())
}

fn map_row_to_record(row: &Row) -> Result<AttendanceRecord, rusqlite::Error> {
    Ok(AttendanceRecord {
        id: row.get(0)?,
        student_id: row.get(1)?,
        class_id: row.get(2)?,
        attendance_date: row.get(3)?,
        status: row.get(4)?,
        notes: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{get_test_connection, must_create_class, must_create_student},
    };

    use super::{AttendanceStatus, get_attendance, insert_attendance, update_attendance_status};

    #[test]
    fn insert_then_get_attendance() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        let class = must_create_class("Ballet I", 10, &connection);

        let id = insert_attendance(
            class.id,
            student.id,
            date!(2024 - 03 - 01),
            AttendanceStatus::Late,
            &connection,
        )
        .unwrap();

        let records = get_attendance(class.id, date!(2024 - 03 - 01), &connection).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].status, AttendanceStatus::Late);
        assert!(
            get_attendance(class.id, date!(2024 - 03 - 02), &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn second_insert_for_same_day_is_duplicate() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        let class = must_create_class("Ballet I", 10, &connection);
        let date = date!(2024 - 03 - 01);
        insert_attendance(class.id, student.id, date, AttendanceStatus::Present, &connection)
            .unwrap();

        let result =
            insert_attendance(class.id, student.id, date, AttendanceStatus::Absent, &connection);

        assert_eq!(result, Err(Error::DuplicateAttendance));
    }

    #[test]
    fn updating_missing_record_fails() {
        let connection = get_test_connection();

        let result = update_attendance_status(42, AttendanceStatus::Present, &connection);

        assert_eq!(result, Err(Error::UpdateMissing("attendance record")));
    }
}
