//! Merges a class roster with the attendance recorded for a date.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    attendance::core::{
        AttendanceId, AttendanceRecord, AttendanceStatus, get_attendance, insert_attendance,
        update_attendance_status,
    },
    class::ClassId,
    enrollment::{RosterEntry, get_roster},
    student::StudentId,
};

/// The attendance of one enrolled student for a class and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// The enrolled student.
    pub student_id: StudentId,
    /// The student's first and last name.
    pub student_name: String,
    /// The recorded status, or [AttendanceStatus::Absent] when nothing has been recorded.
    pub status: AttendanceStatus,
    /// The id of the persisted record, `None` if nothing has been recorded yet.
    ///
    /// Callers pass this back to [set_status] so that it updates the record
    /// instead of inserting a second one.
    pub attendance_record_id: Option<AttendanceId>,
}

/// Produce one row per roster entry, in roster order.
///
/// Students without a record are absent. Records for students not on the
/// roster are ignored.
pub fn merge_roster_with_records(
    roster: &[RosterEntry],
    records: &[AttendanceRecord],
) -> Vec<AttendanceRow> {
    let records_by_student: HashMap<StudentId, &AttendanceRecord> = records
        .iter()
        .map(|record| (record.student_id, record))
        .collect();

    roster
        .iter()
        .map(|entry| {
            let record = records_by_student.get(&entry.student_id);

            AttendanceRow {
                student_id: entry.student_id,
                student_name: entry.full_name(),
                status: record.map_or(AttendanceStatus::Absent, |record| record.status),
                attendance_record_id: record.map(|record| record.id),
            }
        })
        .collect()
}

/// Get the attendance of every student enrolled in a class on `date`.
///
/// Database errors are logged and produce an empty list.
pub fn reconcile(class_id: ClassId, date: Date, connection: &Connection) -> Vec<AttendanceRow> {
    let roster = match get_roster(class_id, connection) {
        Ok(roster) => roster,
        Err(error) => {
            tracing::error!("could not get the roster for class {class_id}: {error}");
            return Vec::new();
        }
    };

    let records = match get_attendance(class_id, date, connection) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("could not get attendance for class {class_id} on {date}: {error}");
            return Vec::new();
        }
    };

    merge_roster_with_records(&roster, &records)
}

/// Set a student's attendance for a class on `date`, returning the record's id.
///
/// When `existing_id` is given that record is overwritten, otherwise a new
/// record is inserted. The last write wins.
///
/// # Errors
/// Returns [Error::UpdateMissing] if `existing_id` does not exist, or
/// [Error::DuplicateAttendance] if a record exists but `existing_id` was not given.
pub fn set_status(
    class_id: ClassId,
    student_id: StudentId,
    date: Date,
    status: AttendanceStatus,
    existing_id: Option<AttendanceId>,
    connection: &Connection,
) -> Result<AttendanceId, Error> {
    match existing_id {
        Some(id) => {
            update_attendance_status(id, status, connection)?;
            Ok(id)
        }
        None => insert_attendance(class_id, student_id, date, status, connection),
    }
}
