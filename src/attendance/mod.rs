//! Attendance tracking.
//!
//! Only students who have been marked get a stored record. Everyone else
//! enrolled in the class is treated as absent until they are marked.

mod attendance_page;
mod core;
mod endpoints;
mod reconcile;

pub use attendance_page::get_attendance_page;
pub use core::{
    AttendanceId, AttendanceRecord, AttendanceStatus, create_attendance_table, get_attendance,
    insert_attendance, update_attendance_status,
};
pub use endpoints::{
    get_attendance_endpoint, mark_all_endpoint, put_attendance_endpoint, set_attendance_endpoint,
};
pub use reconcile::{AttendanceRow, merge_roster_with_records, reconcile, set_status};
