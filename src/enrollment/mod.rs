//! Enrolling students in classes and reading class rosters.

mod core;
mod endpoints;

pub use core::{
    Enrollment, EnrollmentListing, EnrollmentPaymentStatus, EnrollmentStatus, RosterEntry,
    create_enrollment, create_enrollment_table, get_enrollments, get_recent_enrollments,
    get_roster,
};
pub use endpoints::{create_enrollment_endpoint, delete_enrollment_endpoint};
