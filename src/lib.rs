//! Studio Desk is a back office for running a dance studio.
//!
//! This library provides a REST API that directly serves HTML pages for
//! managing students, classes, staff, attendance, payments, expenses, events
//! and documents, plus a small JSON API for the attendance roster and the
//! dashboard statistics.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod action_result;
mod alert;
mod app_state;
mod attendance;
mod class;
mod dashboard;
mod database_id;
mod db;
mod document;
mod endpoints;
mod enrollment;
mod error;
mod event;
mod finance;
mod form;
mod html;
mod internal_server_error;
mod logging;
mod money;
mod navigation;
mod not_found;
mod reports;
mod routing;
mod staff;
mod stats;
mod student;
mod text_enum;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use attendance::{AttendanceRow, AttendanceStatus, reconcile, set_status};
pub use class::{ClassStatus, DayOfWeek, NewClassSession, create_class};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use document::{DocumentType, NewDocument, create_document};
pub use enrollment::{create_enrollment, get_roster};
pub use error::Error;
pub use event::{EventStatus, EventType, NewEvent, create_event};
pub use finance::{
    ExpenseStatus, NewExpense, NewPayment, PaymentMethod, PaymentStatus, PaymentType,
    create_expense, create_payment,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use staff::{NewStaffMember, StaffRole, StaffStatus, create_staff_member};
pub use stats::{
    AttendanceStats, ClassPerformance, DashboardStats, FinancialSummary, SeriesMetric,
    SeriesPoint, attendance_stats, class_performance, dashboard_stats, financial_summary,
    monthly_series,
};
pub use student::{NewStudent, StudentStatus, create_student};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
