//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/students/{student_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the studio's headline numbers.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for listing and searching students.
pub const STUDENTS_VIEW: &str = "/students";
/// The page for listing classes and their enrollments.
pub const CLASSES_VIEW: &str = "/classes";
/// The page for taking attendance for a class on a date.
pub const ATTENDANCE_VIEW: &str = "/attendance";
/// The page for payments, expenses and the financial summary.
pub const FINANCES_VIEW: &str = "/finances";
/// The page for listing staff members.
pub const STAFF_VIEW: &str = "/staff";
/// The page for listing events.
pub const EVENTS_VIEW: &str = "/events";
/// The page for listing document metadata.
pub const DOCUMENTS_VIEW: &str = "/documents";
/// The page for the financial, attendance and class reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a student.
pub const STUDENTS_API: &str = "/api/students";
/// The route to delete a student.
pub const STUDENT: &str = "/api/students/{student_id}";
/// The route to create a class.
pub const CLASSES_API: &str = "/api/classes";
/// The route to delete a class.
pub const CLASS: &str = "/api/classes/{class_id}";
/// The route to enroll a student in a class.
pub const ENROLLMENTS_API: &str = "/api/enrollments";
/// The route to delete an enrollment.
pub const ENROLLMENT: &str = "/api/enrollments/{enrollment_id}";
/// The route to read and set attendance.
pub const ATTENDANCE_API: &str = "/api/attendance";
/// The route to mark several students' attendance at once.
pub const ATTENDANCE_BULK_API: &str = "/api/attendance/bulk";
/// The route to record a payment.
pub const PAYMENTS_API: &str = "/api/payments";
/// The route to delete a payment.
pub const PAYMENT: &str = "/api/payments/{payment_id}";
/// The route to record an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to delete an expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to create a staff member.
pub const STAFF_API: &str = "/api/staff";
/// The route to delete a staff member.
pub const STAFF_MEMBER: &str = "/api/staff/{staff_id}";
/// The route to create an event.
pub const EVENTS_API: &str = "/api/events";
/// The route to delete an event.
pub const EVENT: &str = "/api/events/{event_id}";
/// The route to add document metadata.
pub const DOCUMENTS_API: &str = "/api/documents";
/// The route to delete document metadata.
pub const DOCUMENT: &str = "/api/documents/{document_id}";
/// The route for the dashboard statistics as JSON.
pub const DASHBOARD_STATS_API: &str = "/api/stats/dashboard";
/// The route for the financial summary as JSON.
pub const FINANCIAL_SUMMARY_API: &str = "/api/stats/finances";
/// The route for the attendance statistics as JSON.
pub const ATTENDANCE_STATS_API: &str = "/api/stats/attendance";
/// The route for the class performance table as JSON.
pub const CLASS_PERFORMANCE_API: &str = "/api/stats/classes";
/// The route for how full a single class is.
pub const CLASS_FILL_API: &str = "/api/stats/classes/{class_id}";
/// The route for a monthly series as JSON.
pub const MONTHLY_SERIES_API: &str = "/api/stats/series/{metric}";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/students/{student_id}', '{student_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::STUDENTS_VIEW,
            endpoints::CLASSES_VIEW,
            endpoints::ATTENDANCE_VIEW,
            endpoints::FINANCES_VIEW,
            endpoints::STAFF_VIEW,
            endpoints::EVENTS_VIEW,
            endpoints::DOCUMENTS_VIEW,
            endpoints::REPORTS_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::STUDENTS_API,
            endpoints::STUDENT,
            endpoints::CLASSES_API,
            endpoints::CLASS,
            endpoints::ENROLLMENTS_API,
            endpoints::ENROLLMENT,
            endpoints::ATTENDANCE_API,
            endpoints::ATTENDANCE_BULK_API,
            endpoints::PAYMENTS_API,
            endpoints::PAYMENT,
            endpoints::EXPENSES_API,
            endpoints::EXPENSE,
            endpoints::STAFF_API,
            endpoints::STAFF_MEMBER,
            endpoints::EVENTS_API,
            endpoints::EVENT,
            endpoints::DOCUMENTS_API,
            endpoints::DOCUMENT,
            endpoints::DASHBOARD_STATS_API,
            endpoints::FINANCIAL_SUMMARY_API,
            endpoints::ATTENDANCE_STATS_API,
            endpoints::CLASS_PERFORMANCE_API,
            endpoints::CLASS_FILL_API,
            endpoints::MONTHLY_SERIES_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/api/students/{student_id}", 1);

        assert_eq!(formatted_path, "/api/students/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn accepts_text_parameters() {
        let formatted_path = format_endpoint(endpoints::MONTHLY_SERIES_API, "revenue");

        assert_eq!(formatted_path, "/api/stats/series/revenue");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
