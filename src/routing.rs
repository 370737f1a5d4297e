//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    attendance::{
        get_attendance_endpoint, get_attendance_page, mark_all_endpoint, put_attendance_endpoint,
        set_attendance_endpoint,
    },
    class::{create_class_endpoint, delete_class_endpoint, get_classes_page},
    dashboard::get_dashboard_page,
    document::{create_document_endpoint, delete_document_endpoint, get_documents_page},
    endpoints,
    enrollment::{create_enrollment_endpoint, delete_enrollment_endpoint},
    event::{create_event_endpoint, delete_event_endpoint, get_events_page},
    finance::{
        create_expense_endpoint, create_payment_endpoint, delete_expense_endpoint,
        delete_payment_endpoint, get_finances_page,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    reports::get_reports_page,
    staff::{create_staff_endpoint, delete_staff_endpoint, get_staff_page},
    stats::{
        get_attendance_stats, get_class_fill, get_class_performance, get_dashboard_stats,
        get_financial_summary, get_monthly_series,
    },
    student::{create_student_endpoint, delete_student_endpoint, get_students_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::STUDENTS_VIEW, get(get_students_page))
        .route(endpoints::CLASSES_VIEW, get(get_classes_page))
        .route(endpoints::ATTENDANCE_VIEW, get(get_attendance_page))
        .route(endpoints::FINANCES_VIEW, get(get_finances_page))
        .route(endpoints::STAFF_VIEW, get(get_staff_page))
        .route(endpoints::EVENTS_VIEW, get(get_events_page))
        .route(endpoints::DOCUMENTS_VIEW, get(get_documents_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::STUDENTS_API, post(create_student_endpoint))
        .route(endpoints::STUDENT, delete(delete_student_endpoint))
        .route(endpoints::CLASSES_API, post(create_class_endpoint))
        .route(endpoints::CLASS, delete(delete_class_endpoint))
        .route(endpoints::ENROLLMENTS_API, post(create_enrollment_endpoint))
        .route(endpoints::ENROLLMENT, delete(delete_enrollment_endpoint))
        .route(
            endpoints::ATTENDANCE_API,
            get(get_attendance_endpoint)
                .post(set_attendance_endpoint)
                .put(put_attendance_endpoint),
        )
        .route(endpoints::ATTENDANCE_BULK_API, post(mark_all_endpoint))
        .route(endpoints::PAYMENTS_API, post(create_payment_endpoint))
        .route(endpoints::PAYMENT, delete(delete_payment_endpoint))
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(endpoints::EXPENSE, delete(delete_expense_endpoint))
        .route(endpoints::STAFF_API, post(create_staff_endpoint))
        .route(endpoints::STAFF_MEMBER, delete(delete_staff_endpoint))
        .route(endpoints::EVENTS_API, post(create_event_endpoint))
        .route(endpoints::EVENT, delete(delete_event_endpoint))
        .route(endpoints::DOCUMENTS_API, post(create_document_endpoint))
        .route(endpoints::DOCUMENT, delete(delete_document_endpoint))
        .route(endpoints::DASHBOARD_STATS_API, get(get_dashboard_stats))
        .route(endpoints::FINANCIAL_SUMMARY_API, get(get_financial_summary))
        .route(endpoints::ATTENDANCE_STATS_API, get(get_attendance_stats))
        .route(endpoints::CLASS_PERFORMANCE_API, get(get_class_performance))
        .route(endpoints::CLASS_FILL_API, get(get_class_fill))
        .route(endpoints::MONTHLY_SERIES_API, get(get_monthly_series));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}
