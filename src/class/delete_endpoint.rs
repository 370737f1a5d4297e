//! Defines the endpoint for deleting a class.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    class::core::{ClassId, delete_class},
};

/// The state needed to delete a class.
#[derive(Debug, Clone)]
pub struct DeleteClassState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteClassState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a class, responds with an alert.
///
/// The class's enrollments and attendance records are deleted too.
pub async fn delete_class_endpoint(
    State(state): State<DeleteClassState>,
    Path(class_id): Path<ClassId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_class(class_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Class deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete class {class_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        attendance::{AttendanceStatus, insert_attendance},
        class::delete_endpoint::{DeleteClassState, delete_class_endpoint},
        enrollment::get_enrollments,
        test_utils::{get_test_connection, must_create_class, must_create_student, must_enroll},
    };

    #[tokio::test]
    async fn deleting_class_cascades_to_enrollments_and_attendance() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        let class = must_create_class("Ballet I", 10, &connection);
        must_enroll(student.id, class.id, date!(2024 - 03 - 01), &connection);
        insert_attendance(
            class.id,
            student.id,
            date!(2024 - 03 - 04),
            AttendanceStatus::Present,
            &connection,
        )
        .unwrap();
        let state = DeleteClassState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_class_endpoint(State(state.clone()), Path(class.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_enrollments(&connection).unwrap().is_empty());
        let attendance_rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))
            .unwrap();
        assert_eq!(attendance_rows, 0);
    }

    #[tokio::test]
    async fn deleting_missing_class_responds_not_found() {
        let state = DeleteClassState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_class_endpoint(State(state), Path(8)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
