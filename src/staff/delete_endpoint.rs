//! Defines the endpoint for deleting a staff member.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    staff::core::{StaffId, delete_staff_member},
};

/// The state needed to delete a staff member.
#[derive(Debug, Clone)]
pub struct DeleteStaffState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteStaffState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a staff member, responds with an alert.
pub async fn delete_staff_endpoint(
    State(state): State<DeleteStaffState>,
    Path(staff_id): Path<StaffId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_staff_member(staff_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Staff member deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete staff member {staff_id}: {error}");
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

    use crate::{
        class::get_classes,
        staff::delete_endpoint::{DeleteStaffState, delete_staff_endpoint},
        test_utils::{get_test_connection, must_create_class, must_create_staff},
    };

    #[tokio::test]
    async fn deleting_instructor_keeps_their_classes() {
        let connection = get_test_connection();
        let instructor = must_create_staff("Maya", "Rivera", "maya@studio.test", &connection);
        let class = must_create_class("Jazz I", 12, &connection);
        connection
            .execute(
                "UPDATE class SET instructor_id = ?1 WHERE id = ?2",
                (instructor.id, class.id),
            )
            .unwrap();
        let state = DeleteStaffState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_staff_endpoint(State(state.clone()), Path(instructor.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        let classes = get_classes(&connection).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].instructor_name, None);
    }

    #[tokio::test]
    async fn deleting_missing_staff_member_responds_not_found() {
        let state = DeleteStaffState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_staff_endpoint(State(state), Path(5)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
