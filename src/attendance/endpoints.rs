//! Endpoints for reading and setting attendance.
//!
//! The htmx endpoint responds with an alert and fires the
//! [ATTENDANCE_UPDATED_EVENT] so the attendance table reloads itself. The
//! JSON endpoints serve the same data to API clients.

use std::sync::{Arc, Mutex};

use axum::{
    Form, Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form as MultiValueForm;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    action_result::ActionResult,
    alert::Alert,
    attendance::{
        core::{AttendanceId, AttendanceStatus},
        reconcile::{AttendanceRow, reconcile, set_status},
    },
    class::ClassId,
    form::parse_optional_id,
    student::StudentId,
};

/// The htmx event fired after attendance changes.
pub const ATTENDANCE_UPDATED_EVENT: &str = "attendance-updated";

/// The state needed by the attendance endpoints.
#[derive(Debug, Clone)]
pub struct AttendanceState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AttendanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The class and date to get attendance for.
#[derive(Debug, Deserialize)]
pub struct AttendanceParams {
    pub class_id: ClassId,
    pub date: Date,
}

/// The form data sent by the attendance buttons.
#[derive(Debug, Deserialize)]
pub struct AttendanceForm {
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub date: Date,
    pub status: AttendanceStatus,
    /// The id of the existing record, blank if there is none.
    #[serde(default)]
    pub attendance_record_id: String,
}

/// The JSON body for setting a student's attendance.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetAttendanceRequest {
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub date: Date,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub attendance_record_id: Option<AttendanceId>,
}

/// The form data for marking every listed student with the same status.
#[derive(Debug, Deserialize)]
pub struct BulkAttendanceForm {
    pub class_id: ClassId,
    pub date: Date,
    pub status: AttendanceStatus,
    /// One entry per student to mark.
    #[serde(default)]
    pub student_id: Vec<StudentId>,
}

/// A route handler for setting attendance from the attendance page.
pub async fn set_attendance_endpoint(
    State(state): State<AttendanceState>,
    Form(form): Form<AttendanceForm>,
) -> Response {
    let existing_id = match parse_optional_id("attendance record", &form.attendance_record_id) {
        Ok(existing_id) => existing_id,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_status(
        form.class_id,
        form.student_id,
        form.date,
        form.status,
        existing_id,
        &connection,
    ) {
        Ok(_) => (
            [("HX-Trigger", ATTENDANCE_UPDATED_EVENT)],
            Alert::SuccessSimple {
                message: format!("Marked {}", form.status.label().to_lowercase()),
            },
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not set attendance with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for marking several students at once from the attendance page.
///
/// Students that are not enrolled in the class are skipped. Students with a
/// record are updated, the rest get a new record. Marking stops at the first
/// error, keeping the students already marked.
pub async fn mark_all_endpoint(
    State(state): State<AttendanceState>,
    MultiValueForm(form): MultiValueForm<BulkAttendanceForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let rows = reconcile(form.class_id, form.date, &connection);
    let mut marked_count = 0;

    for student_id in &form.student_id {
        let Some(row) = rows.iter().find(|row| row.student_id == *student_id) else {
            tracing::warn!(
                "Skipping student {student_id} who is not enrolled in class {}",
                form.class_id
            );
            continue;
        };

        if let Err(error) = set_status(
            form.class_id,
            row.student_id,
            form.date,
            form.status,
            row.attendance_record_id,
            &connection,
        ) {
            tracing::error!("Could not mark student {student_id} with {form:?}: {error}");

            if marked_count == 0 {
                return error.into_alert_response();
            }

            tracing::warn!(
                "Marked {marked_count} students in class {} before an error",
                form.class_id
            );

            return (
                error.status_code(),
                [("HX-Trigger", ATTENDANCE_UPDATED_EVENT)],
                Alert::Error {
                    message: format!("Stopped after marking {marked_count} students"),
                    details: format!("Could not mark the remaining students: {error}"),
                },
            )
                .into_response();
        }

        marked_count += 1;
    }

    (
        [("HX-Trigger", ATTENDANCE_UPDATED_EVENT)],
        Alert::SuccessSimple {
            message: format!(
                "Marked {marked_count} students {}",
                form.status.label().to_lowercase()
            ),
        },
    )
        .into_response()
}

/// A route handler that returns the attendance of every enrolled student as JSON.
pub async fn get_attendance_endpoint(
    State(state): State<AttendanceState>,
    Query(params): Query<AttendanceParams>,
) -> Result<Json<Vec<AttendanceRow>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(reconcile(params.class_id, params.date, &connection)))
}

/// A route handler for setting attendance through the JSON API.
pub async fn put_attendance_endpoint(
    State(state): State<AttendanceState>,
    Json(request): Json<SetAttendanceRequest>,
) -> (StatusCode, Json<ActionResult>) {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            let error = Error::DatabaseLockError;
            return (error.status_code(), Json(ActionResult::failed(&error)));
        }
    };

    match set_status(
        request.class_id,
        request.student_id,
        request.date,
        request.status,
        request.attendance_record_id,
        &connection,
    ) {
        Ok(_) => (
            StatusCode::OK,
            Json(ActionResult::succeeded(format!(
                "Attendance marked as {}",
                request.status
            ))),
        ),
        Err(error) => {
            tracing::error!("Could not set attendance with {request:?}: {error}");
            (error.status_code(), Json(ActionResult::failed(&error)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form, Json,
        extract::{Query, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form as MultiValueForm;
    use time::macros::date;

    use crate::{
        action_result::ActionResult,
        attendance::{
            core::{AttendanceStatus, insert_attendance},
            endpoints::{
                ATTENDANCE_UPDATED_EVENT, AttendanceForm, AttendanceParams, AttendanceState,
                BulkAttendanceForm, SetAttendanceRequest, get_attendance_endpoint,
                mark_all_endpoint, put_attendance_endpoint, set_attendance_endpoint,
            },
            reconcile::reconcile,
        },
        test_utils::{
            get_header, get_test_connection, must_create_class, must_create_student, must_enroll,
            parse_html_fragment,
        },
    };

    fn get_test_state() -> (AttendanceState, i64, i64) {
        let connection = get_test_connection();
        let class = must_create_class("Ballet I", 10, &connection);
        let student = must_create_student("Ana", "Lee", &connection);
        must_enroll(student.id, class.id, date!(2024 - 02 - 01), &connection);

        let state = AttendanceState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, class.id, student.id)
    }

    #[tokio::test]
    async fn form_post_records_attendance_and_fires_event() {
        let (state, class_id, student_id) = get_test_state();

        let response = set_attendance_endpoint(
            State(state.clone()),
            Form(AttendanceForm {
                class_id,
                student_id,
                date: date!(2024 - 03 - 01),
                status: AttendanceStatus::Late,
                attendance_record_id: String::new(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-trigger"), ATTENDANCE_UPDATED_EVENT);
        let connection = state.db_connection.lock().unwrap();
        let rows = reconcile(class_id, date!(2024 - 03 - 01), &connection);
        assert_eq!(rows[0].status, AttendanceStatus::Late);
        assert!(rows[0].attendance_record_id.is_some());
    }

    #[tokio::test]
    async fn form_post_with_unknown_record_id_is_not_found() {
        let (state, class_id, student_id) = get_test_state();

        let response = set_attendance_endpoint(
            State(state),
            Form(AttendanceForm {
                class_id,
                student_id,
                date: date!(2024 - 03 - 01),
                status: AttendanceStatus::Present,
                attendance_record_id: "12".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn json_get_returns_reconciled_rows() {
        let (state, class_id, student_id) = get_test_state();

        let Json(rows) = get_attendance_endpoint(
            State(state),
            Query(AttendanceParams {
                class_id,
                date: date!(2024 - 03 - 01),
            }),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, student_id);
        assert_eq!(rows[0].status, AttendanceStatus::Absent);
        assert_eq!(rows[0].attendance_record_id, None);
    }

    #[tokio::test]
    async fn json_put_reports_success_then_duplicate() {
        let (state, class_id, student_id) = get_test_state();
        let request = || SetAttendanceRequest {
            class_id,
            student_id,
            date: date!(2024 - 03 - 01),
            status: AttendanceStatus::Present,
            attendance_record_id: None,
        };

        let (first_status, Json(first)) =
            put_attendance_endpoint(State(state.clone()), Json(request())).await;
        let (second_status, Json(second)) =
            put_attendance_endpoint(State(state), Json(request())).await;

        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(
            first,
            ActionResult::succeeded("Attendance marked as present")
        );
        assert_eq!(second_status, StatusCode::CONFLICT);
        assert!(!second.success);
        assert!(second.error.is_some());
    }

    #[tokio::test]
    async fn mark_all_updates_and_inserts_records() {
        let (state, class_id, ana_id) = get_test_state();
        let date = date!(2024 - 03 - 01);
        let ben_id = {
            let connection = state.db_connection.lock().unwrap();
            let ben = must_create_student("Ben", "Ode", &connection);
            must_enroll(ben.id, class_id, date!(2024 - 02 - 01), &connection);
            insert_attendance(class_id, ana_id, date, AttendanceStatus::Absent, &connection)
                .unwrap();
            ben.id
        };
        let form: BulkAttendanceForm = serde_html_form::from_str(&format!(
            "class_id={class_id}&date=2024-03-01&status=present\
            &student_id={ana_id}&student_id={ben_id}&student_id=999"
        ))
        .unwrap();

        let response = mark_all_endpoint(State(state.clone()), MultiValueForm(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-trigger"), ATTENDANCE_UPDATED_EVENT);
        let connection = state.db_connection.lock().unwrap();
        let rows = reconcile(class_id, date, &connection);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.status == AttendanceStatus::Present));
        assert!(rows.iter().all(|row| row.attendance_record_id.is_some()));
        let record_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))
            .unwrap();
        assert_eq!(record_count, 2);
    }

    #[tokio::test]
    async fn mark_all_reports_students_marked_before_an_error() {
        let (state, class_id, ana_id) = get_test_state();
        let ben_id = {
            let connection = state.db_connection.lock().unwrap();
            let ben = must_create_student("Ben", "Ode", &connection);
            must_enroll(ben.id, class_id, date!(2024 - 02 - 01), &connection);
            connection
                .execute_batch(&format!(
                    "CREATE TRIGGER reject_ben BEFORE INSERT ON attendance \
                    WHEN NEW.student_id = {} BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                    ben.id
                ))
                .unwrap();
            ben.id
        };
        let form: BulkAttendanceForm = serde_html_form::from_str(&format!(
            "class_id={class_id}&date=2024-03-01&status=present\
            &student_id={ana_id}&student_id={ben_id}"
        ))
        .unwrap();

        let response = mark_all_endpoint(State(state.clone()), MultiValueForm(form)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get_header(&response, "hx-trigger"), ATTENDANCE_UPDATED_EVENT);
        let alert = parse_html_fragment(response).await;
        let alert_text: String = alert.root_element().text().collect();
        assert!(
            alert_text.contains("Stopped after marking 1 students"),
            "got alert text {alert_text:?}"
        );
        let connection = state.db_connection.lock().unwrap();
        let rows = reconcile(class_id, date!(2024 - 03 - 01), &connection);
        let ana = rows.iter().find(|row| row.student_id == ana_id).unwrap();
        let ben = rows.iter().find(|row| row.student_id == ben_id).unwrap();
        assert_eq!(ana.status, AttendanceStatus::Present);
        assert!(ana.attendance_record_id.is_some());
        assert_eq!(ben.attendance_record_id, None);
    }
}
