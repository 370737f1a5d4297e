//! Defines the endpoint for creating a new student.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    form::{optional_text, required_text},
    student::core::{NewStudent, StudentStatus, create_student},
    timezone::get_local_date,
};

/// The state needed to create a student.
#[derive(Debug, Clone)]
pub struct CreateStudentState {
    /// The database connection for managing students.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used to date the enrollment.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateStudentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a student.
#[derive(Debug, Deserialize)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub medical_notes: String,
    #[serde(default)]
    pub status: StudentStatus,
}

impl StudentForm {
    /// Validate the form, dating the enrollment `enrollment_date`.
    fn into_new_student(self, enrollment_date: Date) -> Result<NewStudent, Error> {
        Ok(NewStudent {
            first_name: required_text("First name", &self.first_name)?,
            last_name: required_text("Last name", &self.last_name)?,
            date_of_birth: self.date_of_birth,
            email: optional_text(&self.email),
            phone: optional_text(&self.phone),
            emergency_contact_name: optional_text(&self.emergency_contact_name),
            emergency_contact_phone: optional_text(&self.emergency_contact_phone),
            level: optional_text(&self.level),
            medical_notes: optional_text(&self.medical_notes),
            enrollment_date,
            status: self.status,
        })
    }
}

/// A route handler for creating a new student, redirects to the students view on success.
pub async fn create_student_endpoint(
    State(state): State<CreateStudentState>,
    Form(form): Form<StudentForm>,
) -> Response {
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let new_student = match form.into_new_student(today) {
        Ok(new_student) => new_student,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_student(new_student, &connection) {
        Ok(student) => {
            tracing::info!("Created student {} ({})", student.id, student.full_name());

            (
                HxRedirect(endpoints::STUDENTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create student: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        student::{
            core::{StudentStatus, get_students},
            create_endpoint::{CreateStudentState, StudentForm, create_student_endpoint},
        },
        test_utils::assert_hx_redirect,
    };

    fn get_test_state() -> CreateStudentState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateStudentState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn student_form(first_name: &str) -> StudentForm {
        StudentForm {
            first_name: first_name.to_owned(),
            last_name: " Lee ".to_owned(),
            date_of_birth: date!(2013 - 09 - 02),
            email: "ana@example.com".to_owned(),
            phone: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            level: "Intermediate".to_owned(),
            medical_notes: "  ".to_owned(),
            status: StudentStatus::OnHold,
        }
    }

    #[tokio::test]
    async fn can_create_student() {
        let state = get_test_state();

        let response = create_student_endpoint(State(state.clone()), Form(student_form("Ana"))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::STUDENTS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let students = get_students(None, &connection).unwrap();
        assert_eq!(students.len(), 1);
        let student = &students[0];
        assert_eq!(student.full_name(), "Ana Lee");
        assert_eq!(student.email.as_deref(), Some("ana@example.com"));
        assert_eq!(student.phone, None);
        assert_eq!(student.medical_notes, None);
        assert_eq!(student.status, StudentStatus::OnHold);
    }

    #[tokio::test]
    async fn rejects_blank_first_name() {
        let state = get_test_state();

        let response = create_student_endpoint(State(state.clone()), Form(student_form("  "))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_students(None, &connection).unwrap().is_empty());
    }

    #[test]
    fn missing_optional_fields_default_to_blank() {
        let form: StudentForm = serde_urlencoded::from_str(
            "first_name=Ana&last_name=Lee&date_of_birth=2013-09-02",
        )
        .unwrap();

        assert_eq!(form.email, "");
        assert_eq!(form.status, StudentStatus::Active);
    }
}
