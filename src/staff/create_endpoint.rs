//! Defines the endpoint for adding a staff member.
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
    money::parse_optional_money_input,
    staff::core::{NewStaffMember, StaffRole, StaffStatus, create_staff_member},
};

/// The state needed to add a staff member.
#[derive(Debug, Clone)]
pub struct CreateStaffState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateStaffState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding a staff member.
#[derive(Debug, Deserialize)]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: StaffRole,
    pub hire_date: Date,
    /// Yearly salary in dollars, may be blank.
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub status: StaffStatus,
}

impl TryFrom<StaffForm> for NewStaffMember {
    type Error = Error;

    fn try_from(form: StaffForm) -> Result<Self, Self::Error> {
        Ok(NewStaffMember {
            first_name: required_text("First name", &form.first_name)?,
            last_name: required_text("Last name", &form.last_name)?,
            email: required_text("Email", &form.email)?.to_lowercase(),
            phone: optional_text(&form.phone),
            role: form.role,
            hire_date: form.hire_date,
            salary: parse_optional_money_input(&form.salary)?,
            specialization: optional_text(&form.specialization),
            status: form.status,
        })
    }
}

/// A route handler for adding a staff member, redirects to the staff view on success.
pub async fn create_staff_endpoint(
    State(state): State<CreateStaffState>,
    Form(form): Form<StaffForm>,
) -> Response {
    let new_staff_member = match NewStaffMember::try_from(form) {
        Ok(new_staff_member) => new_staff_member,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_staff_member(new_staff_member, &connection) {
        Ok(staff_member) => {
            tracing::info!("Added staff member {}", staff_member.id);

            (
                HxRedirect(endpoints::STAFF_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not add staff member: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};

    use crate::{
        endpoints,
        staff::{
            core::get_staff,
            create_endpoint::{CreateStaffState, StaffForm, create_staff_endpoint},
        },
        test_utils::{assert_hx_redirect, get_test_connection, must_create_staff},
    };

    fn staff_form(email: &str, salary: &str) -> StaffForm {
        serde_urlencoded::from_str(&format!(
            "first_name=Maya&last_name=Rivera&email={email}&role=instructor\
            &hire_date=2022-03-14&salary={salary}"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn can_add_staff_member() {
        let state = CreateStaffState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response =
            create_staff_endpoint(State(state.clone()), Form(staff_form("Maya@Studio.test", "")))
                .await;

        assert_hx_redirect(&response, endpoints::STAFF_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let staff = get_staff(&connection).unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].email, "maya@studio.test");
        assert_eq!(staff[0].salary, None);
    }

    #[tokio::test]
    async fn duplicate_email_responds_with_conflict() {
        let connection = get_test_connection();
        must_create_staff("Maya", "Rivera", "maya@studio.test", &connection);
        let state = CreateStaffState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            create_staff_endpoint(State(state), Form(staff_form("maya@studio.test", ""))).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn negative_salary_is_rejected() {
        let state = CreateStaffState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response =
            create_staff_endpoint(State(state), Form(staff_form("maya@studio.test", "-10"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
