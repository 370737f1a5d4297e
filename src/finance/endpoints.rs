//! Endpoints for recording and deleting payments and expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    finance::{
        expense::{ExpenseId, ExpenseStatus, NewExpense, create_expense, delete_expense},
        payment::{NewPayment, PaymentId, PaymentStatus, create_payment, delete_payment},
    },
    form::{optional_text, parse_optional_choice, required_text},
    money::parse_money_input,
    student::StudentId,
};

/// The state needed to manage payments and expenses.
#[derive(Debug, Clone)]
pub struct FinanceState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FinanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub student_id: StudentId,
    pub amount: String,
    pub payment_date: Date,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_type: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<PaymentForm> for NewPayment {
    type Error = Error;

    fn try_from(form: PaymentForm) -> Result<Self, Self::Error> {
        Ok(NewPayment {
            student_id: form.student_id,
            amount: parse_money_input(&form.amount)?,
            payment_date: form.payment_date,
            payment_method: parse_optional_choice(&form.payment_method)?,
            payment_type: parse_optional_choice(&form.payment_type)?,
            status: form.status,
            notes: optional_text(&form.notes),
        })
    }
}

/// The form data for recording an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub category: String,
    pub description: String,
    pub amount: String,
    pub expense_date: Date,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        Ok(NewExpense {
            category: required_text("Category", &form.category)?,
            description: required_text("Description", &form.description)?,
            amount: parse_money_input(&form.amount)?,
            expense_date: form.expense_date,
            vendor: optional_text(&form.vendor),
            payment_method: parse_optional_choice(&form.payment_method)?,
            status: form.status,
            notes: optional_text(&form.notes),
        })
    }
}

/// A route handler for recording a payment, redirects to the finances view on success.
pub async fn create_payment_endpoint(
    State(state): State<FinanceState>,
    Form(form): Form<PaymentForm>,
) -> Response {
    let new_payment = match NewPayment::try_from(form) {
        Ok(new_payment) => new_payment,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_payment(new_payment, &connection) {
        Ok(payment) => {
            tracing::info!(
                "Recorded payment {} of {} from student {}",
                payment.id,
                payment.amount,
                payment.student_id
            );

            (
                HxRedirect(endpoints::FINANCES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create payment: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting a payment, responds with an alert.
pub async fn delete_payment_endpoint(
    State(state): State<FinanceState>,
    Path(payment_id): Path<PaymentId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_payment(payment_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Payment deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete payment {payment_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for recording an expense, redirects to the finances view on success.
pub async fn create_expense_endpoint(
    State(state): State<FinanceState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let new_expense = match NewExpense::try_from(form) {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_expense(new_expense, &connection) {
        Ok(expense) => {
            tracing::info!("Recorded expense {} of {}", expense.id, expense.amount);

            (
                HxRedirect(endpoints::FINANCES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting an expense, responds with an alert.
pub async fn delete_expense_endpoint(
    State(state): State<FinanceState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Expense deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
