//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Time;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// SQLite extended result code for a failed UNIQUE constraint.
const UNIQUE_CONSTRAINT_FAILED: i32 = 2067;
/// SQLite extended result code for a failed FOREIGN KEY constraint.
const FOREIGN_KEY_CONSTRAINT_FAILED: i32 = 787;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required form field was empty or only whitespace.
    ///
    /// The string is the human readable name of the field, e.g. "First name".
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A money amount could not be parsed or was negative.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A total of money amounts is too large to represent.
    #[error("the total of the amounts is too large to calculate")]
    AmountOverflow,

    /// A class was given a capacity of zero or less.
    #[error("class capacity must be a positive number, got {0}")]
    InvalidCapacity(i64),

    /// A class or event ends before (or at the same time as) it starts.
    #[error("the end time {end} must be after the start time {start}")]
    InvalidTimeRange {
        /// The start time that was given.
        start: Time,
        /// The end time that was given.
        end: Time,
    },

    /// A text value did not match any of the allowed choices for an enumerated column.
    #[error("\"{value}\" is not a valid {kind}")]
    InvalidChoice {
        /// What kind of value was expected, e.g. "attendance status".
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A row referenced a student, class or staff member that does not exist.
    #[error("the referenced record does not exist")]
    InvalidForeignKey,

    /// An attendance record for the same student, class and date already exists.
    #[error("attendance has already been recorded for this student, class and date")]
    DuplicateAttendance,

    /// The student is already enrolled in the class.
    #[error("the student is already enrolled in this class")]
    DuplicateEnrollment,

    /// Another staff member already uses the email address.
    #[error("a staff member with this email address already exists")]
    DuplicateStaffEmail,

    /// Tried to delete a row that does not exist.
    ///
    /// The string names the kind of record, e.g. "student".
    #[error("tried to delete a {0} that is not in the database")]
    DeleteMissing(&'static str),

    /// Tried to update a row that does not exist.
    #[error("tried to update a {0} that is not in the database")]
    UpdateMissing(&'static str),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(sql_error, Some(description)) = &value {
            match sql_error.extended_code {
                UNIQUE_CONSTRAINT_FAILED if description.contains("attendance.") => {
                    return Error::DuplicateAttendance;
                }
                UNIQUE_CONSTRAINT_FAILED if description.contains("enrollment.") => {
                    return Error::DuplicateEnrollment;
                }
                UNIQUE_CONSTRAINT_FAILED if description.contains("staff.email") => {
                    return Error::DuplicateStaffEmail;
                }
                FOREIGN_KEY_CONSTRAINT_FAILED => return Error::InvalidForeignKey,
                _ => {}
            }
        }

        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// The HTTP status for the error when it is reported to a client.
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyField(_)
            | Error::InvalidAmount(_)
            | Error::InvalidCapacity(_)
            | Error::InvalidTimeRange { .. }
            | Error::InvalidChoice { .. }
            | Error::InvalidForeignKey => StatusCode::BAD_REQUEST,
            Error::DuplicateAttendance | Error::DuplicateEnrollment | Error::DuplicateStaffEmail => {
                StatusCode::CONFLICT
            }
            Error::NotFound | Error::DeleteMissing(_) | Error::UpdateMissing(_) => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_)
            | Error::AmountOverflow
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as an alert fragment for HTMX requests.
    pub(crate) fn into_alert_response(self) -> Response {
        let status = self.status_code();
        let alert = match self {
            Error::EmptyField(_)
            | Error::InvalidAmount(_)
            | Error::InvalidCapacity(_)
            | Error::InvalidTimeRange { .. }
            | Error::InvalidChoice { .. } => Alert::Error {
                message: "Invalid form data".to_owned(),
                details: capitalize(&self.to_string()),
            },
            Error::InvalidForeignKey => Alert::Error {
                message: "Unknown record".to_owned(),
                details: "The selected student, class or staff member could not be found. \
                    Try refreshing the page."
                    .to_owned(),
            },
            Error::DuplicateAttendance => Alert::Error {
                message: "Attendance already recorded".to_owned(),
                details: "Attendance for this student has already been recorded for this \
                    date. Refresh the page to see the latest status."
                    .to_owned(),
            },
            Error::DuplicateEnrollment => Alert::Error {
                message: "Already enrolled".to_owned(),
                details: "The student is already enrolled in this class.".to_owned(),
            },
            Error::DuplicateStaffEmail => Alert::Error {
                message: "Duplicate email address".to_owned(),
                details: "Another staff member already uses this email address. \
                    Choose a different email address."
                    .to_owned(),
            },
            Error::DeleteMissing(kind) => Alert::Error {
                message: format!("Could not delete {kind}"),
                details: format!(
                    "The {kind} could not be found. \
                    Try refreshing the page to see if the {kind} has already been deleted."
                ),
            },
            Error::UpdateMissing(kind) => Alert::Error {
                message: format!("Could not update {kind}"),
                details: format!("The {kind} could not be found."),
            },
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        };

        (status, alert.into_html()).into_response()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
