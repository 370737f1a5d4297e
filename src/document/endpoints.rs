//! Endpoints for adding and deleting document metadata.

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
    document::core::{DocumentId, DocumentType, NewDocument, create_document, delete_document},
    endpoints,
    form::{optional_text, parse_optional_id, required_text},
};

/// The state needed to manage document metadata.
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DocumentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding document metadata.
#[derive(Debug, Deserialize)]
pub struct DocumentForm {
    pub title: String,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_url: String,
    /// The file size in bytes, may be blank.
    #[serde(default)]
    pub file_size: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default)]
    pub uploaded_by: String,
    pub uploaded_at: Date,
}

impl TryFrom<DocumentForm> for NewDocument {
    type Error = Error;

    fn try_from(form: DocumentForm) -> Result<Self, Self::Error> {
        let file_size = parse_optional_id("file size", &form.file_size)?;

        if let Some(size) = file_size.filter(|size| *size < 0) {
            return Err(Error::InvalidChoice {
                kind: "file size",
                value: size.to_string(),
            });
        }

        Ok(NewDocument {
            title: required_text("Title", &form.title)?,
            document_type: form.document_type,
            file_name: required_text("File name", &form.file_name)?,
            file_url: required_text("File URL", &form.file_url)?,
            file_size,
            student_id: parse_optional_id("student", &form.student_id)?,
            staff_id: parse_optional_id("staff member", &form.staff_id)?,
            uploaded_by: optional_text(&form.uploaded_by),
            uploaded_at: form.uploaded_at,
        })
    }
}

/// A route handler for adding document metadata, redirects to the documents view on success.
pub async fn create_document_endpoint(
    State(state): State<DocumentState>,
    Form(form): Form<DocumentForm>,
) -> Response {
    let new_document = match NewDocument::try_from(form) {
        Ok(new_document) => new_document,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_document(new_document, &connection) {
        Ok(document) => {
            tracing::info!("Added document {} ({})", document.id, document.file_name);

            (
                HxRedirect(endpoints::DOCUMENTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not add document: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting document metadata, responds with an alert.
pub async fn delete_document_endpoint(
    State(state): State<DocumentState>,
    Path(document_id): Path<DocumentId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_document(document_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Document deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete document {document_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        document::{
            core::get_documents,
            endpoints::{
                DocumentForm, DocumentState, create_document_endpoint, delete_document_endpoint,
            },
        },
        endpoints,
        test_utils::{assert_hx_redirect, get_test_connection, must_create_student},
    };

    fn document_form(student_id: &str, file_size: &str) -> DocumentForm {
        serde_urlencoded::from_str(&format!(
            "title=Waiver&document_type=waiver&file_name=waiver.pdf\
            &file_url=https%3A%2F%2Ffiles.example%2Fwaiver.pdf&file_size={file_size}\
            &student_id={student_id}&staff_id=&uploaded_at=2024-03-01"
        ))
        .unwrap()
    }

    fn new_state(connection: Connection) -> DocumentState {
        DocumentState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_add_document_for_student() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        let state = new_state(connection);

        let response = create_document_endpoint(
            State(state.clone()),
            Form(document_form(&student.id.to_string(), "1024")),
        )
        .await;

        assert_hx_redirect(&response, endpoints::DOCUMENTS_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let documents = get_documents(&connection).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].document.file_size, Some(1024));
        assert_eq!(documents[0].document.staff_id, None);
        assert_eq!(documents[0].student_name.as_deref(), Some("Ana Lee"));
    }

    #[tokio::test]
    async fn unknown_student_responds_bad_request() {
        let state = new_state(get_test_connection());

        let response = create_document_endpoint(State(state), Form(document_form("42", ""))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_file_size_is_rejected() {
        let state = new_state(get_test_connection());

        let response = create_document_endpoint(State(state), Form(document_form("", "-1"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleting_missing_document_responds_not_found() {
        let state = new_state(get_test_connection());

        let response = delete_document_endpoint(State(state), Path(8)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
