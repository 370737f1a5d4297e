//! Displays document metadata with a form for adding documents.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    document::core::{DocumentListing, DocumentType, get_documents},
    endpoints::{self, format_endpoint},
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        base, create_form, delete_button, link, select_input, text_input,
    },
    navigation::NavBar,
    staff::{StaffMember, get_staff},
    student::{Student, get_students},
};

/// The state needed for the documents page.
#[derive(Debug, Clone)]
pub struct DocumentsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DocumentsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the documents page.
pub async fn get_documents_page(
    State(state): State<DocumentsPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let documents = get_documents(&connection)
        .inspect_err(|error| tracing::error!("could not get documents: {error}"))?;
    let students = get_students(None, &connection)
        .inspect_err(|error| tracing::error!("could not get students: {error}"))?;
    let staff = get_staff(&connection)
        .inspect_err(|error| tracing::error!("could not get staff: {error}"))?;

    Ok(documents_view(&documents, &students, &staff).into_response())
}

/// Formats a file size in bytes as B, KB or MB.
fn format_file_size(bytes: i64) -> String {
    const KILOBYTE: i64 = 1024;
    const MEGABYTE: i64 = KILOBYTE * 1024;

    if bytes >= MEGABYTE {
        format!("{:.1} MB", bytes as f64 / MEGABYTE as f64)
    } else if bytes >= KILOBYTE {
        format!("{:.1} KB", bytes as f64 / KILOBYTE as f64)
    } else {
        format!("{bytes} B")
    }
}

fn documents_view(
    documents: &[DocumentListing],
    students: &[Student],
    staff: &[StaffMember],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DOCUMENTS_VIEW).into_html();

    let student_options: Vec<(String, String)> = students
        .iter()
        .map(|student| (student.id.to_string(), student.full_name()))
        .collect();
    let staff_options: Vec<(String, String)> = staff
        .iter()
        .map(|staff_member| (staff_member.id.to_string(), staff_member.full_name()))
        .collect();

    let fields = html! {
        (text_input("Title", "title", "text", true))
        (select_input("Type", "document_type", &DocumentType::options(), false))
        (text_input("File name", "file_name", "text", true))
        (text_input("File URL", "file_url", "url", true))
        (text_input("File size (bytes)", "file_size", "number", false))
        (text_input("Uploaded on", "uploaded_at", "date", true))
        (select_input("Student", "student_id", &student_options, true))
        (select_input("Staff member", "staff_id", &staff_options, true))
        (text_input("Uploaded by", "uploaded_by", "text", false))
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Documents" }
            }

            (create_form("Add Document", endpoints::DOCUMENTS_API, &fields))

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "File" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Size" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Belongs to" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Uploaded" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for listing in documents {
                            @let document = &listing.document;
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (document.title)
                                }
                                td class=(TABLE_CELL_STYLE) { (document.document_type.label()) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (link(&document.file_url, &document.file_name))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if let Some(file_size) = document.file_size {
                                        (format_file_size(file_size))
                                    } @else {
                                        "-"
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (listing
                                        .student_name
                                        .as_deref()
                                        .or(listing.staff_name.as_deref())
                                        .unwrap_or("Studio"))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (document.uploaded_at)
                                    @if let Some(uploaded_by) = &document.uploaded_by {
                                        " by " (uploaded_by)
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (delete_button(
                                        &format_endpoint(endpoints::DOCUMENT, document.id),
                                        &format!("Are you sure you want to delete {}?", document.title),
                                    ))
                                }
                            }
                        }

                        @if documents.is_empty() {
                            tr
                            {
                                td
                                    colspan="7"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No documents yet. Add a document with the form above."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Documents", &content)
}
