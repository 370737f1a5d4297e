//! Displays and searches students, with a form for adding new students.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_YELLOW_STYLE, BUTTON_PRIMARY_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, TABLE_STYLE, badge, base, create_form, delete_button, select_input,
        text_input,
    },
    navigation::NavBar,
    student::core::{Student, StudentStatus, get_students},
};

/// The state needed for the [get_students_page](crate::student::get_students_page) route handler.
#[derive(Debug, Clone)]
pub struct StudentsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StudentsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The search text for filtering students.
#[derive(Debug, Default, Deserialize)]
pub struct StudentSearch {
    #[serde(default)]
    pub q: Option<String>,
}

/// Renders the students page, filtered by the search text in `q` when given.
pub async fn get_students_page(
    State(state): State<StudentsPageState>,
    Query(search): Query<StudentSearch>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let students = get_students(search.q.as_deref(), &connection)
        .inspect_err(|error| tracing::error!("could not get students: {error}"))?;

    Ok(students_view(&students, search.q.as_deref().unwrap_or_default()).into_response())
}

fn status_badge(status: StudentStatus) -> Markup {
    let style = match status {
        StudentStatus::Active => BADGE_GREEN_STYLE,
        StudentStatus::OnHold => BADGE_YELLOW_STYLE,
        StudentStatus::Inactive | StudentStatus::Graduated => BADGE_GRAY_STYLE,
    };

    badge(status.label(), style)
}

fn new_student_fields() -> Markup {
    html! {
        (text_input("First name", "first_name", "text", true))
        (text_input("Last name", "last_name", "text", true))
        (text_input("Date of birth", "date_of_birth", "date", true))
        (text_input("Email", "email", "email", false))
        (text_input("Phone", "phone", "tel", false))
        (text_input("Level", "level", "text", false))
        (text_input("Emergency contact", "emergency_contact_name", "text", false))
        (text_input("Emergency phone", "emergency_contact_phone", "tel", false))
        (text_input("Medical notes", "medical_notes", "text", false))
        (select_input("Status", "status", &StudentStatus::options(), false))
    }
}

fn students_view(students: &[Student], search: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::STUDENTS_VIEW).into_html();

    let table_row = |student: &Student| {
        let delete_url = format_endpoint(endpoints::STUDENT, student.id);
        let confirm_message = format!(
            "Are you sure you want to delete {}? Their enrollments, attendance and payments \
            will be deleted too.",
            student.full_name()
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (student.full_name())
                }

                td class=(TABLE_CELL_STYLE) { (student.email.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE) { (student.phone.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE) { (student.level.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE) { (status_badge(student.status)) }
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(student.enrollment_date) { (student.enrollment_date) }
                }
                td class=(TABLE_CELL_STYLE) { (delete_button(&delete_url, &confirm_message)) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="flex justify-between flex-wrap items-end w-full max-w-5xl gap-4"
            {
                h1 class="text-xl font-bold" { "Students" }

                form method="get" action=(endpoints::STUDENTS_VIEW) class="flex gap-2"
                {
                    input
                        type="search"
                        name="q"
                        value=(search)
                        placeholder="Search by name or email"
                        aria-label="Search students"
                        class=(FORM_TEXT_INPUT_STYLE);

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
                }
            }

            (create_form("Add Student", endpoints::STUDENTS_API, &new_student_fields()))

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Email" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Phone" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Level" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Enrolled" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for student in students {
                            (table_row(student))
                        }

                        @if students.is_empty() {
                            tr
                            {
                                td
                                    colspan="7"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    @if search.trim().is_empty() {
                                        "No students yet. Add a student with the form above."
                                    } @else {
                                        "No students match \"" (search) "\"."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Students", &content)
}
