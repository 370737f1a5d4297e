//! The attendance tracker: pick a class and a date, then mark each enrolled
//! student present, absent, late or excused.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::Date;

use crate::{
    AppState, Error,
    attendance::{
        core::AttendanceStatus,
        endpoints::ATTENDANCE_UPDATED_EVENT,
        reconcile::{AttendanceRow, reconcile},
    },
    class::{ClassId, ClassListing, get_active_classes},
    endpoints,
    form::{parse_optional_date, parse_optional_id},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base, stat_card,
    },
    navigation::NavBar,
    timezone::get_local_date,
};

const STATUS_BUTTON_STYLE: &str = "px-3 py-1 text-xs font-medium rounded border \
    border-gray-300 dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-700";
const STATUS_BUTTON_SELECTED_STYLE: &str = "px-3 py-1 text-xs font-medium rounded border \
    border-blue-600 bg-blue-600 text-white";

/// The state needed for the [get_attendance_page](crate::attendance::get_attendance_page) route handler.
#[derive(Debug, Clone)]
pub struct AttendancePageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for AttendancePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The selected class and date. Both may be blank.
#[derive(Debug, Default, Deserialize)]
pub struct AttendancePageQuery {
    #[serde(default)]
    pub class_id: String,
    #[serde(default)]
    pub date: String,
}

/// Renders the attendance tracker.
///
/// Defaults to the first active class and today's date.
pub async fn get_attendance_page(
    State(state): State<AttendancePageState>,
    Query(query): Query<AttendancePageQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let date = match parse_optional_date(&query.date) {
        Ok(date) => date.unwrap_or(today),
        Err(error) => {
            tracing::warn!("ignoring attendance date: {error}");
            today
        }
    };
    let requested_class_id = parse_optional_id("class", &query.class_id).unwrap_or_else(|error| {
        tracing::warn!("ignoring attendance class: {error}");
        None
    });

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let classes = get_active_classes(&connection)
        .inspect_err(|error| tracing::error!("could not get classes: {error}"))?;

    let selected_class_id = requested_class_id
        .filter(|id| classes.iter().any(|listing| listing.class.id == *id))
        .or_else(|| classes.first().map(|listing| listing.class.id));

    let rows = selected_class_id
        .map(|class_id| reconcile(class_id, date, &connection))
        .unwrap_or_default();

    Ok(attendance_view(&classes, selected_class_id, date, &rows).into_response())
}

fn page_url(class_id: ClassId, date: Date) -> String {
    let query = serde_urlencoded::to_string([
        ("class_id", class_id.to_string()),
        ("date", date.to_string()),
    ])
    .unwrap_or_default();

    format!("{}?{query}", endpoints::ATTENDANCE_VIEW)
}

/// The `hx-vals` for a button that marks the row's student with `status`.
fn status_values(
    row: &AttendanceRow,
    class_id: ClassId,
    date: Date,
    status: AttendanceStatus,
) -> String {
    json!({
        "class_id": class_id,
        "student_id": row.student_id,
        "date": date.to_string(),
        "status": status.as_str(),
        "attendance_record_id": row
            .attendance_record_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
    })
    .to_string()
}

fn status_buttons(row: &AttendanceRow, class_id: ClassId, date: Date) -> Markup {
    html! {
        div class="flex flex-wrap gap-2"
        {
            @for status in AttendanceStatus::ALL {
                @let values = status_values(row, class_id, date, *status);
                @let is_selected = row.attendance_record_id.is_some() && row.status == *status;

                button
                    type="button"
                    hx-post=(endpoints::ATTENDANCE_API)
                    hx-vals=(values)
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    aria-pressed=(is_selected.to_string())
                    class=(if is_selected { STATUS_BUTTON_SELECTED_STYLE } else { STATUS_BUTTON_STYLE })
                {
                    (status.label())
                }
            }
        }
    }
}

/// Marks every student on the roster present in one request.
fn mark_all_form(rows: &[AttendanceRow], class_id: ClassId, date: Date) -> Markup {
    html! {
        form
            id="mark-all"
            hx-post=(endpoints::ATTENDANCE_BULK_API)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="flex justify-end"
        {
            input type="hidden" name="class_id" value=(class_id);
            input type="hidden" name="date" value=(date);
            input type="hidden" name="status" value=(AttendanceStatus::Present.as_str());

            @for row in rows {
                input type="hidden" name="student_id" value=(row.student_id);
            }

            button type="submit" class=(STATUS_BUTTON_STYLE) { "Mark all present" }
        }
    }
}

fn attendance_table(rows: &[AttendanceRow], class_id: ClassId, date: Date) -> Markup {
    let count = |status: AttendanceStatus| {
        rows.iter()
            .filter(|row| row.status == status)
            .count()
            .to_string()
    };

    html! {
        div
            id="attendance-table"
            class="w-full lg:max-w-5xl flex flex-col gap-4"
            hx-get=(page_url(class_id, date))
            hx-trigger={ (ATTENDANCE_UPDATED_EVENT) " from:body" }
            hx-select="#attendance-table"
            hx-swap="outerHTML"
        {
            section class="grid grid-cols-2 md:grid-cols-4 gap-4"
            {
                (stat_card("Present", &count(AttendanceStatus::Present)))
                (stat_card("Late", &count(AttendanceStatus::Late)))
                (stat_card("Excused", &count(AttendanceStatus::Excused)))
                (stat_card("Absent", &count(AttendanceStatus::Absent)))
            }

            @if !rows.is_empty() {
                (mark_all_form(rows, class_id, date))
            }

            section class="w-full overflow-x-auto dark:bg-gray-800"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Student" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Mark as" }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (row.student_name)
                                }

                                td class=(TABLE_CELL_STYLE)
                                {
                                    (row.status.label())

                                    @if row.attendance_record_id.is_none() {
                                        span class="ml-1 text-xs text-gray-400" { "(not recorded)" }
                                    }
                                }

                                td class=(TABLE_CELL_STYLE) { (status_buttons(row, class_id, date)) }
                            }
                        }

                        @if rows.is_empty() {
                            tr
                            {
                                td
                                    colspan="3"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No students are enrolled in this class."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn attendance_view(
    classes: &[ClassListing],
    selected_class_id: Option<ClassId>,
    date: Date,
    rows: &[AttendanceRow],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ATTENDANCE_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="flex justify-between flex-wrap items-end w-full max-w-5xl gap-4"
            {
                h1 class="text-xl font-bold" { "Attendance" }

                form
                    method="get"
                    action=(endpoints::ATTENDANCE_VIEW)
                    class="flex flex-wrap items-end gap-2"
                {
                    div
                    {
                        label for="class_id" class=(FORM_LABEL_STYLE) { "Class" }

                        select name="class_id" id="class_id" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for listing in classes {
                                option
                                    value=(listing.class.id)
                                    selected[selected_class_id == Some(listing.class.id)]
                                {
                                    (listing.class.name) " (" (listing.class.day_of_week.label()) ")"
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                        input
                            type="date"
                            name="date"
                            id="date"
                            value=(date)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
                    }
                }
            }

            @match selected_class_id {
                Some(class_id) => {
                    (attendance_table(rows, class_id, date))
                }
                None => {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "There are no active classes. Add a class on the "
                        a href=(endpoints::CLASSES_VIEW) class="underline" { "classes page" }
                        " to start tracking attendance."
                    }
                }
            }
        }
    );

    base("Attendance", &content)
}
