//! Displays the weekly classes and their enrollments, with forms for adding
//! classes and enrolling students.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    class::core::{ClassListing, ClassStatus, DayOfWeek, get_classes},
    endpoints::{self, format_endpoint},
    enrollment::{EnrollmentListing, get_enrollments},
    form::format_time,
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_RED_STYLE, BADGE_YELLOW_STYLE, CARD_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, badge, base, create_form,
        delete_button, format_currency, money_input, select_input, text_input,
    },
    navigation::NavBar,
    staff::{StaffMember, get_instructors},
    stats::is_full,
    student::{Student, get_students},
    timezone::get_local_date,
};

/// The state needed for the [get_classes_page](crate::class::get_classes_page) route handler.
#[derive(Debug, Clone)]
pub struct ClassesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ClassesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the classes page.
pub async fn get_classes_page(State(state): State<ClassesPageState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let classes = get_classes(&connection)
        .inspect_err(|error| tracing::error!("could not get classes: {error}"))?;
    let instructors = get_instructors(&connection)
        .inspect_err(|error| tracing::error!("could not get instructors: {error}"))?;
    let students = get_students(None, &connection)
        .inspect_err(|error| tracing::error!("could not get students: {error}"))?;
    let enrollments = get_enrollments(&connection)
        .inspect_err(|error| tracing::error!("could not get enrollments: {error}"))?;

    Ok(classes_view(&classes, &instructors, &students, &enrollments, today).into_response())
}

fn status_badge(listing: &ClassListing) -> Markup {
    let class = &listing.class;

    if class.status == ClassStatus::Active && is_full(class.capacity, listing.enrolled) {
        return badge("Full", BADGE_RED_STYLE);
    }

    let style = match class.status {
        ClassStatus::Active => BADGE_GREEN_STYLE,
        ClassStatus::Full => BADGE_YELLOW_STYLE,
        ClassStatus::Inactive => BADGE_GRAY_STYLE,
    };

    badge(class.status.label(), style)
}

fn new_class_fields(instructors: &[StaffMember]) -> Markup {
    let instructor_options: Vec<(String, String)> = instructors
        .iter()
        .map(|instructor| (instructor.id.to_string(), instructor.full_name()))
        .collect();

    html! {
        (text_input("Class name", "name", "text", true))
        (text_input("Class type", "class_type", "text", true))
        (text_input("Level", "level", "text", false))
        (select_input("Instructor", "instructor_id", &instructor_options, true))
        (select_input("Day", "day_of_week", &DayOfWeek::options(), false))
        (text_input("Room", "room", "text", false))
        (text_input("Start time", "start_time", "time", true))
        (text_input("End time", "end_time", "time", true))

        div
        {
            label for="capacity" class=(FORM_LABEL_STYLE) { "Capacity" }

            input
                type="number"
                name="capacity"
                id="capacity"
                min="1"
                step="1"
                value="20"
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }

        (money_input("Tuition fee", "tuition_fee", false))
        (select_input("Status", "status", &ClassStatus::options(), false))
    }
}

fn enroll_fields(classes: &[ClassListing], students: &[Student], today: Date) -> Markup {
    let student_options: Vec<(String, String)> = students
        .iter()
        .map(|student| (student.id.to_string(), student.full_name()))
        .collect();
    let class_options: Vec<(String, String)> = classes
        .iter()
        .map(|listing| (listing.class.id.to_string(), listing.class.name.clone()))
        .collect();

    html! {
        (select_input("Student", "student_id", &student_options, false))
        (select_input("Class", "class_id", &class_options, false))

        div
        {
            label for="enrollment_date" class=(FORM_LABEL_STYLE) { "Enrollment date" }

            input
                type="date"
                name="enrollment_date"
                id="enrollment_date"
                value=(today)
                max=(today)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }
    }
}

fn class_table(classes: &[ClassListing]) -> Markup {
    let table_row = |listing: &ClassListing| {
        let class = &listing.class;
        let delete_url = format_endpoint(endpoints::CLASS, class.id);
        let confirm_message = format!(
            "Are you sure you want to delete {}? Its enrollments and attendance will be \
            deleted too.",
            class.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (class.name)
                }

                td class=(TABLE_CELL_STYLE) { (class.class_type) }
                td class=(TABLE_CELL_STYLE) { (listing.instructor_name.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE) { (class.day_of_week.label()) }
                td class=(TABLE_CELL_STYLE)
                {
                    (format_time(class.start_time)) "–" (format_time(class.end_time))
                }
                td class=(TABLE_CELL_STYLE) { (class.room.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE) { (listing.enrolled) "/" (class.capacity) }
                td class=(TABLE_CELL_STYLE)
                {
                    @match class.tuition_fee {
                        Some(fee) => { (format_currency(fee)) }
                        None => { "-" }
                    }
                }
                td class=(TABLE_CELL_STYLE) { (status_badge(listing)) }
                td class=(TABLE_CELL_STYLE) { (delete_button(&delete_url, &confirm_message)) }
            }
        )
    };

    html!(
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Class" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Instructor" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Day" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Room" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Enrolled" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Fee" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for listing in classes {
                    (table_row(listing))
                }

                @if classes.is_empty() {
                    tr
                    {
                        td
                            colspan="10"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No classes yet. Add a class with the form above."
                        }
                    }
                }
            }
        }
    )
}

/// Active classes grouped by day, Monday to Sunday, earliest first.
fn weekly_schedule(classes: &[ClassListing]) -> Markup {
    let classes_on = |day: DayOfWeek| {
        let mut listings: Vec<&ClassListing> = classes
            .iter()
            .filter(|listing| {
                listing.class.status == ClassStatus::Active && listing.class.day_of_week == day
            })
            .collect();
        listings.sort_by(|a, b| {
            (a.class.start_time, &a.class.name).cmp(&(b.class.start_time, &b.class.name))
        });
        listings
    };

    html!(
        div class="grid w-full gap-4 md:grid-cols-2 lg:grid-cols-4 lg:max-w-5xl"
        {
            @for day in DayOfWeek::ALL {
                @let listings = classes_on(*day);

                article class=(CARD_STYLE) data-day=(day.as_str())
                {
                    h3 class="mb-3 font-semibold" { (day.label()) }

                    @for listing in &listings {
                        div
                            class="p-3 mb-2 rounded-lg border border-gray-200 dark:border-gray-700"
                            data-class-id=(listing.class.id)
                        {
                            p class="text-sm font-medium" { (listing.class.name) }
                            p class="text-xs text-gray-500 dark:text-gray-400"
                            {
                                (format_time(listing.class.start_time))
                                "–"
                                (format_time(listing.class.end_time))
                            }
                            p class="text-xs text-gray-500 dark:text-gray-400"
                            {
                                (listing.class.room.as_deref().unwrap_or("TBA"))
                            }
                            p class="text-xs text-gray-500 dark:text-gray-400"
                            {
                                (listing.instructor_name.as_deref().unwrap_or("TBA"))
                            }
                        }
                    }

                    @if listings.is_empty() {
                        p class="py-4 text-sm text-center text-gray-500 dark:text-gray-400"
                        {
                            "No classes scheduled"
                        }
                    }
                }
            }
        }
    )
}

fn enrollment_table(enrollments: &[EnrollmentListing]) -> Markup {
    html!(
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Student" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Class" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Enrolled" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for enrollment in enrollments {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { (enrollment.student_name) }
                        td class=(TABLE_CELL_STYLE) { (enrollment.class_name) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            time datetime=(enrollment.enrollment_date) { (enrollment.enrollment_date) }
                        }
                        td class=(TABLE_CELL_STYLE) { (enrollment.status.label()) }
                        td class=(TABLE_CELL_STYLE) { (enrollment.payment_status.label()) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (delete_button(
                                &format_endpoint(endpoints::ENROLLMENT, enrollment.id),
                                &format!(
                                    "Remove {} from {}?",
                                    enrollment.student_name, enrollment.class_name
                                ),
                            ))
                        }
                    }
                }

                @if enrollments.is_empty() {
                    tr
                    {
                        td
                            colspan="6"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No enrollments yet."
                        }
                    }
                }
            }
        }
    )
}

fn classes_view(
    classes: &[ClassListing],
    instructors: &[StaffMember],
    students: &[Student],
    enrollments: &[EnrollmentListing],
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CLASSES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="flex justify-between flex-wrap items-end w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Classes" }
            }

            (create_form("Add Class", endpoints::CLASSES_API, &new_class_fields(instructors)))

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                (class_table(classes))
            }

            header class="flex justify-between flex-wrap items-end w-full max-w-5xl"
            {
                h2 class="text-lg font-bold" { "Weekly Schedule" }
            }

            section id="weekly-schedule" class="w-full flex justify-center"
            {
                (weekly_schedule(classes))
            }

            header class="flex justify-between flex-wrap items-end w-full max-w-5xl"
            {
                h2 class="text-lg font-bold" { "Enrollments" }
            }

            @if !classes.is_empty() && !students.is_empty() {
                (create_form(
                    "Enroll Student",
                    endpoints::ENROLLMENTS_API,
                    &enroll_fields(classes, students, today),
                ))
            }

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                (enrollment_table(enrollments))
            }
        }
    );

    base("Classes", &content)
}
