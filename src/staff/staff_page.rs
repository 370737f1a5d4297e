//! Displays the studio's staff with a form for adding staff members.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_YELLOW_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, badge, base,
        create_form, delete_button, money_input, select_input, text_input,
    },
    navigation::NavBar,
    staff::core::{StaffMember, StaffRole, StaffStatus, get_staff},
};

/// The state needed for the staff page.
#[derive(Debug, Clone)]
pub struct StaffPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StaffPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the staff page.
pub async fn get_staff_page(State(state): State<StaffPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let staff = get_staff(&connection)
        .inspect_err(|error| tracing::error!("could not get staff: {error}"))?;

    Ok(staff_view(&staff).into_response())
}

fn staff_view(staff: &[StaffMember]) -> Markup {
    let nav_bar = NavBar::new(endpoints::STAFF_VIEW).into_html();

    let fields = html! {
        (text_input("First name", "first_name", "text", true))
        (text_input("Last name", "last_name", "text", true))
        (text_input("Email", "email", "email", true))
        (text_input("Phone", "phone", "tel", false))
        (select_input("Role", "role", &StaffRole::options(), false))
        (text_input("Hire date", "hire_date", "date", true))
        (money_input("Salary", "salary", false))
        (text_input("Specialization", "specialization", "text", false))
        (select_input("Status", "status", &StaffStatus::options(), false))
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Staff" }
            }

            (create_form("Add Staff Member", endpoints::STAFF_API, &fields))

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Role" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Email" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Specialization" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for staff_member in staff {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (staff_member.full_name())
                                }
                                td class=(TABLE_CELL_STYLE) { (staff_member.role.label()) }
                                td class=(TABLE_CELL_STYLE) { (staff_member.email) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (staff_member.specialization.as_deref().unwrap_or("-"))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @match staff_member.status {
                                        StaffStatus::Active => (badge("Active", BADGE_GREEN_STYLE)),
                                        StaffStatus::OnLeave => (badge("On Leave", BADGE_YELLOW_STYLE)),
                                        StaffStatus::Inactive => (badge("Inactive", BADGE_GRAY_STYLE)),
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (delete_button(
                                        &format_endpoint(endpoints::STAFF_MEMBER, staff_member.id),
                                        &format!(
                                            "Are you sure you want to delete {}? Their classes will be left without an instructor.",
                                            staff_member.full_name()
                                        ),
                                    ))
                                }
                            }
                        }

                        @if staff.is_empty() {
                            tr
                            {
                                td
                                    colspan="6"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No staff yet. Add a staff member with the form above."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Staff", &content)
}
