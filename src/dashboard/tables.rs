//! The recent enrollments and upcoming events lists on the dashboard.

use maud::{Markup, html};

use crate::{
    enrollment::EnrollmentListing,
    event::{Event, event_status_badge, event_time},
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE},
};

const ROW_HEADER_STYLE: &str = "px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white";
const EMPTY_CELL_STYLE: &str = "px-6 py-4 text-center text-gray-500 dark:text-gray-400";

pub(super) fn recent_enrollments_table(enrollments: &[EnrollmentListing]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Enrollments" }

            table id="recent-enrollments" class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Student" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Class" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Enrolled" }
                    }
                }

                tbody
                {
                    @for enrollment in enrollments {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(ROW_HEADER_STYLE) { (enrollment.student_name) }
                            td class=(TABLE_CELL_STYLE) { (enrollment.class_name) }
                            td class=(TABLE_CELL_STYLE) { (enrollment.enrollment_date) }
                        }
                    }

                    @if enrollments.is_empty() {
                        tr
                        {
                            td colspan="3" class=(EMPTY_CELL_STYLE) { "No enrollments yet." }
                        }
                    }
                }
            }
        }
    }
}

pub(super) fn upcoming_events_table(events: &[Event]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            h3 class="text-xl font-semibold mb-4" { "Upcoming Events" }

            table id="upcoming-events" class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Event" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for event in events {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(ROW_HEADER_STYLE) { (event.name) }
                            td class=(TABLE_CELL_STYLE) { (event.event_date) }
                            td class=(TABLE_CELL_STYLE) { (event_time(event)) }
                            td class=(TABLE_CELL_STYLE) { (event_status_badge(event.status)) }
                        }
                    }

                    @if events.is_empty() {
                        tr
                        {
                            td colspan="4" class=(EMPTY_CELL_STYLE) { "No upcoming events." }
                        }
                    }
                }
            }
        }
    }
}
