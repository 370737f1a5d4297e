//! Displays this month's financial summary with the payments and expenses
//! ledgers and forms for recording both.

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
    endpoints::{self, format_endpoint},
    finance::{
        expense::{Expense, ExpenseStatus, get_expenses},
        payment::{PaymentListing, PaymentMethod, PaymentStatus, PaymentType, get_payments},
    },
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_RED_STYLE, BADGE_YELLOW_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, badge, base, create_form, delete_button, format_currency, money_input, select_input,
        stat_card, text_input,
    },
    navigation::NavBar,
    stats::{FinancialSummary, financial_summary},
    student::{Student, get_students},
    timezone::get_local_date,
};

/// The state needed for the finances page.
#[derive(Debug, Clone)]
pub struct FinancesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for FinancesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the finances page.
pub async fn get_finances_page(
    State(state): State<FinancesPageState>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = financial_summary(today, &connection);
    let payments = get_payments(&connection)
        .inspect_err(|error| tracing::error!("could not get payments: {error}"))?;
    let expenses = get_expenses(&connection)
        .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;
    let students = get_students(None, &connection)
        .inspect_err(|error| tracing::error!("could not get students: {error}"))?;

    Ok(finances_view(&summary, &payments, &expenses, &students, today).into_response())
}

fn payment_status_badge(status: PaymentStatus) -> Markup {
    let style = match status {
        PaymentStatus::Completed => BADGE_GREEN_STYLE,
        PaymentStatus::Pending => BADGE_YELLOW_STYLE,
        PaymentStatus::Failed => BADGE_RED_STYLE,
        PaymentStatus::Refunded => BADGE_GRAY_STYLE,
    };

    badge(status.label(), style)
}

fn expense_status_badge(status: ExpenseStatus) -> Markup {
    let style = match status {
        ExpenseStatus::Paid => BADGE_GREEN_STYLE,
        ExpenseStatus::Pending => BADGE_YELLOW_STYLE,
        ExpenseStatus::Reimbursed => BADGE_GRAY_STYLE,
    };

    badge(status.label(), style)
}

fn summary_cards(summary: &FinancialSummary) -> Markup {
    html! {
        section class="grid w-full max-w-5xl grid-cols-2 gap-4 lg:grid-cols-4"
        {
            (stat_card("Revenue this month", &format_currency(summary.total_revenue)))
            (stat_card("Expenses this month", &format_currency(summary.total_expenses)))
            (stat_card("Net profit", &format_currency(summary.net_profit)))
            (stat_card("Outstanding", &format_currency(summary.outstanding)))
        }
    }
}

fn payments_table(payments: &[PaymentListing]) -> Markup {
    html! {
        table id="payments" class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Student" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Method" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for listing in payments {
                    @let payment = &listing.payment;
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th
                            scope="row"
                            class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                        {
                            (listing.student_name)
                        }
                        td class=(TABLE_CELL_STYLE) { (payment.payment_date) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(payment.amount)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (payment.payment_type.map(PaymentType::label).unwrap_or("-"))
                        }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (payment.payment_method.map(PaymentMethod::label).unwrap_or("-"))
                        }
                        td class=(TABLE_CELL_STYLE) { (payment_status_badge(payment.status)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (delete_button(
                                &format_endpoint(endpoints::PAYMENT, payment.id),
                                "Are you sure you want to delete this payment?",
                            ))
                        }
                    }
                }

                @if payments.is_empty() {
                    tr
                    {
                        td
                            colspan="7"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No payments recorded yet."
                        }
                    }
                }
            }
        }
    }
}

fn expenses_table(expenses: &[Expense]) -> Markup {
    html! {
        table id="expenses" class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Vendor" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for expense in expenses {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th
                            scope="row"
                            class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                        {
                            (expense.description)
                        }
                        td class=(TABLE_CELL_STYLE) { (expense.category) }
                        td class=(TABLE_CELL_STYLE) { (expense.expense_date) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (expense.vendor.as_deref().unwrap_or("-"))
                        }
                        td class=(TABLE_CELL_STYLE) { (expense_status_badge(expense.status)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (delete_button(
                                &format_endpoint(endpoints::EXPENSE, expense.id),
                                "Are you sure you want to delete this expense?",
                            ))
                        }
                    }
                }

                @if expenses.is_empty() {
                    tr
                    {
                        td
                            colspan="7"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No expenses recorded yet."
                        }
                    }
                }
            }
        }
    }
}

fn finances_view(
    summary: &FinancialSummary,
    payments: &[PaymentListing],
    expenses: &[Expense],
    students: &[Student],
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::FINANCES_VIEW).into_html();

    let student_options: Vec<(String, String)> = students
        .iter()
        .map(|student| (student.id.to_string(), student.full_name()))
        .collect();

    let payment_fields = html! {
        (select_input("Student", "student_id", &student_options, false))
        (money_input("Amount", "amount", true))
        div
        {
            label for="payment_date" class=(FORM_LABEL_STYLE) { "Date" }
            input
                type="date"
                name="payment_date"
                id="payment_date"
                value=(today)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }
        (select_input("Type", "payment_type", &PaymentType::options(), true))
        (select_input("Method", "payment_method", &PaymentMethod::options(), true))
        (select_input("Status", "status", &PaymentStatus::options(), false))
        div class="md:col-span-2"
        {
            (text_input("Notes", "notes", "text", false))
        }
    };

    let expense_fields = html! {
        (text_input("Description", "description", "text", true))
        (text_input("Category", "category", "text", true))
        (money_input("Amount", "amount", true))
        (text_input("Date", "expense_date", "date", true))
        (text_input("Vendor", "vendor", "text", false))
        (select_input("Method", "payment_method", &PaymentMethod::options(), true))
        (select_input("Status", "status", &ExpenseStatus::options(), false))
        (text_input("Notes", "notes", "text", false))
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Finances" }
            }

            (summary_cards(summary))

            @if !students.is_empty() {
                (create_form("Record Payment", endpoints::PAYMENTS_API, &payment_fields))
            }

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                h2 class="px-6 py-4 text-lg font-semibold" { "Payments" }
                (payments_table(payments))
            }

            (create_form("Record Expense", endpoints::EXPENSES_API, &expense_fields))

            section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl"
            {
                h2 class="px-6 py-4 text-lg font-semibold" { "Expenses" }
                (expenses_table(expenses))
            }
        }
    );

    base("Finances", &content)
}
