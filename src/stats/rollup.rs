//! Time windowed rollups over payments, expenses, enrollments and attendance.
//!
//! None of these fail. Database errors are logged and the rollup falls back
//! to zero so a page of statistics always renders.

use std::collections::HashMap;

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    attendance::AttendanceStatus,
    class::{ClassCapacity, ClassId, get_class_capacity_and_enrollment},
    finance::PaymentStatus,
    stats::queries::{AmountTable, RecordTable, dated_amounts, dated_statuses, sum_amount},
    text_enum::text_enum,
};

/// The number of months in a series when none is requested.
pub const DEFAULT_SERIES_MONTHS: u32 = 6;

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

/// The current calendar month up to and including `today`.
pub fn month_window(today: Date) -> DateWindow {
    DateWindow {
        start: first_of_month(today),
        end: today,
    }
}

/// The current calendar month and the `month_count - 1` months before it.
///
/// A `month_count` of zero is treated as one.
pub fn trailing_months_window(today: Date, month_count: u32) -> DateWindow {
    let mut start = first_of_month(today);

    for _ in 1..month_count.max(1) {
        start = previous_month_start(start);
    }

    DateWindow { start, end: today }
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

fn previous_month_start(month_start: Date) -> Date {
    let month = month_start.month().previous();
    let year = if month == Month::December {
        month_start.year() - 1
    } else {
        month_start.year()
    };

    Date::from_calendar_date(year, month, 1).unwrap_or(month_start)
}

/// `numerator / total` as a whole percentage rounded half up, or zero when `total` is zero.
pub fn percentage(numerator: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }

    let rounded = (numerator.saturating_mul(200) + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// How full a class is as a whole percentage. Zero for a class without capacity.
pub fn class_fill_rate(capacity: i64, enrolled: u64) -> u32 {
    match u64::try_from(capacity) {
        Ok(capacity) => percentage(enrolled, capacity),
        Err(_) => 0,
    }
}

/// Whether a class has no free places.
pub fn is_full(capacity: i64, enrolled: u64) -> bool {
    u64::try_from(capacity).map_or(true, |capacity| enrolled >= capacity)
}

/// How full one class is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassFill {
    pub class_id: ClassId,
    pub fill_rate: u32,
    pub is_full: bool,
}

/// The fill rate of the class with `class_id`.
///
/// A class that cannot be read, including one that does not exist, is
/// reported as empty and not full.
pub fn class_fill(class_id: ClassId, connection: &Connection) -> ClassFill {
    let ClassCapacity { capacity, enrolled } = log_and_default(
        get_class_capacity_and_enrollment(class_id, connection),
        "class fill rate",
    );

    ClassFill {
        class_id,
        fill_rate: class_fill_rate(capacity, enrolled),
        is_full: capacity > 0 && is_full(capacity, enrolled),
    }
}

/// Revenue minus expenses. May be negative, and zero if the difference overflows.
pub fn net_profit(revenue: Decimal, expenses: Decimal) -> Decimal {
    revenue.checked_sub(expenses).unwrap_or_else(|| {
        tracing::error!("could not calculate net profit: {}", Error::AmountOverflow);
        Decimal::ZERO
    })
}

fn log_and_default<T: Default>(result: Result<T, Error>, what: &str) -> T {
    result.unwrap_or_else(|error| {
        tracing::error!("could not calculate {what}: {error}");
        T::default()
    })
}

/// The total of completed payments made since the start of `window`.
pub fn monthly_revenue(window: DateWindow, connection: &Connection) -> Decimal {
    log_and_default(
        sum_amount(
            AmountTable::Payment,
            Some(window.start),
            Some(PaymentStatus::Completed.as_str()),
            connection,
        ),
        "revenue",
    )
}

/// The total of all expenses since the start of `window`.
pub fn monthly_expenses(window: DateWindow, connection: &Connection) -> Decimal {
    log_and_default(
        sum_amount(AmountTable::Expense, Some(window.start), None, connection),
        "expenses",
    )
}

/// The total of all pending payments, whenever they were made.
pub fn outstanding(connection: &Connection) -> Decimal {
    log_and_default(
        sum_amount(
            AmountTable::Payment,
            None,
            Some(PaymentStatus::Pending.as_str()),
            connection,
        ),
        "outstanding payments",
    )
}

/// Counts of attendance records by status within a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceCounts {
    pub total: u64,
    pub present: u64,
    pub late: u64,
}

impl AttendanceCounts {
    fn add(&mut self, status: &str) {
        self.total += 1;

        match status.parse() {
            Ok(AttendanceStatus::Present) => self.present += 1,
            Ok(AttendanceStatus::Late) => self.late += 1,
            _ => {}
        }
    }

    /// The percentage of records that are present.
    pub fn attendance_rate(&self) -> u32 {
        percentage(self.present, self.total)
    }

    /// The percentage of records that are late.
    pub fn late_rate(&self) -> u32 {
        percentage(self.late, self.total)
    }
}

/// Count the attendance records taken since the start of `window`.
pub fn attendance_counts(window: DateWindow, connection: &Connection) -> AttendanceCounts {
    let statuses = log_and_default(
        dated_statuses(RecordTable::Attendance, window.start, connection),
        "attendance counts",
    );

    let mut counts = AttendanceCounts::default();
    for (_, status) in &statuses {
        counts.add(status);
    }

    counts
}

/// The percentage of attendance records since the start of `window` that are present.
pub fn attendance_rate(window: DateWindow, connection: &Connection) -> u32 {
    attendance_counts(window, connection).attendance_rate()
}

/// The percentage of attendance records since the start of `window` that are late.
pub fn late_rate(window: DateWindow, connection: &Connection) -> u32 {
    attendance_counts(window, connection).late_rate()
}

text_enum! {
    /// The quantities that can be charted month by month.
    pub enum SeriesMetric("series metric") {
        /// Completed payments.
        Revenue => ("revenue", "Revenue"),
        /// All expenses.
        Expenses => ("expenses", "Expenses"),
        /// New enrollments.
        Enrollments => ("enrollments", "Enrollments"),
        /// The percentage of attendance records that are present.
        Attendance => ("attendance", "Attendance Rate"),
    }
}

/// One month of a [SeriesMetric].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// The short month name, e.g. "Mar".
    pub month: String,
    /// The amount, count or percentage for the month.
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
}

/// The short English name of a month, e.g. "Jan".
pub fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// `metric` for each of the trailing `month_count` months, oldest first.
///
/// Months without any records are included with a value of zero.
pub fn monthly_series(
    metric: SeriesMetric,
    month_count: u32,
    today: Date,
    connection: &Connection,
) -> Vec<SeriesPoint> {
    let window = trailing_months_window(today, month_count);

    let mut months = Vec::new();
    let mut month_start = window.start;
    while month_start <= window.end {
        months.push((month_start.year(), month_start.month()));
        month_start = next_month_start(month_start);
    }

    let values: HashMap<(i32, Month), Decimal> = match metric {
        SeriesMetric::Revenue | SeriesMetric::Expenses => {
            let (table, status) = match metric {
                SeriesMetric::Revenue => {
                    (AmountTable::Payment, Some(PaymentStatus::Completed.as_str()))
                }
                _ => (AmountTable::Expense, None),
            };
            log_and_default(
                dated_amounts(table, window.start, status, connection).and_then(totals_by_month),
                "monthly amounts",
            )
        }
        SeriesMetric::Enrollments => {
            let rows = log_and_default(
                dated_statuses(RecordTable::Enrollment, window.start, connection),
                "monthly enrollments",
            );

            let mut counts = HashMap::new();
            for (date, _) in rows {
                *counts.entry((date.year(), date.month())).or_insert(Decimal::ZERO) += Decimal::ONE;
            }
            counts
        }
        SeriesMetric::Attendance => {
            let rows = log_and_default(
                dated_statuses(RecordTable::Attendance, window.start, connection),
                "monthly attendance",
            );

            let mut counts: HashMap<(i32, Month), AttendanceCounts> = HashMap::new();
            for (date, status) in &rows {
                counts
                    .entry((date.year(), date.month()))
                    .or_default()
                    .add(status);
            }
            counts
                .into_iter()
                .map(|(month, counts)| (month, Decimal::from(counts.attendance_rate())))
                .collect()
        }
    };

    months
        .into_iter()
        .map(|key| SeriesPoint {
            month: month_label(key.1).to_owned(),
            value: values.get(&key).copied().unwrap_or_default(),
        })
        .collect()
}

fn totals_by_month(rows: Vec<(Date, Decimal)>) -> Result<HashMap<(i32, Month), Decimal>, Error> {
    let mut totals: HashMap<(i32, Month), Decimal> = HashMap::new();

    for (date, amount) in rows {
        let total = totals.entry((date.year(), date.month())).or_default();
        *total = total.checked_add(amount).ok_or(Error::AmountOverflow)?;
    }

    Ok(totals)
}

fn next_month_start(month_start: Date) -> Date {
    let month = month_start.month().next();
    let year = if month == Month::January {
        month_start.year() + 1
    } else {
        month_start.year()
    };

    Date::from_calendar_date(year, month, 1).unwrap_or(Date::MAX)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        attendance::{AttendanceStatus, insert_attendance},
        finance::PaymentStatus,
        test_utils::{
            get_test_connection, must_create_class, must_create_expense, must_create_payment,
            must_create_student, must_enroll,
        },
    };

    use super::{
        ClassFill, DateWindow, SeriesMetric, attendance_rate, class_fill, class_fill_rate,
        is_full, late_rate,
        month_window, monthly_expenses, monthly_revenue, monthly_series, net_profit,
        outstanding, percentage, trailing_months_window,
    };

    #[test]
    fn month_window_starts_on_first_day() {
        assert_eq!(
            month_window(date!(2024 - 03 - 17)),
            DateWindow {
                start: date!(2024 - 03 - 01),
                end: date!(2024 - 03 - 17),
            }
        );
    }

    #[test]
    fn trailing_window_crosses_year_boundary() {
        assert_eq!(
            trailing_months_window(date!(2024 - 02 - 10), 6).start,
            date!(2023 - 09 - 01)
        );
        assert_eq!(
            trailing_months_window(date!(2024 - 02 - 10), 0).start,
            date!(2024 - 02 - 01)
        );
    }

    #[test]
    fn percentage_is_zero_without_records_and_bounded() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        for total in 1..=30 {
            for numerator in 0..=total {
                let rate = percentage(numerator, total);
                assert!(rate <= 100, "{numerator}/{total} gave {rate}");
            }
        }
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn full_exactly_at_capacity() {
        assert_eq!(class_fill_rate(12, 12), 100);
        assert!(is_full(12, 12));
        assert!(is_full(12, 13));
        assert!(!is_full(12, 11));
        assert_eq!(class_fill_rate(12, 6), 50);
        assert_eq!(class_fill_rate(0, 3), 0);
    }

    #[test]
    fn class_fill_looks_up_capacity_and_enrollment() {
        let connection = get_test_connection();
        let class = must_create_class("Ballet I", 2, &connection);
        let ana = must_create_student("Ana", "Lee", &connection);
        must_enroll(ana.id, class.id, date!(2024 - 02 - 01), &connection);

        assert_eq!(
            class_fill(class.id, &connection),
            ClassFill {
                class_id: class.id,
                fill_rate: 50,
                is_full: false,
            }
        );

        let ben = must_create_student("Ben", "Ode", &connection);
        must_enroll(ben.id, class.id, date!(2024 - 02 - 01), &connection);

        assert_eq!(
            class_fill(class.id, &connection),
            ClassFill {
                class_id: class.id,
                fill_rate: 100,
                is_full: true,
            }
        );
    }

    #[test]
    fn class_fill_is_empty_for_missing_class() {
        let connection = get_test_connection();

        assert_eq!(
            class_fill(42, &connection),
            ClassFill {
                class_id: 42,
                fill_rate: 0,
                is_full: false,
            }
        );
        assert_eq!(
            class_fill(42, &Connection::open_in_memory().unwrap()),
            ClassFill {
                class_id: 42,
                fill_rate: 0,
                is_full: false,
            }
        );
    }

    #[test]
    fn no_payments_means_zero_revenue_and_outstanding() {
        let connection = get_test_connection();
        let window = month_window(date!(2024 - 03 - 17));

        assert_eq!(monthly_revenue(window, &connection), dec!(0));
        assert_eq!(outstanding(&connection), dec!(0));
        assert_eq!(
            net_profit(
                monthly_revenue(window, &connection),
                monthly_expenses(window, &connection)
            ),
            dec!(0)
        );
    }

    #[test]
    fn revenue_counts_completed_payments_in_window() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        for (amount, date, status) in [
            (dec!(120.50), date!(2024 - 03 - 02), PaymentStatus::Completed),
            (dec!(80), date!(2024 - 03 - 03), PaymentStatus::Pending),
            (dec!(30), date!(2024 - 03 - 04), PaymentStatus::Refunded),
            (dec!(500), date!(2024 - 02 - 29), PaymentStatus::Completed),
            (dec!(20), date!(2023 - 11 - 01), PaymentStatus::Pending),
        ] {
            must_create_payment(student.id, amount, date, status, &connection);
        }
        must_create_expense(dec!(200), date!(2024 - 03 - 05), &connection);
        must_create_expense(dec!(999), date!(2024 - 02 - 05), &connection);
        let window = month_window(date!(2024 - 03 - 17));

        let revenue = monthly_revenue(window, &connection);
        let expenses = monthly_expenses(window, &connection);

        assert_eq!(revenue, dec!(120.50));
        assert_eq!(expenses, dec!(200));
        assert_eq!(net_profit(revenue, expenses), dec!(-79.50));
        assert_eq!(outstanding(&connection), dec!(100));
    }

    #[test]
    fn attendance_and_late_rates() {
        let connection = get_test_connection();
        let class = must_create_class("Ballet I", 10, &connection);
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
        ];
        for (index, status) in statuses.into_iter().enumerate() {
            let student = must_create_student(&format!("Student{index}"), "Lee", &connection);
            must_enroll(student.id, class.id, date!(2024 - 02 - 01), &connection);
            insert_attendance(class.id, student.id, date!(2024 - 03 - 04), status, &connection)
                .unwrap();
        }
        let window = month_window(date!(2024 - 03 - 17));

        assert_eq!(attendance_rate(window, &connection), 50);
        assert_eq!(late_rate(window, &connection), 25);
        assert_eq!(attendance_rate(month_window(date!(2024 - 04 - 01)), &connection), 0);
    }

    #[test]
    fn series_has_one_zero_filled_point_per_month() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        must_create_payment(
            student.id,
            dec!(100),
            date!(2024 - 01 - 15),
            PaymentStatus::Completed,
            &connection,
        );
        must_create_payment(
            student.id,
            dec!(50),
            date!(2024 - 03 - 02),
            PaymentStatus::Completed,
            &connection,
        );
        must_create_payment(
            student.id,
            dec!(25),
            date!(2024 - 03 - 09),
            PaymentStatus::Completed,
            &connection,
        );

        let series = monthly_series(SeriesMetric::Revenue, 6, date!(2024 - 03 - 17), &connection);

        let labels: Vec<&str> = series.iter().map(|point| point.month.as_str()).collect();
        let values: Vec<_> = series.iter().map(|point| point.value).collect();
        assert_eq!(labels, ["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(
            values,
            [dec!(0), dec!(0), dec!(0), dec!(100), dec!(0), dec!(75)]
        );
    }

    #[test]
    fn enrollment_series_counts_new_enrollments() {
        let connection = get_test_connection();
        let class = must_create_class("Ballet I", 10, &connection);
        for (name, date) in [
            ("Ana", date!(2024 - 02 - 01)),
            ("Ben", date!(2024 - 02 - 20)),
            ("Cleo", date!(2024 - 03 - 01)),
        ] {
            let student = must_create_student(name, "Lee", &connection);
            must_enroll(student.id, class.id, date, &connection);
        }

        let series =
            monthly_series(SeriesMetric::Enrollments, 2, date!(2024 - 03 - 17), &connection);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, dec!(2));
        assert_eq!(series[1].value, dec!(1));
    }

    #[test]
    fn overflowing_totals_default_to_zero() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        for _ in 0..2 {
            connection
                .execute(
                    "INSERT INTO payment (student_id, amount, payment_date, status) \
                    VALUES (?1, '50000000000000000000000000000', '2024-03-02', 'completed')",
                    [student.id],
                )
                .unwrap();
        }
        let today = date!(2024 - 03 - 17);

        assert_eq!(monthly_revenue(month_window(today), &connection), dec!(0));
        let series = monthly_series(SeriesMetric::Revenue, 3, today, &connection);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|point| point.value.is_zero()));
    }

    #[test]
    fn net_profit_is_zero_when_the_difference_overflows() {
        assert_eq!(net_profit(Decimal::MAX, Decimal::MIN), dec!(0));
        assert_eq!(net_profit(Decimal::MIN, Decimal::ONE), dec!(0));
        assert_eq!(net_profit(dec!(10), dec!(25.50)), dec!(-15.50));
    }

    #[test]
    fn rollups_default_to_zero_on_database_errors() {
        let connection = Connection::open_in_memory().unwrap();
        let today = date!(2024 - 03 - 17);
        let window = month_window(today);

        assert_eq!(monthly_revenue(window, &connection), dec!(0));
        assert_eq!(monthly_expenses(window, &connection), dec!(0));
        assert_eq!(outstanding(&connection), dec!(0));
        assert_eq!(attendance_rate(window, &connection), 0);
        let series = monthly_series(SeriesMetric::Attendance, 3, today, &connection);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|point| point.value.is_zero()));
    }
}
