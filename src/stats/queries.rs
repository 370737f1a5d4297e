//! The aggregate queries behind the rollup statistics.
//!
//! Amounts are summed in Rust from their stored text so that a malformed row
//! counts as zero instead of failing the whole query.

use rusqlite::{Connection, ToSql};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    db::get_count,
    money::{checked_total, parse_amount},
};

/// The tables that hold money amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTable {
    Payment,
    Expense,
}

impl AmountTable {
    fn name(self) -> &'static str {
        match self {
            AmountTable::Payment => "payment",
            AmountTable::Expense => "expense",
        }
    }

    fn date_column(self) -> &'static str {
        match self {
            AmountTable::Payment => "payment_date",
            AmountTable::Expense => "expense_date",
        }
    }
}

/// The tables that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTable {
    Student,
    Class,
    Enrollment,
    Attendance,
}

impl RecordTable {
    fn name(self) -> &'static str {
        match self {
            RecordTable::Student => "student",
            RecordTable::Class => "class",
            RecordTable::Enrollment => "enrollment",
            RecordTable::Attendance => "attendance",
        }
    }

    /// The date a row is bucketed by. Classes are weekly and have no date.
    fn date_column(self) -> Option<&'static str> {
        match self {
            RecordTable::Student => Some("enrollment_date"),
            RecordTable::Class => None,
            RecordTable::Enrollment => Some("enrollment_date"),
            RecordTable::Attendance => Some("attendance_date"),
        }
    }
}

/// Builds the `WHERE` clause shared by the queries below.
fn filter_clause(
    date_column: Option<&str>,
    date_from: Option<Date>,
    status_filter: Option<&str>,
) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let (Some(column), Some(date_from)) = (date_column, date_from) {
        params.push(Box::new(date_from));
        conditions.push(format!("{column} >= ?{}", params.len()));
    }

    if let Some(status) = status_filter {
        params.push(Box::new(status.to_owned()));
        conditions.push(format!("status = ?{}", params.len()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Sum the amounts in `table` dated on or after `date_from`, optionally only
/// rows with the given status.
///
/// # Errors
/// Returns [Error::AmountOverflow] if the total is too large.
pub fn sum_amount(
    table: AmountTable,
    date_from: Option<Date>,
    status_filter: Option<&str>,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let (where_clause, params) = filter_clause(Some(table.date_column()), date_from, status_filter);

    connection
        .prepare(&format!("SELECT amount FROM {}{where_clause}", table.name()))?
        .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get::<_, String>(0)
        })?
        .map(|maybe_amount| {
            maybe_amount
                .map(|amount| parse_amount(&amount))
                .map_err(Error::from)
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(checked_total)
}

/// Count the rows in `table` dated on or after `date_from`, optionally only
/// rows with the given status.
///
/// `date_from` is ignored for tables without a date.
pub fn count_rows(
    table: RecordTable,
    date_from: Option<Date>,
    status_filter: Option<&str>,
    connection: &Connection,
) -> Result<u64, Error> {
    let (where_clause, params) = filter_clause(table.date_column(), date_from, status_filter);

    connection
        .query_row(
            &format!("SELECT COUNT(*) FROM {}{where_clause}", table.name()),
            rusqlite::params_from_iter(params.iter()),
            |row| get_count(row, 0),
        )
        .map_err(Error::from)
}

/// The date and amount of each row in `table` dated on or after `date_from`.
pub fn dated_amounts(
    table: AmountTable,
    date_from: Date,
    status_filter: Option<&str>,
    connection: &Connection,
) -> Result<Vec<(Date, Decimal)>, Error> {
    let (where_clause, params) =
        filter_clause(Some(table.date_column()), Some(date_from), status_filter);

    connection
        .prepare(&format!(
            "SELECT {}, amount FROM {}{where_clause}",
            table.date_column(),
            table.name()
        ))?
        .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            let amount: String = row.get(1)?;
            Ok((row.get(0)?, parse_amount(&amount)))
        })?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

/// The date and status of each row in `table` dated on or after `date_from`.
pub fn dated_statuses(
    table: RecordTable,
    date_from: Date,
    connection: &Connection,
) -> Result<Vec<(Date, String)>, Error> {
    let Some(date_column) = table.date_column() else {
        return Ok(Vec::new());
    };

    connection
        .prepare(&format!(
            "SELECT {date_column}, status FROM {} WHERE {date_column} >= ?1",
            table.name()
        ))?
        .query_map([date_from], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}
