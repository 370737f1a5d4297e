//! Creates the studio database schema.

use rusqlite::{Connection, Row, Transaction, TransactionBehavior, types::Type};

use crate::{
    Error, attendance::create_attendance_table, class::create_class_table,
    document::create_document_table, enrollment::create_enrollment_table,
    event::create_event_table,
    finance::{create_expense_table, create_payment_table},
    staff::create_staff_table, student::create_student_table,
};

/// Create the tables for the studio's records if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection` so that deleting a
/// student or class cascades to their enrollments, attendance and payments.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_student_table(&transaction)?;
    create_staff_table(&transaction)?;
    create_class_table(&transaction)?;
    create_enrollment_table(&transaction)?;
    create_attendance_table(&transaction)?;
    create_payment_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_event_table(&transaction)?;
    create_document_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a `COUNT(..)` column, which SQLite hands back as a signed integer.
pub fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{get_count, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }

    #[test]
    fn creates_every_table() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let mut tables: Vec<String> = connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        tables.retain(|name| !name.starts_with("sqlite_"));

        assert_eq!(
            tables,
            [
                "attendance",
                "class",
                "document",
                "enrollment",
                "event",
                "expense",
                "payment",
                "staff",
                "student"
            ]
        );
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }

    #[test]
    fn counts_are_read_as_unsigned() {
        let connection = Connection::open_in_memory().unwrap();

        let count = connection.query_row(
            "SELECT COUNT(*) FROM (SELECT 1 UNION SELECT 2)",
            [],
            |row| get_count(row, 0),
        );
        let negative = connection.query_row("SELECT -1", [], |row| get_count(row, 0));

        assert_eq!(count, Ok(2));
        assert!(matches!(
            negative,
            Err(rusqlite::Error::FromSqlConversionFailure(0, _, _))
        ));
    }
}
