//! Studio expenses and the database queries for them.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    finance::payment::PaymentMethod,
    money::{parse_amount, serialize_amount, to_storage},
    text_enum::text_enum,
};

pub type ExpenseId = DatabaseId;

text_enum! {
    /// Where an expense is up to. Every expense counts towards the totals.
    #[derive(Default)]
    pub enum ExpenseStatus("expense status") {
        /// The bill has not been paid yet.
        Pending => ("pending", "Pending"),
        /// The bill has been paid.
        #[default]
        Paid => ("paid", "Paid"),
        /// A staff member paid and has been paid back.
        Reimbursed => ("reimbursed", "Reimbursed"),
    }
}

/// An expense as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub category: String,
    pub description: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub expense_date: Date,
    pub vendor: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: ExpenseStatus,
    pub notes: Option<String>,
}

/// An expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A grouping such as "Rent" or "Costumes".
    pub category: String,
    /// What was bought.
    pub description: String,
    /// The amount spent in dollars, must not be negative.
    pub amount: Decimal,
    /// The day the money was spent.
    pub expense_date: Date,
    /// Who was paid.
    pub vendor: Option<String>,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Where the expense is up to.
    pub status: ExpenseStatus,
    /// Free text notes.
    pub notes: Option<String>,
}

/// Create the expense table.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            expense_date TEXT NOT NULL,
            vendor TEXT,
            payment_method TEXT CHECK (payment_method IN
                ('cash', 'credit-card', 'debit-card', 'check', 'bank-transfer', 'online')),
            status TEXT NOT NULL DEFAULT 'paid'
                CHECK (status IN ('pending', 'paid', 'reimbursed')),
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(expense_date);",
    )
}

/// Save a new expense to the database.
///
/// # Errors
/// Returns [Error::EmptyField] if the category or description is blank, or
/// [Error::InvalidAmount] if the amount is negative.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    if expense.category.trim().is_empty() {
        return Err(Error::EmptyField("Category"));
    }

    if expense.description.trim().is_empty() {
        return Err(Error::EmptyField("Description"));
    }

    if expense.amount.is_sign_negative() && !expense.amount.is_zero() {
        return Err(Error::InvalidAmount(expense.amount.to_string()));
    }

    let amount = expense.amount.round_dp(2);

    connection.execute(
        "INSERT INTO expense (category, description, amount, expense_date, vendor, \
            payment_method, status, notes) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            expense.category,
            expense.description,
            to_storage(amount),
            expense.expense_date,
            expense.vendor,
            expense.payment_method,
            expense.status,
            expense.notes,
        ],
    )?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        category: expense.category,
        description: expense.description,
        amount,
        expense_date: expense.expense_date,
        vendor: expense.vendor,
        payment_method: expense.payment_method,
        status: expense.status,
        notes: expense.notes,
    })
}

/// Get every expense, newest first.
pub fn get_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, category, description, amount, expense_date, vendor, payment_method, \
                status, notes \
            FROM expense ORDER BY expense_date DESC, id DESC",
        )?
        .query_map([], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Delete an expense.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the expense does not exist.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("expense"));
    }

    Ok(())
}

fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    let amount: String = row.get(3)?;

    Ok(Expense {
        id: row.get(0)?,
        category: row.get(1)?,
        description: row.get(2)?,
        amount: parse_amount(&amount),
        expense_date: row.get(4)?,
        vendor: row.get(5)?,
        payment_method: row.get(6)?,
        status: row.get(7)?,
        notes: row.get(8)?,
    })
}
