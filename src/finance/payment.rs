//! Payments received from students and the database queries for them.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    money::{parse_amount, serialize_amount, to_storage},
    student::StudentId,
    text_enum::text_enum,
};

pub type PaymentId = DatabaseId;

text_enum! {
    /// How a payment or expense was paid.
    pub enum PaymentMethod("payment method") {
        /// Notes and coins.
        Cash => ("cash", "Cash"),
        /// A credit card.
        CreditCard => ("credit-card", "Credit Card"),
        /// A debit card.
        DebitCard => ("debit-card", "Debit Card"),
        /// A paper cheque.
        Check => ("check", "Check"),
        /// A direct bank transfer.
        BankTransfer => ("bank-transfer", "Bank Transfer"),
        /// An online payment provider.
        Online => ("online", "Online"),
    }
}

text_enum! {
    /// What a payment was for.
    pub enum PaymentType("payment type") {
        /// Class fees.
        Tuition => ("tuition", "Tuition"),
        /// A one off sign up fee.
        Registration => ("registration", "Registration"),
        /// Costume hire or purchase.
        Costume => ("costume", "Costume"),
        /// Competition entry fees.
        Competition => ("competition", "Competition"),
        /// Anything else.
        Other => ("other", "Other"),
    }
}

text_enum! {
    /// Where a payment is up to. Only completed payments count as revenue.
    #[derive(Default)]
    pub enum PaymentStatus("payment status") {
        /// Invoiced but not paid yet.
        Pending => ("pending", "Pending"),
        /// The money has been received.
        #[default]
        Completed => ("completed", "Completed"),
        /// The payment did not go through.
        Failed => ("failed", "Failed"),
        /// The money was given back.
        Refunded => ("refunded", "Refunded"),
    }
}

/// A payment as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub payment_date: Date,
    pub payment_method: Option<PaymentMethod>,
    pub payment_type: Option<PaymentType>,
    pub status: PaymentStatus,
    pub notes: Option<String>,
}

/// A payment that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    /// The student who paid.
    pub student_id: StudentId,
    /// The amount paid in dollars, must not be negative.
    pub amount: Decimal,
    /// The day the payment was made.
    pub payment_date: Date,
    /// How the student paid.
    pub payment_method: Option<PaymentMethod>,
    /// What the payment was for.
    pub payment_type: Option<PaymentType>,
    /// Where the payment is up to.
    pub status: PaymentStatus,
    /// Free text notes.
    pub notes: Option<String>,
}

/// A payment with the name of the student who made it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentListing {
    pub payment: Payment,
    pub student_name: String,
}

/// Create the payment table.
///
/// Payments are deleted along with their student.
pub fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment (
            id INTEGER PRIMARY KEY,
            student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
            amount TEXT NOT NULL,
            payment_date TEXT NOT NULL,
            payment_method TEXT CHECK (payment_method IN
                ('cash', 'credit-card', 'debit-card', 'check', 'bank-transfer', 'online')),
            payment_type TEXT CHECK (payment_type IN
                ('tuition', 'registration', 'costume', 'competition', 'other')),
            status TEXT NOT NULL DEFAULT 'completed'
                CHECK (status IN ('pending', 'completed', 'failed', 'refunded')),
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_payment_date ON payment(payment_date);
        CREATE INDEX IF NOT EXISTS idx_payment_student ON payment(student_id);",
    )
}

/// Save a new payment to the database.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the amount is negative, or
/// [Error::InvalidForeignKey] if the student does not exist.
pub fn create_payment(payment: NewPayment, connection: &Connection) -> Result<Payment, Error> {
    if payment.amount.is_sign_negative() && !payment.amount.is_zero() {
        return Err(Error::InvalidAmount(payment.amount.to_string()));
    }

    let amount = payment.amount.round_dp(2);

    connection.execute(
        "INSERT INTO payment (student_id, amount, payment_date, payment_method, payment_type, \
            status, notes) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            payment.student_id,
            to_storage(amount),
            payment.payment_date,
            payment.payment_method,
            payment.payment_type,
            payment.status,
            payment.notes,
        ],
    )?;

    Ok(Payment {
        id: connection.last_insert_rowid(),
        student_id: payment.student_id,
        amount,
        payment_date: payment.payment_date,
        payment_method: payment.payment_method,
        payment_type: payment.payment_type,
        status: payment.status,
        notes: payment.notes,
    })
}

/// Get every payment with the student's name, newest first.
pub fn get_payments(connection: &Connection) -> Result<Vec<PaymentListing>, Error> {
    connection
        .prepare(
            "SELECT payment.id, payment.student_id, payment.amount, payment.payment_date, \
                payment.payment_method, payment.payment_type, payment.status, payment.notes, \
                student.first_name || ' ' || student.last_name \
            FROM payment INNER JOIN student ON student.id = payment.student_id \
            ORDER BY payment.payment_date DESC, payment.id DESC",
        )?
        .query_map([], |row| {
            Ok(PaymentListing {
                payment: map_row_to_payment(row)?,
                student_name: row.get(8)?,
            })
        })?
        .map(|maybe_listing| maybe_listing.map_err(Error::from))
        .collect()
}

/// Delete a payment.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the payment does not exist.
pub fn delete_payment(id: PaymentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM payment WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("payment"));
    }

    Ok(())
}

fn map_row_to_payment(row: &Row) -> Result<Payment, rusqlite::Error> {
    let amount: String = row.get(2)?;

    Ok(Payment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        amount: parse_amount(&amount),
        payment_date: row.get(3)?,
        payment_method: row.get(4)?,
        payment_type: row.get(5)?,
        status: row.get(6)?,
        notes: row.get(7)?,
    })
}
