//! Staff members and the database queries for them.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    money::{parse_amount, to_storage},
    text_enum::text_enum,
};

pub type StaffId = DatabaseId;

text_enum! {
    /// What a staff member does at the studio.
    pub enum StaffRole("staff role") {
        Instructor => ("instructor", "Instructor"),
        Admin => ("admin", "Admin"),
        Assistant => ("assistant", "Assistant"),
        Owner => ("owner", "Owner"),
    }
}

text_enum! {
    /// Whether a staff member is currently working.
    #[derive(Default)]
    pub enum StaffStatus("staff status") {
        #[default]
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        OnLeave => ("on-leave", "On Leave"),
    }
}

/// A staff member as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub hire_date: Date,
    pub salary: Option<Decimal>,
    pub specialization: Option<String>,
    pub status: StaffStatus,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated staff member that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStaffMember {
    /// The staff member's given name.
    pub first_name: String,
    /// The staff member's family name.
    pub last_name: String,
    /// Unique across all staff.
    pub email: String,
    /// A contact phone number.
    pub phone: Option<String>,
    /// What they do at the studio.
    pub role: StaffRole,
    /// The day they started.
    pub hire_date: Date,
    /// Their yearly salary in dollars.
    pub salary: Option<Decimal>,
    /// The styles they teach, e.g. "Ballet, Jazz".
    pub specialization: Option<String>,
    /// Whether they are currently working.
    pub status: StaffStatus,
}

const STAFF_COLUMNS: &str =
    "id, first_name, last_name, email, phone, role, hire_date, salary, specialization, status";

/// Create the staff table.
pub fn create_staff_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS staff (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT,
            role TEXT NOT NULL
                CHECK (role IN ('instructor', 'admin', 'assistant', 'owner')),
            hire_date TEXT NOT NULL,
            salary TEXT,
            specialization TEXT,
            status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'inactive', 'on-leave'))
        );",
    )
}

/// Save a new staff member to the database.
///
/// # Errors
/// Returns [Error::DuplicateStaffEmail] if another staff member has the same email.
pub fn create_staff_member(
    staff_member: NewStaffMember,
    connection: &Connection,
) -> Result<StaffMember, Error> {
    connection.execute(
        "INSERT INTO staff (first_name, last_name, email, phone, role, hire_date, salary, \
            specialization, status) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            staff_member.first_name,
            staff_member.last_name,
            staff_member.email,
            staff_member.phone,
            staff_member.role,
            staff_member.hire_date,
            staff_member.salary.map(to_storage),
            staff_member.specialization,
            staff_member.status,
        ],
    )?;

    Ok(StaffMember {
        id: connection.last_insert_rowid(),
        first_name: staff_member.first_name,
        last_name: staff_member.last_name,
        email: staff_member.email,
        phone: staff_member.phone,
        role: staff_member.role,
        hire_date: staff_member.hire_date,
        salary: staff_member.salary,
        specialization: staff_member.specialization,
        status: staff_member.status,
    })
}

/// Retrieve all staff ordered by last name then first name.
pub fn get_staff(connection: &Connection) -> Result<Vec<StaffMember>, Error> {
    connection
        .prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff ORDER BY last_name ASC, first_name ASC"
        ))?
        .query_map([], map_row_to_staff_member)?
        .map(|maybe_staff_member| maybe_staff_member.map_err(Error::from))
        .collect()
}

/// Retrieve the active instructors, for assigning to classes.
pub fn get_instructors(connection: &Connection) -> Result<Vec<StaffMember>, Error> {
    connection
        .prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff \
            WHERE role = 'instructor' AND status = 'active' \
            ORDER BY last_name ASC, first_name ASC"
        ))?
        .query_map([], map_row_to_staff_member)?
        .map(|maybe_staff_member| maybe_staff_member.map_err(Error::from))
        .collect()
}

/// Delete a staff member. Their classes are kept without an instructor.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the staff member does not exist.
pub fn delete_staff_member(id: StaffId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM staff WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("staff member"));
    }

    Ok(())
}

fn map_row_to_staff_member(row: &Row) -> Result<StaffMember, rusqlite::Error> {
    let salary: Option<String> = row.get(7)?;

    Ok(StaffMember {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        role: row.get(5)?,
        hire_date: row.get(6)?,
        salary: salary.as_deref().map(parse_amount),
        specialization: row.get(8)?,
        status: row.get(9)?,
    })
}
