//! Student records and the database queries for them.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{Error, database_id::DatabaseId, text_enum::text_enum};

pub type StudentId = DatabaseId;

text_enum! {
    /// Where a student is in their time at the studio.
    #[derive(Default)]
    pub enum StudentStatus("student status") {
        #[default]
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        OnHold => ("on-hold", "On Hold"),
        Graduated => ("graduated", "Graduated"),
    }
}

/// A student as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub level: Option<String>,
    pub medical_notes: Option<String>,
    pub enrollment_date: Date,
    pub status: StudentStatus,
}

impl Student {
    /// The first and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated student that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    /// The student's given name, must not be empty.
    pub first_name: String,
    /// The student's family name, must not be empty.
    pub last_name: String,
    /// The student's birthday.
    pub date_of_birth: Date,
    /// The student's or their guardian's email address.
    pub email: Option<String>,
    /// The student's or their guardian's phone number.
    pub phone: Option<String>,
    /// Who to call in an emergency.
    pub emergency_contact_name: Option<String>,
    /// The emergency contact's phone number.
    pub emergency_contact_phone: Option<String>,
    /// The student's skill level, e.g. "Beginner".
    pub level: Option<String>,
    /// Injuries, allergies and other notes for instructors.
    pub medical_notes: Option<String>,
    /// The day the student joined the studio.
    pub enrollment_date: Date,
    /// Whether the student is currently attending.
    pub status: StudentStatus,
}

const STUDENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, email, phone, \
    emergency_contact_name, emergency_contact_phone, level, medical_notes, enrollment_date, status";

/// Create the student table.
pub fn create_student_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS student (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            emergency_contact_name TEXT,
            emergency_contact_phone TEXT,
            level TEXT,
            medical_notes TEXT,
            enrollment_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'inactive', 'on-hold', 'graduated'))
        );

        CREATE INDEX IF NOT EXISTS idx_student_name ON student(last_name, first_name);
        CREATE INDEX IF NOT EXISTS idx_student_status ON student(status);",
    )
}

/// Save a new student to the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub fn create_student(student: NewStudent, connection: &Connection) -> Result<Student, Error> {
    connection.execute(
        "INSERT INTO student (first_name, last_name, date_of_birth, email, phone, \
            emergency_contact_name, emergency_contact_phone, level, medical_notes, \
            enrollment_date, status) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            student.first_name,
            student.last_name,
            student.date_of_birth,
            student.email,
            student.phone,
            student.emergency_contact_name,
            student.emergency_contact_phone,
            student.level,
            student.medical_notes,
            student.enrollment_date,
            student.status,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Student {
        id,
        first_name: student.first_name,
        last_name: student.last_name,
        date_of_birth: student.date_of_birth,
        email: student.email,
        phone: student.phone,
        emergency_contact_name: student.emergency_contact_name,
        emergency_contact_phone: student.emergency_contact_phone,
        level: student.level,
        medical_notes: student.medical_notes,
        enrollment_date: student.enrollment_date,
        status: student.status,
    })
}

/// Retrieve a student by id.
///
/// # Errors
/// Returns [Error::NotFound] if no student has the id `id`.
pub fn get_student(id: StudentId, connection: &Connection) -> Result<Student, Error> {
    connection
        .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM student WHERE id = ?1"),
            [id],
            map_row_to_student,
        )
        .map_err(Error::from)
}

/// Retrieve students ordered by last name then first name.
///
/// When `search` is given, only students whose first name, last name or email
/// contain the search text (ignoring ASCII case) are returned.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub fn get_students(search: Option<&str>, connection: &Connection) -> Result<Vec<Student>, Error> {
    let pattern = search
        .map(str::trim)
        .filter(|search| !search.is_empty())
        .map(|search| format!("%{}%", escape_like(search)));

    let mut statement = connection.prepare(&format!(
        "SELECT {STUDENT_COLUMNS} FROM student \
        WHERE ?1 IS NULL \
            OR first_name LIKE ?1 ESCAPE '\\' \
            OR last_name LIKE ?1 ESCAPE '\\' \
            OR email LIKE ?1 ESCAPE '\\' \
        ORDER BY last_name ASC, first_name ASC"
    ))?;

    statement
        .query_map([pattern], map_row_to_student)?
        .map(|maybe_student| maybe_student.map_err(Error::from))
        .collect()
}

/// Delete a student along with their enrollments, attendance and payments.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the student does not exist.
pub fn delete_student(id: StudentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM student WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("student"));
    }

    Ok(())
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub fn map_row_to_student(row: &Row) -> Result<Student, rusqlite::Error> {
    Ok(Student {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        emergency_contact_name: row.get(6)?,
        emergency_contact_phone: row.get(7)?,
        level: row.get(8)?,
        medical_notes: row.get(9)?,
        enrollment_date: row.get(10)?,
        status: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, db::initialize};

    use super::{
        NewStudent, StudentStatus, create_student, delete_student, get_student, get_students,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_student(first_name: &str, last_name: &str, email: Option<&str>) -> NewStudent {
        NewStudent {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            date_of_birth: date!(2012 - 05 - 17),
            email: email.map(str::to_owned),
            phone: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            level: Some("Beginner".to_owned()),
            medical_notes: None,
            enrollment_date: date!(2024 - 02 - 01),
            status: StudentStatus::Active,
        }
    }

    #[test]
    fn create_and_get_student() {
        let connection = get_test_connection();

        let created = create_student(new_student("Ana", "Lee", None), &connection).unwrap();
        let got = get_student(created.id, &connection).unwrap();

        assert_eq!(created, got);
        assert_eq!(got.full_name(), "Ana Lee");
    }

    #[test]
    fn get_missing_student_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_student(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn students_are_ordered_by_last_then_first_name() {
        let connection = get_test_connection();
        for (first, last) in [("Zoe", "Brown"), ("Ana", "Lee"), ("Ben", "Brown")] {
            create_student(new_student(first, last, None), &connection).unwrap();
        }

        let names: Vec<String> = get_students(None, &connection)
            .unwrap()
            .iter()
            .map(|student| student.full_name())
            .collect();

        assert_eq!(names, ["Ben Brown", "Zoe Brown", "Ana Lee"]);
    }

    #[test]
    fn search_matches_names_and_email_ignoring_case() {
        let connection = get_test_connection();
        create_student(new_student("Ana", "Lee", Some("ana@example.com")), &connection).unwrap();
        create_student(new_student("Ben", "Cruz", Some("bcruz@example.com")), &connection)
            .unwrap();
        create_student(new_student("Cleo", "Anand", None), &connection).unwrap();

        let by_name: Vec<String> = get_students(Some("ANA"), &connection)
            .unwrap()
            .iter()
            .map(|student| student.full_name())
            .collect();
        let by_email = get_students(Some("bcruz@"), &connection).unwrap();

        assert_eq!(by_name, ["Cleo Anand", "Ana Lee"]);
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].first_name, "Ben");
    }

    #[test]
    fn blank_search_returns_everyone() {
        let connection = get_test_connection();
        create_student(new_student("Ana", "Lee", None), &connection).unwrap();
        create_student(new_student("Ben", "Cruz", None), &connection).unwrap();

        assert_eq!(get_students(Some("  "), &connection).unwrap().len(), 2);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let connection = get_test_connection();
        create_student(new_student("Ana", "Lee", None), &connection).unwrap();

        assert!(get_students(Some("%"), &connection).unwrap().is_empty());
    }

    #[test]
    fn delete_student_removes_row() {
        let connection = get_test_connection();
        let student = create_student(new_student("Ana", "Lee", None), &connection).unwrap();

        delete_student(student.id, &connection).unwrap();

        assert_eq!(get_student(student.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_student_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_student(7, &connection),
            Err(Error::DeleteMissing("student"))
        );
    }
}
