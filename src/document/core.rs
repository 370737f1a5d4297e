//! Metadata for the studio's documents. Only the file's name and URL are kept,
//! the file itself lives elsewhere.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{
    Error, database_id::DatabaseId, staff::StaffId, student::StudentId, text_enum::text_enum,
};

pub type DocumentId = DatabaseId;

text_enum! {
    /// What kind of document it is.
    pub enum DocumentType("document type") {
        /// An employment or hire contract.
        Contract => ("contract", "Contract"),
        /// A signed liability waiver.
        Waiver => ("waiver", "Waiver"),
        /// A studio policy.
        Policy => ("policy", "Policy"),
        /// A filled in form.
        Form => ("form", "Form"),
        /// An exam or training certificate.
        Certificate => ("certificate", "Certificate"),
        /// Anything else.
        Other => ("other", "Other"),
    }
}

/// A document's metadata as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_url: String,
    /// The size of the file in bytes.
    pub file_size: Option<i64>,
    pub student_id: Option<StudentId>,
    pub staff_id: Option<StaffId>,
    /// Who uploaded the file.
    pub uploaded_by: Option<String>,
    /// The date the file was uploaded.
    pub uploaded_at: Date,
}

/// A document with the names of the people it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentListing {
    pub document: Document,
    pub student_name: Option<String>,
    pub staff_name: Option<String>,
}

/// Document metadata that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    /// A short name shown in the documents table.
    pub title: String,
    /// What kind of document this is.
    pub document_type: DocumentType,
    /// The original file name.
    pub file_name: String,
    /// Where the file is stored.
    pub file_url: String,
    /// The file size in bytes.
    pub file_size: Option<i64>,
    /// The student the document is about, if any.
    pub student_id: Option<StudentId>,
    /// The staff member the document is about, if any.
    pub staff_id: Option<StaffId>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: Date,
}

const DOCUMENT_COLUMNS: &str = "document.id, document.title, document.document_type, \
    document.file_name, document.file_url, document.file_size, document.student_id, \
    document.staff_id, document.uploaded_by, document.uploaded_at";

/// Create the document table.
///
/// Documents outlive the student or staff member they belong to.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS document (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            document_type TEXT NOT NULL CHECK (document_type IN
                ('contract', 'waiver', 'policy', 'form', 'certificate', 'other')),
            file_name TEXT NOT NULL,
            file_url TEXT NOT NULL,
            file_size INTEGER CHECK (file_size IS NULL OR file_size >= 0),
            student_id INTEGER,
            staff_id INTEGER,
            uploaded_by TEXT,
            uploaded_at TEXT NOT NULL,
            FOREIGN KEY(student_id) REFERENCES student(id) ON DELETE SET NULL,
            FOREIGN KEY(staff_id) REFERENCES staff(id) ON DELETE SET NULL
        );",
    )
}

/// Save new document metadata to the database.
///
/// # Errors
/// Returns [Error::EmptyField] if the title, file name or URL is blank, or
/// [Error::InvalidForeignKey] if the student or staff member does not exist.
pub fn create_document(document: NewDocument, connection: &Connection) -> Result<Document, Error> {
    for (field, value) in [
        ("Title", &document.title),
        ("File name", &document.file_name),
        ("File URL", &document.file_url),
    ] {
        if value.trim().is_empty() {
            return Err(Error::EmptyField(field));
        }
    }

    connection.execute(
        "INSERT INTO document (title, document_type, file_name, file_url, file_size, \
            student_id, staff_id, uploaded_by, uploaded_at) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            document.title,
            document.document_type,
            document.file_name,
            document.file_url,
            document.file_size,
            document.student_id,
            document.staff_id,
            document.uploaded_by,
            document.uploaded_at,
        ],
    )?;

    Ok(Document {
        id: connection.last_insert_rowid(),
        title: document.title,
        document_type: document.document_type,
        file_name: document.file_name,
        file_url: document.file_url,
        file_size: document.file_size,
        student_id: document.student_id,
        staff_id: document.staff_id,
        uploaded_by: document.uploaded_by,
        uploaded_at: document.uploaded_at,
    })
}

/// Get every document, most recently uploaded first.
pub fn get_documents(connection: &Connection) -> Result<Vec<DocumentListing>, Error> {
    connection
        .prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS}, \
                student.first_name || ' ' || student.last_name, \
                staff.first_name || ' ' || staff.last_name \
            FROM document \
            LEFT JOIN student ON student.id = document.student_id \
            LEFT JOIN staff ON staff.id = document.staff_id \
            ORDER BY document.uploaded_at DESC, document.id DESC"
        ))?
        .query_map([], |row| {
            Ok(DocumentListing {
                document: map_row_to_document(row)?,
                student_name: row.get(10)?,
                staff_name: row.get(11)?,
            })
        })?
        .map(|maybe_listing| maybe_listing.map_err(Error::from))
        .collect()
}

/// Delete a document's metadata.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the document does not exist.
pub fn delete_document(id: DocumentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM document WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("document"));
    }

    Ok(())
}

fn map_row_to_document(row: &Row) -> Result<Document, rusqlite::Error> {
    Ok(Document {
        id: row.get(0)?,
        title: row.get(1)?,
        document_type: row.get(2)?,
        file_name: row.get(3)?,
        file_url: row.get(4)?,
        file_size: row.get(5)?,
        student_id: row.get(6)?,
        staff_id: row.get(7)?,
        uploaded_by: row.get(8)?,
        uploaded_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        student::{StudentId, delete_student},
        test_utils::{get_test_connection, must_create_staff, must_create_student},
    };

    use super::{
        DocumentType, NewDocument, create_document, delete_document, get_documents,
    };

    fn new_document(title: &str, student_id: Option<StudentId>) -> NewDocument {
        NewDocument {
            title: title.to_owned(),
            document_type: DocumentType::Waiver,
            file_name: "waiver.pdf".to_owned(),
            file_url: "https://files.example/waiver.pdf".to_owned(),
            file_size: Some(20_480),
            student_id,
            staff_id: None,
            uploaded_by: Some("Front desk".to_owned()),
            uploaded_at: date!(2024 - 03 - 01),
        }
    }

    #[test]
    fn lists_documents_with_owner_names() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        let staff_member = must_create_staff("Maya", "Rivera", "maya@studio.test", &connection);
        create_document(new_document("Ana's waiver", Some(student.id)), &connection).unwrap();
        create_document(
            NewDocument {
                staff_id: Some(staff_member.id),
                document_type: DocumentType::Contract,
                uploaded_at: date!(2024 - 03 - 05),
                ..new_document("Maya's contract", None)
            },
            &connection,
        )
        .unwrap();

        let documents = get_documents(&connection).unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].document.title, "Maya's contract");
        assert_eq!(documents[0].staff_name.as_deref(), Some("Maya Rivera"));
        assert_eq!(documents[0].student_name, None);
        assert_eq!(documents[1].student_name.as_deref(), Some("Ana Lee"));
    }

    #[test]
    fn blank_title_is_rejected() {
        let connection = get_test_connection();

        let result = create_document(new_document("  ", None), &connection);

        assert_eq!(result, Err(Error::EmptyField("Title")));
    }

    #[test]
    fn unknown_student_is_rejected() {
        let connection = get_test_connection();

        let result = create_document(new_document("Waiver", Some(99)), &connection);

        assert_eq!(result, Err(Error::InvalidForeignKey));
    }

    #[test]
    fn deleting_student_keeps_their_documents() {
        let connection = get_test_connection();
        let student = must_create_student("Ana", "Lee", &connection);
        create_document(new_document("Ana's waiver", Some(student.id)), &connection).unwrap();

        delete_student(student.id, &connection).unwrap();

        let documents = get_documents(&connection).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].document.student_id, None);
    }

    #[test]
    fn delete_document_reports_missing_rows() {
        let connection = get_test_connection();
        let document = create_document(new_document("Waiver", None), &connection).unwrap();

        assert_eq!(delete_document(document.id, &connection), Ok(()));
        assert_eq!(
            delete_document(document.id, &connection),
            Err(Error::DeleteMissing("document"))
        );
    }
}
