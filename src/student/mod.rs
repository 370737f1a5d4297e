//! Student records: listing, searching, enrolling new students and removing them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod students_page;

pub use core::{
    NewStudent, Student, StudentId, StudentStatus, create_student, create_student_table,
    delete_student, get_student, get_students,
};
pub use create_endpoint::create_student_endpoint;
pub use delete_endpoint::delete_student_endpoint;
pub use students_page::get_students_page;
