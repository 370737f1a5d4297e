//! Shortcuts for putting records in a test database.

use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::{
    Date,
    macros::{date, time},
};

use crate::{
    class::{ClassSession, ClassStatus, DayOfWeek, NewClassSession, create_class},
    db::initialize,
    enrollment::{Enrollment, create_enrollment},
    event::{Event, EventStatus, EventType, NewEvent, create_event},
    finance::{
        Expense, ExpenseStatus, NewExpense, NewPayment, Payment, PaymentMethod, PaymentStatus,
        PaymentType, create_expense, create_payment,
    },
    staff::{NewStaffMember, StaffMember, StaffRole, StaffStatus, create_staff_member},
    student::{NewStudent, Student, StudentStatus, create_student},
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    connection
}

#[track_caller]
pub(crate) fn must_create_student(
    first_name: &str,
    last_name: &str,
    connection: &Connection,
) -> Student {
    create_student(
        NewStudent {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            date_of_birth: date!(2012 - 06 - 15),
            email: None,
            phone: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            level: None,
            medical_notes: None,
            enrollment_date: date!(2024 - 01 - 08),
            status: StudentStatus::Active,
        },
        connection,
    )
    .expect("Could not create student")
}

#[track_caller]
pub(crate) fn must_create_staff(
    first_name: &str,
    last_name: &str,
    email: &str,
    connection: &Connection,
) -> StaffMember {
    create_staff_member(
        NewStaffMember {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
            phone: None,
            role: StaffRole::Instructor,
            hire_date: date!(2023 - 08 - 01),
            salary: None,
            specialization: None,
            status: StaffStatus::Active,
        },
        connection,
    )
    .expect("Could not create staff member")
}

#[track_caller]
pub(crate) fn must_create_class(name: &str, capacity: i64, connection: &Connection) -> ClassSession {
    create_class(
        NewClassSession {
            name: name.to_owned(),
            class_type: "Ballet".to_owned(),
            level: None,
            instructor_id: None,
            day_of_week: DayOfWeek::Monday,
            start_time: time!(16:00),
            end_time: time!(17:00),
            room: None,
            capacity,
            tuition_fee: None,
            status: ClassStatus::Active,
        },
        connection,
    )
    .expect("Could not create class")
}

#[track_caller]
pub(crate) fn must_enroll(
    student_id: i64,
    class_id: i64,
    enrollment_date: Date,
    connection: &Connection,
) -> Enrollment {
    create_enrollment(student_id, class_id, enrollment_date, connection)
        .expect("Could not create enrollment")
}

#[track_caller]
pub(crate) fn must_create_payment(
    student_id: i64,
    amount: Decimal,
    payment_date: Date,
    status: PaymentStatus,
    connection: &Connection,
) -> Payment {
    create_payment(
        NewPayment {
            student_id,
            amount,
            payment_date,
            payment_method: Some(PaymentMethod::Cash),
            payment_type: Some(PaymentType::Tuition),
            status,
            notes: None,
        },
        connection,
    )
    .expect("Could not create payment")
}

#[track_caller]
pub(crate) fn must_create_expense(
    amount: Decimal,
    expense_date: Date,
    connection: &Connection,
) -> Expense {
    create_expense(
        NewExpense {
            category: "Rent".to_owned(),
            description: "Studio rent".to_owned(),
            amount,
            expense_date,
            vendor: None,
            payment_method: None,
            status: ExpenseStatus::Paid,
            notes: None,
        },
        connection,
    )
    .expect("Could not create expense")
}

#[track_caller]
pub(crate) fn must_create_event(name: &str, event_date: Date, connection: &Connection) -> Event {
    create_event(
        NewEvent {
            name: name.to_owned(),
            event_type: EventType::Recital,
            event_date,
            start_time: Some(time!(18:00)),
            end_time: Some(time!(20:00)),
            location: None,
            cost: Some(dec!(150)),
            status: EventStatus::Scheduled,
            description: None,
        },
        connection,
    )
    .expect("Could not create event")
}
