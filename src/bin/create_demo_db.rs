use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime, macros::date, macros::time};

use studio_desk::{
    AttendanceStatus, ClassStatus, DayOfWeek, DocumentType, EventStatus, EventType,
    ExpenseStatus, NewClassSession, NewDocument, NewEvent, NewExpense, NewPayment,
    NewStaffMember, NewStudent, PaymentMethod, PaymentStatus, PaymentType, StaffRole,
    StaffStatus, StudentStatus, create_class, create_document, create_enrollment, create_event,
    create_expense, create_payment, create_staff_member, create_student, initialize_db,
    set_status,
};

/// A utility for creating a demo database for the Studio Desk server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'studio.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'studio.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating staff...");
    let instructor = create_staff_member(
        NewStaffMember {
            first_name: "Maria".to_owned(),
            last_name: "Lopez".to_owned(),
            email: "maria@studio.example".to_owned(),
            phone: Some("555-0101".to_owned()),
            role: StaffRole::Instructor,
            hire_date: date!(2021 - 02 - 01),
            salary: Some(Decimal::new(52_000, 0)),
            specialization: Some("Ballet".to_owned()),
            status: StaffStatus::Active,
        },
        &conn,
    )?;
    let owner = create_staff_member(
        NewStaffMember {
            first_name: "Sam".to_owned(),
            last_name: "Reed".to_owned(),
            email: "sam@studio.example".to_owned(),
            phone: None,
            role: StaffRole::Owner,
            hire_date: date!(2019 - 08 - 15),
            salary: None,
            specialization: None,
            status: StaffStatus::Active,
        },
        &conn,
    )?;

    println!("Creating students...");
    let mut students = Vec::new();
    for (first_name, last_name, date_of_birth, status) in [
        ("Ava", "Nguyen", date!(2014 - 05 - 12), StudentStatus::Active),
        ("Ben", "Carter", date!(2012 - 11 - 03), StudentStatus::Active),
        ("Chloe", "Diaz", date!(2015 - 01 - 27), StudentStatus::Active),
        ("Dylan", "Evans", date!(2010 - 07 - 19), StudentStatus::OnHold),
        ("Ella", "Foster", date!(2008 - 03 - 08), StudentStatus::Graduated),
    ] {
        let student = create_student(
            NewStudent {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                date_of_birth,
                email: Some(format!("{}@family.example", first_name.to_lowercase())),
                phone: None,
                emergency_contact_name: Some(format!("Parent {last_name}")),
                emergency_contact_phone: Some("555-0199".to_owned()),
                level: Some("Beginner".to_owned()),
                medical_notes: None,
                enrollment_date: today - Duration::days(90),
                status,
            },
            &conn,
        )?;
        students.push(student);
    }

    println!("Creating classes...");
    let ballet = create_class(
        NewClassSession {
            name: "Ballet I".to_owned(),
            class_type: "Ballet".to_owned(),
            level: Some("Beginner".to_owned()),
            instructor_id: Some(instructor.id),
            day_of_week: DayOfWeek::Monday,
            start_time: time!(16:00),
            end_time: time!(17:00),
            room: Some("Studio A".to_owned()),
            capacity: 3,
            tuition_fee: Some(Decimal::new(120, 0)),
            status: ClassStatus::Active,
        },
        &conn,
    )?;
    let jazz = create_class(
        NewClassSession {
            name: "Jazz Juniors".to_owned(),
            class_type: "Jazz".to_owned(),
            level: None,
            instructor_id: Some(instructor.id),
            day_of_week: DayOfWeek::Wednesday,
            start_time: time!(17:30),
            end_time: time!(18:30),
            room: Some("Studio B".to_owned()),
            capacity: 12,
            tuition_fee: Some(Decimal::new(95, 0)),
            status: ClassStatus::Active,
        },
        &conn,
    )?;

    println!("Creating enrollments and attendance...");
    for (index, student) in students.iter().take(4).enumerate() {
        let class_id = if index < 3 { ballet.id } else { jazz.id };
        create_enrollment(
            student.id,
            class_id,
            today - Duration::days(30 - index as i64),
            &conn,
        )?;
    }

    let attendance_dates: Vec<Date> = (1..=3).map(|weeks| today - Duration::weeks(weeks)).collect();
    for (date_index, date) in attendance_dates.iter().enumerate() {
        for (student_index, student) in students.iter().take(3).enumerate() {
            let status = if (date_index + student_index) % 4 == 0 {
                AttendanceStatus::Absent
            } else {
                AttendanceStatus::Present
            };
            set_status(ballet.id, student.id, *date, status, None, &conn)?;
        }
    }

    println!("Creating payments and expenses...");
    for (index, student) in students.iter().take(4).enumerate() {
        create_payment(
            NewPayment {
                student_id: student.id,
                amount: Decimal::new(12_000, 2),
                payment_date: today - Duration::days(index as i64 * 20),
                payment_method: Some(PaymentMethod::CreditCard),
                payment_type: Some(PaymentType::Tuition),
                status: if index == 3 {
                    PaymentStatus::Pending
                } else {
                    PaymentStatus::Completed
                },
                notes: None,
            },
            &conn,
        )?;
    }

    for (category, description, amount, days_ago) in [
        ("Rent", "Studio rent", Decimal::new(1_500, 0), 2),
        ("Utilities", "Power bill", Decimal::new(18_550, 2), 10),
        ("Costumes", "Recital costumes", Decimal::new(42_000, 2), 40),
    ] {
        create_expense(
            NewExpense {
                category: category.to_owned(),
                description: description.to_owned(),
                amount,
                expense_date: today - Duration::days(days_ago),
                vendor: None,
                payment_method: Some(PaymentMethod::BankTransfer),
                status: ExpenseStatus::Paid,
                notes: None,
            },
            &conn,
        )?;
    }

    println!("Creating events and documents...");
    create_event(
        NewEvent {
            name: "Spring Recital".to_owned(),
            event_type: EventType::Recital,
            event_date: today + Duration::days(21),
            start_time: Some(time!(18:00)),
            end_time: Some(time!(20:00)),
            location: Some("Town Hall".to_owned()),
            cost: Some(Decimal::new(150, 0)),
            status: EventStatus::Scheduled,
            description: None,
        },
        &conn,
    )?;
    create_event(
        NewEvent {
            name: "Tap Workshop".to_owned(),
            event_type: EventType::Workshop,
            event_date: today + Duration::days(7),
            start_time: Some(time!(10:00)),
            end_time: None,
            location: Some("Studio A".to_owned()),
            cost: None,
            status: EventStatus::Scheduled,
            description: Some("Guest teacher".to_owned()),
        },
        &conn,
    )?;

    create_document(
        NewDocument {
            title: "Liability waiver".to_owned(),
            document_type: DocumentType::Waiver,
            file_name: "waiver.pdf".to_owned(),
            file_url: "https://files.studio.example/waiver.pdf".to_owned(),
            file_size: Some(48_213),
            student_id: Some(students[0].id),
            staff_id: None,
            uploaded_by: Some(format!("{} {}", owner.first_name, owner.last_name)),
            uploaded_at: today,
        },
        &conn,
    )?;
    create_document(
        NewDocument {
            title: "Employment contract".to_owned(),
            document_type: DocumentType::Contract,
            file_name: "contract-lopez.pdf".to_owned(),
            file_url: "https://files.studio.example/contract-lopez.pdf".to_owned(),
            file_size: Some(1_204_880),
            student_id: None,
            staff_id: Some(instructor.id),
            uploaded_by: None,
            uploaded_at: today - Duration::days(3),
        },
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
