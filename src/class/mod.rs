//! Weekly classes, their instructors and how full they are.

mod classes_page;
mod core;
mod create_endpoint;
mod delete_endpoint;

pub use classes_page::get_classes_page;
pub use core::{
    ClassCapacity, ClassId, ClassListing, ClassSession, ClassStatus, DayOfWeek, NewClassSession,
    create_class, create_class_table, get_active_classes, get_class_capacity_and_enrollment,
    get_classes,
};
pub use create_endpoint::create_class_endpoint;
pub use delete_endpoint::delete_class_endpoint;
