//! Staff members: instructors, assistants, admins and owners.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod staff_page;

pub use core::{
    NewStaffMember, StaffId, StaffMember, StaffRole, StaffStatus, create_staff_member,
    create_staff_table, get_instructors, get_staff,
};
pub use create_endpoint::create_staff_endpoint;
pub use delete_endpoint::delete_staff_endpoint;
pub use staff_page::get_staff_page;
