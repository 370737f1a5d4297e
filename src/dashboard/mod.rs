//! Dashboard module
//!
//! Provides an overview page with the studio's headline numbers, the newest
//! enrollments and the next events.

mod cards;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
