//! Reports on the studio's finances, attendance and classes.

mod reports_page;
mod tables;

pub use reports_page::get_reports_page;
