/// The integer primary key of a row in the studio database.
pub type DatabaseId = i64;
