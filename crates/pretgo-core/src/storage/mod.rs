//! Read access to the loan application's SQLite database.

pub mod connection;
pub mod people;

pub use connection::ConnectionPool;
pub use people::{PeopleQuery, SEARCH_LIMIT};
