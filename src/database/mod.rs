//! Profile recovery database layer.
//!
//! Opens browser databases read-only through a private copy.
//!
//! # Usage
//!
//! ```no_run
//! use profile_recovery::database::Database;
//!
//! // Open a copy of a profile's history database
//! let db = Database::open_copy("Default/History").expect("failed to open database");
//!
//! // Access the underlying connection for queries
//! let conn = db.connection();
//! ```

pub mod connection;

pub use connection::Database;
