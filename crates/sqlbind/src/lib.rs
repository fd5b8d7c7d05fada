//! # sqlbind
//!
//! Lightweight SQL helpers layered over any relational driver.
//!
//! - **Composable fragments**: `?`-placeholder statements that nest without
//!   manual placeholder bookkeeping ([`sql`], [`in_list`], [`values`])
//! - **Driver-agnostic scanning**: iterate a cursor into your own types
//!   through two small capability traits ([`Row`], [`Rows`])
//! - **Struct mapping without reflection**: `#[derive(Record)]` plus
//!   [`into_struct`]/[`from_struct`] bind columns to fields by name or tag
//! - **Value adapters**: carry any value through its binary, text or JSON
//!   encoding ([`Binary`], [`Text`], [`Json`])
//! - **Minimal magic**: no pooling, no transactions, no SQL parsing; the
//!   caller keeps every policy decision
//!
//! ## Composing statements
//!
//! ```
//! use sqlbind::{in_list, sql};
//!
//! let ids = vec![1i64, 2, 3];
//! let q = sql!("SELECT name FROM users WHERE id IN (?)", in_list(ids));
//! assert_eq!(q.statement(), "SELECT name FROM users WHERE id IN (?, ?, ?)");
//! ```
//!
//! ## Scanning rows
//!
//! ```ignore
//! use sqlbind::{FieldMatcher, Record, into_struct, scan, sql};
//!
//! #[derive(Debug, Default, Record)]
//! struct User {
//!     id: i64,
//!     first_name: String,
//! }
//!
//! let rows = sql!("SELECT id, first_name FROM users").query(&mut db)?;
//! let users = scan(rows, into_struct::<User, _>(FieldMatcher))?;
//! ```

extern crate self as sqlbind;

pub mod codec;
pub mod db;
pub mod error;
pub mod record;
pub mod row;
pub mod scan;
pub mod sql;
pub mod value;

#[cfg(test)]
pub(crate) mod mock;

pub use codec::{Binary, FromBinary, Json, Text, ToBinary};
pub use db::{Database, ExecResult};
pub use error::{Error, Result};
pub use record::{Field, FieldMatcher, Matcher, Record, TagMatcher, from_struct, into_struct};
pub use row::{Column, Row, Rows};
pub use scan::{iter, pluck, scan, scan_v};
pub use sql::{Fragment, debug_sql, in_list, sql, values};
pub use value::{Arg, IntoArg, Scan, ToArg, Value};

#[cfg(feature = "derive")]
pub use sqlbind_derive::Record;
