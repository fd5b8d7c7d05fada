//! Fragment composition.
//!
//! A [`Fragment`] is a statement string plus the flat list of arguments that
//! fill its `?` placeholders. Fragments nest: passing one as an argument to
//! [`sql`] splices its text into the template and its arguments into the
//! flat list, so composed queries stay consistent without manual placeholder
//! bookkeeping.
//!
//! # Example
//!
//! ```
//! use sqlbind::{args, in_list, sql};
//!
//! let ids = vec![1i64, 2, 3];
//! let q = sql(
//!     "SELECT name FROM users WHERE id IN (?) AND active = ?",
//!     args![in_list(ids), true],
//! );
//! assert_eq!(
//!     q.statement(),
//!     "SELECT name FROM users WHERE id IN (?, ?, ?) AND active = ?"
//! );
//! assert_eq!(q.args().len(), 4);
//! ```

mod builder;
mod debug;
mod fragment;


pub use builder::{in_list, sql, values};
pub use debug::debug_sql;
pub use fragment::Fragment;

/// Build a [`Fragment`] from a template and a variadic argument list.
///
/// Each argument goes through [`IntoArg`](crate::IntoArg), so plain values,
/// adapters and nested fragments can be mixed freely.
#[macro_export]
macro_rules! sql {
    ($stmt:expr $(,)?) => {
        $crate::sql::sql($stmt, ::std::vec::Vec::new())
    };
    ($stmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::sql::sql($stmt, ::std::vec![$($crate::IntoArg::into_arg($arg)),+])
    };
}

/// [`sql!`] with the caller's source location prepended as an SQL comment.
#[macro_export]
macro_rules! debug_sql {
    ($stmt:expr $(,)?) => {
        $crate::sql::debug_sql($stmt, ::std::vec::Vec::new())
    };
    ($stmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::sql::debug_sql($stmt, ::std::vec![$($crate::IntoArg::into_arg($arg)),+])
    };
}

/// Build a `Vec<Arg>` from a variadic value list.
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::IntoArg::into_arg($arg)),+]
    };
}
