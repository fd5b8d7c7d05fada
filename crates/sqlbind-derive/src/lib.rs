//! Derive macros for sqlbind
//!
//! Provides the `#[derive(Record)]` macro.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive the `Record` trait for a struct with named fields.
///
/// The generated impl is the type descriptor the struct mapper works from:
/// field names and tags in declaration order, mutable scan destinations, and
/// per-field argument extraction.
///
/// # Example
///
/// ```ignore
/// use sqlbind::Record;
///
/// #[derive(Default, Record)]
/// struct User {
///     id: i64,
///     #[record(json = "name,omitempty")]
///     name: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[record(key = "value", ..)]` - Attach metadata tags to a field,
///   consulted by `TagMatcher`
///
/// Every field must implement `Scan`, and `Clone` plus `ToArg` for the
/// argument side.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
