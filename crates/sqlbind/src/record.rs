//! Column-to-field mapping for record types.
//!
//! [`into_struct`] synthesises a per-row scan callback for any type deriving
//! [`Record`]: columns are bound to fields by a [`Matcher`], and the binding
//! is resolved once per callback and reused for every subsequent row.
//! [`from_struct`] is the inverse, turning a record value into an argument
//! list for a fixed column order.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::{Arg, Scan};

/// Descriptor for one field of a [`Record`], emitted by the derive macro.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Field name, in declaration spelling.
    pub name: &'static str,
    /// Declaration-time metadata from `#[record(key = "value")]` attributes.
    pub tags: &'static [(&'static str, &'static str)],
}

impl Field {
    /// The tag value for `key`, if present.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// A record type whose fields can be bound to result columns.
///
/// Derive with `#[derive(Record)]`; only structs with named fields qualify,
/// anything else is rejected at compile time.
pub trait Record: Default {
    /// Field descriptors in declaration order.
    const FIELDS: &'static [Field];

    /// Mutable scan destinations for every field, in declaration order.
    fn scan_targets(&mut self) -> Vec<&mut dyn Scan>;

    /// The field at `index` (a position into [`Record::FIELDS`]) as a
    /// statement argument.
    fn arg(&self, index: usize) -> Arg;
}

/// Decides whether a result column binds to a record field.
pub trait Matcher {
    fn matches(&self, column: &str, field: &Field) -> bool;
}

/// Case-insensitive, underscore-insensitive identifier matching.
///
/// `hello_there`, `HELLO__THERE` and `HelloThere` all match a field named
/// `hello_there`; `hello` does not match `hell` (the stripped strings must
/// be the same length).
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMatcher;

impl Matcher for FieldMatcher {
    fn matches(&self, column: &str, field: &Field) -> bool {
        ident_eq(column, field.name)
    }
}

fn skip_underscores(v: &[u8], mut i: usize) -> usize {
    while i < v.len() && v[i] == b'_' {
        i += 1;
    }
    i
}

fn ident_eq(column: &str, name: &str) -> bool {
    let (column, name) = (column.as_bytes(), name.as_bytes());
    let (mut i, mut j) = (skip_underscores(column, 0), skip_underscores(name, 0));

    while i < column.len() && j < name.len() {
        if !column[i].eq_ignore_ascii_case(&name[j]) {
            return false;
        }
        i = skip_underscores(column, i + 1);
        j = skip_underscores(name, j + 1);
    }

    i == column.len() && j == name.len()
}

/// Matches fields by their tag value for `key`, taking the portion before
/// the first `,` (so a `"name,omitempty"` tag matches the column `name`).
#[derive(Debug, Clone, Copy)]
pub struct TagMatcher(pub &'static str);

impl Matcher for TagMatcher {
    fn matches(&self, column: &str, field: &Field) -> bool {
        match field.tag(self.0) {
            Some(tag) => tag.split(',').next() == Some(column),
            None => false,
        }
    }
}

fn resolve<V: Record, M: Matcher>(
    matcher: &M,
    cache: &mut HashMap<String, usize>,
    column: &str,
) -> Result<usize> {
    if let Some(&index) = cache.get(column) {
        return Ok(index);
    }

    // First match in declaration order wins; later duplicates are unreachable.
    let index = V::FIELDS
        .iter()
        .position(|field| matcher.matches(column, field))
        .ok_or_else(|| Error::FieldNotFound(column.to_owned()))?;

    cache.insert(column.to_owned(), index);
    Ok(index)
}

/// A per-row scan callback binding result columns to the fields of `V`.
///
/// Column names are resolved against `V`'s fields on first sight and cached
/// for the lifetime of the returned callback; subsequent rows reuse the
/// mapping without consulting the matcher again. Unmatched columns fail with
/// `field ".." not found`. The callback must not be shared across threads;
/// use one callback per result set shape.
pub fn into_struct<V: Record, M: Matcher>(
    matcher: M,
) -> impl FnMut(&mut V, &mut dyn Row) -> Result<()> {
    let mut cache = HashMap::new();
    move |v, row| {
        let columns = row.columns()?;

        let mut targets: Vec<Option<&mut dyn Scan>> =
            v.scan_targets().into_iter().map(Some).collect();
        let mut dest = Vec::with_capacity(columns.len());

        for column in &columns {
            let index = resolve::<V, M>(&matcher, &mut cache, column.name())?;
            let target = targets[index]
                .take()
                .ok_or_else(|| Error::FieldReused(V::FIELDS[index].name.to_owned()))?;
            dest.push(target);
        }

        row.scan(&mut dest)
    }
}

/// A function turning a `V` into an argument list in `columns` order.
///
/// Column resolution runs once, here; an unmatched column fails immediately
/// with the same error [`into_struct`] would produce. The returned function
/// only clones the mapped fields.
pub fn from_struct<V: Record, M: Matcher>(
    matcher: M,
    columns: &[&str],
) -> Result<impl Fn(&V) -> Vec<Arg> + use<V, M>> {
    let mut cache = HashMap::new();
    let mut indexes = Vec::with_capacity(columns.len());
    for column in columns {
        indexes.push(resolve::<V, M>(&matcher, &mut cache, column)?);
    }

    Ok(move |v: &V| indexes.iter().map(|&index| v.arg(index)).collect())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::mock::TestRows;
    use crate::value::{Arg, Value};
    use crate::{Record, scan, scan_v};

    #[derive(Debug, Default, PartialEq, Record)]
    struct Account {
        id: i64,
        first_name: String,
        suspended: Option<i64>,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Tagged {
        #[record(json = "id")]
        key: i64,
        #[record(json = "name,omitempty")]
        label: String,
    }

    #[test]
    fn into_struct_binds_columns_by_field_name() {
        let rows = TestRows::new(["id", "first_name", "suspended"])
            .row([Value::Integer(1), Value::Text("a".into()), Value::Null])
            .row([Value::Integer(2), Value::Text("b".into()), Value::Integer(1)]);
        let closes = rows.close_count();

        let items = scan(rows, into_struct::<Account, _>(FieldMatcher)).unwrap();

        assert_eq!(
            items,
            vec![
                Box::new(Account { id: 1, first_name: "a".into(), suspended: None }),
                Box::new(Account { id: 2, first_name: "b".into(), suspended: Some(1) }),
            ]
        );
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn into_struct_ignores_column_order() {
        let rows = TestRows::new(["first_name", "id", "suspended"])
            .row([Value::Text("a".into()), Value::Integer(1), Value::Null]);

        let items: Vec<Account> = scan_v(rows, into_struct(FieldMatcher)).unwrap();

        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].first_name, "a");
    }

    #[test]
    fn into_struct_binds_columns_by_tag() {
        let rows = TestRows::new(["id", "name"])
            .row([Value::Integer(1), Value::Text("a".into())])
            .row([Value::Integer(2), Value::Text("b".into())]);

        let items: Vec<Tagged> = scan_v(rows, into_struct(TagMatcher("json"))).unwrap();

        assert_eq!(
            items,
            vec![
                Tagged { key: 1, label: "a".into() },
                Tagged { key: 2, label: "b".into() },
            ]
        );
    }

    #[test]
    fn into_struct_unknown_column_fails() {
        let rows = TestRows::new(["nope"]).row([Value::Integer(1)]);

        let err = scan_v::<Account, _, _>(rows, into_struct(FieldMatcher)).unwrap_err();

        assert_eq!(err.to_string(), "failed to scan rows: field \"nope\" not found");
    }

    #[test]
    fn into_struct_rejects_rebinding_a_field() {
        let rows = TestRows::new(["id", "ID"])
            .row([Value::Integer(1), Value::Integer(2)]);

        let err = scan_v::<Account, _, _>(rows, into_struct(FieldMatcher)).unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to scan rows: field \"id\" bound more than once"
        );
    }

    struct CountingMatcher {
        calls: Rc<Cell<usize>>,
    }

    impl Matcher for CountingMatcher {
        fn matches(&self, column: &str, field: &Field) -> bool {
            self.calls.set(self.calls.get() + 1);
            FieldMatcher.matches(column, field)
        }
    }

    #[test]
    fn into_struct_resolves_each_column_once() {
        let rows = TestRows::new(["id", "first_name"])
            .row([Value::Integer(1), Value::Text("a".into())])
            .row([Value::Integer(2), Value::Text("b".into())])
            .row([Value::Integer(3), Value::Text("c".into())]);

        let calls = Rc::new(Cell::new(0));
        let matcher = CountingMatcher { calls: Rc::clone(&calls) };

        let items: Vec<Account> = scan_v(rows, into_struct(matcher)).unwrap();
        assert_eq!(items.len(), 3);

        // "id" hits the first field immediately; "first_name" walks past it.
        // Rows two and three must not consult the matcher at all.
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn from_struct_maps_fields_in_column_order() {
        let to_args = from_struct::<Account, _>(FieldMatcher, &["first_name", "id"]).unwrap();

        let account = Account { id: 7, first_name: "ada".into(), suspended: None };
        let args = to_args(&account);

        let values: Vec<Value> = args
            .iter()
            .map(|arg| match arg {
                Arg::Value(v) => v.to_value().unwrap(),
                Arg::Fragment(_) => unreachable!("record fields are plain values"),
            })
            .collect();
        assert_eq!(values, vec![Value::Text("ada".into()), Value::Integer(7)]);
    }

    #[test]
    fn from_struct_unknown_column_fails_eagerly() {
        let err = from_struct::<Account, _>(FieldMatcher, &["missing"]).err().unwrap();
        assert_eq!(err.to_string(), "field \"missing\" not found");
    }

    #[test]
    fn field_matcher_strips_case_and_underscores() {
        let field = |name: &'static str| Field { name, tags: &[] };

        assert!(FieldMatcher.matches("_", &field("")));
        assert!(!FieldMatcher.matches("A", &field("")));
        assert!(FieldMatcher.matches("hello_there", &field("HelloThere")));
        assert!(FieldMatcher.matches("hello__there", &field("HelloThere")));
        assert!(FieldMatcher.matches("HELLO__THERE", &field("hello_there")));
        assert!(FieldMatcher.matches("hello_there", &field("hello_there")));
        assert!(!FieldMatcher.matches("hello", &field("There")));
        assert!(!FieldMatcher.matches("hello", &field("Hell")));
    }

    #[test]
    fn tag_matcher_ignores_options_after_comma() {
        let field = Field { name: "label", tags: &[("json", "name,omitempty")] };

        assert!(TagMatcher("json").matches("name", &field));
        assert!(!TagMatcher("json").matches("name,omitempty", &field));
        assert!(!TagMatcher("json").matches("label", &field));
        assert!(!TagMatcher("db").matches("name", &field));
    }
}
