use std::sync::Arc;

use super::Fragment;
use crate::value::{Arg, IntoArg, ToArg};

/// Compose a statement from a template and its arguments, splicing any
/// argument that is itself a [`Fragment`].
///
/// Each argument claims the next `?` in the template, left to right. A plain
/// value keeps its `?` and joins the argument list; a fragment replaces the
/// `?` with its own statement text and contributes its arguments in place.
/// Arguments left over once the template runs out of `?` are dropped;
/// template text left over once the arguments run out (including further
/// literal `?`) is kept verbatim.
///
/// This runs on hot paths: a single pass over the template with both output
/// buffers sized up front.
pub fn sql(stmt: impl Into<String>, args: Vec<Arg>) -> Fragment {
    let stmt = stmt.into();
    if args.is_empty() {
        return Fragment::raw(stmt);
    }

    let mut stmt_size = stmt.len();
    let mut args_size = args.len();
    for arg in &args {
        if let Arg::Fragment(sub) = arg {
            stmt_size += sub.statement().len();
            args_size += sub.args().len();
        }
    }

    let mut statement = String::with_capacity(stmt_size);
    let mut flat: Vec<Arc<dyn ToArg>> = Vec::with_capacity(args_size);

    let mut end = 0;
    for arg in args {
        let Some(idx) = stmt[end..].find('?') else {
            break;
        };
        let start = end;
        end += idx + 1;

        match arg {
            Arg::Fragment(sub) => {
                statement.push_str(&stmt[start..end - 1]);
                statement.push_str(sub.statement());
                flat.extend(sub.into_args());
            }
            Arg::Value(value) => {
                statement.push_str(&stmt[start..end]);
                flat.push(value);
            }
        }
    }
    statement.push_str(&stmt[end..]);

    Fragment::from_parts(statement, flat)
}

/// Placeholders for an SQL `IN` clause: one `?` per item, `", "`-separated.
///
/// Empty input yields an empty fragment. Items that are fragments are
/// spliced, so a list of subqueries renders as the subqueries themselves.
pub fn in_list<I>(items: I) -> Fragment
where
    I: IntoIterator,
    I::Item: IntoArg,
{
    let args: Vec<Arg> = items.into_iter().map(IntoArg::into_arg).collect();
    if args.is_empty() {
        return Fragment::default();
    }

    let mut stmt = String::with_capacity(args.len() * 3 - 2);
    stmt.push('?');
    for _ in 1..args.len() {
        stmt.push_str(", ?");
    }

    sql(stmt, args)
}

/// Row groups for an SQL `VALUES` clause: `(?, ?), (?, ?), ..`.
pub fn values<I>(rows: I) -> Fragment
where
    I: IntoIterator<Item = Vec<Arg>>,
{
    in_list(
        rows.into_iter()
            .map(|row| sql("(?)", vec![in_list(row).into_arg()])),
    )
}
