//! Row iteration helpers.
//!
//! [`iter`] is the foundational loop: it drives a cursor, invokes a callback
//! per row, and guarantees the cursor is released on every exit path. The
//! collecting variants [`scan`], [`scan_v`] and [`pluck`] build on it.

use crate::error::{Error, Result};
use crate::row::{Row, Rows};
use crate::value::Scan;

/// Drive `rows` to completion, invoking `f` once per available row.
///
/// The cursor's `close` runs exactly once, on every exit path. A close
/// failure alone surfaces as a close error; a close failure after an earlier
/// error surfaces both, joined, so neither is lost.
pub fn iter<R: Rows>(mut rows: R, mut f: impl FnMut(&mut R) -> Result<()>) -> Result<()> {
    let result = drive(&mut rows, &mut f);
    match (result, rows.close()) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close)) => Err(Error::Close(Box::new(close))),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close)) => Err(err.join(Error::Close(Box::new(close)))),
    }
}

fn drive<R: Rows>(rows: &mut R, f: &mut impl FnMut(&mut R) -> Result<()>) -> Result<()> {
    while rows.next() {
        rows.err()?;
        f(rows)?;
    }
    rows.err()
}

/// Collect every row into a fresh `V`, one heap allocation per row.
///
/// `per_row` receives a zero value and the current row; on success the value
/// is kept, on failure iteration stops and the error is surfaced. A value
/// whose scan failed is never kept, even partially populated.
pub fn scan<V, R, F>(rows: R, mut per_row: F) -> Result<Vec<Box<V>>>
where
    V: Default,
    R: Rows,
    F: FnMut(&mut V, &mut dyn Row) -> Result<()>,
{
    let mut out = Vec::new();
    iter(rows, |rows| {
        let mut v = Box::new(V::default());
        per_row(&mut v, rows).map_err(|err| Error::Scan(Box::new(err)))?;
        out.push(v);
        Ok(())
    })?;
    Ok(out)
}

/// [`scan`], collecting values inline instead of boxed.
pub fn scan_v<V, R, F>(rows: R, mut per_row: F) -> Result<Vec<V>>
where
    V: Default,
    R: Rows,
    F: FnMut(&mut V, &mut dyn Row) -> Result<()>,
{
    let mut out = Vec::new();
    iter(rows, |rows| {
        let mut v = V::default();
        per_row(&mut v, rows).map_err(|err| Error::Scan(Box::new(err)))?;
        out.push(v);
        Ok(())
    })?;
    Ok(out)
}

/// Collect a single-column result into a `Vec<V>`.
///
/// Takes the `Result` straight from a query call, so call sites stay flat:
/// a prior query error is returned untouched without touching the cursor.
pub fn pluck<V, R>(rows: Result<R>) -> Result<Vec<V>>
where
    V: Scan + Default,
    R: Rows,
{
    scan_v(rows?, |v, row| row.scan(&mut [v as &mut dyn Scan]))
}
