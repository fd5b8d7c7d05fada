//! In-crate stand-in for a driver cursor, used by the test suites.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::row::{Column, Row, Rows};
use crate::value::{Scan, Value};

enum Outcome {
    Row(Vec<Value>),
    Fail(String),
}

pub(crate) struct TestRows {
    columns: Vec<Column>,
    pending: VecDeque<Outcome>,
    current: Option<Vec<Value>>,
    failed: Option<String>,
    close_error: Option<String>,
    closes: Rc<Cell<usize>>,
}

impl TestRows {
    pub fn new<const N: usize>(columns: [&str; N]) -> Self {
        Self {
            columns: columns.into_iter().map(Column::new).collect(),
            pending: VecDeque::new(),
            current: None,
            failed: None,
            close_error: None,
            closes: Rc::new(Cell::new(0)),
        }
    }

    pub fn row<const N: usize>(mut self, values: [Value; N]) -> Self {
        self.pending.push_back(Outcome::Row(values.into_iter().collect()));
        self
    }

    /// Inject a cursor failure after the rows queued so far.
    pub fn then_fail(mut self, message: &str) -> Self {
        self.pending.push_back(Outcome::Fail(message.into()));
        self
    }

    pub fn close_error(mut self, message: &str) -> Self {
        self.close_error = Some(message.into());
        self
    }

    /// Shared counter of `close` invocations.
    pub fn close_count(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }
}

impl Row for TestRows {
    fn columns(&self) -> Result<Vec<Column>> {
        Ok(self.columns.clone())
    }

    fn scan(&mut self, dest: &mut [&mut dyn Scan]) -> Result<()> {
        let values = self
            .current
            .as_ref()
            .ok_or_else(|| Error::driver("scan without a current row"))?;
        if dest.len() != values.len() {
            return Err(Error::ColumnCount {
                columns: values.len(),
                dests: dest.len(),
            });
        }
        for (dest, value) in dest.iter_mut().zip(values.iter().cloned()) {
            dest.scan(value)?;
        }
        Ok(())
    }
}

impl Rows for TestRows {
    fn next(&mut self) -> bool {
        if self.failed.is_some() {
            return false;
        }
        match self.pending.pop_front() {
            Some(Outcome::Row(values)) => {
                self.current = Some(values);
                true
            }
            Some(Outcome::Fail(message)) => {
                self.failed = Some(message);
                false
            }
            None => false,
        }
    }

    fn err(&self) -> Result<()> {
        match &self.failed {
            Some(message) => Err(Error::driver(message.clone())),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        match self.close_error.take() {
            Some(message) => Err(Error::driver(message)),
            None => Ok(()),
        }
    }
}
