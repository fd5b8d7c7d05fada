use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::value::{Arg, IntoArg, ToArg, Value};

/// An immutable SQL statement paired with its flat, ordered argument list.
///
/// Produced by [`sql`](crate::sql()), [`in_list`](crate::in_list) and
/// [`values`](crate::values); by construction the argument list never
/// contains a nested fragment.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    statement: String,
    args: Vec<Arc<dyn ToArg>>,
}

impl Fragment {
    /// A fragment with no arguments.
    ///
    /// No placeholder rewriting occurs, so literal `?` bytes are preserved.
    pub fn raw(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            args: Vec::new(),
        }
    }

    pub(crate) fn from_parts(statement: String, args: Vec<Arc<dyn ToArg>>) -> Self {
        Self { statement, args }
    }

    /// The statement text.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The flattened argument list.
    pub fn args(&self) -> &[Arc<dyn ToArg>] {
        &self.args
    }

    pub(crate) fn into_args(self) -> Vec<Arc<dyn ToArg>> {
        self.args
    }

    /// Materialise every argument through [`ToArg::to_value`].
    pub fn arg_values(&self) -> Result<Vec<Value>> {
        self.args.iter().map(|arg| arg.to_value()).collect()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement)
    }
}

impl IntoArg for Fragment {
    fn into_arg(self) -> Arg {
        Arg::Fragment(self)
    }
}
