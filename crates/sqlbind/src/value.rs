//! Driver-facing values and the bidirectional argument/scan protocols.
//!
//! A [`Value`] is what crosses the boundary between this library and a
//! database driver: statement arguments are produced through [`ToArg`], and
//! column values are delivered to scan destinations through [`Scan`].

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sql::Fragment;

/// A dynamically typed value exchanged with the database driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Statement-argument protocol: the driver calls [`ToArg::to_value`] when the
/// statement is executed.
///
/// Conversion is deferred and fallible, so adapters that serialise on the way
/// out (e.g. [`Json`](crate::Json)) surface their encoding errors at
/// execution time rather than at composition time.
pub trait ToArg: fmt::Debug + Send + Sync {
    fn to_value(&self) -> Result<Value>;
}

/// One argument to the fragment combinator.
///
/// Plain values keep their `?` placeholder; fragments are spliced into the
/// statement text. A constructed [`Fragment`] can only ever hold the
/// [`Arg::Value`] shape, so flattening is guaranteed by the type system.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A plain statement argument.
    Value(Arc<dyn ToArg>),
    /// A nested fragment, spliced into the statement.
    Fragment(Fragment),
}

impl Arg {
    /// Wrap a value implementing [`ToArg`].
    pub fn value(v: impl ToArg + 'static) -> Self {
        Arg::Value(Arc::new(v))
    }
}

/// Conversion into an [`Arg`], used by [`sql!`](crate::sql!) and
/// [`args!`](crate::args!).
///
/// Unlike [`ToArg`] this may take ownership: borrowed strings and byte slices
/// are copied here so the resulting fragment is self-contained.
pub trait IntoArg {
    fn into_arg(self) -> Arg;
}

impl IntoArg for Arg {
    fn into_arg(self) -> Arg {
        self
    }
}

/// Scan-destination protocol: the driver delivers the raw column value
/// through [`Scan::scan`].
pub trait Scan {
    fn scan(&mut self, value: Value) -> Result<()>;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl ToArg for $ty {
            fn to_value(&self) -> Result<Value> {
                i64::try_from(*self).map(Value::Integer).map_err(|_| Error::OutOfRange {
                    value: *self as i128,
                    ty: "i64",
                })
            }
        }

        impl Scan for $ty {
            fn scan(&mut self, value: Value) -> Result<()> {
                match value {
                    Value::Integer(v) => {
                        *self = <$ty>::try_from(v).map_err(|_| Error::OutOfRange {
                            value: i128::from(v),
                            ty: stringify!($ty),
                        })?;
                        Ok(())
                    }
                    other => Err(Error::Mismatch {
                        expected: "integer",
                        got: other.kind(),
                    }),
                }
            }
        }

        impl IntoArg for $ty {
            fn into_arg(self) -> Arg {
                Arg::Value(Arc::new(self))
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_real {
    ($($ty:ty),* $(,)?) => {$(
        impl ToArg for $ty {
            fn to_value(&self) -> Result<Value> {
                Ok(Value::Real(f64::from(*self)))
            }
        }

        impl Scan for $ty {
            fn scan(&mut self, value: Value) -> Result<()> {
                match value {
                    Value::Real(v) => {
                        *self = v as $ty;
                        Ok(())
                    }
                    Value::Integer(v) => {
                        *self = v as $ty;
                        Ok(())
                    }
                    other => Err(Error::Mismatch {
                        expected: "real",
                        got: other.kind(),
                    }),
                }
            }
        }

        impl IntoArg for $ty {
            fn into_arg(self) -> Arg {
                Arg::Value(Arc::new(self))
            }
        }
    )*};
}

impl_real!(f32, f64);

impl ToArg for bool {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::Integer(i64::from(*self)))
    }
}

impl Scan for bool {
    fn scan(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Integer(0) => {
                *self = false;
                Ok(())
            }
            Value::Integer(1) => {
                *self = true;
                Ok(())
            }
            Value::Integer(v) => Err(Error::OutOfRange {
                value: i128::from(v),
                ty: "bool",
            }),
            other => Err(Error::Mismatch {
                expected: "integer",
                got: other.kind(),
            }),
        }
    }
}

impl IntoArg for bool {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

impl ToArg for String {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::Text(self.clone()))
    }
}

impl Scan for String {
    fn scan(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Text(s) => {
                *self = s;
                Ok(())
            }
            Value::Bytes(b) => {
                *self = String::from_utf8(b).map_err(Error::decode)?;
                Ok(())
            }
            other => Err(Error::Mismatch {
                expected: "text",
                got: other.kind(),
            }),
        }
    }
}

impl IntoArg for String {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

impl IntoArg for &str {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self.to_owned()))
    }
}

impl ToArg for Vec<u8> {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::Bytes(self.clone()))
    }
}

impl Scan for Vec<u8> {
    fn scan(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Bytes(b) => {
                *self = b;
                Ok(())
            }
            Value::Text(s) => {
                *self = s.into_bytes();
                Ok(())
            }
            other => Err(Error::Mismatch {
                expected: "bytes",
                got: other.kind(),
            }),
        }
    }
}

impl IntoArg for Vec<u8> {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

impl IntoArg for &[u8] {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self.to_vec()))
    }
}

impl<T: ToArg> ToArg for Option<T> {
    fn to_value(&self) -> Result<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Scan + Default> Scan for Option<T> {
    fn scan(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Null => {
                *self = None;
                Ok(())
            }
            value => {
                let mut v = T::default();
                v.scan(value)?;
                *self = Some(v);
                Ok(())
            }
        }
    }
}

impl<T: ToArg + 'static> IntoArg for Option<T> {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

impl ToArg for Value {
    fn to_value(&self) -> Result<Value> {
        Ok(self.clone())
    }
}

impl Scan for Value {
    fn scan(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }
}

impl IntoArg for Value {
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}
