//! Value adapters bridging user codecs to the driver protocols.
//!
//! Each adapter borrows (or owns) a user value and presents it to the driver
//! as both a scan destination and a statement argument: pass `Json(&mut v)`
//! where a column should be decoded into `v`, or `Json(v)` where `v` should
//! travel as an argument. [`Text`] uses the standard `Display`/`FromStr`
//! pair; [`Binary`] uses the [`ToBinary`]/[`FromBinary`] traits below;
//! [`Json`] goes through serde.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::value::{Arg, IntoArg, Scan, ToArg, Value};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Types with a binary wire encoding.
pub trait ToBinary {
    fn to_binary(&self) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Types decodable from their binary wire encoding.
pub trait FromBinary: Sized {
    fn from_binary(data: &[u8]) -> std::result::Result<Self, BoxError>;
}

impl<T: ToBinary + ?Sized> ToBinary for &T {
    fn to_binary(&self) -> std::result::Result<Vec<u8>, BoxError> {
        (**self).to_binary()
    }
}

impl<T: ToBinary + ?Sized> ToBinary for &mut T {
    fn to_binary(&self) -> std::result::Result<Vec<u8>, BoxError> {
        (**self).to_binary()
    }
}

/// Raw column values are expected to arrive as bytes or text.
fn into_bytes(value: Value) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(b) => Ok(b),
        Value::Text(s) => Ok(s.into_bytes()),
        other => Err(Error::Mismatch {
            expected: "bytes",
            got: other.kind(),
        }),
    }
}

/// Adapter carrying a value through its binary encoding.
#[derive(Debug)]
pub struct Binary<T>(pub T);

impl<T: ToBinary + fmt::Debug + Send + Sync> ToArg for Binary<T> {
    fn to_value(&self) -> Result<Value> {
        self.0.to_binary().map(Value::Bytes).map_err(Error::Encode)
    }
}

impl<T: FromBinary> Scan for Binary<&mut T> {
    fn scan(&mut self, value: Value) -> Result<()> {
        let data = into_bytes(value)?;
        *self.0 = T::from_binary(&data).map_err(Error::Decode)?;
        Ok(())
    }
}

impl<T> IntoArg for Binary<T>
where
    Binary<T>: ToArg + 'static,
{
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

/// Adapter carrying a value through its text encoding
/// (`Display`/`FromStr`).
#[derive(Debug)]
pub struct Text<T>(pub T);

impl<T: fmt::Display + fmt::Debug + Send + Sync> ToArg for Text<T> {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::Text(self.0.to_string()))
    }
}

impl<T: FromStr> Scan for Text<&mut T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn scan(&mut self, value: Value) -> Result<()> {
        let data = into_bytes(value)?;
        let text = std::str::from_utf8(&data).map_err(Error::decode)?;
        *self.0 = text.parse().map_err(Error::decode)?;
        Ok(())
    }
}

impl<T> IntoArg for Text<T>
where
    Text<T>: ToArg + 'static,
{
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

/// Adapter carrying a value through its JSON encoding.
///
/// Typically wraps a reference to the destination structure; the argument
/// side serialises to a JSON string.
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<T: Serialize + fmt::Debug + Send + Sync> ToArg for Json<T> {
    fn to_value(&self) -> Result<Value> {
        let data = serde_json::to_string(&self.0).map_err(Error::encode)?;
        Ok(Value::Text(data))
    }
}

impl<T: DeserializeOwned> Scan for Json<&mut T> {
    fn scan(&mut self, value: Value) -> Result<()> {
        let data = into_bytes(value)?;
        *self.0 = serde_json::from_slice(&data).map_err(Error::decode)?;
        Ok(())
    }
}

impl<T> IntoArg for Json<T>
where
    Json<T>: ToArg + 'static,
{
    fn into_arg(self) -> Arg {
        Arg::Value(Arc::new(self))
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use serde::{Deserialize, Serialize};

    use super::*;

    /// Fixed-width big-endian point, as a stand-in binary codec.
    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl ToBinary for Point {
        fn to_binary(&self) -> std::result::Result<Vec<u8>, BoxError> {
            let mut out = Vec::with_capacity(8);
            out.extend_from_slice(&self.x.to_be_bytes());
            out.extend_from_slice(&self.y.to_be_bytes());
            Ok(out)
        }
    }

    impl FromBinary for Point {
        fn from_binary(data: &[u8]) -> std::result::Result<Self, BoxError> {
            if data.len() != 8 {
                return Err(format!("expected 8 bytes, got {}", data.len()).into());
            }
            Ok(Point {
                x: i32::from_be_bytes(data[..4].try_into()?),
                y: i32::from_be_bytes(data[4..].try_into()?),
            })
        }
    }

    #[test]
    fn binary_adapter_round_trips() {
        let point = Point { x: 3, y: -7 };
        let encoded = Binary(&point).to_value().unwrap();

        let mut decoded = Point::default();
        Binary(&mut decoded).scan(encoded).unwrap();

        assert_eq!(decoded, point);
    }

    #[test]
    fn binary_scan_accepts_text_losslessly() {
        struct Raw(Vec<u8>);
        impl FromBinary for Raw {
            fn from_binary(data: &[u8]) -> std::result::Result<Self, BoxError> {
                Ok(Raw(data.to_vec()))
            }
        }

        let mut raw = Raw(Vec::new());
        Binary(&mut raw).scan(Value::Text("abc".into())).unwrap();
        assert_eq!(raw.0, b"abc");
    }

    #[test]
    fn binary_scan_rejects_other_kinds() {
        let mut point = Point::default();
        let err = Binary(&mut point).scan(Value::Integer(5)).unwrap_err();
        assert_eq!(err.to_string(), "expected bytes, got integer");
    }

    #[test]
    fn text_adapter_parses_and_formats() {
        let addr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(
            Text(&addr).to_value().unwrap(),
            Value::Text("10.0.0.1".into())
        );

        let mut decoded = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        Text(&mut decoded).scan(Value::Text("192.168.0.7".into())).unwrap();
        assert_eq!(decoded, IpAddr::V4(Ipv4Addr::new(192, 168, 0, 7)));
    }

    #[test]
    fn text_scan_accepts_bytes() {
        let mut port = 0u16;
        Text(&mut port).scan(Value::Bytes(b"8080".to_vec())).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn text_scan_surfaces_parse_errors() {
        let mut port = 0u16;
        let err = Text(&mut port).scan(Value::Text("not a port".into())).unwrap_err();
        assert!(err.to_string().starts_with("failed to decode column"));
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Document {
        title: String,
        pages: Vec<i64>,
    }

    #[test]
    fn json_adapter_round_trips() {
        let doc = Document { title: "t".into(), pages: vec![1, 2, 3] };

        let encoded = Json(&doc).to_value().unwrap();
        assert_eq!(
            encoded,
            Value::Text(r#"{"title":"t","pages":[1,2,3]}"#.into())
        );

        let mut decoded = Document::default();
        Json(&mut decoded).scan(encoded).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn json_scan_accepts_bytes() {
        let mut doc = Document::default();
        Json(&mut doc)
            .scan(Value::Bytes(br#"{"title":"b","pages":[]}"#.to_vec()))
            .unwrap();
        assert_eq!(doc.title, "b");
    }

    #[test]
    fn json_scan_rejects_other_kinds() {
        let mut doc = Document::default();
        let err = Json(&mut doc).scan(Value::Real(1.5)).unwrap_err();
        assert_eq!(err.to_string(), "expected bytes, got real");
    }
}
