use std::fmt;

use bytes::Bytes;
use itertools::Itertools;
use redis::Value;
use thiserror::Error as ThisError;

use crate::command::Shape;

#[derive(Debug, ThisError, PartialEq)]
pub enum ReplyError {
    #[error("unexpected reply; expected {expected}, got {actual}")]
    UnexpectedShape { expected: Shape, actual: String },
    #[error("unexpected reply; map with an odd number of elements ({0})")]
    UnpairedMap(usize),
}

/// A reply from the store, decoded under the shape its command declared.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Nil,
    Status(String),
    Integer(i64),
    Bulk(Bytes),
    List(Vec<Reply>),
    Map(Vec<(Bytes, Bytes)>),
}

impl Reply {
    pub fn decode(value: Value, shape: Shape) -> Result<Reply, ReplyError> {
        match (shape, value) {
            (Shape::Status, Value::Okay) => Ok(Reply::Status("OK".to_string())),
            (Shape::Status, Value::Status(s)) => Ok(Reply::Status(s)),
            (Shape::Integer, Value::Int(i)) => Ok(Reply::Integer(i)),
            // ZRANK and ZREVRANK answer nil for a missing member.
            (Shape::Integer, Value::Nil) => Ok(Reply::Nil),
            (Shape::Text, Value::Nil) => Ok(Reply::Nil),
            (Shape::Text, Value::Data(data)) => Ok(Reply::Bulk(Bytes::from(data))),
            (Shape::List, Value::Bulk(items)) => items
                .into_iter()
                .map(Reply::decode_element)
                .collect::<Result<Vec<_>, _>>()
                .map(Reply::List),
            (Shape::Map, Value::Bulk(items)) => {
                if items.len() % 2 != 0 {
                    return Err(ReplyError::UnpairedMap(items.len()));
                }

                let mut pairs = Vec::with_capacity(items.len() / 2);
                for (field, value) in items.into_iter().tuples() {
                    pairs.push((bulk_bytes(field, shape)?, bulk_bytes(value, shape)?));
                }

                Ok(Reply::Map(pairs))
            }
            (expected, actual) => Err(ReplyError::UnexpectedShape {
                expected,
                actual: format!("{:?}", actual),
            }),
        }
    }

    fn decode_element(value: Value) -> Result<Reply, ReplyError> {
        match value {
            Value::Nil => Ok(Reply::Nil),
            Value::Int(i) => Ok(Reply::Integer(i)),
            Value::Data(data) => Ok(Reply::Bulk(Bytes::from(data))),
            Value::Status(s) => Ok(Reply::Status(s)),
            Value::Okay => Ok(Reply::Status("OK".to_string())),
            Value::Bulk(items) => items
                .into_iter()
                .map(Reply::decode_element)
                .collect::<Result<Vec<_>, _>>()
                .map(Reply::List),
        }
    }

    /// Nil, zero and empty strings read as a negative answer. Lists and maps always read as positive,
    /// even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Reply::Nil => false,
            Reply::Integer(i) => *i != 0,
            Reply::Status(s) => !s.is_empty(),
            Reply::Bulk(bytes) => !bytes.is_empty(),
            Reply::List(_) | Reply::Map(_) => true,
        }
    }

    fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Missing elements in an array print as nothing, e.g. `a,,c`.
            Reply::Nil => Ok(()),
            reply => write!(f, "{}", reply),
        }
    }
}

fn bulk_bytes(value: Value, shape: Shape) -> Result<Bytes, ReplyError> {
    match value {
        Value::Data(data) => Ok(Bytes::from(data)),
        Value::Status(s) => Ok(Bytes::from(s)),
        actual => Err(ReplyError::UnexpectedShape {
            expected: shape,
            actual: format!("{:?}", actual),
        }),
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Nil => f.write_str("null"),
            Reply::Status(s) => f.write_str(s),
            Reply::Integer(i) => write!(f, "{}", i),
            Reply::Bulk(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Reply::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    item.fmt_element(f)?;
                }
                Ok(())
            }
            Reply::Map(pairs) => {
                let object: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(field, value)| {
                        (
                            String::from_utf8_lossy(field).into_owned(),
                            serde_json::Value::String(String::from_utf8_lossy(value).into_owned()),
                        )
                    })
                    .collect();
                write!(f, "{}", serde_json::Value::Object(object))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(s: &str) -> Value {
        Value::Data(s.as_bytes().to_vec())
    }

    #[test]
    fn decode_status() {
        let reply = Reply::decode(Value::Okay, Shape::Status).unwrap();

        assert_eq!(reply, Reply::Status("OK".to_string()));
        assert_eq!(reply.to_string(), "OK");
        assert!(reply.is_truthy());
    }

    #[test]
    fn decode_integer_zero_is_falsy() {
        let reply = Reply::decode(Value::Int(0), Shape::Integer).unwrap();

        assert_eq!(reply, Reply::Integer(0));
        assert!(!reply.is_truthy());
    }

    #[test]
    fn decode_nil_integer_is_falsy() {
        let reply = Reply::decode(Value::Nil, Shape::Integer).unwrap();

        assert_eq!(reply, Reply::Nil);
        assert!(!reply.is_truthy());
    }

    #[test]
    fn decode_nil_text() {
        let reply = Reply::decode(Value::Nil, Shape::Text).unwrap();

        assert_eq!(reply, Reply::Nil);
        assert_eq!(reply.to_string(), "null");
        assert!(!reply.is_truthy());
    }

    #[test]
    fn decode_empty_text_is_falsy() {
        let reply = Reply::decode(data(""), Shape::Text).unwrap();

        assert!(!reply.is_truthy());
    }

    #[test]
    fn decode_list_with_nil_element() {
        let reply = Reply::decode(
            Value::Bulk(vec![data("California"), Value::Nil, data("New York")]),
            Shape::List,
        )
        .unwrap();

        assert_eq!(reply.to_string(), "California,,New York");
    }

    #[test]
    fn decode_empty_list_is_truthy() {
        let reply = Reply::decode(Value::Bulk(vec![]), Shape::List).unwrap();

        assert_eq!(reply.to_string(), "");
        assert!(reply.is_truthy());
    }

    #[test]
    fn nested_scan_reply_is_flattened() {
        let reply = Reply::decode(
            Value::Bulk(vec![
                data("0"),
                Value::Bulk(vec![data("fname"), data("Sue"), data("lname"), data("Jones")]),
            ]),
            Shape::List,
        )
        .unwrap();

        assert_eq!(reply.to_string(), "0,fname,Sue,lname,Jones");
    }

    #[test]
    fn decode_map_keeps_field_order() {
        let reply = Reply::decode(
            Value::Bulk(vec![
                data("lname"),
                data("Jones"),
                data("age"),
                data("38"),
                data("fname"),
                data("Sue \"the CTO\""),
            ]),
            Shape::Map,
        )
        .unwrap();

        assert_eq!(
            reply.to_string(),
            r#"{"lname":"Jones","age":"38","fname":"Sue \"the CTO\""}"#
        );
    }

    #[test]
    fn decode_map_with_odd_elements() {
        let err = Reply::decode(Value::Bulk(vec![data("fname")]), Shape::Map).unwrap_err();

        assert_eq!(err, ReplyError::UnpairedMap(1));
    }

    #[test]
    fn decode_wrong_shape() {
        let err = Reply::decode(data("OK"), Shape::Integer).unwrap_err();

        assert!(matches!(
            err,
            ReplyError::UnexpectedShape {
                expected: Shape::Integer,
                ..
            }
        ));
    }
}
