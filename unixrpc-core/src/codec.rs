//! Codec for request and response serialization
//!
//! Messages travel as a single JSON object with no length prefix and no
//! delimiter. This module converts between that byte form and the in-memory
//! [`Request`] and [`Response`] types.
//!
//! # Error Handling
//!
//! Every decoding failure maps to [`Error::Codec`]: invalid UTF-8, unparsable
//! JSON, trailing bytes after the object, a missing required field, a field of
//! the wrong type, or a parameter that the value model cannot represent (such
//! as `null`). The server treats any of these as a broken connection.
//!
//! # Examples
//!
//! ```rust
//! use unixrpc_core::{codec, Request, Value};
//!
//! let request = Request::new("floor", vec![Value::from(3.7)], 1);
//! let bytes = codec::encode_request(&request).unwrap();
//!
//! let decoded = codec::decode_request(&bytes).unwrap();
//! assert_eq!(decoded, request);
//! ```

use crate::error::{Error, Result};
use crate::types::{Request, Response};
use serde::{Deserialize, Serialize};

/// Encode any serializable message to JSON bytes
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| Error::Codec(e.to_string()))
}

/// Decode JSON bytes into a specific message type
///
/// The whole slice must be one JSON value; anything after it is an error.
pub fn decode_as<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T> {
    serde_json::from_slice(data).map_err(|e| Error::Codec(e.to_string()))
}

/// Encode a request
pub fn encode_request(req: &Request) -> Result<Vec<u8>> {
    encode(req)
}

/// Encode a response
pub fn encode_response(resp: &Response) -> Result<Vec<u8>> {
    encode(resp)
}

/// Decode a request
///
/// An empty slice is reported as a codec error rather than end of stream;
/// callers handle end of stream before reaching the codec.
pub fn decode_request(data: &[u8]) -> Result<Request> {
    decode_as(data)
}

/// Decode a response
pub fn decode_response(data: &[u8]) -> Result<Response> {
    decode_as(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dispatched, ResultType, Value};

    #[test]
    fn test_encode_decode_request() {
        let req = Request::new(
            "sort",
            vec![Value::from("banana"), Value::from("apple")],
            42,
        )
        .with_param_types(["string", "string"]);
        let encoded = encode_request(&req).unwrap();
        let decoded = decode_request(&encoded).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_encode_decode_response_success() {
        let resp = Response::success(
            Dispatched::new(vec!["apple", "banana"], ResultType::StringArray),
            3,
        );
        let decoded = decode_response(&encode_response(&resp).unwrap()).unwrap();
        assert_eq!(decoded, resp);
        assert!(decoded.is_success());
    }

    #[test]
    fn test_encode_decode_response_error() {
        let resp = Response::failure("Error executing method: unknown method: x", 99);
        let decoded = decode_response(&encode_response(&resp).unwrap()).unwrap();
        assert_eq!(decoded, resp);
        assert!(decoded.results.is_none());
        assert!(decoded.result_type.is_none());
    }

    #[test]
    fn test_round_trip_preserves_unicode_and_fractions() {
        let req = Request::new(
            "mixed",
            vec![
                Value::from("héllo 🌍"),
                Value::from(0.1),
                Value::from(-7.0),
                Value::from(false),
                Value::Sequence(vec![Value::from("x"), Value::Sequence(vec![])]),
            ],
            -5,
        );
        let decoded = decode_request(&encode_request(&req).unwrap()).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_decode_request_from_wire_text() {
        let wire = br#"{"method": "nroot", "params": [2, 9], "param_types": ["int", "int"], "id": 3}"#;
        let req = decode_request(wire).unwrap();
        assert_eq!(req.method, "nroot");
        assert_eq!(req.params, vec![Value::Number(2.0), Value::Number(9.0)]);
        assert_eq!(req.id, 3);
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = decode_request(b"{not json");
        assert!(matches!(result, Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(matches!(decode_request(b""), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_truncated_message() {
        let full = encode_request(&Request::new("reverse", vec![Value::from("abc")], 1)).unwrap();
        let truncated = &full[..full.len() - 3];
        assert!(matches!(decode_request(truncated), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_rejects_two_concatenated_messages() {
        let one = encode_request(&Request::new("floor", vec![Value::from(1.5)], 1)).unwrap();
        let mut two = one.clone();
        two.extend_from_slice(&one);
        assert!(matches!(decode_request(&two), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_wrong_field_type() {
        let wire = br#"{"method": 5, "params": [], "id": 1}"#;
        assert!(matches!(decode_request(wire), Err(Error::Codec(_))));
        let wire = br#"{"method": "floor", "params": "3.7", "id": 1}"#;
        assert!(matches!(decode_request(wire), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_null_param() {
        let wire = br#"{"method": "floor", "params": [null], "id": 1}"#;
        assert!(matches!(decode_request(wire), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_null_lists_as_empty() {
        let wire = br#"{"method":"sort","params":null,"param_types":null,"id":1}"#;
        let request = decode_request(wire).unwrap();
        assert_eq!(request.method, "sort");
        assert!(request.params.is_empty());
        assert!(request.param_types.is_empty());
        assert_eq!(request.id, 1);
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let wire = b"{\"method\": \"\xff\", \"id\": 1}";
        assert!(matches!(decode_request(wire), Err(Error::Codec(_))));
    }

    #[test]
    fn test_decode_response_missing_id() {
        let wire = br#"{"results": 3, "result_type": "int"}"#;
        assert!(matches!(decode_response(wire), Err(Error::Codec(_))));
    }
}
