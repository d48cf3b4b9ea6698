//! Datum-identifier extraction from read-query response bodies.
//!
//! The endpoint answers a read-query with a JSON array whose first object
//! carries the datum identifier:
//!
//! ```text
//! [{"id":"0ENQG7RYQA40W17G2A2SFH8E9Q","value":"23.50",...}]
//! ```
//!
//! The structured strategy deserializes that shape and is the one to trust.
//! The positional strategy is a compatibility shim kept from the firmware
//! this library grew out of: it slices [`IDENTIFIER_LENGTH`] bytes at
//! [`IDENTIFIER_OFFSET`], which only works while the server keeps `id` as the
//! first key of the first object and never changes the identifier width. It
//! is fragile against any change in the server's encoding and is only
//! consulted when the structured parse fails.

use heapless::Vec;
use serde::Deserialize;

/// Byte offset of the identifier within the legacy body layout.
pub const IDENTIFIER_OFFSET: usize = 8;

/// Identifier width in bytes.
pub const IDENTIFIER_LENGTH: usize = 26;

#[derive(Debug, Deserialize)]
struct DataPoint<'a> {
    #[serde(borrow)]
    id: &'a str,
}

/// Pull the datum identifier out of a read-query response body.
///
/// Tries the structured parse first, then the positional shim. Returns
/// `None` when neither strategy finds an identifier; short or malformed
/// bodies never panic.
pub fn extract_identifier(body: &[u8]) -> Option<&str> {
    structured(body).or_else(|| positional(body))
}

fn structured(body: &[u8]) -> Option<&str> {
    let text = core::str::from_utf8(body).ok()?;
    let (points, _remainder): (Vec<DataPoint, 4>, usize) = serde_json_core::from_str(text).ok()?;
    points.first().map(|point| point.id)
}

fn positional(body: &[u8]) -> Option<&str> {
    let end = IDENTIFIER_OFFSET.checked_add(IDENTIFIER_LENGTH)?;
    if body.len() < end {
        return None;
    }
    core::str::from_utf8(&body[IDENTIFIER_OFFSET..end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"[{"id":"0ENQG7RYQA40W17G2A2SFH8E9Q","x":1}]"#;

    #[test]
    fn extracts_from_well_formed_body() {
        assert_eq!(
            extract_identifier(BODY),
            Some("0ENQG7RYQA40W17G2A2SFH8E9Q")
        );
    }

    #[test]
    fn structured_parse_tolerates_extra_fields() {
        let body = br#"[{"id":"0ENQG7RYQA40W17G2A2SFH8E9Q","value":"23.50","lat":"0.0"}]"#;
        assert_eq!(
            structured(body),
            Some("0ENQG7RYQA40W17G2A2SFH8E9Q")
        );
    }

    #[test]
    fn positional_shim_handles_non_json_body() {
        // Same layout, but trailing garbage that breaks the JSON parse.
        let body = br#"[{"id":"0ENQG7RYQA40W17G2A2SFH8E9Q""#;
        assert!(structured(body).is_none());
        assert_eq!(
            extract_identifier(body),
            Some("0ENQG7RYQA40W17G2A2SFH8E9Q")
        );
    }

    #[test]
    fn short_body_is_rejected_not_sliced() {
        assert_eq!(extract_identifier(b"[]"), None);
        assert_eq!(extract_identifier(b""), None);
        assert_eq!(extract_identifier(br#"[{"id":"short"}]"#), Some("short"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut body = [0xffu8; IDENTIFIER_OFFSET + IDENTIFIER_LENGTH];
        body[0] = b'[';
        assert_eq!(extract_identifier(&body), None);
    }
}
