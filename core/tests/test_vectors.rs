//! Verify `parse_response` against the JSON test vectors in `test-vectors/`.
//!
//! Each case holds a raw response and either the expected parsed fields or
//! the name of the expected `ParseError` variant.

use std::collections::BTreeMap;

use wirefetch_core::{parse_response, ParseError};

/// Variant name of a `ParseError`, matching the vector file's spelling.
fn error_name(err: &ParseError) -> &'static str {
    match err {
        ParseError::StatusLineRead(_) => "StatusLineRead",
        ParseError::MalformedStatusLine(_) => "MalformedStatusLine",
        ParseError::InvalidProtocol(_) => "InvalidProtocol",
        ParseError::InvalidStatusCode { .. } => "InvalidStatusCode",
        ParseError::HeaderRead(_) => "HeaderRead",
        ParseError::MalformedHeaderLine(_) => "MalformedHeaderLine",
        ParseError::InvalidChunkSize { .. } => "InvalidChunkSize",
        ParseError::ChunkRead(_) => "ChunkRead",
        ParseError::InvalidContentLength { .. } => "InvalidContentLength",
        ParseError::BodyRead(_) => "BodyRead",
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["raw"].as_str().unwrap();
        let result = parse_response(input.as_bytes());

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error");
            continue;
        }

        let response = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected"];
        assert_eq!(
            response.status_code as u64,
            expected["status_code"].as_u64().unwrap(),
            "{name}: status_code"
        );
        assert_eq!(response.proto, expected["proto"].as_str().unwrap(), "{name}: proto");

        let expected_headers: BTreeMap<String, Vec<String>> =
            serde_json::from_value(expected["headers"].clone()).unwrap();
        let headers: BTreeMap<String, Vec<String>> = response
            .headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect();
        assert_eq!(headers, expected_headers, "{name}: headers");

        assert_eq!(
            response.body,
            expected["body"].as_str().unwrap().as_bytes(),
            "{name}: body"
        );
    }
}
