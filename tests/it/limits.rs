// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use json_inplace::is_valid;
use json_inplace::is_valid_with;
use json_inplace::Decoder;
use json_inplace::DecoderOptions;
use json_inplace::ParseErrorCode;
use json_inplace::DEFAULT_DEPTH_LIMIT;

use crate::init_tracing;

const NESTED: &str = r#"{"One":1,"Two":{"TwoTwo":22,"ThreeThree":33}}"#;

#[test]
fn test_depth_limit() {
    init_tracing();

    assert!(is_valid(r#"["One"]"#));
    assert!(is_valid_with(r#"["One"]"#, 1, 99));
    assert!(!is_valid_with(r#"["One"]"#, 0, 99));

    assert!(is_valid_with(r#"["One", "Two"]"#, 1, 99));
    assert!(!is_valid_with(r#"["One", "Two"]"#, 0, 99));

    assert!(is_valid(NESTED));
    assert!(is_valid_with(NESTED, 2, 99));
    assert!(!is_valid_with(NESTED, 1, 99));

    // Scalars and empty containers fit at depth 0.
    assert!(is_valid_with("1", 0, 99));
    assert!(is_valid_with("[]", 0, 99));
    assert!(is_valid_with("{}", 0, 99));
}

#[test]
fn test_depth_limit_error() {
    init_tracing();

    let mut buf = br#"["One"]"#.to_vec();
    let err = Decoder::new()
        .set_depth_limit(0)
        .decode_inplace(&mut buf)
        .unwrap_err();
    assert_eq!(err.code(), Some(ParseErrorCode::DepthLimitExceeded));
    assert_eq!(err.to_string(), "depth limit exceeded, pos 1");

    let mut buf = br#"{"a": {"b": [ 1 ]}}"#.to_vec();
    let err = Decoder::new()
        .set_depth_limit(2)
        .decode_inplace(&mut buf)
        .unwrap_err();
    assert_eq!(err.to_string(), "depth limit exceeded, pos 14");
    assert!(err.code().unwrap().is_limit());
}

#[test]
fn test_deep_nesting_is_an_error() {
    // The outermost array sits at depth 0, so the limit admits one more level.
    let depth = DEFAULT_DEPTH_LIMIT as usize + 1;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert!(is_valid(&text));

    let depth = DEFAULT_DEPTH_LIMIT as usize + 2;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert!(!is_valid(&text));

    // Far deeper than any stack could recurse: rejected at the limit.
    let text = "[".repeat(1_000_000);
    let mut buf = text.into_bytes();
    let err = Decoder::new().decode_inplace(&mut buf).unwrap_err();
    assert_eq!(err.code(), Some(ParseErrorCode::DepthLimitExceeded));
    assert_eq!(err.position(), Some(DEFAULT_DEPTH_LIMIT as usize + 1));
}

#[test]
fn test_raised_depth_limit_with_large_stack() {
    let depth = 10_000;
    let handle = std::thread::Builder::new()
        .stack_size(256 << 20)
        .spawn(move || {
            let mut decoder = Decoder::new();
            decoder.set_depth_limit(depth as u16);

            let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
            let mut buf = text.into_bytes();
            assert_eq!(decoder.decode_inplace(&mut buf).unwrap().node_count(), depth);

            // The limit still trips before recursion goes any deeper.
            let mut buf = "[".repeat(60_000).into_bytes();
            let err = decoder.decode_inplace(&mut buf).unwrap_err();
            assert_eq!(err.code(), Some(ParseErrorCode::DepthLimitExceeded));
            assert_eq!(err.position(), Some(depth + 1));
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn test_node_limit() {
    init_tracing();

    // The array and its string.
    assert!(is_valid_with(r#"["One"]"#, 99, 2));
    assert!(!is_valid_with(r#"["One"]"#, 99, 1));

    assert!(is_valid_with(r#"["One", "Two"]"#, 99, 3));
    assert!(!is_valid_with(r#"["One", "Two"]"#, 99, 2));

    // Keys count as nodes: 1 root + 2 keys + 1 value + 1 object + 2 keys + 2 values.
    assert!(is_valid_with(NESTED, 99, 9));
    assert!(!is_valid_with(NESTED, 99, 8));

    assert!(!is_valid_with("null", 99, 0));
}

#[test]
fn test_node_limit_error() {
    let mut buf = br#"[1, "two", 3]"#.to_vec();
    let err = Decoder::new()
        .set_node_limit(2)
        .decode_inplace(&mut buf)
        .unwrap_err();
    assert_eq!(err.to_string(), "node limit exceeded, pos 4");

    let mut buf = br#"{"a": 1, "b": 2}"#.to_vec();
    let err = Decoder::new()
        .set_node_limit(3)
        .decode_inplace(&mut buf)
        .unwrap_err();
    assert_eq!(err.to_string(), "node limit exceeded, pos 9");
}

#[test]
fn test_decoder_reuse() {
    let options = DecoderOptions::from_json_str(r#"{"depth_limit": 1, "node_limit": 4}"#).unwrap();
    let mut decoder = Decoder::with_options(options);

    let mut buf = b"[1, 2, 3]".to_vec();
    assert_eq!(decoder.decode_inplace(&mut buf).unwrap().node_count(), 4);

    let mut buf = b"[1, 2, 3, 4]".to_vec();
    let err = decoder.decode_inplace(&mut buf).unwrap_err();
    assert_eq!(err.code(), Some(ParseErrorCode::NodeLimitExceeded));
    assert_eq!(decoder.byte_position(), 10);

    let mut buf = b"[[]]".to_vec();
    assert!(decoder.decode_inplace(&mut buf).is_ok());
    let mut buf = b"[[1]]".to_vec();
    assert!(decoder.decode_inplace(&mut buf).is_err());
}
