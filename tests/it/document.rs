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

use json_inplace::decode_inplace;
use json_inplace::NodeKind;
use json_inplace::Number;
use json_inplace::NumberKind;

use crate::render;

#[test]
fn test_nested_array() {
    let mut buf = br#"["One", ["Two", "Three"]]"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();

    assert!(root.is_array());
    assert_eq!(root.len(), 2);
    assert_eq!(root.get(0).as_str(), Some("One"));

    let inner = root.get(1);
    assert!(inner.is_array());
    assert_eq!(inner.len(), 2);
    let texts: Vec<_> = inner.children().map(|n| n.as_str().unwrap()).collect();
    assert_eq!(texts, vec!["Two", "Three"]);

    assert_eq!(doc.node_count(), 5);
    assert_eq!(doc.iter().len(), 2);
}

#[test]
fn test_object_lookup() {
    let mut buf = br#"{"One":1}"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();

    let one = root.get("One");
    assert!(one.is_number());
    assert!(one.is_unsigned_integral());
    assert_eq!(one.number_kind(), Some(NumberKind::UnsignedIntegral));
    assert_eq!(one.to_u64(), Some(1));
    assert_eq!(one.to_integer::<u8>(), Some(1));

    // Out of range: the empty handle, not an error and not null.
    let missing = root.get(1);
    assert!(missing.is_empty());
    assert!(!missing.is_null());
    assert_eq!(missing.kind(), None);

    // By position an object yields its key node.
    let key = root.get(0);
    assert!(key.is_key());
    assert!(key.is_string());
    assert_eq!(key.as_bytes(), b"One");
    assert_eq!(key.child(), one);
    assert_eq!(key.len(), 1);
}

#[test]
fn test_empty_vs_null() {
    let mut buf = br#"{"a": null}"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();

    let present = root.get("a");
    assert!(present.is_null());
    assert!(!present.is_empty());

    let absent = root.get("b");
    assert!(absent.is_empty());
    assert!(!absent.is_null());

    // Lookups on the empty handle chain without checks.
    let deep = absent.get("c").get(3).child();
    assert!(deep.is_empty());
    assert_eq!(deep.len(), 0);
    assert_eq!(deep.as_bytes(), b"");
    assert_eq!(deep.as_str(), None);
    assert_eq!(deep.children().count(), 0);
    assert_eq!(render(deep), "<empty>");
}

#[test]
fn test_key_lookup_is_object_only() {
    let mut buf = br#"["a", {"a": 1}]"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();
    assert!(root.get("a").is_empty());
    assert_eq!(root.get(1).get("a").to_i64(), Some(1));

    let key = String::from("a");
    assert_eq!(root.get(1).get(&key).to_i64(), Some(1));
    assert_eq!(root.get(1).get(key).to_i64(), Some(1));
}

#[test]
fn test_duplicate_keys() {
    let mut buf = br#"{"k": 1, "k": 2}"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();
    assert_eq!(root.len(), 2);
    assert_eq!(root.get("k").to_u64(), Some(1));
    let values: Vec<_> = root.entries().map(|(_, v)| v.to_u64().unwrap()).collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn test_entries() {
    let mut buf = br#"{"name": "x\"y", "list": [1, 2, 3], "flag": false}"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();

    let keys: Vec<_> = root.entries().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![&b"name"[..], &b"list"[..], &b"flag"[..]]);
    assert_eq!(root.entries().len(), 3);

    assert_eq!(root.get("name").as_bytes(), b"x\"y");
    assert_eq!(root.get("list").children().len(), 3);
    assert_eq!(root.get("flag").as_bool(), Some(false));
    assert!(root.get("flag").is_boolean());
    assert!(root.get("flag").is_false());

    // Only objects have entries.
    assert_eq!(root.get("list").entries().count(), 0);
}

#[test]
fn test_kinds() {
    let mut buf = br#"[null, true, false, "s", 1, -1, 1.5, [], {}]"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let kinds: Vec<_> = doc.iter().map(|n| n.kind().unwrap()).collect();
    assert_eq!(kinds, vec![
        NodeKind::Null,
        NodeKind::True,
        NodeKind::False,
        NodeKind::String,
        NodeKind::Number,
        NodeKind::Number,
        NodeKind::Number,
        NodeKind::Array,
        NodeKind::Object,
    ]);

    let root = doc.root();
    assert!(root.get(1).is_true());
    assert!(!root.get(3).is_key());
    assert!(root.get(5).is_signed_integral());
    assert!(root.get(5).is_integral());
    assert!(root.get(6).is_floating_point());
    assert!(!root.get(6).is_integral());
    assert_eq!(root.get(3).number_kind(), None);
    assert!(!root.get(7).has_children());
    assert!(root.has_children());
    assert_eq!(root.get(7).as_bytes(), b"");
}

#[test]
fn test_number_conversions() {
    let mut buf =
        br#"[255, 256, -129, 18446744073709551615, 18446744073709551616, 2.5e3, 1e400, -0]"#
            .to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let root = doc.root();

    assert_eq!(root.get(0).to_integer::<u8>(), Some(255));
    assert_eq!(root.get(1).to_integer::<u8>(), None);
    assert_eq!(root.get(2).to_integer::<i8>(), None);
    assert_eq!(root.get(2).to_integer::<i16>(), Some(-129));
    assert_eq!(root.get(2).to_u64(), None);
    assert_eq!(root.get(3).to_u64(), Some(u64::MAX));
    assert_eq!(root.get(3).to_i64(), None);

    // Too large for 64 bits: still a valid node, only the integer conversion fails.
    assert!(root.get(4).is_unsigned_integral());
    assert_eq!(root.get(4).to_u64(), None);
    assert_eq!(root.get(4).to_f64(), Some(18446744073709551616.0));

    assert_eq!(root.get(5).to_f64(), Some(2500.0));
    assert_eq!(root.get(5).to_i64(), None);
    assert_eq!(root.get(6).to_f64(), None);
    assert_eq!(root.get(7).to_i64(), Some(0));
    assert!(root.get(7).is_signed_integral());
    // Negative zero still fits unsigned targets.
    assert_eq!(root.get(7).to_u64(), Some(0));
    assert_eq!(root.get(7).to_integer::<u8>(), Some(0));
    assert_eq!(root.get(7).to_number(), Some(Number::Int64(0)));

    // Non-numbers never convert.
    assert_eq!(doc.root().to_f64(), None);
    assert_eq!(doc.root().to_number(), None);
}

#[test]
fn test_pre_order_nodes() {
    let mut buf = br#"{"a": [1, true], "b": "c"}"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let texts: Vec<_> = doc
        .nodes()
        .map(|n| String::from_utf8_lossy(n.as_bytes()).into_owned())
        .collect();
    assert_eq!(texts, vec!["", "a", "", "1", "true", "b", "c"]);
    let keys = doc.nodes().filter(|n| n.is_key()).count();
    assert_eq!(keys, 2);
}

#[test]
fn test_source_is_compacted() {
    let mut buf = br#"["a\u0041b", "tail"]"#.to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    assert_eq!(doc.root().get(0).as_bytes(), b"aAb");
    assert_eq!(doc.root().get(1).as_bytes(), b"tail");
    // Decoded text was written right after the opening quote.
    assert_eq!(&doc.source()[..5], b"[\"aAb");
}

#[test]
fn test_debug_and_equality() {
    let mut buf1 = br#"{"a": [1, "x"], "b": null}"#.to_vec();
    let mut buf2 = br#"{ "a" : [ 1 , "x" ] , "b" : null }"#.to_vec();
    let doc1 = decode_inplace(&mut buf1).unwrap();
    let doc2 = decode_inplace(&mut buf2).unwrap();

    assert_eq!(doc1, doc2);
    assert_eq!(format!("{:?}", doc1.root()), r#"{"a": [1, "x"], "b": null}"#);
    assert_ne!(doc1.root(), doc1.root().get("a"));
}

#[test]
fn test_into_iterator() {
    let mut buf = b"[1, 2, 3]".to_vec();
    let doc = decode_inplace(&mut buf).unwrap();
    let mut sum = 0;
    for node in &doc {
        sum += node.to_u64().unwrap();
    }
    assert_eq!(sum, 6);
    let sum: u64 = doc.root().into_iter().filter_map(|n| n.to_u64()).sum();
    assert_eq!(sum, 6);
}
