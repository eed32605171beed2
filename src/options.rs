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

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_DEPTH_LIMIT;
use crate::constants::DEFAULT_NODE_LIMIT;
use crate::error::Error;
use crate::error::Result;
use crate::parser::Decoder;

/// Resource limits and checks applied by a [`Decoder`].
///
/// Missing fields fall back to their defaults when deserialized, so the
/// options can be embedded in a host application's configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Deepest nesting level a value may sit at. The root is at depth 0,
    /// so `0` only admits scalars and empty containers.
    ///
    /// Decoding recurses once per level, using a few hundred bytes of stack
    /// each. The default fits a 2 MiB thread stack with room to spare. Limits
    /// in the thousands need a thread with a correspondingly larger stack,
    /// otherwise deep input overflows the stack before the limit trips.
    pub depth_limit: u16,
    /// Maximum number of nodes, object keys included.
    pub node_limit: u32,
    /// Reject string payloads that are not valid UTF-8 after unescaping.
    pub validate_utf8: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            node_limit: DEFAULT_NODE_LIMIT,
            validate_utf8: false,
        }
    }
}

impl DecoderOptions {
    /// Reads options from a JSON object such as
    /// `{"depth_limit": 32, "node_limit": 10000}`.
    ///
    /// Unknown keys are ignored and missing keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<DecoderOptions> {
        let mut buf = text.as_bytes().to_vec();
        let doc = Decoder::new().decode_inplace(&mut buf)?;
        let root = doc.root();
        if !root.is_object() {
            return Err(Error::InvalidOptions(format!(
                "expected an object, found {}",
                root.kind().map_or("nothing", |kind| kind.type_name())
            )));
        }

        let mut options = DecoderOptions::default();
        for (key, value) in root.entries() {
            match key {
                b"depth_limit" => {
                    options.depth_limit = value
                        .to_integer()
                        .ok_or_else(|| invalid_field("depth_limit", "an integer in 0..=65535"))?;
                }
                b"node_limit" => {
                    options.node_limit = value.to_integer().ok_or_else(|| {
                        invalid_field("node_limit", "an integer in 0..=4294967295")
                    })?;
                }
                b"validate_utf8" => {
                    options.validate_utf8 = value
                        .as_bool()
                        .ok_or_else(|| invalid_field("validate_utf8", "a boolean"))?;
                }
                _ => {}
            }
        }
        Ok(options)
    }
}

fn invalid_field(name: &str, expected: &str) -> Error {
    Error::InvalidOptions(format!("{name} must be {expected}"))
}
