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

use json_inplace::NodeKind;
use json_inplace::NodeRef;

mod document;
mod limits;

/// Renders a decoded tree as compact JSON, so expectations can be written as text.
pub(crate) fn render(node: NodeRef<'_, '_>) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: NodeRef<'_, '_>, out: &mut String) {
    match node.kind() {
        None => out.push_str("<empty>"),
        Some(NodeKind::String) => {
            let text = String::from_utf8_lossy(node.as_bytes());
            out.push_str(&serde_json::to_string(&text).unwrap());
        }
        Some(NodeKind::Array) => {
            out.push('[');
            for (i, child) in node.children().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_into(child, out);
            }
            out.push(']');
        }
        Some(NodeKind::Object) => {
            out.push('{');
            for (i, key) in node.children().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_into(key, out);
                out.push(':');
                render_into(key.child(), out);
            }
            out.push('}');
        }
        Some(_) => out.push_str(node.as_str().unwrap()),
    }
}

/// Sends decoder logs to the test output. Set `RUST_LOG=json_inplace=trace` to see them.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
