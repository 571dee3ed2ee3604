use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::OutlineCache;
use crate::config::Config;
use crate::extract::extract_with;
use crate::format;
use crate::track::{evaluate, positions_from_json};
use crate::types::Outline;

/// MCP server over stdio. Two tools:
/// - `toc_outline` → headings of a markdown document
/// - `toc_active`  → heading active for a set of anchor positions
pub fn run(config: &Config) -> io::Result<()> {
    let cache = OutlineCache::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, None, -32700, &format!("parse error: {e}"))?;
                continue;
            }
        };

        // Notifications have no id — silently drop them per JSON-RPC spec
        if req.id.is_none() {
            continue;
        }

        let response = handle_request(&req, config, &cache);
        serde_json::to_writer(&mut stdout, &response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    Ok(())
}

#[derive(Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

fn handle_request(req: &JsonRpcRequest, config: &Config, cache: &OutlineCache) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "tocsync",
                    "version": env!("CARGO_PKG_VERSION")
                }
            })),
            error: None,
        },

        "tools/list" => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "tools": tool_definitions()
            })),
            error: None,
        },

        "tools/call" => handle_tool_call(req, config, cache),

        "ping" => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({})),
            error: None,
        },

        _ => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: format!("method not found: {}", req.method),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Tool dispatch
// ---------------------------------------------------------------------------

/// Execute a tool by name with the given arguments. Returns formatted output or error string.
pub(crate) fn dispatch_tool(
    tool: &str,
    args: &Value,
    config: &Config,
    cache: &OutlineCache,
) -> Result<String, String> {
    match tool {
        "toc_outline" => tool_outline(args, config, cache),
        "toc_active" => tool_active(args, config, cache),
        _ => Err(format!("unknown tool: {tool}")),
    }
}

fn tool_outline(args: &Value, config: &Config, cache: &OutlineCache) -> Result<String, String> {
    let outline = resolve_outline(args, config, cache)?;
    let as_json = args.get("format").and_then(|v| v.as_str()) == Some("json");

    if as_json {
        Ok(format::render_json(&outline, None).to_string())
    } else {
        Ok(format::render_text(&outline, None))
    }
}

fn tool_active(args: &Value, config: &Config, cache: &OutlineCache) -> Result<String, String> {
    let outline = resolve_outline(args, config, cache)?;
    let positions = args.get("positions")
        .ok_or("missing required parameter: positions")?;
    let positions = positions_from_json(positions).map_err(|e| e.to_string())?;
    let offset = args.get("offset").and_then(Value::as_f64)
        .unwrap_or(config.trigger_offset);

    let active = evaluate(&outline, &positions, offset);
    Ok(serde_json::json!({ "active": active }).to_string())
}

/// Outline from inline `content`, or from the file at `path` via the cache.
fn resolve_outline(args: &Value, config: &Config, cache: &OutlineCache) -> Result<Outline, String> {
    if let Some(content) = args.get("content").and_then(|v| v.as_str()) {
        return Ok(extract_with(content, &config.slug));
    }
    let path_str = args.get("path").and_then(|v| v.as_str())
        .ok_or("missing required parameter: content or path")?;
    let path = PathBuf::from(path_str);
    let outline = crate::read::outline_file(&path, &config.slug, cache)
        .map_err(|e| e.to_string())?;
    Ok(outline.as_ref().clone())
}

// ---------------------------------------------------------------------------
// MCP tool call handler
// ---------------------------------------------------------------------------

fn handle_tool_call(req: &JsonRpcRequest, config: &Config, cache: &OutlineCache) -> JsonRpcResponse {
    let params = &req.params;
    let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let args = params.get("arguments").unwrap_or(&Value::Null);

    let result = dispatch_tool(tool_name, args, config, cache);

    match result {
        Ok(output) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: Some(serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": output
                }]
            })),
            error: None,
        },
        Err(e) => {
            log::debug!("tool {tool_name} failed: {e}");
            JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: Some(serde_json::json!({
                    "content": [{
                        "type": "text",
                        "text": e
                    }],
                    "isError": true
                })),
                error: None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tool definitions
// ---------------------------------------------------------------------------

fn tool_definitions() -> Vec<Value> {
    vec![
        serde_json::json!({
            "name": "toc_outline",
            "description": "Extract the table of contents of a markdown document. Headings inside fenced blocks, inline code and indented code are ignored. Each entry has an anchor id, display text and level (1-6).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "Markdown text. Takes precedence over `path`."
                    },
                    "path": {
                        "type": "string",
                        "description": "Path to a markdown file."
                    },
                    "format": {
                        "type": "string",
                        "enum": ["text", "json"],
                        "default": "text",
                        "description": "text: indented list with anchors. json: {headings, active}."
                    }
                }
            }
        }),
        serde_json::json!({
            "name": "toc_active",
            "description": "Determine which heading is current for a scroll position: the last heading, in document order, whose anchor is within `offset` of the viewport top. Returns {\"active\": id | null}.",
            "inputSchema": {
                "type": "object",
                "required": ["positions"],
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "Markdown text. Takes precedence over `path`."
                    },
                    "path": {
                        "type": "string",
                        "description": "Path to a markdown file."
                    },
                    "positions": {
                        "type": "object",
                        "additionalProperties": { "type": ["number", "null"] },
                        "description": "Heading id -> distance of its anchor from the viewport top. Missing or null ids are skipped."
                    },
                    "offset": {
                        "type": "number",
                        "description": "Trigger line distance from the viewport top. Default from config (120)."
                    }
                }
            }
        }),
    ]
}

fn write_error(w: &mut impl Write, id: Option<Value>, code: i32, msg: &str) -> io::Result<()> {
    let resp = JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: msg.into(),
        }),
    };
    serde_json::to_writer(&mut *w, &resp)?;
    w.write_all(b"\n")?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(tool: &str, args: Value) -> Result<String, String> {
        dispatch_tool(tool, &args, &Config::default(), &OutlineCache::new())
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            _jsonrpc: "2.0".into(),
            id: Some(serde_json::json!(1)),
            method: method.into(),
            params,
        }
    }

    #[test]
    fn outline_from_content() {
        let out = call("toc_outline", serde_json::json!({
            "content": "# A\n```\n# B\n```\n## C\n",
            "format": "json"
        })).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["headings"].as_array().unwrap().len(), 2);
        assert_eq!(v["headings"][1]["id"], "c");
    }

    #[test]
    fn active_from_positions() {
        let out = call("toc_active", serde_json::json!({
            "content": "# A\n## B\n## C\n",
            "positions": {"a": -30, "b": 90, "c": 500}
        })).unwrap();
        assert_eq!(out, r#"{"active":"b"}"#);
    }

    #[test]
    fn active_respects_offset_override() {
        let out = call("toc_active", serde_json::json!({
            "content": "# A\n",
            "positions": {"a": 150},
            "offset": 200
        })).unwrap();
        assert_eq!(out, r#"{"active":"a"}"#);
    }

    #[test]
    fn active_none_is_null() {
        let out = call("toc_active", serde_json::json!({
            "content": "# A\n",
            "positions": {"a": 500}
        })).unwrap();
        assert_eq!(out, r#"{"active":null}"#);
    }

    #[test]
    fn missing_arguments_reported() {
        assert!(call("toc_outline", Value::Null).unwrap_err().contains("content or path"));
        let err = call("toc_active", serde_json::json!({ "content": "# A" })).unwrap_err();
        assert!(err.contains("positions"));
        assert!(call("toc_nope", Value::Null).unwrap_err().contains("unknown tool"));
    }

    #[test]
    fn tool_errors_are_tool_results() {
        let req = request("tools/call", serde_json::json!({
            "name": "toc_outline",
            "arguments": { "path": "/definitely/not/here.md" }
        }));
        let resp = handle_request(&req, &Config::default(), &OutlineCache::new());
        assert!(resp.error.is_none());
        assert_eq!(resp.result.unwrap()["isError"], true);
    }

    #[test]
    fn unknown_method() {
        let req = request("resources/list", Value::Null);
        let resp = handle_request(&req, &Config::default(), &OutlineCache::new());
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[test]
    fn lists_both_tools() {
        let names: Vec<String> = tool_definitions()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["toc_outline", "toc_active"]);
    }
}
