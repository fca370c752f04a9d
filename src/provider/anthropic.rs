use serde::Serialize;
use serde_json::Value;

use super::{header, json_content_type, Headers, Provider, RequestParameters};

const MODEL: &str = "claude-3-7-sonnet-20250219";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Anthropic messages API.
pub struct Claude;

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Msg<'a>; 1],
    temperature: f64,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

impl Provider for Claude {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn body(&self, params: &RequestParameters) -> Value {
        let req = MsgRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: [Msg { role: "user", content: &params.user_prompt }],
            temperature: params.temperature,
        };
        serde_json::to_value(req).unwrap_or(Value::Null)
    }

    fn headers(&self, credential: &str) -> Headers {
        vec![
            header("x-api-key", credential),
            header("anthropic-version", API_VERSION),
            json_content_type(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_shape() {
        let params = RequestParameters { temperature: 0.7, user_prompt: "hi".into(), ..Default::default() };
        assert_eq!(
            Claude.body(&params),
            json!({
                "model": "claude-3-7-sonnet-20250219",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn header_order() {
        let names: Vec<_> = Claude.headers("c").into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["x-api-key", "anthropic-version", "Content-Type"]);
    }
}
