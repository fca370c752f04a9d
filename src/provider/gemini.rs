use serde::Serialize;
use serde_json::Value;

use super::{json_content_type, Headers, Provider, RequestParameters};

const STOP_SEQUENCES: &[&str] = &["Title"];
const MAX_OUTPUT_TOKENS: u32 = 1024;
const TOP_P: f64 = 0.8;
const TOP_K: u32 = 10;

/// `generateContent` API. The key travels in the query string.
pub struct Gemini;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    stop_sequences: &'static [&'static str],
    temperature: f64,
    max_output_tokens: u32,
    top_p: f64,
    top_k: u32,
}

impl Provider for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn body(&self, params: &RequestParameters) -> Value {
        let req = GenerateRequest {
            contents: [Content { parts: [Part { text: &params.user_prompt }] }],
            generation_config: GenerationConfig {
                stop_sequences: STOP_SEQUENCES,
                temperature: params.temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };
        serde_json::to_value(req).unwrap_or(Value::Null)
    }

    fn headers(&self, _credential: &str) -> Headers {
        vec![json_content_type()]
    }

    fn url(&self, endpoint: &str, credential: &str) -> String {
        format!("{endpoint}?key={credential}")
    }
}
