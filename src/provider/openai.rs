use serde::Serialize;
use serde_json::Value;

use super::{header, json_content_type, Headers, Provider, RequestParameters};

/// Chat-completions style services (OpenAI, Mistral): bearer auth and a flat
/// system + user message list.
pub struct ChatCompletions {
    pub service: &'static str,
    pub model: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Msg<'a>; 2],
    temperature: f64,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

impl Provider for ChatCompletions {
    fn name(&self) -> &'static str {
        self.service
    }

    fn body(&self, params: &RequestParameters) -> Value {
        let req = ChatRequest {
            model: self.model,
            messages: [
                Msg { role: "system", content: &params.system_prompt },
                Msg { role: "user", content: &params.user_prompt },
            ],
            temperature: params.temperature,
        };
        serde_json::to_value(req).unwrap_or(Value::Null)
    }

    fn headers(&self, credential: &str) -> Headers {
        vec![
            header("Authorization", format!("Bearer {credential}")),
            json_content_type(),
        ]
    }
}
