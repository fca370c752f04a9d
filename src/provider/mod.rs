use serde_json::Value;

use crate::errors::DispatchError;

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub const JSON_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Ordered header list, sent as-is.
pub type Headers = Vec<(String, String)>;

/// Caller-controlled knobs threaded into every request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameters {
    pub temperature: f64,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            system_prompt: "You are a helpful assistant.".into(),
            user_prompt: "Explain how AI works in a few words.".into(),
        }
    }
}

/// A request ready to be posted.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub body: Value,
    pub headers: Headers,
}

impl RequestSpec {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || is_empty_json(&self.body)
    }
}

fn is_empty_json(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        _ => false,
    }
}

/// Wire shape of one upstream service.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn body(&self, params: &RequestParameters) -> Value;

    fn headers(&self, credential: &str) -> Headers;

    /// Final request URL. Most services carry the key in a header and post
    /// to the endpoint unchanged.
    fn url(&self, endpoint: &str, _credential: &str) -> String {
        endpoint.to_string()
    }
}

static PROVIDERS: &[&dyn Provider] = &[
    &openai::ChatCompletions { service: "openai", model: "gpt-4" },
    &openai::ChatCompletions { service: "mistral", model: "mistral-large-latest" },
    &gemini::Gemini,
    &anthropic::Claude,
];

pub fn lookup(service: &str) -> Option<&'static dyn Provider> {
    PROVIDERS.iter().copied().find(|p| p.name() == service)
}

pub fn supported_services() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name()).collect()
}

/// Shape the body and headers for `service`.
pub fn build(
    service: &str,
    credential: &str,
    params: &RequestParameters,
) -> Result<RequestSpec, DispatchError> {
    let prov = lookup(service).ok_or_else(|| DispatchError::UnsupportedService(service.to_string()))?;
    let spec = RequestSpec {
        body: prov.body(params),
        headers: prov.headers(credential),
    };
    if spec.is_empty() {
        return Err(DispatchError::UnsupportedService(service.to_string()));
    }
    Ok(spec)
}

/// URL to post to; unknown services get the endpoint unchanged.
pub fn resolve_url(service: &str, endpoint: &str, credential: &str) -> String {
    match lookup(service) {
        Some(p) => p.url(endpoint, credential),
        None => endpoint.to_string(),
    }
}

pub(crate) fn header(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_string(), value.into())
}

pub(crate) fn json_content_type() -> (String, String) {
    header(JSON_CONTENT_TYPE.0, JSON_CONTENT_TYPE.1)
}
