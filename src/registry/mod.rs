use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config;
use crate::errors::{DispatchError, Missing};

const API_KEY_SUFFIX: &str = "_api_key";
const URL_SUFFIX: &str = "_url";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Credentials,
    Endpoints,
}

/// Service name of a config key: everything before the first `_`.
///
/// A key with no underscore has the empty service name.
pub fn service_prefix(key: &str) -> &str {
    match key.find('_') {
        Some(i) => &key[..i],
        None => "",
    }
}

/// Credentials and endpoints keyed by service name.
#[derive(Debug, Default, Clone)]
pub struct ServiceRegistry {
    credentials: BTreeMap<String, String>,
    endpoints: BTreeMap<String, String>,
}

impl ServiceRegistry {
    pub fn load(env_file: &Path, links_file: &Path) -> Result<Self> {
        let mut reg = ServiceRegistry::default();
        reg.extend(config::load_assignments(env_file)?, FileKind::Credentials);
        reg.extend(config::load_assignments(links_file)?, FileKind::Endpoints);
        Ok(reg)
    }

    pub fn extend<I>(&mut self, pairs: I, kind: FileKind)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in pairs {
            self.register(&k, v, kind);
        }
    }

    /// Keys that don't end in the suffix for `kind` directly after the
    /// service prefix are ignored.
    pub fn register(&mut self, key: &str, value: String, kind: FileKind) {
        let service = service_prefix(key);
        let (suffix, map) = match kind {
            FileKind::Credentials => (API_KEY_SUFFIX, &mut self.credentials),
            FileKind::Endpoints => (URL_SUFFIX, &mut self.endpoints),
        };
        if key.strip_prefix(service) == Some(suffix) {
            map.insert(service.to_string(), value);
        }
    }

    pub fn credential(&self, service: &str) -> Option<&str> {
        self.credentials.get(service).map(String::as_str)
    }

    pub fn endpoint(&self, service: &str) -> Option<&str> {
        self.endpoints.get(service).map(String::as_str)
    }

    /// Services with both a credential and an endpoint, in name order.
    pub fn eligible_services(&self) -> Vec<&str> {
        self.endpoints
            .keys()
            .filter(|s| self.credentials.contains_key(s.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// `(endpoint, credential)` for `service`; the endpoint is checked first.
    pub fn require(&self, service: &str) -> Result<(&str, &str), DispatchError> {
        let endpoint = self.endpoint(service).ok_or_else(|| DispatchError::ConfigMissing {
            service: service.to_string(),
            missing: Missing::Endpoint,
        })?;
        let credential = self.credential(service).ok_or_else(|| DispatchError::ConfigMissing {
            service: service.to_string(),
            missing: Missing::ApiKey,
        })?;
        Ok((endpoint, credential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_assignments;

    fn registry(env: &str, links: &str) -> ServiceRegistry {
        let mut reg = ServiceRegistry::default();
        reg.extend(parse_assignments(env), FileKind::Credentials);
        reg.extend(parse_assignments(links), FileKind::Endpoints);
        reg
    }

    #[test]
    fn prefix_is_text_before_first_underscore() {
        assert_eq!(service_prefix("openai_api_key"), "openai");
        assert_eq!(service_prefix("gemini_url"), "gemini");
        assert_eq!(service_prefix("_api_key"), "");
        assert_eq!(service_prefix("nounderscore"), "");
    }

    #[test]
    fn only_exact_suffixes_register() {
        let reg = registry(
            "openai_api_key=sk\nopenai_url=wrong-file\nopenai_api_key_old=x\nAPI_KEY=y\n",
            "openai_url=https://a\nopenai_api_key=wrong-file\nmy_service_url=z\n",
        );
        assert_eq!(reg.credential("openai"), Some("sk"));
        assert_eq!(reg.endpoint("openai"), Some("https://a"));
        // "my_service_url" has prefix "my", so the suffix is "_service_url".
        assert_eq!(reg.endpoint("my"), None);
        assert_eq!(reg.credential("API"), None);
    }

    #[test]
    fn eligible_is_intersection() {
        let reg = registry(
            "openai_api_key=a\nclaude_api_key=b\n",
            "openai_url=u1\ngemini_url=u2\nfoo_url=u3\n",
        );
        assert_eq!(reg.eligible_services(), vec!["openai"]);
    }

    #[test]
    fn last_duplicate_wins_and_order_does_not_matter() {
        let lines = ["openai_api_key=1", "claude_api_key=2", "mistral_api_key=3", "openai_api_key=4"];
        let forward = registry(&lines.join("\n"), "");
        let mut shuffled = vec![lines[2], lines[1], lines[0], lines[3]];
        let shuffled_reg = registry(&shuffled.join("\n"), "");
        for s in ["openai", "claude", "mistral"] {
            assert_eq!(forward.credential(s), shuffled_reg.credential(s));
        }
        assert_eq!(forward.credential("openai"), Some("4"));

        shuffled.reverse();
        let reversed = registry(&shuffled.join("\n"), "");
        assert_eq!(reversed.credential("openai"), Some("1"));
    }

    #[test]
    fn line_without_equals_changes_nothing() {
        let with = registry("openai_api_key=a\nopenai_api_key\n", "");
        assert_eq!(with.credential("openai"), Some("a"));
    }

    #[test]
    fn empty_service_name_never_collides_with_real_services() {
        let reg = registry("_api_key=blank\n", "_url=https://blank\n");
        assert_eq!(reg.credential(""), Some("blank"));
        assert_eq!(reg.eligible_services(), vec![""]);
        assert_eq!(reg.credential("openai"), None);
    }

    #[test]
    fn require_reports_which_piece_is_missing() {
        let reg = registry("bar_api_key=k\n", "foo_url=https://foo\n");
        match reg.require("foo") {
            Err(DispatchError::ConfigMissing { missing, .. }) => assert_eq!(missing, Missing::ApiKey),
            other => panic!("unexpected {other:?}"),
        }
        match reg.require("bar") {
            Err(DispatchError::ConfigMissing { missing, .. }) => assert_eq!(missing, Missing::Endpoint),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn loads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join(".env");
        let links = dir.path().join(".links");
        std::fs::write(&env, "openai_api_key=sk-test\n").unwrap();
        std::fs::write(&links, "openai_url=https://api.openai.com/v1/chat/completions\n").unwrap();
        let reg = ServiceRegistry::load(&env, &links).unwrap();
        assert_eq!(
            reg.require("openai").unwrap(),
            ("https://api.openai.com/v1/chat/completions", "sk-test")
        );
    }
}
