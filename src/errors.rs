use thiserror::Error;

/// Which half of a service's configuration is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Endpoint,
    ApiKey,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missing::Endpoint => f.write_str("endpoint"),
            Missing::ApiKey => f.write_str("API key"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("missing {missing} for service '{service}'")]
    ConfigMissing { service: String, missing: Missing },
    #[error("unsupported service '{0}'")]
    UnsupportedService(String),
    #[error("request to '{service}' failed: {source:#}")]
    Transport {
        service: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, DispatchError::Transport { .. })
    }

    pub fn service(&self) -> &str {
        match self {
            DispatchError::ConfigMissing { service, .. } => service,
            DispatchError::UnsupportedService(service) => service,
            DispatchError::Transport { service, .. } => service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_missing_names_the_absent_piece() {
        let err = DispatchError::ConfigMissing { service: "foo".into(), missing: Missing::ApiKey };
        assert_eq!(err.to_string(), "missing API key for service 'foo'");
        let err = DispatchError::ConfigMissing { service: "foo".into(), missing: Missing::Endpoint };
        assert_eq!(err.to_string(), "missing endpoint for service 'foo'");
    }

    #[test]
    fn service_is_reported_for_every_variant() {
        let err = DispatchError::Transport { service: "claude".into(), source: anyhow::anyhow!("dns") };
        assert_eq!(err.service(), "claude");
        assert!(err.to_string().contains("dns"));
        assert!(err.is_transport());
        assert_eq!(DispatchError::UnsupportedService("foo".into()).service(), "foo");
        assert!(!DispatchError::UnsupportedService("foo".into()).is_transport());
    }
}
