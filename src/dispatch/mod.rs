use crate::errors::DispatchError;
use crate::log::{self, RunArtifacts};
use crate::provider::{self, RequestParameters, RequestSpec};
use crate::registry::ServiceRegistry;
use crate::transport::{HttpReply, Transport};
use crate::ux;

/// Result of handling one service.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The POST completed; any status other than 200 is an upstream error.
    Delivered { service: String, reply: HttpReply },
    /// Built but not sent. The URL and headers have the credential redacted.
    DryRun { service: String, url: String, spec: RequestSpec },
}

impl Outcome {
    pub fn is_upstream_error(&self) -> bool {
        matches!(self, Outcome::Delivered { reply, .. } if !reply.is_ok())
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<Result<Outcome, DispatchError>>,
}

impl BatchReport {
    pub fn delivered(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Ok(o) if !o.is_upstream_error()))
            .count()
    }

    pub fn upstream_errors(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Ok(o) if o.is_upstream_error()))
            .count()
    }

    /// Never sent: missing configuration or no request shape for the service.
    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Err(e) if !e.is_transport()))
            .count()
    }

    /// Sent, but no status came back.
    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_transport()))
            .count()
    }
}

/// Process exit status for a single-target run.
///
/// Only a request that could not be built (missing configuration or an
/// unsupported service) fails the process. Once a request has been sent, the
/// run succeeds whatever came back, including no answer at all.
pub fn exit_status(res: &Result<Outcome, DispatchError>) -> u8 {
    match res {
        Ok(_) => 0,
        Err(DispatchError::Transport { .. }) => 0,
        Err(DispatchError::ConfigMissing { .. } | DispatchError::UnsupportedService(_)) => 1,
    }
}

pub struct Dispatcher<'a> {
    registry: &'a ServiceRegistry,
    params: &'a RequestParameters,
    transport: &'a dyn Transport,
    dry_run: bool,
    debug: bool,
    progress: bool,
    artifacts: Option<&'a RunArtifacts>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a ServiceRegistry,
        params: &'a RequestParameters,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            registry,
            params,
            transport,
            dry_run: false,
            debug: false,
            progress: false,
            artifacts: None,
        }
    }

    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    pub fn progress(mut self, on: bool) -> Self {
        self.progress = on;
        self
    }

    pub fn artifacts(mut self, artifacts: Option<&'a RunArtifacts>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Dispatch to one named service. Missing configuration is an error here,
    /// unlike in batch mode where such services are never selected.
    pub async fn run_single(&self, service: &str) -> Result<Outcome, DispatchError> {
        let (endpoint, credential) = self.registry.require(service)?;
        self.dispatch(service, endpoint, credential).await
    }

    /// Dispatch to every eligible service in turn. Failures are recorded and
    /// handed to `report` but never stop the loop.
    pub async fn run_batch<F>(&self, mut report: F) -> BatchReport
    where
        F: FnMut(&Result<Outcome, DispatchError>),
    {
        let mut out = BatchReport::default();
        for service in self.registry.eligible_services() {
            let res = match self.registry.require(service) {
                Ok((endpoint, credential)) => self.dispatch(service, endpoint, credential).await,
                Err(e) => Err(e),
            };
            report(&res);
            out.results.push(res);
        }
        out
    }

    async fn dispatch(
        &self,
        service: &str,
        endpoint: &str,
        credential: &str,
    ) -> Result<Outcome, DispatchError> {
        let spec = provider::build(service, credential, self.params)?;
        let url = provider::resolve_url(service, endpoint, credential);

        if self.debug || self.dry_run {
            let shown = RequestSpec {
                body: spec.body.clone(),
                headers: log::redact_headers(&spec.headers, credential),
            };
            let shown_url = log::redact(&url, credential);
            if self.debug {
                if let Err(e) = log::print_request_debug(service, &shown_url, &shown) {
                    ux::warn(&format!("debug output failed: {e:#}"));
                }
            }
            if self.dry_run {
                return Ok(Outcome::DryRun { service: service.to_string(), url: shown_url, spec: shown });
            }
        }

        if let Some(run) = self.artifacts {
            match run.save_request(service, &spec) {
                Ok(p) if self.debug => log::print_saved_path(service, &p),
                Ok(_) => {}
                Err(e) => ux::warn(&format!("{e:#}")),
            }
        }

        let pb = self.progress.then(|| ux::spinner(service));
        let sent = self.transport.post(&url, &spec.headers, &spec.body).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let reply = sent.map_err(|e| DispatchError::Transport {
            service: service.to_string(),
            // reqwest errors may quote the URL, which for gemini carries the key.
            source: anyhow::anyhow!(log::redact(&format!("{e:#}"), credential)),
        })?;

        if self.debug {
            log::print_reply_debug(service, &reply);
        }
        if let Some(run) = self.artifacts {
            match run.save_response(service, &reply) {
                Ok(p) if self.debug => log::print_saved_path(service, &p),
                Ok(_) => {}
                Err(e) => ux::warn(&format!("{e:#}")),
            }
        }

        Ok(Outcome::Delivered { service: service.to_string(), reply })
    }
}
