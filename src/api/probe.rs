//! Endpoint dialect detection
//!
//! Each known dialect is tried in order against its model-listing path. The
//! first candidate that answers the way that dialect would wins. Probe
//! failures never escape: a refused connection or a 404 only means "not this
//! dialect", and when nothing matches the endpoint is treated as
//! [`ApiDialect::Unknown`].

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::api::dialect::{ApiDialect, EndpointMap};
use crate::utils::report::Reporter;
use crate::utils::url::endpoint_url;

pub const TOKEN_ENV_VAR: &str = "LLM_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedApi {
    pub dialect: ApiDialect,
    pub endpoints: EndpointMap,
}

struct ProbeCandidate {
    dialect: ApiDialect,
    send_token: bool,
    accepts_body: Option<fn(&Value) -> bool>,
}

const CANDIDATES: &[ProbeCandidate] = &[
    ProbeCandidate {
        dialect: ApiDialect::Ollama,
        send_token: false,
        accepts_body: None,
    },
    ProbeCandidate {
        dialect: ApiDialect::OpenWebUi,
        send_token: true,
        accepts_body: Some(looks_like_openwebui),
    },
];

fn looks_like_openwebui(body: &Value) -> bool {
    body.get("data").is_some() || body.get("choices").is_some()
}

/// Classify `base_url` and derive its endpoints.
pub async fn probe_endpoint(
    http: &reqwest::Client,
    base_url: &str,
    token: &str,
    reporter: &dyn Reporter,
) -> DetectedApi {
    for candidate in CANDIDATES {
        match try_candidate(http, base_url, token, candidate).await {
            Ok(true) => {
                debug!(dialect = %candidate.dialect, base_url, "endpoint dialect detected");
                if candidate.send_token && token.is_empty() {
                    warn_missing_token(reporter);
                }
                return DetectedApi {
                    dialect: candidate.dialect,
                    endpoints: candidate.dialect.endpoints(base_url),
                };
            }
            Ok(false) => {
                debug!(dialect = %candidate.dialect, base_url, "probe did not match");
            }
            Err(err) => {
                debug!(dialect = %candidate.dialect, base_url, error = %err, "probe failed");
            }
        }
    }

    DetectedApi {
        dialect: ApiDialect::Unknown,
        endpoints: ApiDialect::Unknown.endpoints(base_url),
    }
}

async fn try_candidate(
    http: &reqwest::Client,
    base_url: &str,
    token: &str,
    candidate: &ProbeCandidate,
) -> Result<bool, reqwest::Error> {
    let (models_path, _) = candidate.dialect.paths();
    let mut request = http.get(endpoint_url(base_url, models_path));
    if candidate.send_token {
        request = request
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json");
    }

    let response = request.send().await?;
    if response.status() != StatusCode::OK {
        return Ok(false);
    }

    match candidate.accepts_body {
        None => Ok(true),
        Some(accepts) => {
            let body = response.json::<Value>().await?;
            Ok(accepts(&body))
        }
    }
}

fn warn_missing_token(reporter: &dyn Reporter) {
    reporter.warning(&format!(
        "Missing API token. Please set {TOKEN_ENV_VAR} as a user environment variable."
    ));
    reporter.info("Need a hand?");
    reporter.info("POSIX shell:");
    reporter.info(&format!("  export {TOKEN_ENV_VAR}=\"your-secret-token-here\""));
    reporter.info("PowerShell (permanent):");
    reporter.info(&format!(
        "  [System.Environment]::SetEnvironmentVariable(\"{TOKEN_ENV_VAR}\", \"your-secret-token-here\", \"User\")"
    ));
    reporter.info("PowerShell (temporary):");
    reporter.info(&format!("  $env:{TOKEN_ENV_VAR} = \"your-secret-token-here\""));
}
