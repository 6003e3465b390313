//! HTTP access to the remote assistant service.
//!
//! The service owns every interesting operation (code generation, git, CI,
//! task boards). This module only maps parameters onto requests and decodes
//! the JSON that comes back.

pub mod client;
pub mod error;
pub mod payloads;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::ApiClient;
pub use error::ApiError;
pub use payloads::{
    AgentResponse, BackEndCodeResponse, FrontEndCodeResponse, GenerateCodeResponse,
    MessageResponse, RepoResponse, TasksResponse,
};

pub const BACKEND_URL_ENV: &str = "AI_ASSISTANT_BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Picks the base URL once at startup.
///
/// Precedence is command-line flag, then environment, then settings file, then
/// [`DEFAULT_BACKEND_URL`]. Blank candidates are skipped and a trailing slash
/// is dropped so paths can be appended verbatim.
pub fn resolve_base_url(
    cli_override: Option<&str>,
    env_override: Option<&str>,
    settings_value: Option<&str>,
) -> String {
    [cli_override, env_override, settings_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_BACKEND_URL)
        .trim_end_matches('/')
        .to_string()
}

/// [`resolve_base_url`] with the environment variable read from the process.
pub fn resolve_base_url_from_env(
    cli_override: Option<&str>,
    settings_value: Option<&str>,
) -> String {
    let env_value = std::env::var(BACKEND_URL_ENV).ok();
    resolve_base_url(cli_override, env_value.as_deref(), settings_value)
}
