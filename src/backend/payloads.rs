use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct PromptRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TechStackRequest<'a> {
    pub tech_stack: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeployRequest<'a> {
    pub site_name: &'a str,
    pub build_dir: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SlackMessageRequest<'a> {
    pub channel: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RepoRequest<'a> {
    pub repo_name: &'a str,
    pub code_dir: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TestingRequest<'a> {
    pub code_dir: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BoardRequest<'a> {
    pub board_id: &'a str,
}

// Response fields are optional unless a caller cannot do anything without them.
// A missing or null field decodes to `None` rather than failing the call.

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateCodeResponse {
    pub generated_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontEndCodeResponse {
    pub generated_front_end_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackEndCodeResponse {
    pub generated_back_end_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoResponse {
    pub repo_url: Option<String>,
}

/// Shape shared by push, testing, deploy and Slack endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub result: Value,
}
