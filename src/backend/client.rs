use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;
use super::payloads::{
    AgentResponse, BackEndCodeResponse, BoardRequest, DeployRequest, FrontEndCodeResponse,
    GenerateCodeResponse, MessageResponse, PromptRequest, RepoRequest, RepoResponse,
    SlackMessageRequest, TasksResponse, TechStackRequest, TestingRequest,
};

/// Request sender shared by every panel and CLI command.
///
/// One method per remote action. No retry, timeout, auth or interceptors:
/// the caller receives the decoded body or an [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate_code(&self, prompt: &str) -> Result<GenerateCodeResponse, ApiError> {
        self.post("/generate_code", &PromptRequest { prompt }).await
    }

    pub async fn generate_front_end(
        &self,
        tech_stack: &str,
    ) -> Result<FrontEndCodeResponse, ApiError> {
        self.post("/generate_front_end", &TechStackRequest { tech_stack })
            .await
    }

    pub async fn generate_back_end(
        &self,
        tech_stack: &str,
    ) -> Result<BackEndCodeResponse, ApiError> {
        self.post("/generate_back_end", &TechStackRequest { tech_stack })
            .await
    }

    pub async fn deploy(
        &self,
        site_name: &str,
        build_dir: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post(
            "/deploy",
            &DeployRequest {
                site_name,
                build_dir,
            },
        )
        .await
    }

    pub async fn send_slack_message(
        &self,
        channel: &str,
        message: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post("/send_slack_message", &SlackMessageRequest { channel, message })
            .await
    }

    pub async fn create_github_repo(
        &self,
        repo_name: &str,
        code_dir: &str,
    ) -> Result<RepoResponse, ApiError> {
        self.post(
            "/create_github_repo",
            &RepoRequest {
                repo_name,
                code_dir,
            },
        )
        .await
    }

    pub async fn push_github(
        &self,
        repo_name: &str,
        code_dir: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post(
            "/push_github",
            &RepoRequest {
                repo_name,
                code_dir,
            },
        )
        .await
    }

    pub async fn automate_testing(
        &self,
        code_dir: &str,
        language: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post("/automate_testing", &TestingRequest { code_dir, language })
            .await
    }

    pub async fn fetch_trello_tasks(&self, board_id: &str) -> Result<TasksResponse, ApiError> {
        self.post("/fetch_trello_tasks", &BoardRequest { board_id })
            .await
    }

    /// Runs the remote multi-step workflow. The result has no fixed schema.
    pub async fn run_workflow(&self) -> Result<Value, ApiError> {
        let url = self.endpoint("/workflow");
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    pub async fn query_agent(&self, prompt: &str) -> Result<AgentResponse, ApiError> {
        self.post("/query_agent", &PromptRequest { prompt }).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn request_error(err: reqwest::Error) -> ApiError {
    ApiError::Request {
        message: err.to_string(),
    }
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|err| ApiError::Read {
        message: err.to_string(),
    })?;

    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|err| ApiError::Decode {
        message: err.to_string(),
    })
}
