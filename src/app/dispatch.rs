//! Background execution of remote calls.
//!
//! The UI loop never awaits the network. Each request runs on its own tokio
//! task and reports back over a channel that [`App`](super::App) drains on
//! every tick. Requests are independent: no ordering, cancellation or
//! de-duplication.

use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

use crate::backend::{
    ApiClient, ApiError, GenerateCodeResponse, MessageResponse, RepoResponse, TasksResponse,
};

use super::code::CodeTarget;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Request {
    GenerateCode { prompt: String },
    GenerateFrontEnd { tech_stack: String },
    GenerateBackEnd { tech_stack: String },
    CreateRepo { repo_name: String, code_dir: String },
    PushCode { repo_name: String, code_dir: String },
    RunTests { code_dir: String, language: String },
    FetchTasks { board_id: String },
    RunWorkflow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    CreateRepo(Result<RepoResponse, ApiError>),
    PushCode(Result<MessageResponse, ApiError>),
    RunTests(Result<MessageResponse, ApiError>),
    FetchTasks(Result<TasksResponse, ApiError>),
    RunWorkflow(Result<Value, ApiError>),
}

/// A finished request, routed back to the panel that issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Chat(Result<GenerateCodeResponse, ApiError>),
    Code {
        target: CodeTarget,
        result: Result<Option<String>, ApiError>,
    },
    Operation(OperationOutcome),
}

impl Request {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GenerateCode { .. } => "generate_code",
            Self::GenerateFrontEnd { .. } => "generate_front_end",
            Self::GenerateBackEnd { .. } => "generate_back_end",
            Self::CreateRepo { .. } => "create_github_repo",
            Self::PushCode { .. } => "push_github",
            Self::RunTests { .. } => "automate_testing",
            Self::FetchTasks { .. } => "fetch_trello_tasks",
            Self::RunWorkflow => "workflow",
        }
    }

    pub async fn execute(self, client: &ApiClient) -> Completion {
        match self {
            Self::GenerateCode { prompt } => Completion::Chat(client.generate_code(&prompt).await),
            Self::GenerateFrontEnd { tech_stack } => Completion::Code {
                target: CodeTarget::FrontEnd,
                result: client
                    .generate_front_end(&tech_stack)
                    .await
                    .map(|reply| reply.generated_front_end_code),
            },
            Self::GenerateBackEnd { tech_stack } => Completion::Code {
                target: CodeTarget::BackEnd,
                result: client
                    .generate_back_end(&tech_stack)
                    .await
                    .map(|reply| reply.generated_back_end_code),
            },
            Self::CreateRepo {
                repo_name,
                code_dir,
            } => Completion::Operation(OperationOutcome::CreateRepo(
                client.create_github_repo(&repo_name, &code_dir).await,
            )),
            Self::PushCode {
                repo_name,
                code_dir,
            } => Completion::Operation(OperationOutcome::PushCode(
                client.push_github(&repo_name, &code_dir).await,
            )),
            Self::RunTests { code_dir, language } => Completion::Operation(
                OperationOutcome::RunTests(client.automate_testing(&code_dir, &language).await),
            ),
            Self::FetchTasks { board_id } => Completion::Operation(OperationOutcome::FetchTasks(
                client.fetch_trello_tasks(&board_id).await,
            )),
            Self::RunWorkflow => {
                Completion::Operation(OperationOutcome::RunWorkflow(client.run_workflow().await))
            }
        }
    }

    /// The completion this request would produce had the call failed with `err`.
    pub fn fail(self, err: ApiError) -> Completion {
        match self {
            Self::GenerateCode { .. } => Completion::Chat(Err(err)),
            Self::GenerateFrontEnd { .. } => Completion::Code {
                target: CodeTarget::FrontEnd,
                result: Err(err),
            },
            Self::GenerateBackEnd { .. } => Completion::Code {
                target: CodeTarget::BackEnd,
                result: Err(err),
            },
            Self::CreateRepo { .. } => Completion::Operation(OperationOutcome::CreateRepo(Err(err))),
            Self::PushCode { .. } => Completion::Operation(OperationOutcome::PushCode(Err(err))),
            Self::RunTests { .. } => Completion::Operation(OperationOutcome::RunTests(Err(err))),
            Self::FetchTasks { .. } => Completion::Operation(OperationOutcome::FetchTasks(Err(err))),
            Self::RunWorkflow => Completion::Operation(OperationOutcome::RunWorkflow(Err(err))),
        }
    }
}

pub struct Dispatcher {
    client: Arc<ApiClient>,
    runtime: Option<Handle>,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Dispatcher {
    /// Captures the ambient tokio runtime, if any. Without one every request
    /// completes immediately with [`ApiError::NoRuntime`].
    pub fn new(client: ApiClient) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            client: Arc::new(client),
            runtime: Handle::try_current().ok(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, request: Request) {
        self.in_flight += 1;
        debug!(request = request.label(), "dispatching");

        let Some(runtime) = &self.runtime else {
            warn!(request = request.label(), "no async runtime; failing request");
            let _ = self.tx.send(request.fail(ApiError::NoRuntime));
            return;
        };

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        runtime.spawn(async move {
            let completion = request.execute(&client).await;
            // The receiver only goes away when the app shuts down.
            let _ = tx.send(completion);
        });
    }

    /// Next finished request, without blocking.
    pub fn try_recv(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Waits for the next finished request.
    pub async fn recv(&mut self) -> Option<Completion> {
        let completion = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.client.base_url())
            .field("has_runtime", &self.runtime.is_some())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
