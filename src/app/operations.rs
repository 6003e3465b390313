use serde_json::Value;
use tracing::warn;

use crate::backend::ApiError;

use super::dispatch::{OperationOutcome, Request};
use super::state::Notice;

/// Language sent with every automated-testing request.
pub const TEST_LANGUAGE: &str = "python";

pub const CREATE_REPO_ERROR: &str = "Error creating repository";
pub const PUSH_CODE_ERROR: &str = "Error pushing code";
pub const RUN_TESTS_ERROR: &str = "Error running tests";
pub const FETCH_TASKS_ERROR: &str = "Error fetching Trello tasks";
pub const RUN_WORKFLOW_ERROR: &str = "Error running workflow";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operation {
    CreateRepo,
    PushCode,
    RunTests,
    FetchTasks,
    RunWorkflow,
}

impl Operation {
    pub const fn button_label(self) -> &'static str {
        match self {
            Self::CreateRepo => "Create Repo",
            Self::PushCode => "Push Code",
            Self::RunTests => "Run Automated Testing",
            Self::FetchTasks => "Fetch Trello Tasks",
            Self::RunWorkflow => "Run Full Workflow",
        }
    }
}

#[derive(Debug, Default)]
pub struct OperationsPanel {
    pub repo_name: String,
    pub code_dir: String,
    pub board_id: String,
    workflow_result: Option<Value>,
    workflow_scroll: u16,
}

impl OperationsPanel {
    pub fn workflow_result(&self) -> Option<&Value> {
        self.workflow_result.as_ref()
    }

    pub fn workflow_scroll(&self) -> u16 {
        self.workflow_scroll
    }

    pub fn scroll_workflow_by(&mut self, rows: i32) {
        let next = i32::from(self.workflow_scroll).saturating_add(rows);
        self.workflow_scroll = u16::try_from(next.max(0)).unwrap_or(u16::MAX);
    }

    /// Caps the offset so the last row stays at the bottom of the view.
    pub fn clamp_workflow_scroll(&mut self, hidden_rows: u16) -> u16 {
        self.workflow_scroll = self.workflow_scroll.min(hidden_rows);
        self.workflow_scroll
    }

    /// Builds the request from the current field values. Inputs are sent
    /// as-is, empty strings included.
    pub fn request(&self, operation: Operation) -> Request {
        match operation {
            Operation::CreateRepo => Request::CreateRepo {
                repo_name: self.repo_name.clone(),
                code_dir: self.code_dir.clone(),
            },
            Operation::PushCode => Request::PushCode {
                repo_name: self.repo_name.clone(),
                code_dir: self.code_dir.clone(),
            },
            Operation::RunTests => Request::RunTests {
                code_dir: self.code_dir.clone(),
                language: TEST_LANGUAGE.to_string(),
            },
            Operation::FetchTasks => Request::FetchTasks {
                board_id: self.board_id.clone(),
            },
            Operation::RunWorkflow => Request::RunWorkflow,
        }
    }

    /// Applies a finished operation. Returns the notice to show, if any.
    ///
    /// A successful workflow run replaces the stored result and raises no
    /// notice. A failed one leaves the previous result in place.
    pub fn finish(&mut self, outcome: OperationOutcome) -> Option<Notice> {
        match outcome {
            OperationOutcome::CreateRepo(Ok(reply)) => {
                let url = reply.repo_url.unwrap_or_default();
                Some(Notice::info(format!("Repository created: {url}")).with_link(url))
            }
            OperationOutcome::CreateRepo(Err(err)) => Some(failure(err, CREATE_REPO_ERROR)),
            OperationOutcome::PushCode(Ok(reply)) | OperationOutcome::RunTests(Ok(reply)) => {
                Some(Notice::info(reply.message.unwrap_or_default()))
            }
            OperationOutcome::PushCode(Err(err)) => Some(failure(err, PUSH_CODE_ERROR)),
            OperationOutcome::RunTests(Err(err)) => Some(failure(err, RUN_TESTS_ERROR)),
            OperationOutcome::FetchTasks(Ok(reply)) => Some(Notice::info(format!(
                "Trello Tasks: {}",
                reply.tasks.join(", ")
            ))),
            OperationOutcome::FetchTasks(Err(err)) => Some(failure(err, FETCH_TASKS_ERROR)),
            OperationOutcome::RunWorkflow(Ok(value)) => {
                self.workflow_result = Some(value);
                self.workflow_scroll = 0;
                None
            }
            OperationOutcome::RunWorkflow(Err(err)) => Some(failure(err, RUN_WORKFLOW_ERROR)),
        }
    }
}

fn failure(err: ApiError, text: &str) -> Notice {
    warn!(error = %err, code = err.code(), "{text}");
    Notice::error(text)
}

/// Two-space indented JSON, as shown under "Workflow Results:".
pub fn pretty_workflow(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
