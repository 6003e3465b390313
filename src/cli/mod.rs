use clap::{Args, Subcommand};
use serde_json::{Value, json};
use tracing::error;

use crate::app::chat::NO_CODE_GENERATED;
use crate::app::operations::TEST_LANGUAGE;
use crate::backend::{ApiClient, ApiError};

const SCHEMA_VERSION: &str = "cli.v1";

#[derive(Debug, Clone, Subcommand)]
pub enum RootCommand {
    /// Generate code from a free-form prompt.
    Generate(PromptArgs),
    /// Generate front-end code for a tech stack.
    FrontEnd(TechStackArgs),
    /// Generate back-end code for a tech stack.
    BackEnd(TechStackArgs),
    /// Deploy a build directory as a hosted site.
    Deploy(DeployArgs),
    /// Post a message to a Slack channel.
    Slack(SlackArgs),
    /// Create a GitHub repository from a code directory.
    CreateRepo(RepoArgs),
    /// Push a code directory to an existing GitHub repository.
    Push(RepoArgs),
    /// Run the backend's automated tests on a code directory.
    Test(TestArgs),
    /// List the tasks on a Trello board.
    Tasks(BoardArgs),
    /// Run the full multi-step workflow.
    Workflow,
    /// Ask the backend agent directly.
    Agent(PromptArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PromptArgs {
    #[arg(value_name = "PROMPT")]
    pub prompt: String,
}

#[derive(Debug, Clone, Args)]
pub struct TechStackArgs {
    #[arg(value_name = "TECH_STACK")]
    pub tech_stack: String,
}

#[derive(Debug, Clone, Args)]
pub struct DeployArgs {
    #[arg(long, value_name = "NAME")]
    pub site_name: String,
    #[arg(long, value_name = "DIR")]
    pub build_dir: String,
}

#[derive(Debug, Clone, Args)]
pub struct SlackArgs {
    #[arg(long, value_name = "CHANNEL")]
    pub channel: String,
    #[arg(long, value_name = "TEXT")]
    pub message: String,
}

#[derive(Debug, Clone, Args)]
pub struct RepoArgs {
    #[arg(long, value_name = "NAME")]
    pub repo_name: String,
    #[arg(long, value_name = "DIR")]
    pub code_dir: String,
}

#[derive(Debug, Clone, Args)]
pub struct TestArgs {
    #[arg(long, value_name = "DIR")]
    pub code_dir: String,
    #[arg(long, value_name = "LANGUAGE", default_value = TEST_LANGUAGE)]
    pub language: String,
}

#[derive(Debug, Clone, Args)]
pub struct BoardArgs {
    #[arg(long, value_name = "BOARD_ID")]
    pub board_id: String,
}

pub async fn run(client: &ApiClient, command: RootCommand, json_output: bool, quiet: bool) -> i32 {
    match execute(client, command).await {
        Ok(output) => {
            print_success(client, output, json_output, quiet);
            0
        }
        Err(err) => {
            print_error(&err, json_output);
            err.exit_code
        }
    }
}

#[derive(Debug)]
struct CommandOutput {
    command: &'static str,
    data: Value,
    text: String,
}

#[derive(Debug)]
struct CliError {
    exit_code: i32,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

type CliResult<T> = Result<T, CliError>;

async fn execute(client: &ApiClient, command: RootCommand) -> CliResult<CommandOutput> {
    match command {
        RootCommand::Generate(args) => {
            require("prompt", &args.prompt)?;
            let reply = client.generate_code(&args.prompt).await.map_err(remote_error)?;
            let code = reply.generated_code.unwrap_or_default();
            Ok(code_output("generate", "generated_code", code))
        }
        RootCommand::FrontEnd(args) => {
            let reply = client
                .generate_front_end(&args.tech_stack)
                .await
                .map_err(remote_error)?;
            let code = reply.generated_front_end_code.unwrap_or_default();
            Ok(code_output("front-end", "generated_front_end_code", code))
        }
        RootCommand::BackEnd(args) => {
            let reply = client
                .generate_back_end(&args.tech_stack)
                .await
                .map_err(remote_error)?;
            let code = reply.generated_back_end_code.unwrap_or_default();
            Ok(code_output("back-end", "generated_back_end_code", code))
        }
        RootCommand::Deploy(args) => {
            require("site-name", &args.site_name)?;
            require("build-dir", &args.build_dir)?;
            let reply = client
                .deploy(&args.site_name, &args.build_dir)
                .await
                .map_err(remote_error)?;
            Ok(message_output("deploy", reply.message))
        }
        RootCommand::Slack(args) => {
            require("channel", &args.channel)?;
            require("message", &args.message)?;
            let reply = client
                .send_slack_message(&args.channel, &args.message)
                .await
                .map_err(remote_error)?;
            Ok(message_output("slack", reply.message))
        }
        RootCommand::CreateRepo(args) => {
            require("repo-name", &args.repo_name)?;
            require("code-dir", &args.code_dir)?;
            let reply = client
                .create_github_repo(&args.repo_name, &args.code_dir)
                .await
                .map_err(remote_error)?;
            let url = reply.repo_url.unwrap_or_default();
            Ok(CommandOutput {
                command: "create-repo",
                data: json!({ "repo_url": url }),
                text: format!("Repository created: {url}"),
            })
        }
        RootCommand::Push(args) => {
            require("repo-name", &args.repo_name)?;
            require("code-dir", &args.code_dir)?;
            let reply = client
                .push_github(&args.repo_name, &args.code_dir)
                .await
                .map_err(remote_error)?;
            Ok(message_output("push", reply.message))
        }
        RootCommand::Test(args) => {
            require("code-dir", &args.code_dir)?;
            let reply = client
                .automate_testing(&args.code_dir, &args.language)
                .await
                .map_err(remote_error)?;
            Ok(message_output("test", reply.message))
        }
        RootCommand::Tasks(args) => {
            require("board-id", &args.board_id)?;
            let reply = client
                .fetch_trello_tasks(&args.board_id)
                .await
                .map_err(remote_error)?;
            Ok(CommandOutput {
                command: "tasks",
                data: json!({ "tasks": reply.tasks }),
                text: reply.tasks.join("\n"),
            })
        }
        RootCommand::Workflow => {
            let value = client.run_workflow().await.map_err(remote_error)?;
            Ok(CommandOutput {
                command: "workflow",
                text: pretty(&value),
                data: value,
            })
        }
        RootCommand::Agent(args) => {
            require("prompt", &args.prompt)?;
            let reply = client.query_agent(&args.prompt).await.map_err(remote_error)?;
            let text = match &reply.result {
                Value::String(text) => text.clone(),
                Value::Null => String::new(),
                other => pretty(other),
            };
            Ok(CommandOutput {
                command: "agent",
                data: json!({ "result": reply.result }),
                text,
            })
        }
    }
}

fn code_output(command: &'static str, key: &str, code: String) -> CommandOutput {
    let text = if code.is_empty() {
        NO_CODE_GENERATED.to_string()
    } else {
        code.clone()
    };
    CommandOutput {
        command,
        data: json!({ key: code }),
        text,
    }
}

fn message_output(command: &'static str, message: Option<String>) -> CommandOutput {
    let message = message.unwrap_or_default();
    CommandOutput {
        command,
        data: json!({ "message": message }),
        text: message,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn require(name: &str, value: &str) -> CliResult<()> {
    if value.trim().is_empty() {
        return Err(usage_error(
            "ARGUMENT_REQUIRED",
            format!("{name} cannot be empty"),
        ));
    }
    Ok(())
}

fn usage_error(code: &'static str, message: impl Into<String>) -> CliError {
    CliError {
        exit_code: 2,
        code,
        message: message.into(),
        details: None,
    }
}

fn remote_error(err: ApiError) -> CliError {
    let details = match &err {
        ApiError::Http { status, body } => Some(json!({ "status": status, "body": body })),
        _ => None,
    };
    CliError {
        exit_code: 5,
        code: err.code(),
        message: err.to_string(),
        details,
    }
}

fn success_envelope(base_url: &str, output: &CommandOutput) -> Value {
    json!({
        "schema_version": SCHEMA_VERSION,
        "command": output.command,
        "base_url": base_url,
        "data": output.data
    })
}

fn error_envelope(err: &CliError) -> Value {
    json!({
        "schema_version": SCHEMA_VERSION,
        "error": {
            "code": err.code,
            "message": err.message,
            "details": err.details
        }
    })
}

fn print_success(client: &ApiClient, output: CommandOutput, json_output: bool, quiet: bool) {
    if json_output {
        println!("{}", pretty(&success_envelope(client.base_url(), &output)));
        return;
    }

    if quiet {
        return;
    }

    if output.text.is_empty() {
        println!("ok");
    } else {
        println!("{}", output.text);
    }
}

fn print_error(err: &CliError, json_output: bool) {
    error!(
        code = err.code,
        message = %err.message,
        details = ?err.details,
        "cli command failed"
    );

    if json_output {
        eprintln!("{}", pretty(&error_envelope(err)));
        return;
    }

    eprintln!("error[{}]: {}", err.code, err.message);
}
