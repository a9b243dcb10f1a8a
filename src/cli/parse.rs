//! CLI parse: clap types for PRAX. No behavior; definitions only.

use crate::models::WorkflowKind;
use crate::render::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// PRAX CLI - manage pipelines, tasks, builds and routes
#[derive(Parser, Debug)]
#[command(name = "prax", version)]
#[command(about = "Oceanum PRAX projects management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// PRAX API base URL (overrides configuration)
    #[arg(long)]
    pub api_url: Option<String>,

    /// PRAX API token (overrides configuration)
    #[arg(long)]
    pub token: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List resources
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Describe resources
    Describe {
        #[command(subcommand)]
        command: DescribeCommands,
    },
    /// Submit Tasks, Pipelines and Builds runs
    Submit(SubmitArgs),
    /// Retry the last run of a Task, Pipeline or Build
    Retry(WorkflowTarget),
    /// Terminate the active run of a Task, Pipeline or Build
    Terminate(TerminateArgs),
    /// Show logs of the last run of a Task, Pipeline or Build
    Logs(LogsArgs),
    /// Update resources
    Update {
        #[command(subcommand)]
        command: UpdateCommands,
    },
    /// Manage resources permissions
    Allow {
        #[command(subcommand)]
        command: AllowCommands,
    },
    /// Create resources
    Create {
        #[command(subcommand)]
        command: CreateCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ListCommands {
    /// List PRAX Pipelines
    Pipelines(ListArgs),
    /// List PRAX Tasks
    Tasks(ListArgs),
    /// List PRAX Builds
    Builds(ListArgs),
    /// List PRAX Routes
    Routes(RouteListArgs),
    /// List PRAX Notebooks
    Notebooks(RouteListArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum DescribeCommands {
    /// Describe a PRAX Pipeline
    Pipeline(DescribeArgs),
    /// Describe a PRAX Task
    Task(DescribeArgs),
    /// Describe a PRAX Build
    Build(DescribeArgs),
    /// Describe a PRAX Service or App Route
    Route {
        /// Route name
        name: String,
    },
    /// Describe the current PRAX user
    User,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateCommands {
    /// Update PRAX Routes
    Route {
        #[command(subcommand)]
        command: UpdateRouteCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateRouteCommands {
    /// Update a PRAX Route thumbnail
    Thumbnail {
        /// Route name
        name: String,
        /// Image file to upload
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AllowCommands {
    /// Grant users or groups access to a route
    Route(AllowRouteArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum CreateCommands {
    /// Create or update a PRAX User Secret
    UserSecret(UserSecretArgs),
}

/// Filters shared by project-scoped list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectFilterArgs {
    /// Organization name
    #[arg(long)]
    pub org: Option<String>,
    /// Project owner email
    #[arg(long)]
    pub user: Option<String>,
    /// Project name
    #[arg(long)]
    pub project: Option<String>,
    /// Stage name
    #[arg(long)]
    pub stage: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Search by names or description
    #[arg(long)]
    pub search: Option<String>,
    #[command(flatten)]
    pub filters: ProjectFilterArgs,
    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<u32>,
    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RouteListArgs {
    /// Search by route name, project name or project description
    #[arg(long)]
    pub search: Option<String>,
    #[command(flatten)]
    pub filters: ProjectFilterArgs,
    /// Route status
    #[arg(long)]
    pub status: Option<String>,
    /// Route tier (e.g. frontend, backend)
    #[arg(long)]
    pub tier: Option<String>,
    /// Show only open-access routes
    #[arg(long)]
    pub open_access: bool,
    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<u32>,
    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    /// Resource name
    pub name: String,
    /// Dump the full record instead of the summary view
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct WorkflowTarget {
    /// Kind of resource
    #[arg(value_enum)]
    pub kind: WorkflowKind,
    /// Resource name
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub target: WorkflowTarget,
    /// Run parameters as key=value (repeatable)
    #[arg(short = 'p', long = "parameter")]
    pub parameters: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TerminateArgs {
    #[command(flatten)]
    pub target: WorkflowTarget,
    /// Return as soon as termination is requested
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    #[command(flatten)]
    pub target: WorkflowTarget,
    /// Keep streaming new lines
    #[arg(short, long)]
    pub follow: bool,
    /// Show only the last N lines
    #[arg(short = 'n', long)]
    pub lines: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct AllowRouteArgs {
    /// Route name
    pub name: String,
    /// User to grant access to (repeatable)
    #[arg(long = "user")]
    pub users: Vec<String>,
    /// Group to grant access to (repeatable)
    #[arg(long = "group")]
    pub groups: Vec<String>,
    /// Allow to view the route
    #[arg(short, long)]
    pub view: bool,
    /// Allow to change the route, implies --view
    #[arg(short, long)]
    pub change: bool,
}

#[derive(Args, Debug, Clone)]
pub struct UserSecretArgs {
    /// Secret name
    pub name: String,
    /// Organization name (defaults to the current org)
    #[arg(long)]
    pub org: Option<String>,
    /// Secret description
    #[arg(long)]
    pub description: Option<String>,
    /// Secret data as key=value (repeatable)
    #[arg(short, long = "data")]
    pub data: Vec<String>,
    /// Update an existing secret without asking
    #[arg(short, long)]
    pub yes: bool,
}
