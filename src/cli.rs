//! CLI domain: parse, route, help, output, and presentation.
//! The single route table in [`RunContext::execute`] dispatches every command.

mod args;
mod fields;
mod help;
mod output;
mod parse;
mod poll;
mod presentation;
mod route;

pub use args::parse_key_values;
pub use help::command_name;
pub use output::format_command_error;
pub use parse::{
    AllowCommands, AllowRouteArgs, Cli, Commands, CreateCommands, DescribeArgs, DescribeCommands,
    ListArgs, ListCommands, LogsArgs, ProjectFilterArgs, RouteListArgs, SubmitArgs, TerminateArgs,
    UpdateCommands, UpdateRouteCommands, UserSecretArgs, WorkflowTarget,
};
pub use poll::RunPoller;
pub use presentation::{format_dt, status_line, Symbol, NOT_AVAILABLE};
pub use route::{ConfirmFn, RunContext, RunSettings};
