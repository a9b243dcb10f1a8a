//! Command names for log spans (e.g. "list.pipelines", "describe.user").

use crate::cli::parse::{
    AllowCommands, Commands, CreateCommands, DescribeCommands, ListCommands, UpdateCommands,
};

pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::List { command } => format!("list.{}", list_command_name(command)),
        Commands::Describe { command } => format!("describe.{}", describe_command_name(command)),
        Commands::Submit(args) => format!("submit.{}", args.target.kind.singular()),
        Commands::Retry(target) => format!("retry.{}", target.kind.singular()),
        Commands::Terminate(args) => format!("terminate.{}", args.target.kind.singular()),
        Commands::Logs(args) => format!("logs.{}", args.target.kind.singular()),
        Commands::Update { command } => format!("update.{}", update_command_name(command)),
        Commands::Allow { command } => format!("allow.{}", allow_command_name(command)),
        Commands::Create { command } => format!("create.{}", create_command_name(command)),
    }
}

pub fn list_command_name(command: &ListCommands) -> &'static str {
    match command {
        ListCommands::Pipelines(_) => "pipelines",
        ListCommands::Tasks(_) => "tasks",
        ListCommands::Builds(_) => "builds",
        ListCommands::Routes(_) => "routes",
        ListCommands::Notebooks(_) => "notebooks",
    }
}

pub fn describe_command_name(command: &DescribeCommands) -> &'static str {
    match command {
        DescribeCommands::Pipeline(_) => "pipeline",
        DescribeCommands::Task(_) => "task",
        DescribeCommands::Build(_) => "build",
        DescribeCommands::Route { .. } => "route",
        DescribeCommands::User => "user",
    }
}

fn update_command_name(command: &UpdateCommands) -> &'static str {
    match command {
        UpdateCommands::Route { .. } => "route.thumbnail",
    }
}

fn allow_command_name(command: &AllowCommands) -> &'static str {
    match command {
        AllowCommands::Route(_) => "route",
    }
}

fn create_command_name(command: &CreateCommands) -> &'static str {
    match command {
        CreateCommands::UserSecret(_) => "user_secret",
    }
}
