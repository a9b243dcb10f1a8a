//! CLI route: single route table and run context. Each handler makes its
//! remote calls through [`PraxApi`], stops at the first failure and renders
//! only `Ok` data.

use crate::cli::args::parse_key_values;
use crate::cli::fields;
use crate::cli::help::command_name;
use crate::cli::parse::{
    AllowCommands, AllowRouteArgs, Commands, CreateCommands, DescribeArgs, DescribeCommands,
    ListArgs, ListCommands, LogsArgs, RouteListArgs, SubmitArgs, TerminateArgs, UpdateCommands,
    UpdateRouteCommands, UserSecretArgs, WorkflowTarget,
};
use crate::cli::poll::RunPoller;
use crate::cli::presentation::{status_line, Symbol};
use crate::client::{HttpPraxClient, ListFilters, LogOptions, PraxApi};
use crate::config::PraxConfig;
use crate::error::{ApiResult, CommandError, Context, ErrorInfo};
use crate::models::{PermissionsRequest, SecretRequest, SubjectPermission, WorkflowKind};
use crate::render::{render, to_record, to_records, FieldSpec, OutputFormat};
use serde_json::{json, Value};
use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info_span, warn};

/// Asks the user a yes/no question.
pub type ConfirmFn = fn(&str) -> ApiResult<bool>;

/// Command defaults taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub default_format: OutputFormat,
    pub default_limit: u32,
    pub poll_interval: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Table,
            default_limit: ListFilters::DEFAULT_LIMIT,
            poll_interval: Duration::from_millis(2000),
        }
    }
}

impl RunSettings {
    pub fn from_config(config: &PraxConfig) -> Self {
        Self {
            default_format: config.output.format,
            default_limit: config.output.limit,
            poll_interval: Duration::from_millis(config.api.poll_interval_ms),
        }
    }
}

/// Runtime context for CLI execution: the API client plus command defaults.
pub struct RunContext<A: PraxApi> {
    api: A,
    settings: RunSettings,
    confirm: ConfirmFn,
}

impl RunContext<HttpPraxClient> {
    /// Build the HTTP-backed context from loaded configuration.
    pub fn from_config(config: &PraxConfig) -> ApiResult<Self> {
        let api = HttpPraxClient::new(&config.api)?;
        Ok(Self::new(api, RunSettings::from_config(config)))
    }
}

impl<A: PraxApi> RunContext<A> {
    pub fn new(api: A, settings: RunSettings) -> Self {
        Self {
            api,
            settings,
            confirm: prompt_confirm,
        }
    }

    /// Replace the interactive confirmation prompt.
    pub fn with_confirm(mut self, confirm: ConfirmFn) -> Self {
        self.confirm = confirm;
        self
    }

    /// Reference to the underlying API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Execute a command, writing its output to `out`.
    pub fn execute(&self, command: &Commands, out: &mut dyn Write) -> Result<(), CommandError> {
        let name = command_name(command);
        let _span = info_span!("command", name = %name).entered();
        debug!("Executing command");
        let result = self.execute_inner(command, out);
        if let Err(err) = &result {
            warn!(context = %err.context, kind = %err.info.kind, "Command failed: {}", err.info);
        }
        result
    }

    fn execute_inner(&self, command: &Commands, out: &mut dyn Write) -> Result<(), CommandError> {
        match command {
            Commands::List { command } => match command {
                ListCommands::Pipelines(args) => {
                    self.handle_list_workflows(WorkflowKind::Pipeline, args, out)
                }
                ListCommands::Tasks(args) => self.handle_list_workflows(WorkflowKind::Task, args, out),
                ListCommands::Builds(args) => {
                    self.handle_list_workflows(WorkflowKind::Build, args, out)
                }
                ListCommands::Routes(args) => self.handle_list_routes(args, false, out),
                ListCommands::Notebooks(args) => self.handle_list_routes(args, true, out),
            },
            Commands::Describe { command } => match command {
                DescribeCommands::Pipeline(args) => {
                    self.handle_describe_workflow(WorkflowKind::Pipeline, args, out)
                }
                DescribeCommands::Task(args) => {
                    self.handle_describe_workflow(WorkflowKind::Task, args, out)
                }
                DescribeCommands::Build(args) => {
                    self.handle_describe_workflow(WorkflowKind::Build, args, out)
                }
                DescribeCommands::Route { name } => self.handle_describe_route(name, out),
                DescribeCommands::User => self.handle_describe_user(out),
            },
            Commands::Submit(args) => self.handle_submit(args, out),
            Commands::Retry(target) => self.handle_retry(target, out),
            Commands::Terminate(args) => self.handle_terminate(args, out),
            Commands::Logs(args) => self.handle_logs(args, out),
            Commands::Update { command } => match command {
                UpdateCommands::Route {
                    command: UpdateRouteCommands::Thumbnail { name, file },
                } => self.handle_update_thumbnail(name, file, out),
            },
            Commands::Allow { command } => match command {
                AllowCommands::Route(args) => self.handle_allow_route(args, out),
            },
            Commands::Create { command } => match command {
                CreateCommands::UserSecret(args) => self.handle_create_user_secret(args, out),
            },
        }
    }

    fn handle_list_workflows(
        &self,
        kind: WorkflowKind,
        args: &ListArgs,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let filters = ListFilters {
            search: args.search.clone(),
            org: args.filters.org.clone(),
            user: args.filters.user.clone(),
            project: args.filters.project.clone(),
            stage: args.filters.stage.clone(),
            limit: args.limit.unwrap_or(self.settings.default_limit),
            ..ListFilters::default()
        };
        let context = format!("Error fetching {}", kind.plural());
        let page = self.api.list_workflows(kind, &filters).context(&context)?;
        if page.is_empty() {
            return emit(out, format!("No {} found!", kind.plural()));
        }
        let records = to_records(&page.items).context(&context)?;
        let format = args.output.unwrap_or(self.settings.default_format);
        let text = render(&records, &fields::workflow_list(kind), format, 0).context(&context)?;
        emit(out, text)?;
        if format.is_tabular() && page.is_truncated() {
            emit(
                out,
                format!("Showing {} of {} {}.", page.items.len(), page.count, kind.plural()),
            )?;
        }
        Ok(())
    }

    fn handle_list_routes(
        &self,
        args: &RouteListArgs,
        notebooks: bool,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let label = if notebooks { "notebooks" } else { "routes" };
        let filters = ListFilters {
            search: args.search.clone(),
            org: args.filters.org.clone(),
            user: args.filters.user.clone(),
            project: args.filters.project.clone(),
            stage: args.filters.stage.clone(),
            status: args.status.clone(),
            tier: args.tier.clone(),
            open: args.open_access.then_some(true),
            notebook: notebooks.then_some(true),
            limit: args.limit.unwrap_or(self.settings.default_limit),
        };
        let context = format!("Error fetching {}", label);
        let page = self.api.list_routes(&filters).context(&context)?;
        if page.is_empty() {
            return emit(out, format!("No {} found!", label));
        }
        let records = to_records(&page.items).context(&context)?;
        let format = args.output.unwrap_or(self.settings.default_format);
        let text = render(&records, &fields::route_list(), format, 0).context(&context)?;
        emit(out, text)?;
        if format.is_tabular() && page.is_truncated() {
            emit(
                out,
                format!("Showing {} of {} {}.", page.items.len(), page.count, label),
            )?;
        }
        Ok(())
    }

    fn handle_describe_workflow(
        &self,
        kind: WorkflowKind,
        args: &DescribeArgs,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let context = format!("Error fetching {}", kind.singular());
        let workflow = self.api.get_workflow(kind, &args.name).context(&context)?;
        let record = to_record(&workflow).context(&context)?;

        if let Some(format @ (OutputFormat::Yaml | OutputFormat::Json)) = args.output {
            return emit(out, render(&[record], &[], format, 0).context(&context)?);
        }

        emit(out, plain(&record, &fields::workflow_detail(kind), 0).context(&context)?)?;
        let Some(run) = &workflow.last_run else {
            return Ok(());
        };
        let run_record = to_record(run).context(&context)?;
        emit(out, "Last Run:")?;
        emit(out, plain(&run_record, &fields::run_detail(), 2).context(&context)?)?;
        if let Some(arguments) = run.arguments.as_ref().filter(|a| !is_blank(a)) {
            emit(out, "    Arguments:")?;
            emit(out, dump_yaml(arguments, 4).context(&context)?)?;
        }
        if let Some(details) = run.details.as_ref().filter(|d| !is_blank(d)) {
            emit(out, "  Run Details:")?;
            emit(out, dump_yaml(details, 2).context(&context)?)?;
        }
        Ok(())
    }

    fn handle_describe_route(&self, name: &str, out: &mut dyn Write) -> Result<(), CommandError> {
        let context = "Error fetching route";
        let route = self.api.get_route(name).context(context)?;
        let record = to_record(&route).context(context)?;
        emit(out, plain(&record, &fields::route_detail(), 0).context(context)?)
    }

    fn handle_describe_user(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        let context = "Error fetching user";
        let users = self.api.get_users().context(context)?;
        let Some(user) = users.first() else {
            return emit(out, "No users found!");
        };
        let record = to_record(user).context(context)?;
        emit(out, plain(&record, &fields::user_detail(), 0).context(context)?)
    }

    fn handle_submit(&self, args: &SubmitArgs, out: &mut dyn Write) -> Result<(), CommandError> {
        let WorkflowTarget { kind, name } = &args.target;
        let context = format!("Error submitting {}", kind.singular());
        let parameters = parse_key_values(&args.parameters).context(&context)?;
        debug!(kind = %kind, name = %name, parameters = parameters.len(), "Submitting run");
        let run = self.api.submit(*kind, name, &parameters).context(&context)?;
        emit(
            out,
            status_line(
                Symbol::Check,
                format!(
                    "{} '{}' submitted! Run '{}' is {}.",
                    kind.title(),
                    name,
                    run.name,
                    run.status
                ),
            ),
        )
    }

    fn handle_retry(&self, target: &WorkflowTarget, out: &mut dyn Write) -> Result<(), CommandError> {
        let kind = target.kind;
        let context = format!("Error retrying {}", kind.singular());
        let run = self.api.retry(kind, &target.name).context(&context)?;
        emit(
            out,
            status_line(
                Symbol::Check,
                format!(
                    "{} '{}' retried! Run '{}' is {}.",
                    kind.title(),
                    target.name,
                    run.name,
                    run.status
                ),
            ),
        )
    }

    fn handle_terminate(&self, args: &TerminateArgs, out: &mut dyn Write) -> Result<(), CommandError> {
        let kind = args.target.kind;
        let context = format!("Error terminating {}", kind.singular());
        let run = self.api.terminate(kind, &args.target.name).context(&context)?;

        if args.no_wait {
            return emit(
                out,
                status_line(
                    Symbol::Info,
                    format!("Termination of {} run '{}' requested.", kind.title(), run.name),
                ),
            );
        }

        let last = if run.status.is_active() {
            let poller = RunPoller::new(&self.api, kind, run.name.clone(), self.settings.poll_interval);
            poller.wait().context(&context)?.unwrap_or(run)
        } else {
            run
        };
        emit(
            out,
            status_line(
                Symbol::Check,
                format!(
                    "{} run '{}' terminated with status {}",
                    kind.title(),
                    last.name,
                    last.status
                ),
            ),
        )
    }

    fn handle_logs(&self, args: &LogsArgs, out: &mut dyn Write) -> Result<(), CommandError> {
        let WorkflowTarget { kind, name } = &args.target;
        let context = format!("Error fetching {} logs", kind.singular());
        let workflow = self.api.get_workflow(*kind, name).context(&context)?;
        let run = workflow.last_run.ok_or_else(|| {
            CommandError::new(
                &context,
                ErrorInfo::precondition(format!("{} '{}' has no runs yet", kind.title(), name)),
            )
        })?;
        let options = LogOptions {
            follow: args.follow,
            lines: args.lines,
        };
        let stream = self.api.run_logs(*kind, &run.name, options).context(&context)?;
        for line in stream {
            let line = line.context(&context)?;
            emit(out, line)?;
            out.flush().map_err(|e| CommandError::new("Error writing output", e.into()))?;
        }
        Ok(())
    }

    fn handle_update_thumbnail(
        &self,
        name: &str,
        file: &Path,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let route = self.api.get_route(name).context("Error fetching route")?;
        let content = std::fs::read(file).map_err(|e| {
            CommandError::new(
                "Error reading thumbnail",
                ErrorInfo::precondition(format!("{}: {}", file.display(), e)),
            )
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "thumbnail".to_string());
        debug!(route = %route.name, file = %file_name, bytes = content.len(), "Uploading thumbnail");
        let updated = self
            .api
            .update_route_thumbnail(&route.name, &file_name, content)
            .context("Error updating route thumbnail")?;
        let mut message = format!("Thumbnail of route '{}' updated!", updated.name);
        if let Some(url) = &updated.thumbnail {
            message.push_str(&format!(" {}", url));
        }
        emit(out, status_line(Symbol::Check, message))
    }

    fn handle_allow_route(&self, args: &AllowRouteArgs, out: &mut dyn Write) -> Result<(), CommandError> {
        let context = "Error updating route permissions";
        if args.users.is_empty() && args.groups.is_empty() {
            return Err(CommandError::new(
                context,
                ErrorInfo::precondition("At least one --user or --group is required"),
            ));
        }
        let route = self.api.get_route(&args.name).context("Error fetching route")?;
        let request = PermissionsRequest {
            users: args.users.clone(),
            groups: args.groups.clone(),
            view: args.view || args.change,
            change: args.change,
        };
        let permissions = self.api.allow_route(&route.name, &request).context(context)?;

        emit(
            out,
            status_line(
                Symbol::Check,
                format!("Permissions for route '{}' set successfully!", route.name),
            ),
        )?;
        let records: Vec<Value> = permissions
            .users
            .iter()
            .map(|p| permission_record("user", p))
            .chain(permissions.groups.iter().map(|p| permission_record("group", p)))
            .collect();
        if records.is_empty() {
            return Ok(());
        }
        let fields = [
            FieldSpec::new("Subject", "$.subject"),
            FieldSpec::new("Type", "$.type"),
            FieldSpec::new("View", "$.view"),
            FieldSpec::new("Change", "$.change"),
        ];
        emit(out, render(&records, &fields, OutputFormat::Table, 0).context(context)?)
    }

    fn handle_create_user_secret(
        &self,
        args: &UserSecretArgs,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let context = "Error creating user secret";
        let data = parse_key_values(&args.data).context(context)?;
        if data.is_empty() {
            return Err(CommandError::new(
                context,
                ErrorInfo::precondition("At least one --data key=value is required"),
            ));
        }

        let users = self.api.get_users().context("Error fetching user")?;
        let user = users.first().ok_or_else(|| {
            CommandError::new("Error fetching user", ErrorInfo::precondition("No user found"))
        })?;
        let org = args
            .org
            .clone()
            .or_else(|| user.current_org.clone())
            .ok_or_else(|| {
                CommandError::new(
                    context,
                    ErrorInfo::precondition("No organization given and no current org set, use --org"),
                )
            })?;

        let exists = user.secrets_in(&org).any(|s| s == args.name);
        if exists && !args.yes {
            let prompt = format!(
                "Secret '{}' already exists in org '{}'. Update it?",
                args.name, org
            );
            if !(self.confirm)(&prompt).context(context)? {
                return emit(out, format!("Aborted, secret '{}' left unchanged.", args.name));
            }
        }

        let request = SecretRequest {
            name: args.name.clone(),
            org: Some(org.clone()),
            description: args.description.clone(),
            data,
        };
        let secret = self.api.create_or_update_user_secret(&request).context(context)?;
        let verb = if exists { "updated" } else { "created" };
        emit(
            out,
            status_line(
                Symbol::Check,
                format!("User secret '{}' {} in org '{}'!", secret.name, verb, org),
            ),
        )
    }
}

/// Interactive confirmation on the terminal; fails when stdin is not a TTY.
fn prompt_confirm(prompt: &str) -> ApiResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| {
            ErrorInfo::precondition(format!(
                "Cannot ask for confirmation ({}), pass --yes to update without asking",
                e
            ))
        })
}

fn emit(out: &mut dyn Write, text: impl Display) -> Result<(), CommandError> {
    writeln!(out, "{}", text).map_err(|e| CommandError::new("Error writing output", e.into()))
}

fn plain(record: &Value, fields: &[FieldSpec], indent: usize) -> ApiResult<String> {
    render(std::slice::from_ref(record), fields, OutputFormat::Plain, indent)
}

fn dump_yaml(value: &Value, indent: usize) -> ApiResult<String> {
    render(std::slice::from_ref(value), &[], OutputFormat::Yaml, indent)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn permission_record(kind: &str, permission: &SubjectPermission) -> Value {
    json!({
        "subject": permission.subject,
        "type": kind,
        "view": permission.view,
        "change": permission.change,
    })
}
