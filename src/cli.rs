use std::path::PathBuf;

use anyhow::{bail, Context};
use bd_core::entities::{AccountGroup, Announcement, SalaryComponent, VoucherType};
use bd_core::{ListEntity, ListParams, RecordId, SortDirection};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::info;

use crate::bootstrap::{default_config_path, load_config, wire_dependencies, AppDeps};

#[derive(Parser, Debug)]
#[command(
    name = "bizdesk",
    version,
    about = "Bizdesk: list, inspect and toggle back-office records"
)]
pub struct Cli {
    /// Path to the TOML config (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to the platform log directory
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List one page of records
    List {
        resource: Resource,
        #[command(flatten)]
        filters: ListArgs,
    },
    /// Show a single record
    Show { resource: Resource, id: String },
    /// Flip a record's active flag
    Toggle { resource: Resource, id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    AccountGroups,
    VoucherTypes,
    Announcements,
    SalaryComponents,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// `asc` or `desc`; only used together with `--sort`
    #[arg(long)]
    pub direction: Option<SortDirection>,

    #[arg(long)]
    pub page: Option<u64>,

    #[arg(long)]
    pub per_page: Option<u64>,
}

impl ListArgs {
    pub fn to_params(&self) -> ListParams {
        let mut params = ListParams::new();
        if let Some(search) = &self.search {
            params = params.search(search.clone());
        }
        if let Some(status) = &self.status {
            params = params.status(status.clone());
        }
        if let Some(field) = &self.sort {
            params = params.sort(field.clone(), self.direction.unwrap_or(SortDirection::Asc));
        }
        if let Some(page) = self.page {
            params = params.page(page);
        }
        if let Some(per_page) = self.per_page {
            params = params.per_page(per_page);
        }
        params
    }
}

macro_rules! for_resource {
    ($resource:expr, $func:ident ( $($arg:expr),* )) => {
        match $resource {
            Resource::AccountGroups => $func::<AccountGroup>($($arg),*).await,
            Resource::VoucherTypes => $func::<VoucherType>($($arg),*).await,
            Resource::Announcements => $func::<Announcement>($($arg),*).await,
            Resource::SalaryComponents => $func::<SalaryComponent>($($arg),*).await,
        }
    };
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                path
            }
            None => default_config_path().unwrap_or_else(|| PathBuf::from("bizdesk.toml")),
        };
        let config = load_config(&config_path)?;
        let deps = wire_dependencies(config).context("Failed to wire dependencies")?;

        let output = execute(&deps, self.command).await?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// Run one command against already-wired dependencies and return its JSON output.
pub async fn execute(deps: &AppDeps, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::List { resource, filters } => {
            let params = filters.to_params();
            for_resource!(resource, list_records(deps, params))
        }
        Command::Show { resource, id } => {
            let id = RecordId::from(id);
            for_resource!(resource, show_record(deps, &id))
        }
        Command::Toggle { resource, id } => {
            let id = RecordId::from(id);
            for_resource!(resource, toggle_record(deps, &id))
        }
    }
}

async fn list_records<E: ListEntity>(deps: &AppDeps, params: ListParams) -> anyhow::Result<Value> {
    let (controller, _views) = deps.controller::<E>(params);
    let view = controller.load().await;

    if let Some(message) = &view.last_error {
        if view.is_empty() {
            bail!("{message}");
        }
    }

    Ok(json!({
        "resource": E::RESOURCE,
        "items": view.items,
        "pagination": view.pagination,
        "stats": view.stats,
    }))
}

async fn show_record<E: ListEntity>(deps: &AppDeps, id: &RecordId) -> anyhow::Result<Value> {
    let record = deps
        .resource::<E>()
        .show(id)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))
        .with_context(|| format!("Failed to load {} {id}", E::RESOURCE))?;
    Ok(serde_json::to_value(record)?)
}

async fn toggle_record<E: ListEntity>(deps: &AppDeps, id: &RecordId) -> anyhow::Result<Value> {
    let resource = deps.resource::<E>();
    let record = resource
        .toggle_status(id)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))
        .with_context(|| format!("Failed to toggle {} {id}", E::RESOURCE))?;
    let dropped = deps.cache.invalidate(&resource.namespace_key());
    info!(resource = E::RESOURCE, %id, dropped, "Toggled record status");
    Ok(serde_json::to_value(record)?)
}
