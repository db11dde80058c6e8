use std::{path::PathBuf, sync::Arc};

use canvas_lms::{
    CanvasClient,
    config::{self, CanvasConfig},
    logging::{LoggingConfig, init_logging},
    mcp::CanvasMcpServer,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use rmcp::{ServiceExt, transport::stdio};

mod commands;

use commands::inspect::Resource;

#[derive(Debug, Parser)]
#[command(name = "canvas", version, about = "Canvas LMS client and MCP server")]
struct Cli {
    /// Canvas instance URL, e.g. https://school.instructure.com
    #[arg(long, global = true)]
    host: Option<String>,

    /// API access token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Settings file (defaults to canvas-lms.toml in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dump every API response into ./canvas-logs
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the raw structure of an API response
    Inspect {
        #[arg(value_enum)]
        resource: Resource,
        /// Item id; required for assignments and modules
        #[arg(long)]
        id: Option<String>,
    },
    /// Upcoming assignment due dates
    Upcoming {
        #[arg(long, short = 'c')]
        course_id: Option<String>,
    },
    /// Upcoming due dates from a single GraphQL query
    GraphqlUpcoming,
    /// Every active course with all of its dated assignments
    DueDates,
    /// Serve the MCP tools over stdio
    Mcp,
    /// Read or update the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Store the global --host / --token values
    Save {
        /// Default log filter, e.g. `info` or `canvas_lms=debug`
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Print the stored settings with the token masked
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let settings = config::load_config(&config_path)?;

    let logging = LoggingConfig::from_env().with_level(settings.log_level.as_deref());
    let _log_guard =
        init_logging(logging).map_err(|e| eyre!("Failed to initialize logging: {e}"))?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "canvas starting up");

    if let Command::Config { action } = &cli.command {
        match action {
            ConfigAction::Save { log_level } => commands::settings::save(
                &config_path,
                settings,
                cli.host.clone(),
                cli.token.clone(),
                log_level.clone(),
            )?,
            ConfigAction::Show => commands::settings::show(&config_path, &settings),
        }
        return Ok(());
    }

    let client = Arc::new(build_client(&cli, &settings)?);

    match cli.command {
        Command::Inspect { resource, id } => {
            commands::inspect::run(&client, resource, id.as_deref()).await?
        },
        Command::Upcoming { course_id } => {
            commands::upcoming::run(&client, course_id.as_deref()).await?
        },
        Command::GraphqlUpcoming => commands::upcoming::run_graphql(&client).await?,
        Command::DueDates => commands::due_dates::run(&client).await?,
        Command::Mcp => {
            CanvasMcpServer::new(client)
                .serve(stdio())
                .await?
                .waiting()
                .await?;
        },
        Command::Config { .. } => {},
    }

    Ok(())
}

fn build_client(cli: &Cli, settings: &CanvasConfig) -> Result<CanvasClient> {
    let client_config = settings
        .client_config(cli.token.clone(), cli.host.clone())?
        .with_debug_logging(cli.debug);
    Ok(CanvasClient::from_config(client_config)?)
}
