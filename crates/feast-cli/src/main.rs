mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use feast_router::HttpMethod;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feast")]
#[command(version, about = "Feast router tool - inspect routes, resolve requests and manage the route cache", long_about = None)]
struct Cli {
    /// Handler manifest describing modules, controllers, actions and routes
    #[arg(short, long, global = true, default_value = "feast.routes.toml")]
    manifest: PathBuf,

    /// Router configuration file
    #[arg(short, long, global = true, default_value = "feast.toml")]
    config: PathBuf,

    /// Show debug logs (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes {
        /// Only show routes of this HTTP method
        #[arg(short = 'X', long)]
        method: Option<HttpMethod>,
    },

    /// Resolve a web path
    Match {
        /// Request path, optionally with a query string
        path: String,

        /// HTTP method of the request
        #[arg(short = 'X', long, default_value = "GET")]
        method: HttpMethod,

        /// Print the router state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve and bind a CLI command, e.g. `feast cli small create --color=orange testing`
    Cli {
        /// Print the router state as JSON
        #[arg(long)]
        json: bool,

        /// Controller, action and argument tokens
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        tokens: Vec<String>,
    },

    /// Build the external path of a named route or a controller/action
    Path {
        /// Route name; omit to build a conventional path
        route: Option<String>,

        #[arg(long)]
        module: Option<String>,

        #[arg(long)]
        controller: Option<String>,

        #[arg(long)]
        action: Option<String>,

        /// HTTP method the route is registered for
        #[arg(short = 'X', long)]
        method: Option<HttpMethod>,

        /// Route argument, `name=value` (repeat a name for a list)
        #[arg(short, long = "arg", value_parser = commands::path::parse_pair)]
        args: Vec<(String, String)>,

        /// Query parameter, `name=value`
        #[arg(short, long, value_parser = commands::path::parse_pair)]
        query: Vec<(String, String)>,
    },

    /// Route cache management
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Scan the manifest and write the route cache
    Build,

    /// Show the routes stored in the cache
    Show,

    /// Delete the route cache
    Clear,
}

/// Log level used when `RUST_LOG` is unset
fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project = commands::Project::load(&cli.manifest, &cli.config)?;

    // Execute command
    match cli.command {
        Commands::Routes { method } => {
            commands::routes::execute(&project, method)?;
        }
        Commands::Match { path, method, json } => {
            commands::resolve::execute_match(&project, &path, method, json)?;
        }
        Commands::Cli { tokens, json } => {
            commands::resolve::execute_cli(&project, &tokens, json)?;
        }
        Commands::Path {
            route,
            module,
            controller,
            action,
            method,
            args,
            query,
        } => {
            let request = commands::path::build_request(
                route, module, controller, action, method, args, query,
            );
            commands::path::execute(&project, &request)?;
        }
        Commands::Cache { command } => {
            commands::cache::execute(&project, command)?;
        }
    }

    Ok(())
}
