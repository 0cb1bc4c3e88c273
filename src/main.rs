//! mcp-manager - MCP server installer CLI
//!
//! Every command reports failures as a message and exits 0.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mcp_manager::config::{list_installed, set_config_path, SetPathOutcome};
use mcp_manager::{
    get_server_info, install, search_servers, uninstall, Client, InstallError, InstallOptions,
    InstalledServer, Paths, Scope, ServerDescriptor, SystemProbe, TerminalPrompt,
};

#[derive(Parser)]
#[command(name = "mcp-manager")]
#[command(about = "MCP Manager - search, install, and uninstall MCP servers for Claude")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the registry for servers matching a keyword
    Search {
        /// Keyword matched against server names and descriptions
        keyword: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show detailed info for a server
    Info {
        /// Server name (e.g. filesystem)
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install a server into the Claude config
    Install {
        /// Server name to install
        name: String,

        /// Client type
        #[arg(long, value_enum)]
        client: Option<Client>,

        /// Installation scope
        #[arg(long, value_enum)]
        scope: Option<Scope>,
    },

    /// Remove a server from the Claude config
    Uninstall {
        /// Server name to remove
        name: String,

        /// Client type
        #[arg(long, value_enum)]
        client: Option<Client>,
    },

    /// List installed servers
    List {
        /// Include entries that are not in the registry
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the Claude config location
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved config path
    Path,

    /// Use a different config file
    SetPath {
        /// New config file path
        path: String,
    },
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "mcp_manager=debug,warn" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let paths = Paths::resolve();

    match cli.command {
        Commands::Search { keyword, json } => {
            let servers: Vec<&ServerDescriptor> = search_servers(&keyword)
                .into_iter()
                .filter_map(get_server_info)
                .collect();
            if json {
                print_json(&servers);
                return;
            }
            if servers.is_empty() {
                println!("No servers found matching: {}", keyword);
                return;
            }
            println!("Found {} matching servers:", servers.len());
            for s in servers {
                println!("\n{}:", s.name);
                println!("  Description: {}", s.description);
                println!("  Maintainer: {}", s.maintainer);
            }
        }
        Commands::Info { name, json } => match get_server_info(&name) {
            Some(server) if json => print_json(server),
            Some(server) => print_info_output(server),
            None => println!("Server not found: {}", name),
        },
        Commands::Install { name, client, scope } => {
            let options = InstallOptions { client, scope };
            match install(&paths, &name, options, &SystemProbe, &TerminalPrompt) {
                Ok(_) => println!("Successfully installed {} for Claude", name),
                Err(InstallError::MissingDependencies(missing)) => {
                    println!("Missing required dependencies:");
                    for dep in missing {
                        println!("- {}", dep);
                    }
                    println!("\nPlease install the missing dependencies and try again.");
                }
                Err(e) => println!("{}", e),
            }
        }
        Commands::Uninstall { name, client } => match uninstall(&paths, &name, client) {
            Ok(_) => println!("Successfully removed {} from Claude config", name),
            Err(e) => println!("{}", e),
        },
        Commands::List { all, json } => {
            let config_path = match paths.resolve_config_path() {
                Ok(p) => p,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            let servers = match list_installed(&config_path, all) {
                Ok(s) => s,
                Err(e) => {
                    println!("Error reading Claude config: {}", e);
                    return;
                }
            };
            if json {
                print_json(&servers);
            } else if servers.is_empty() {
                println!("No MCP servers found in Claude configuration.");
            } else {
                print_list_table(&servers);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => match paths.resolve_config_path() {
                Ok(config_path) => {
                    println!("Config path: {}", config_path.display());
                    println!("Exists:      {}", if config_path.exists() { "yes" } else { "no" });
                }
                Err(e) => println!("{}", e),
            },
            ConfigAction::SetPath { path } => match set_config_path(&paths, &path, &TerminalPrompt) {
                Ok(SetPathOutcome::Updated { path, copied_from }) => {
                    if let Some(from) = copied_from {
                        println!("Copied existing config from {}", from.display());
                    }
                    println!("Config path set to: {}", path.display());
                }
                Ok(SetPathOutcome::Aborted) => println!("Aborted. Config path unchanged."),
                Err(e) => println!("Error: {}", e),
            },
        },
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(output) => println!("{output}"),
        Err(e) => println!("Error: failed to serialize output: {}", e),
    }
}

fn format_command_line(server: &ServerDescriptor) -> String {
    let launch = &server.launch_config;
    let mut parts = vec![launch.command.clone()];
    parts.extend(launch.args.iter().cloned());
    parts.join(" ")
}

fn print_info_output(server: &ServerDescriptor) {
    println!("\nServer: {}", server.name);
    println!("Description: {}", server.description);
    println!("Maintainer: {}", server.maintainer);
    println!("Command: {}", format_command_line(server));
    if let Some(env) = &server.launch_config.env {
        for (k, v) in env {
            println!("Env: {}={}", k, v);
        }
    }

    if !server.required_config.is_empty() {
        println!("\nRequired configuration:");
        for note in &server.required_config {
            println!("- {}", note);
        }
    }

    if !server.dependencies.is_empty() {
        println!("\nDependencies:");
        for dep in &server.dependencies {
            println!("- {}", dep);
        }
    }

    if let Some(prompt) = server.user_input_prompt.as_deref().filter(|_| server.requires_user_input) {
        println!("\nAsks on install: {}", prompt);
    }
}

fn print_list_table(servers: &[InstalledServer]) {
    println!("\nInstalled MCP Servers:");
    println!("{}", "=".repeat(80));

    for s in servers {
        println!("\nServer: {}", s.name);
        if s.is_known() {
            println!("Description: {}", s.description.as_deref().unwrap_or_default());
            println!("Maintainer: {}", s.maintainer.as_deref().unwrap_or_default());
        } else {
            println!("Description: (unknown, not in registry)");
        }
        println!("{}", "-".repeat(40));
    }
}
