//! AHCP - authorization CLI
//!
//! Inspect permission decisions and the section table from the shell

use ahcp_core::config::CONFIG_FILE_NAME;
use ahcp_core::rbac::{evaluate_str, Action, Module, Permissions, Role};
use ahcp_core::session::validate_email;
use ahcp_core::{AuthzConfig, Decision, Identity, NoticeSink, RecordingSink};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ahcp")]
#[command(version = "0.4.2")]
#[command(about = "AHCP dashboard authorization tool", long_about = None)]
struct Cli {
    /// Path to ahcp-authz.yaml (defaults to ./ahcp-authz.yaml, then built-in settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide a single permission request
    Check {
        /// Role (super_admin, section_supervisor, field_worker)
        #[arg(long)]
        role: String,
        /// Section label assigned to the user
        #[arg(long)]
        section: Option<String>,
        /// User email
        #[arg(long, default_value = "cli@ahcp.local")]
        email: String,
        /// Module (e.g. vaccination, clients)
        #[arg(long)]
        module: String,
        /// Action (view, create, edit, delete)
        #[arg(long)]
        action: String,
        /// Use the noisy path and print any notice
        #[arg(long)]
        notify: bool,
    },
    /// Print every module x action decision for a user
    Matrix {
        /// Role (super_admin, section_supervisor, field_worker)
        #[arg(long)]
        role: String,
        /// Section label assigned to the user
        #[arg(long)]
        section: Option<String>,
        /// User email
        #[arg(long, default_value = "cli@ahcp.local")]
        email: String,
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the section label table
    Sections,
    /// Validate a config file
    ValidateConfig {
        /// Path to the config file
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct MatrixRow {
    module: Module,
    action: Action,
    decision: Decision,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ahcp_core=debug,ahcp=debug" } else { "ahcp_core=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("AHCP_LOG").unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<AuthzConfig> {
    if let Some(path) = explicit {
        return AuthzConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let cwd = std::env::current_dir()?;
    if cwd.join(CONFIG_FILE_NAME).exists() {
        return AuthzConfig::load_from_dir(&cwd).context("failed to load config from current directory");
    }

    Ok(AuthzConfig::default())
}

fn build_identity(config: &AuthzConfig, role: &str, section: Option<&str>, email: &str) -> Result<Identity> {
    let role: Role = role.parse()?;
    validate_email(email)?;
    let section_map = config.section_map();
    section_map.validate()?;
    Ok(Identity::resolve(role, section, email, &section_map))
}

fn print_decision(decision: &Decision) {
    match decision {
        Decision::Allowed => println!("{}", "ALLOW".green().bold()),
        Decision::Denied(reason) => println!("{}  {}", "DENY".red().bold(), reason),
    }
}

fn handle_check(
    config: &AuthzConfig,
    identity: &Identity,
    module: &str,
    action: &str,
    notify: bool,
) -> Result<()> {
    let perms = Permissions::new(Some(identity)).with_notice_config(config.notice());
    let decision = evaluate_str(perms.identity(), module, action);
    print_decision(&decision);

    if notify {
        if let (Ok(module), Ok(action)) = (module.parse::<Module>(), action.parse::<Action>()) {
            let sink = RecordingSink::new();
            perms.check_with_notice(module, action, &sink as &dyn NoticeSink);
            for notice in sink.drain() {
                println!("  {} {}", "notice:".yellow(), notice.message);
                println!("          {} ({} ms)", notice.description, notice.duration_ms);
            }
        }
    }

    Ok(())
}

fn handle_matrix(identity: &Identity, format: &str) -> Result<()> {
    let perms = Permissions::new(Some(identity));
    let rows: Vec<MatrixRow> = Module::all()
        .iter()
        .flat_map(|module| {
            Action::all().iter().map(move |action| MatrixRow {
                module: *module,
                action: *action,
                decision: perms.evaluate(ahcp_core::PermissionRequest::new(*module, *action)),
            })
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "table" => {
            println!(
                "{:<18} {:<8} {:<8} {:<8} {:<8}",
                "MODULE", "VIEW", "CREATE", "EDIT", "DELETE"
            );
            for module in Module::all() {
                let cells: Vec<String> = Action::all()
                    .iter()
                    .map(|action| {
                        if perms.check(*module, *action) {
                            format!("{:<8}", "yes").green().to_string()
                        } else {
                            format!("{:<8}", "no").red().to_string()
                        }
                    })
                    .collect();
                println!("{:<18} {}", module.as_str(), cells.join(" "));
            }
        }
        other => anyhow::bail!("unknown format '{}', expected table or json", other),
    }

    Ok(())
}

fn handle_sections(config: &AuthzConfig) {
    let map = config.section_map();
    println!("{} section labels", map.len());
    for (label, scope) in map.iter() {
        match scope {
            Some(scope) => println!("  {}  →  {}", label, scope.to_string().cyan()),
            None => println!("  {}  →  {}", label, "(unmapped)".dimmed()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { role, section, email, module, action, notify } => {
            let config = load_config(cli.config.as_deref())?;
            let identity = build_identity(&config, &role, section.as_deref(), &email)?;
            handle_check(&config, &identity, &module, &action, notify)?;
        }

        Commands::Matrix { role, section, email, format } => {
            let config = load_config(cli.config.as_deref())?;
            let identity = build_identity(&config, &role, section.as_deref(), &email)?;
            handle_matrix(&identity, &format)?;
        }

        Commands::Sections => {
            let config = load_config(cli.config.as_deref())?;
            handle_sections(&config);
        }

        Commands::ValidateConfig { path } => {
            let config = AuthzConfig::load(&path)
                .with_context(|| format!("invalid config {}", path.display()))?;
            println!(
                "{} {} ({} section labels, notice {} ms)",
                "✓".green(),
                config.metadata.name,
                config.section_map().len(),
                config.notice().duration_ms
            );
        }
    }

    Ok(())
}
