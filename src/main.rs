use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use plugup::config::{Config, config_path, executable_suffix, log_path};
use plugup::inventory::manifest::HostLayout;
use plugup::inventory::resolver::PluginPattern;
use plugup::upgrade::installer::PackageManagerInstaller;
use plugup::upgrade::prompt::{AssumeYes, Confirmer, TerminalConfirmer};
use plugup::upgrade::suggestion::HttpSuggestionClient;
use plugup::upgrade::workflow::{Outcome, UpgradeCheck, UpgradeWorkflow};

#[derive(Parser)]
#[command(name = "plugup")]
#[command(version, about = "Upgrade installed plugins to versions suggested for this host")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct Overrides {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Host data directory containing package.json and node_modules
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Manifest shipped with the host application
    #[arg(long, global = true)]
    bundled_manifest: Option<PathBuf>,

    /// Host version sent to the suggestion service
    #[arg(long, global = true)]
    host_version: Option<String>,

    /// Suggestion service endpoint
    #[arg(long, global = true)]
    suggestion_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Check for upgrades and apply them after confirmation (default)
    Upgrade {
        /// Apply the plan without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Show available upgrades without installing anything
    Check,
    /// List extraneous plugins and their installed versions
    List,
}

impl Overrides {
    fn apply(self, mut config: Config) -> Config {
        if let Some(root) = self.root {
            config.root = Some(root);
        }
        if let Some(bundled_manifest) = self.bundled_manifest {
            config.bundled_manifest = Some(bundled_manifest);
        }
        if let Some(host_version) = self.host_version {
            config.host_version = Some(host_version);
        }
        if let Some(suggestion_url) = self.suggestion_url {
            config.suggestion_url = suggestion_url;
        }
        config
    }
}

fn main() -> ExitCode {
    // --help and --version exit here, before any file is created
    let cli = Cli::parse();

    let _guard = match plugup::logging::init(&log_path()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.overrides.config.clone().unwrap_or_else(config_path);
    let config = cli.overrides.apply(Config::load(&path)?);
    info!("Using host root {}", config.root_dir().display());

    let check = build_check(&config)?;

    match cli.command.unwrap_or(Command::Upgrade { yes: false }) {
        Command::List => {
            let installed = check.installed().await?;
            let mut names: Vec<_> = installed.keys().collect();
            names.sort();
            for name in names {
                println!("{}@{}", name, installed[name]);
            }
        }
        Command::Check => {
            let plan = check.plan().await?;
            if plan.is_empty() {
                println!("All plugins are up to date.");
            } else {
                print!("{}", plugup::upgrade::prompt::render_plan(&plan));
            }
        }
        Command::Upgrade { yes } => {
            let confirmer: Arc<dyn Confirmer> = if yes {
                Arc::new(AssumeYes)
            } else {
                Arc::new(TerminalConfirmer::stdio())
            };
            let installer = PackageManagerInstaller::new(
                config.package_manager.clone(),
                executable_suffix(),
                config.root_dir(),
            );

            let workflow = UpgradeWorkflow::new(check, confirmer, Arc::new(installer));
            match workflow.run().await? {
                Outcome::UpToDate => println!("All plugins are up to date."),
                Outcome::Skipped(_) => println!("Upgrade skipped."),
                Outcome::Upgraded(plan) => println!("Upgraded {} plugin(s).", plan.len()),
            }
        }
    }

    Ok(())
}

fn build_check(config: &Config) -> anyhow::Result<UpgradeCheck> {
    let layout = HostLayout::new(config.root_dir(), config.bundled_manifest_path());
    let pattern = PluginPattern::new(&config.plugin_pattern)?;
    let client = HttpSuggestionClient::new(&config.suggestion_url)?;

    let check = UpgradeCheck::new(layout, pattern, config.read_limit(), Arc::new(client));
    Ok(match &config.host_version {
        Some(version) => check.with_host_version(version.clone()),
        None => check,
    })
}
