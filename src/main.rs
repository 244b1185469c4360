use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use meshsim::lifecycle::{SystemEmitter, SystemSupervisor};
use meshsim::{node, orchestrator, settings};

/// Operation to perform for the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Generate the control scripts and role report
    Generate,
    /// Run the start sequence in-process
    Start,
    /// Terminate the routing daemon
    Stop,
}

/// OLSR routing service configurator for emulated network nodes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the node description YAML file
    #[arg(short, long)]
    node: PathBuf,

    /// Path to a service settings YAML file (defaults apply if omitted)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output directory for generated artifacts and the node working dir
    #[arg(short, long, default_value = "meshsim_output")]
    output: PathBuf,

    /// Operation to perform
    #[arg(value_enum, default_value_t = Action::Generate)]
    action: Action,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting meshsim");
    info!("Node description: {:?}", args.node);
    info!("Output directory: {:?}", args.output);

    let settings = settings::load_settings(args.settings.as_deref())?;
    let node = node::load_node(&args.node)?;

    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", args.output.display()))?;

    let mut emitter = SystemEmitter::new(args.output.clone());

    match args.action {
        Action::Generate => {
            let role = orchestrator::generate_artifacts(&settings, &node, &mut emitter)?;
            info!(
                "Artifacts generated for '{}' (gateway={} hna={})",
                node.hostname,
                role.gateway,
                role.hna.is_some()
            );
        }
        Action::Start => {
            let mut supervisor = SystemSupervisor::new(args.output.clone());
            orchestrator::start_node(&settings, &node, &mut emitter, &mut supervisor)?;
            info!("Routing service started on '{}'", node.hostname);
        }
        Action::Stop => {
            let mut supervisor = SystemSupervisor::new(args.output.clone());
            orchestrator::stop_node(&settings, &mut supervisor);
            info!("Routing service stopped on '{}'", node.hostname);
        }
    }

    info!("meshsim completed successfully");
    Ok(())
}
