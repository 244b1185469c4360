//! Service orchestrator.
//!
//! Ties classification, synthesis, and lifecycle control together into the
//! three operations the CLI (and the hosting framework) invoke: artifact
//! generation, in-process start, and in-process stop.

use crate::address;
use crate::lifecycle::{ArtifactEmitter, LifecycleController, ProcessSupervisor};
use crate::node::Node;
use crate::registry::{NodeReport, REPORT_FILENAME};
use crate::role::{self, Role};
use crate::scripts::{self, ArtifactKind};
use crate::settings::Settings;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

/// Generate the per-node artifacts: the three control scripts and the role
/// report. Returns the classified role for the caller's logging.
pub fn generate_artifacts(
    settings: &Settings,
    node: &Node,
    emitter: &mut dyn ArtifactEmitter,
) -> Result<Role> {
    let role = role::classify(node, &settings.local_subnet);
    info!(
        "Node '{}' classified: gateway={} hna={}",
        node.hostname,
        role.gateway,
        role.hna.is_some()
    );

    for kind in ArtifactKind::all() {
        let contents = scripts::render(kind, settings, node)
            .wrap_err_with(|| format!("Failed to render {:?}", kind))?;
        emitter
            .write_artifact(kind.filename(), &contents)
            .wrap_err_with(|| format!("Failed to write {}", kind.filename()))?;
        info!("Generated {}", kind.filename());
    }

    let binding = address::primary_binding(node, &settings.primary_interface)?;
    let report = NodeReport::new(node, &settings.primary_interface, &binding, &role);
    emitter
        .write_artifact(REPORT_FILENAME, &report.to_json()?)
        .wrap_err_with(|| format!("Failed to write {}", REPORT_FILENAME))?;
    info!("Generated {}", REPORT_FILENAME);

    Ok(role)
}

/// Run the start sequence in-process (what the generated start script does
/// when the framework executes it inside the node).
pub fn start_node(
    settings: &Settings,
    node: &Node,
    emitter: &mut dyn ArtifactEmitter,
    supervisor: &mut dyn ProcessSupervisor,
) -> Result<()> {
    let mut controller = LifecycleController::new(settings.clone());
    controller
        .start(node, emitter, supervisor)
        .wrap_err_with(|| format!("Failed to start routing service on '{}'", node.hostname))?;
    Ok(())
}

/// Terminate the daemon. Never fails: an absent daemon is a no-op.
pub fn stop_node(settings: &Settings, supervisor: &mut dyn ProcessSupervisor) {
    let mut controller = LifecycleController::new(settings.clone());
    controller.stop(supervisor);
}
