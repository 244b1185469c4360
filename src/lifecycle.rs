//! Routing service lifecycle control.
//!
//! Sequences the start procedure (network stack adjustment, interface
//! readdressing, config write, optional gateway shaping, daemon launch)
//! and the stop procedure (terminate the daemon by name). The controller
//! never talks to the system directly: all writes and commands go through
//! the `ArtifactEmitter` and `ProcessSupervisor` capabilities, so tests can
//! substitute recording fakes.
//!
//! Stop terminates by process name rather than through the retained
//! handle: the controller instance asked to stop may not be the one that
//! started the daemon (e.g. after a framework restart), so the process
//! name is the only contract between the two transitions.

use crate::address::{self, AddressError, FLAT_PREFIX_LEN};
use crate::node::Node;
use crate::olsr::RoutingConfig;
use crate::role;
use crate::settings::{Settings, OLSRD_CONF_FILENAME, OLSRD_PROCESS_NAME};
use log::{info, warn};
use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Writes generated artifacts and runs shell commands inside the node.
/// Supplied by the hosting framework in production.
pub trait ArtifactEmitter {
    /// Write `contents` to the named file in the node's working directory.
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()>;

    /// Run a shell command inside the node. `Ok(true)` means zero exit.
    fn execute(&mut self, command: &str) -> io::Result<bool>;
}

/// Launches and terminates the routing daemon process.
pub trait ProcessSupervisor {
    /// Launch the daemon and retain its handle. Must fail if the
    /// executable is missing or the process exits within the timeout
    /// window.
    fn launch(&mut self, executable: &str, args: &[&str], timeout: Duration) -> io::Result<()>;

    /// Terminate every process with the given name. Returns whether any
    /// was found; an absent process is not an error.
    fn terminate_by_name(&mut self, name: &str) -> bool;
}

/// Lifecycle errors. `Precondition` surfaces before any mutation; the
/// remaining variants abort the start sequence.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Precondition(#[from] AddressError),

    #[error("failed to rebind interface '{name}': {reason}")]
    InterfaceReconfigure { name: String, reason: String },

    #[error("failed to write '{name}': {source}")]
    ConfigWrite {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch '{executable}': {source}")]
    DaemonLaunch {
        executable: String,
        #[source]
        source: io::Error,
    },
}

/// Controller states. `Starting` and `Stopping` are transient: callers
/// only ever observe `Stopped` or `Running` across the blocking calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Per-node lifecycle controller. Independent across nodes; holds no
/// state beyond the settings and the current lifecycle state.
pub struct LifecycleController {
    settings: Settings,
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: LifecycleState::Stopped,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Run the start sequence. On any fatal error the daemon is not
    /// launched and the controller remains `Stopped`.
    pub fn start(
        &mut self,
        node: &Node,
        emitter: &mut dyn ArtifactEmitter,
        supervisor: &mut dyn ProcessSupervisor,
    ) -> Result<(), LifecycleError> {
        self.state = LifecycleState::Starting;
        match self.run_start_sequence(node, emitter, supervisor) {
            Ok(()) => {
                self.state = LifecycleState::Running;
                info!("Routing daemon running on node '{}'", node.hostname);
                Ok(())
            }
            Err(err) => {
                self.state = LifecycleState::Stopped;
                Err(err)
            }
        }
    }

    fn run_start_sequence(
        &mut self,
        node: &Node,
        emitter: &mut dyn ArtifactEmitter,
        supervisor: &mut dyn ProcessSupervisor,
    ) -> Result<(), LifecycleError> {
        let ifname = self.settings.primary_interface.clone();

        // Precondition: resolve the binding before touching anything
        let binding = address::primary_binding(node, &ifname)?;
        let node_role = role::classify(node, &self.settings.local_subnet);
        info!(
            "Starting routing service on '{}' ({}/{} gateway={} hna={})",
            node.hostname,
            binding.addr,
            binding.prefix_len,
            node_role.gateway,
            node_role.hna.is_some()
        );

        // IPv6 plays no part in the emulation; losing this is harmless
        if let Err(reason) = self.run_command(
            emitter,
            "echo 1 > /proc/sys/net/ipv6/conf/all/disable_ipv6",
        ) {
            warn!("Could not disable IPv6 on '{}': {}", node.hostname, reason);
        }

        // Rebind the primary interface into the flat /16 broadcast domain
        let del = format!(
            "ip addr del {}/{} dev {}",
            binding.addr, binding.prefix_len, ifname
        );
        let add = format!(
            "ip addr add {}/{} brd {} dev {}",
            binding.addr, FLAT_PREFIX_LEN, binding.broadcast, ifname
        );
        for command in [del, add] {
            self.run_command(emitter, &command).map_err(|reason| {
                LifecycleError::InterfaceReconfigure {
                    name: ifname.clone(),
                    reason,
                }
            })?;
        }

        // Write the routing configuration; the daemon is only launched
        // against a complete config
        let config = RoutingConfig::for_role(&ifname, &node_role, &self.settings.plugins);
        emitter
            .write_artifact(OLSRD_CONF_FILENAME, &config.render())
            .map_err(|source| LifecycleError::ConfigWrite {
                name: OLSRD_CONF_FILENAME.to_string(),
                source,
            })?;

        if node_role.gateway {
            self.apply_uplink_shaping(emitter, &node.hostname);
        }

        let executable = self.settings.olsrd_executable();
        supervisor
            .launch(
                &executable,
                &["-f", OLSRD_CONF_FILENAME, "-d", "0"],
                self.settings.launch_timeout,
            )
            .map_err(|source| LifecycleError::DaemonLaunch { executable, source })?;

        Ok(())
    }

    /// Egress shaping on the uplink. Absence degrades performance, not
    /// correctness, so failures only warn.
    fn apply_uplink_shaping(&mut self, emitter: &mut dyn ArtifactEmitter, hostname: &str) {
        let uplink = self.settings.uplink_interface.clone();
        let qdisc = format!(
            "tc qdisc add dev {} parent root handle 1: htb default 1",
            uplink
        );
        let class = format!(
            "tc class add dev {} parent 1: classid 1:1 htb rate {}",
            uplink, self.settings.shaping_rate
        );
        for command in [qdisc, class] {
            if let Err(reason) = self.run_command(emitter, &command) {
                warn!(
                    "Could not apply uplink shaping on '{}' ({}): {}",
                    hostname, uplink, reason
                );
            }
        }
    }

    fn run_command(
        &mut self,
        emitter: &mut dyn ArtifactEmitter,
        command: &str,
    ) -> Result<(), String> {
        match emitter.execute(command) {
            Ok(true) => Ok(()),
            Ok(false) => Err(format!("command exited non-zero: {}", command)),
            Err(err) => Err(format!("command failed to run: {}: {}", command, err)),
        }
    }

    /// Terminate the daemon. Idempotent: an absent daemon is a no-op
    /// success, and the controller always ends up `Stopped`.
    pub fn stop(&mut self, supervisor: &mut dyn ProcessSupervisor) {
        self.state = LifecycleState::Stopping;
        if supervisor.terminate_by_name(OLSRD_PROCESS_NAME) {
            info!("Terminated routing daemon");
        } else {
            info!("No routing daemon process found; nothing to stop");
        }
        self.state = LifecycleState::Stopped;
    }
}

/// Emitter backed by the local filesystem and `/bin/bash`, for running the
/// lifecycle directly inside a node.
pub struct SystemEmitter {
    workdir: PathBuf,
}

impl SystemEmitter {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

impl ArtifactEmitter for SystemEmitter {
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()> {
        std::fs::write(self.workdir.join(name), contents)
    }

    fn execute(&mut self, command: &str) -> io::Result<bool> {
        let status = Command::new("/bin/bash")
            .arg("-c")
            .arg(command)
            .current_dir(&self.workdir)
            .status()?;
        Ok(status.success())
    }
}

/// How long to watch a freshly launched daemon for an immediate exit.
const LAUNCH_GRACE: Duration = Duration::from_millis(500);
const LAUNCH_POLL: Duration = Duration::from_millis(50);

/// Supervisor backed by `std::process`. Retains the child handle of the
/// daemon it launched; termination goes through `killall` by name.
pub struct SystemSupervisor {
    workdir: PathBuf,
    child: Option<Child>,
}

impl SystemSupervisor {
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            workdir,
            child: None,
        }
    }
}

impl ProcessSupervisor for SystemSupervisor {
    fn launch(&mut self, executable: &str, args: &[&str], timeout: Duration) -> io::Result<()> {
        let mut child = Command::new(executable)
            .args(args)
            .current_dir(&self.workdir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Watch briefly for an immediate exit; the daemon itself is
        // long-lived and is not waited on.
        let deadline = Instant::now() + LAUNCH_GRACE.min(timeout);
        while Instant::now() < deadline {
            if let Some(status) = child.try_wait()? {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("daemon exited immediately with {}", status),
                ));
            }
            std::thread::sleep(LAUNCH_POLL);
        }

        self.child = Some(child);
        Ok(())
    }

    fn terminate_by_name(&mut self, name: &str) -> bool {
        self.child = None;
        match Command::new("killall").arg(name).status() {
            // killall exits non-zero when no process matched
            Ok(status) => status.success(),
            Err(err) => {
                warn!("killall {} failed to run: {}", name, err);
                false
            }
        }
    }
}
