//! Per-node control script generation.
//!
//! The hosting framework executes plain shell fragments inside each node;
//! meshsim generates them. Which artifact to produce is selected by the
//! `ArtifactKind` tag, and each branch is a pure function of the settings
//! and the node description.
//!
//! Role decisions are made here, at generation time: the emitted shell
//! contains no hostname checks or address greps. A gateway's start script
//! simply carries the shaping commands and a config heredoc that already
//! includes the default-route announcement.

use crate::address::{self, AddressError, FLAT_PREFIX_LEN};
use crate::node::Node;
use crate::olsr::RoutingConfig;
use crate::role;
use crate::settings::{Settings, OLSRD_CONF_FILENAME, OLSRD_PROCESS_NAME};

/// The artifacts meshsim can generate for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Start script: readdress the interface, write the daemon config,
    /// apply gateway shaping, launch the daemon.
    StartScript,
    /// Stop script: terminate the daemon by name.
    StopScript,
    /// Interactive environment for shells spawned inside the node.
    EnvScript,
}

impl ArtifactKind {
    /// Filename the artifact is written to inside the node directory.
    pub fn filename(&self) -> &'static str {
        match self {
            ArtifactKind::StartScript => "olsrdservice_start.sh",
            ArtifactKind::StopScript => "olsrdservice_stop.sh",
            ArtifactKind::EnvScript => ".bashrc",
        }
    }

    /// All artifact kinds, in generation order.
    pub fn all() -> [ArtifactKind; 3] {
        [
            ArtifactKind::StartScript,
            ArtifactKind::StopScript,
            ArtifactKind::EnvScript,
        ]
    }
}

/// Render one artifact for a node.
pub fn render(
    kind: ArtifactKind,
    settings: &Settings,
    node: &Node,
) -> Result<String, AddressError> {
    match kind {
        ArtifactKind::StartScript => render_start_script(settings, node),
        ArtifactKind::StopScript => Ok(render_stop_script()),
        ArtifactKind::EnvScript => Ok(render_env_script(settings)),
    }
}

fn script_header() -> String {
    "#!/bin/bash\n# auto-generated by meshsim\n".to_string()
}

fn render_start_script(settings: &Settings, node: &Node) -> Result<String, AddressError> {
    let binding = address::primary_binding(node, &settings.primary_interface)?;
    let node_role = role::classify(node, &settings.local_subnet);
    let config_text = RoutingConfig::for_role(
        &settings.primary_interface,
        &node_role,
        &settings.plugins,
    )
    .render();

    let mut script = script_header();
    script.push_str(&format!(
        r#"
export OLSR_DIR={olsrd_dir}

printandexec() {{
    echo "$@"
    eval "$@"
}}

# IPv6 plays no part in the emulation
echo 1 > /proc/sys/net/ipv6/conf/all/disable_ipv6

# rebind {ifname} into the emulation's flat /16 broadcast domain
printandexec ip addr del {addr}/{prefix} dev {ifname}
printandexec ip addr add {addr}/{flat_prefix} brd {broadcast} dev {ifname}

cat - > {conf} << 'EOF'
{config}EOF
"#,
        olsrd_dir = settings.olsrd_dir,
        ifname = settings.primary_interface,
        addr = binding.addr,
        prefix = binding.prefix_len,
        flat_prefix = FLAT_PREFIX_LEN,
        broadcast = binding.broadcast,
        conf = OLSRD_CONF_FILENAME,
        config = config_text,
    ));

    if node_role.gateway {
        script.push_str(&format!(
            r#"
# cap egress towards the internet-facing interface
printandexec tc qdisc add dev {uplink} parent root handle 1: htb default 1
printandexec tc class add dev {uplink} parent 1: classid 1:1 htb rate {rate}
"#,
            uplink = settings.uplink_interface,
            rate = settings.shaping_rate,
        ));
    }

    script.push_str(&format!(
        "\nprintandexec ${{OLSR_DIR}}/{daemon} -f {conf} -d 0\n",
        daemon = OLSRD_PROCESS_NAME,
        conf = OLSRD_CONF_FILENAME,
    ));

    Ok(script)
}

fn render_stop_script() -> String {
    let mut script = script_header();
    // an absent daemon is not a failure
    script.push_str(&format!(
        "\nkillall {} 2>/dev/null || true\nexit 0\n",
        OLSRD_PROCESS_NAME
    ));
    script
}

fn render_env_script(settings: &Settings) -> String {
    format!(
        r#"export OLSR_DIR={olsrd_dir}
export SHELL=/bin/bash
export HOME=$PWD
export PATH=$OLSR_DIR:$PATH
export TERM=vt100
alias ls='ls --color'

4olsr () {{
    wget -q http://127.0.0.1:2006/$1 -O -
}}
"#,
        olsrd_dir = settings.olsrd_dir,
    )
}
