//! Static `docker run` flag tables.
//!
//! Every flag spelling resolves to a canonical parameter name (`-p` and
//! `--publish` both become `publish`). Parameter behaviour is decided by
//! membership in the fixed sets below rather than per-flag conditionals.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Known flag spellings and the canonical parameter each resolves to.
const FLAG_ALIASES: &[(&str, &str)] = &[
    ("-a", "attach"),
    ("--attach", "attach"),
    ("--add-host", "add_host"),
    ("--annotation", "annotation"),
    ("--blkio-weight", "blkio_weight"),
    ("--blkio-weight-device", "blkio_weight_device"),
    ("--cap-add", "cap_add"),
    ("--cap-drop", "cap_drop"),
    ("--cgroup-parent", "cgroup_parent"),
    ("--cgroupns", "cgroupns"),
    ("--cidfile", "cidfile"),
    ("--cpu-count", "cpu_count"),
    ("--cpu-percent", "cpu_percent"),
    ("--cpu-period", "cpu_period"),
    ("--cpu-quota", "cpu_quota"),
    ("--cpu-rt-period", "cpu_rt_period"),
    ("--cpu-rt-runtime", "cpu_rt_runtime"),
    ("-c", "cpu_shares"),
    ("--cpu-shares", "cpu_shares"),
    ("--cpus", "cpus"),
    ("--cpuset-cpus", "cpuset_cpus"),
    ("--cpuset-mems", "cpuset_mems"),
    ("-d", "detach"),
    ("--detach", "detach"),
    ("--detach-keys", "detach_keys"),
    ("--device", "device"),
    ("--device-cgroup-rule", "device_cgroup_rule"),
    ("--device-read-bps", "device_read_bps"),
    ("--device-read-iops", "device_read_iops"),
    ("--device-write-bps", "device_write_bps"),
    ("--device-write-iops", "device_write_iops"),
    ("--disable-content-trust", "disable_content_trust"),
    ("--dns", "dns"),
    ("--dns-opt", "dns_option"),
    ("--dns-option", "dns_option"),
    ("--dns-search", "dns_search"),
    ("--domainname", "domainname"),
    ("--entrypoint", "entrypoint"),
    ("-e", "env"),
    ("--env", "env"),
    ("--env-file", "env_file"),
    ("--expose", "expose"),
    ("--gpus", "gpus"),
    ("--group-add", "group_add"),
    ("--health-cmd", "health_cmd"),
    ("--health-interval", "health_interval"),
    ("--health-retries", "health_retries"),
    ("--health-start-interval", "health_start_interval"),
    ("--health-start-period", "health_start_period"),
    ("--health-timeout", "health_timeout"),
    ("-h", "hostname"),
    ("--hostname", "hostname"),
    ("--init", "init"),
    ("--init-path", "init_path"),
    ("-i", "interactive"),
    ("--interactive", "interactive"),
    ("--io-maxbandwidth", "io_maxbandwidth"),
    ("--io-maxiops", "io_maxiops"),
    ("--ip", "ip"),
    ("--ip6", "ip6"),
    ("--ipc", "ipc"),
    ("--isolation", "isolation"),
    ("--kernel-memory", "kernel_memory"),
    ("-l", "label"),
    ("--label", "label"),
    ("--label-file", "label_file"),
    ("--link", "link"),
    ("--link-local-ip", "link_local_ip"),
    ("--log-driver", "log_driver"),
    ("--log-opt", "log_opt"),
    ("--mac-address", "mac_address"),
    ("-m", "memory"),
    ("--memory", "memory"),
    ("--memory-reservation", "memory_reservation"),
    ("--memory-swap", "memory_swap"),
    ("--memory-swappiness", "memory_swappiness"),
    ("--mount", "mount"),
    ("--name", "name"),
    ("--net", "network"),
    ("--network", "network"),
    ("--net-alias", "network_alias"),
    ("--network-alias", "network_alias"),
    ("--no-healthcheck", "no_healthcheck"),
    ("--oom-kill-disable", "oom_kill_disable"),
    ("--oom-score-adj", "oom_score_adj"),
    ("--pid", "pid"),
    ("--pids-limit", "pids_limit"),
    ("--platform", "platform"),
    ("--privileged", "privileged"),
    ("-p", "publish"),
    ("--publish", "publish"),
    ("-P", "publish_all"),
    ("--publish-all", "publish_all"),
    ("--pull", "pull"),
    ("-q", "quiet"),
    ("--quiet", "quiet"),
    ("--read-only", "read_only"),
    ("--restart", "restart"),
    ("--rm", "rm"),
    ("--runtime", "runtime"),
    ("--security-opt", "security_opt"),
    ("--shm-size", "shm_size"),
    ("--sig-proxy", "sig_proxy"),
    ("--stop-signal", "stop_signal"),
    ("--stop-timeout", "stop_timeout"),
    ("--storage-opt", "storage_opt"),
    ("--sysctl", "sysctl"),
    ("--tmpfs", "tmpfs"),
    ("-t", "tty"),
    ("--tty", "tty"),
    ("--ulimit", "ulimit"),
    ("--use-api-socket", "use_api_socket"),
    ("-u", "user"),
    ("--user", "user"),
    ("--userns", "userns"),
    ("--uts", "uts"),
    ("-v", "volume"),
    ("--volume", "volume"),
    ("--volume-driver", "volume_driver"),
    ("--volumes-from", "volumes_from"),
    ("-w", "workdir"),
    ("--workdir", "workdir"),
];

/// Parameters that never take a value.
pub const BOOLEAN_PARAMS: &[&str] = &[
    "detach",
    "disable_content_trust",
    "init",
    "interactive",
    "no_healthcheck",
    "oom_kill_disable",
    "privileged",
    "publish_all",
    "quiet",
    "read_only",
    "rm",
    "sig_proxy",
    "tty",
    "use_api_socket",
];

/// Parameters whose occurrences accumulate in encounter order.
pub const REPEATABLE_PARAMS: &[&str] = &[
    "add_host",
    "annotation",
    "attach",
    "cap_add",
    "cap_drop",
    "device",
    "dns",
    "dns_option",
    "dns_search",
    "env",
    "env_file",
    "expose",
    "gpus",
    "group_add",
    "label",
    "link",
    "log_opt",
    "mount",
    "network_alias",
    "publish",
    "security_opt",
    "storage_opt",
    "sysctl",
    "tmpfs",
    "ulimit",
    "volume",
    "volumes_from",
];

/// Parameters the field mapper translates into service fields.
pub const MAPPED_PARAMS: &[&str] = &[
    "add_host",
    "annotation",
    "cap_add",
    "cap_drop",
    "cgroup_parent",
    "cgroupns",
    "cpu_shares",
    "cpus",
    "cpuset_cpus",
    "device",
    "dns",
    "dns_option",
    "dns_search",
    "domainname",
    "entrypoint",
    "env",
    "env_file",
    "expose",
    "gpus",
    "group_add",
    "health_cmd",
    "health_interval",
    "health_retries",
    "health_start_interval",
    "health_start_period",
    "health_timeout",
    "hostname",
    "init",
    "interactive",
    "ipc",
    "label",
    "link",
    "log_driver",
    "log_opt",
    "mac_address",
    "memory",
    "memory_reservation",
    "mount",
    "name",
    "network",
    "network_alias",
    "no_healthcheck",
    "oom_kill_disable",
    "oom_score_adj",
    "pid",
    "pids_limit",
    "platform",
    "privileged",
    "publish",
    "pull",
    "read_only",
    "restart",
    "runtime",
    "security_opt",
    "shm_size",
    "stop_signal",
    "stop_timeout",
    "storage_opt",
    "sysctl",
    "tmpfs",
    "tty",
    "ulimit",
    "use_api_socket",
    "user",
    "userns",
    "volume",
    "volumes_from",
    "workdir",
];

/// Recognized parameters with no Compose equivalent.
pub const UNSUPPORTED_PARAMS: &[&str] = &[
    "attach",
    "blkio_weight",
    "blkio_weight_device",
    "cidfile",
    "cpu_count",
    "cpu_percent",
    "cpu_period",
    "cpu_quota",
    "cpu_rt_period",
    "cpu_rt_runtime",
    "cpuset_mems",
    "detach",
    "detach_keys",
    "device_cgroup_rule",
    "device_read_bps",
    "device_read_iops",
    "device_write_bps",
    "device_write_iops",
    "disable_content_trust",
    "init_path",
    "io_maxbandwidth",
    "io_maxiops",
    "ip",
    "ip6",
    "isolation",
    "kernel_memory",
    "label_file",
    "link_local_ip",
    "memory_swap",
    "memory_swappiness",
    "publish_all",
    "quiet",
    "rm",
    "sig_proxy",
    "uts",
    "volume_driver",
];

static FLAG_TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn flag_table() -> &'static HashMap<&'static str, &'static str> {
    FLAG_TABLE.get_or_init(|| FLAG_ALIASES.iter().copied().collect())
}

/// Resolves a flag spelling such as `--publish` to its canonical name.
///
/// Unknown spellings keep their name with the leading dashes removed.
pub fn canonical_name(spelling: &str) -> String {
    flag_table().get(spelling).map_or_else(
        || spelling.trim_start_matches('-').to_owned(),
        |name| (*name).to_owned(),
    )
}

/// Expands a cluster of single-letter boolean flags (`-it`, `-dit`).
///
/// Returns `None` unless the token is a single-dash cluster of at least two
/// letters that all resolve to boolean parameters.
pub fn expand_short_cluster(token: &str) -> Option<Vec<&'static str>> {
    let letters = token.strip_prefix('-')?;
    if letters.starts_with('-') || letters.chars().count() < 2 {
        return None;
    }
    letters
        .chars()
        .map(|letter| {
            let spelling = format!("-{letter}");
            flag_table()
                .get(spelling.as_str())
                .copied()
                .filter(|name| is_boolean(name))
        })
        .collect()
}

/// Whether the parameter is a valueless switch.
pub fn is_boolean(name: &str) -> bool {
    BOOLEAN_PARAMS.contains(&name)
}

/// Whether occurrences of the parameter accumulate.
pub fn is_repeatable(name: &str) -> bool {
    REPEATABLE_PARAMS.contains(&name)
}

/// Whether the field mapper produces output for the parameter.
pub fn is_mapped(name: &str) -> bool {
    MAPPED_PARAMS.contains(&name)
}

/// Whether the parameter is recognized but has no Compose equivalent.
pub fn is_unsupported(name: &str) -> bool {
    UNSUPPORTED_PARAMS.contains(&name)
}
