//! Field mapping from a parsed `docker run` command to a Compose service.
//!
//! The mapper is total: parameters with no Compose counterpart and values
//! that fail to parse are dropped rather than reported.

use indexmap::IndexMap;
use runcompose_common::constants::DEFAULT_NETWORK;

use crate::parser::ParsedCommand;
use crate::parser::flags;
use crate::parser::specs;
use crate::service::{
    Deploy, DeviceRequest, GpuCount, Healthcheck, Logging, NetworkAttachment, ResourceSpec,
    ServiceDescription, VolumeEntry,
};

/// Bind mounts added by `--use-api-socket`.
const API_SOCKET_MOUNTS: [&str; 2] = [
    "/var/run/docker.sock:/var/run/docker.sock",
    "/usr/bin/docker:/usr/bin/docker:ro",
];

/// GPU reservations always target this driver.
const GPU_DRIVER: &str = "nvidia";

/// `--network` values that select a mode rather than a user network.
fn is_network_mode(network: &str) -> bool {
    matches!(network, "host" | "none")
        || network.starts_with("container:")
        || network.starts_with("service:")
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

fn split_words(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_owned).collect()
}

/// Translates one parsed command into a service description.
pub fn map_to_service(parsed: &ParsedCommand) -> ServiceDescription {
    let mut service = ServiceDescription {
        image: owned(parsed.image()),
        command: parsed.command().to_vec(),
        container_name: owned(parsed.value("name")),
        hostname: owned(parsed.value("hostname")),
        domainname: owned(parsed.value("domainname")),
        entrypoint: parsed.value("entrypoint").map(split_words).unwrap_or_default(),
        working_dir: owned(parsed.value("workdir")),
        user: owned(parsed.value("user")),
        cgroup: owned(parsed.value("cgroupns")),
        cgroup_parent: owned(parsed.value("cgroup_parent")),
        mac_address: owned(parsed.value("mac_address")),
        platform: owned(parsed.value("platform")),
        pull_policy: owned(parsed.value("pull")),
        restart: parsed.value("restart").map(map_restart),
        privileged: parsed.flag("privileged"),
        read_only: parsed.flag("read_only"),
        init: parsed.flag("init"),
        tty: parsed.flag("tty"),
        stdin_open: parsed.flag("interactive"),
        env_file: parsed.values("env_file").to_vec(),
        volumes_from: parsed.values("volumes_from").to_vec(),
        cap_add: parsed.values("cap_add").to_vec(),
        cap_drop: parsed.values("cap_drop").to_vec(),
        security_opt: parsed.values("security_opt").to_vec(),
        dns: parsed.values("dns").to_vec(),
        dns_search: parsed.values("dns_search").to_vec(),
        dns_options: parsed.values("dns_option").to_vec(),
        shm_size: owned(parsed.value("shm_size")),
        tmpfs: parsed.values("tmpfs").to_vec(),
        ipc: owned(parsed.value("ipc")),
        pid: owned(parsed.value("pid")),
        userns_mode: owned(parsed.value("userns")),
        runtime: owned(parsed.value("runtime")),
        stop_signal: owned(parsed.value("stop_signal")),
        stop_grace_period: parsed.value("stop_timeout").map(|t| format!("{t}s")),
        cpu_shares: parsed.value("cpu_shares").and_then(|v| v.parse().ok()),
        cpuset: owned(parsed.value("cpuset_cpus")),
        pids_limit: parsed.value("pids_limit").and_then(|v| v.parse().ok()),
        oom_kill_disable: parsed.flag("oom_kill_disable"),
        oom_score_adj: parsed.value("oom_score_adj").and_then(|v| v.parse().ok()),
        group_add: parsed.values("group_add").to_vec(),
        ..ServiceDescription::default()
    };

    service.labels = map_labels(parsed);
    service.ports = parsed
        .values("publish")
        .iter()
        .filter_map(|p| specs::parse_publish(p))
        .map(|p| p.to_short_syntax())
        .collect();
    service.expose = parsed
        .values("expose")
        .iter()
        .filter_map(|e| specs::parse_expose(e))
        .collect();
    service.environment = map_environment(parsed.values("env"));
    service.volumes = map_volumes(parsed);
    if parsed.flag("use_api_socket") {
        service.privileged = true;
    }
    map_networks(parsed, &mut service);
    service.links = parsed.values("link").iter().map(|l| map_link(l)).collect();
    service.extra_hosts = parsed
        .values("add_host")
        .iter()
        .map(|h| {
            let (host, ip) = specs::parse_add_host(h);
            format!("{host}:{ip}")
        })
        .collect();
    service.devices = parsed
        .values("device")
        .iter()
        .map(|d| specs::parse_device(d))
        .collect();
    service.sysctls = parsed
        .values("sysctl")
        .iter()
        .map(|s| std::iter::once(specs::parse_sysctl(s)).collect())
        .collect();
    service.ulimits = parsed
        .values("ulimit")
        .iter()
        .filter_map(|u| specs::parse_ulimit(u))
        .collect();
    service.logging = map_logging(parsed);
    service.storage_opt = key_value_map(parsed.values("storage_opt"));
    service.healthcheck = map_healthcheck(parsed);
    service.deploy = map_deploy(parsed);

    log_dropped(parsed);
    service
}

fn log_dropped(parsed: &ParsedCommand) {
    for name in parsed.params().keys() {
        if flags::is_unsupported(name) {
            tracing::debug!(param = %name, "parameter has no compose equivalent");
        } else if !flags::is_mapped(name) {
            tracing::debug!(param = %name, "dropping unknown parameter");
        }
    }
}

/// Keeps the policy name before any `:max-retries` suffix.
fn map_restart(restart: &str) -> String {
    restart
        .split_once(':')
        .map_or(restart, |(policy, _)| policy)
        .to_owned()
}

fn key_value_map(entries: &[String]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|entry| {
            let (key, value) = specs::split_key_value(entry);
            (key.to_owned(), value.to_owned())
        })
        .collect()
}

/// Annotations land first under `annotation.<key>`; explicit labels are
/// applied afterwards and win on conflict.
fn map_labels(parsed: &ParsedCommand) -> IndexMap<String, String> {
    let mut labels = IndexMap::new();
    for annotation in parsed.values("annotation") {
        let (key, value) = specs::split_key_value(annotation);
        let _ = labels.insert(format!("annotation.{key}"), value.to_owned());
    }
    for label in parsed.values("label") {
        let (key, value) = specs::split_key_value(label);
        let _ = labels.insert(key.to_owned(), value.to_owned());
    }
    labels
}

fn map_environment(entries: &[String]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|entry| {
            let (key, value) = specs::parse_env(entry);
            (key, value.unwrap_or_default())
        })
        .collect()
}

fn map_volumes(parsed: &ParsedCommand) -> Vec<VolumeEntry> {
    let from_volumes = parsed
        .values("volume")
        .iter()
        .map(|v| VolumeEntry::from(specs::parse_volume(v)));
    let from_mounts = parsed
        .values("mount")
        .iter()
        .filter_map(|m| specs::parse_mount(m))
        .map(VolumeEntry::from);
    let api_socket = API_SOCKET_MOUNTS
        .iter()
        .filter(|_| parsed.flag("use_api_socket"))
        .map(|m| VolumeEntry::Short((*m).to_owned()));

    from_volumes.chain(from_mounts).chain(api_socket).collect()
}

fn map_networks(parsed: &ParsedCommand, service: &mut ServiceDescription) {
    if let Some(network) = parsed.value("network") {
        if is_network_mode(network) {
            service.network_mode = Some(network.to_owned());
        } else {
            let _ = service
                .networks
                .insert(network.to_owned(), NetworkAttachment::default());
        }
        return;
    }
    let aliases = parsed.values("network_alias");
    if !aliases.is_empty() {
        let _ = service.networks.insert(
            DEFAULT_NETWORK.to_owned(),
            NetworkAttachment {
                aliases: aliases.to_vec(),
            },
        );
    }
}

fn map_link(link: &str) -> String {
    match specs::parse_link(link) {
        (container, Some(alias)) => format!("{container}:{alias}"),
        (container, None) => container,
    }
}

fn map_logging(parsed: &ParsedCommand) -> Option<Logging> {
    let logging = Logging {
        driver: owned(parsed.value("log_driver")),
        options: key_value_map(parsed.values("log_opt")),
    };
    (logging.driver.is_some() || !logging.options.is_empty()).then_some(logging)
}

fn map_healthcheck(parsed: &ParsedCommand) -> Option<Healthcheck> {
    let healthcheck = Healthcheck {
        test: parsed.value("health_cmd").map(split_words).unwrap_or_default(),
        interval: owned(parsed.value("health_interval")),
        timeout: owned(parsed.value("health_timeout")),
        retries: parsed.value("health_retries").and_then(|r| r.parse().ok()),
        start_period: owned(parsed.value("health_start_period")),
        start_interval: owned(parsed.value("health_start_interval")),
        disable: parsed.flag("no_healthcheck"),
    };
    (!healthcheck.is_empty()).then_some(healthcheck)
}

fn map_deploy(parsed: &ParsedCommand) -> Option<Deploy> {
    let limits = ResourceSpec {
        memory: owned(parsed.value("memory")),
        cpus: owned(parsed.value("cpus")),
        devices: Vec::new(),
    };
    let gpu = parsed.values("gpus").first().map(|count| DeviceRequest {
        driver: GPU_DRIVER.to_owned(),
        count: GpuCount::from(count.as_str()),
        capabilities: vec!["gpu".to_owned()],
    });
    let reservations = ResourceSpec {
        memory: owned(parsed.value("memory_reservation")),
        cpus: None,
        devices: gpu.into_iter().collect(),
    };
    Deploy::from_parts(limits, reservations)
}
