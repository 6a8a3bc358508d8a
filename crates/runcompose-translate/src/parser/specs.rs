//! Parsers for compound flag values (`-p`, `-v`, `--device`, ...).
//!
//! Every parser is total: malformed input yields `None` or a default shape
//! instead of an error, so a single bad value never aborts a command.

use serde::Serialize;

/// A parsed `--publish` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    /// Host interface to bind.
    pub host_ip: Option<String>,
    /// Host port.
    pub published: Option<String>,
    /// Container port.
    pub target: String,
    /// `tcp`, `udp` or `sctp`.
    pub protocol: Option<String>,
}

impl PortSpec {
    /// Renders the Compose short syntax, e.g. `8080:80` or `53:53/udp`.
    pub fn to_short_syntax(&self) -> String {
        let mut out = match (&self.host_ip, &self.published) {
            (Some(ip), published) => {
                format!("{ip}:{}:{}", published.as_deref().unwrap_or(""), self.target)
            }
            (None, Some(published)) => format!("{published}:{}", self.target),
            (None, None) => self.target.clone(),
        };
        if let Some(protocol) = &self.protocol {
            out.push('/');
            out.push_str(protocol);
        }
        out
    }
}

/// Whether a volume reference is a host path or a runtime-managed volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeKind {
    /// Host filesystem path mounted into the container.
    Bind,
    /// Named or anonymous volume managed by the runtime.
    Volume,
}

/// A parsed `--volume` value.
///
/// Serializes as the Compose long volume syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeSpec {
    /// Mount type.
    #[serde(rename = "type")]
    pub kind: VolumeKind,
    /// Host path or volume name; absent for anonymous volumes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Path inside the container.
    pub target: String,
    /// Mounted read-only.
    #[serde(skip_serializing_if = "crate::service::is_false")]
    pub read_only: bool,
}

impl VolumeSpec {
    /// Name of the runtime-managed volume this spec refers to, if any.
    pub fn volume_name(&self) -> Option<&str> {
        match self.kind {
            VolumeKind::Volume => self.source.as_deref(),
            VolumeKind::Bind => None,
        }
    }

    /// Whether the source is a host path, as opposed to a volume name.
    pub fn has_host_source(&self) -> bool {
        self.source.as_deref().is_some_and(is_host_path)
    }

    /// Renders `source:target[:ro]`, or just the target without a source.
    pub fn to_short_syntax(&self) -> String {
        let mut out = match &self.source {
            Some(source) => format!("{source}:{}", self.target),
            None => self.target.clone(),
        };
        if self.read_only {
            out.push_str(":ro");
        }
        out
    }
}

/// A parsed `--device` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSpec {
    /// Device path on the host.
    pub path_on_host: String,
    /// Device path inside the container.
    pub path_in_container: String,
    /// cgroup permissions such as `rwm`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

/// A parsed `--ulimit` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ulimit {
    /// Resource name, e.g. `nofile`.
    pub name: String,
    /// Soft limit.
    pub soft: i64,
    /// Hard limit.
    pub hard: i64,
}

/// Splits `key=value`; a bare key maps to an empty value.
pub fn split_key_value(spec: &str) -> (&str, &str) {
    spec.split_once('=').unwrap_or((spec, ""))
}

/// Parses `[[host_ip:]host_port:]container_port[/protocol]`.
///
/// Returns `None` for an empty container port or more than three parts.
pub fn parse_publish(spec: &str) -> Option<PortSpec> {
    let parts: Vec<&str> = spec.split(':').collect();
    let (host_ip, published, container) = match parts.as_slice() {
        [container] => (None, None, *container),
        [published, container] => (None, Some(*published), *container),
        [ip, published, container] => (Some(*ip), Some(*published), *container),
        _ => return None,
    };
    let (target, protocol) = match container.split_once('/') {
        Some((port, protocol)) => (port, Some(protocol)),
        None => (container, None),
    };
    if target.is_empty() {
        return None;
    }
    let non_empty = |s: Option<&str>| s.filter(|v| !v.is_empty()).map(str::to_owned);
    Some(PortSpec {
        host_ip: non_empty(host_ip),
        published: non_empty(published),
        target: target.to_owned(),
        protocol: non_empty(protocol),
    })
}

fn is_host_path(source: &str) -> bool {
    source.starts_with(['/', '.', '~', '$']) || has_drive_prefix(source)
}

fn has_drive_prefix(spec: &str) -> bool {
    let bytes = spec.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'\\' | b'/')
}

/// Parses `[source:]target[:options]`.
///
/// Sources that look like host paths yield [`VolumeKind::Bind`]; bare names
/// and anonymous volumes yield [`VolumeKind::Volume`]. An `ro` option marks
/// the mount read-only.
pub fn parse_volume(spec: &str) -> VolumeSpec {
    let (drive, rest) = if has_drive_prefix(spec) {
        spec.split_at(2)
    } else {
        ("", spec)
    };
    let mut parts = rest.splitn(3, ':');
    let first = format!("{drive}{}", parts.next().unwrap_or_default());
    let (source, target, options) = match (parts.next(), parts.next()) {
        (None, _) => (None, first, ""),
        (Some(target), options) => (Some(first), target.to_owned(), options.unwrap_or("")),
    };
    let read_only = options
        .split([',', ':'])
        .any(|opt| opt == "ro" || opt == "readonly");
    let kind = match &source {
        Some(path) if is_host_path(path) => VolumeKind::Bind,
        _ => VolumeKind::Volume,
    };
    VolumeSpec {
        kind,
        source,
        target,
        read_only,
    }
}

/// Parses `type=...,source=...,target=...[,readonly]`.
///
/// Only `bind` and `volume` mounts are accepted; a missing type means
/// `volume`. Returns `None` when the source or target is missing.
pub fn parse_mount(spec: &str) -> Option<VolumeSpec> {
    let mut kind = VolumeKind::Volume;
    let mut source = None;
    let mut target = None;
    let mut read_only = false;

    for field in spec.split(',') {
        let (key, value) = split_key_value(field.trim());
        match key {
            "type" => {
                kind = match value {
                    "bind" => VolumeKind::Bind,
                    "volume" => VolumeKind::Volume,
                    _ => return None,
                };
            }
            "source" | "src" => source = Some(value),
            "target" | "destination" | "dst" => target = Some(value),
            "readonly" | "ro" => read_only = matches!(value, "" | "true" | "1"),
            _ => {}
        }
    }

    let source = source.filter(|s| !s.is_empty())?;
    let target = target.filter(|t| !t.is_empty())?;
    Some(VolumeSpec {
        kind,
        source: Some(source.to_owned()),
        target: target.to_owned(),
        read_only,
    })
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Parses `KEY[=VALUE]`, stripping one layer of matching quotes from the
/// value.
pub fn parse_env(spec: &str) -> (String, Option<String>) {
    match spec.split_once('=') {
        Some((key, value)) => (
            key.to_owned(),
            Some(strip_matching_quotes(value.trim()).to_owned()),
        ),
        None => (spec.to_owned(), None),
    }
}

/// Parses `container[:alias]`.
pub fn parse_link(spec: &str) -> (String, Option<String>) {
    match spec.split_once(':') {
        Some((container, alias)) => (container.to_owned(), Some(alias.to_owned())),
        None => (spec.to_owned(), None),
    }
}

/// Parses `host_path[:container_path[:permissions]]`.
pub fn parse_device(spec: &str) -> DeviceSpec {
    let mut parts = spec.split(':');
    let path_on_host = parts.next().unwrap_or_default().to_owned();
    let path_in_container = parts
        .next()
        .map_or_else(|| path_on_host.clone(), str::to_owned);
    let permissions = parts.next().map(str::to_owned);
    DeviceSpec {
        path_on_host,
        path_in_container,
        permissions,
    }
}

/// Parses `name=soft[:hard]`; the hard limit defaults to the soft one.
///
/// Returns `None` unless there is exactly one `=` and both limits are
/// integers.
pub fn parse_ulimit(spec: &str) -> Option<Ulimit> {
    let mut parts = spec.split('=');
    let (Some(name), Some(limits), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let (soft, hard) = match limits.split_once(':') {
        Some((soft, hard)) => (
            soft.trim().parse::<i64>().ok()?,
            hard.trim().parse::<i64>().ok()?,
        ),
        None => {
            let value = limits.trim().parse::<i64>().ok()?;
            (value, value)
        }
    };
    Some(Ulimit {
        name: name.to_owned(),
        soft,
        hard,
    })
}

/// Parses `port[/protocol]`, discarding the protocol.
pub fn parse_expose(spec: &str) -> Option<u16> {
    let port = spec.split_once('/').map_or(spec, |(port, _)| port);
    port.trim().parse().ok()
}

/// Parses `key[=value]`; the value defaults to an empty string.
pub fn parse_sysctl(spec: &str) -> (String, String) {
    let (key, value) = split_key_value(spec);
    (key.to_owned(), value.to_owned())
}

/// Parses `host:ip` (or `host=ip`) into a Compose `extra_hosts` entry.
pub fn parse_add_host(spec: &str) -> (String, String) {
    let split = if spec.contains('=') {
        spec.split_once('=')
    } else {
        spec.split_once(':')
    };
    split.map_or_else(
        || (spec.to_owned(), String::new()),
        |(host, ip)| (host.to_owned(), ip.to_owned()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_container_port_only() {
        let spec = parse_publish("80").expect("should parse");
        assert_eq!(spec.target, "80");
        assert!(spec.published.is_none());
        assert_eq!(spec.to_short_syntax(), "80");
    }

    #[test]
    fn publish_host_and_container_port() {
        let spec = parse_publish("8080:80").expect("should parse");
        assert_eq!(spec.published.as_deref(), Some("8080"));
        assert_eq!(spec.target, "80");
        assert_eq!(spec.to_short_syntax(), "8080:80");
    }

    #[test]
    fn publish_with_protocol() {
        let spec = parse_publish("53:53/udp").expect("should parse");
        assert_eq!(spec.protocol.as_deref(), Some("udp"));
        assert_eq!(spec.to_short_syntax(), "53:53/udp");
    }

    #[test]
    fn publish_with_host_ip() {
        let spec = parse_publish("127.0.0.1:8080:80/tcp").expect("should parse");
        assert_eq!(spec.host_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(spec.published.as_deref(), Some("8080"));
        assert_eq!(spec.to_short_syntax(), "127.0.0.1:8080:80/tcp");
    }

    #[test]
    fn publish_host_ip_with_random_port() {
        let spec = parse_publish("127.0.0.1::80").expect("should parse");
        assert!(spec.published.is_none());
        assert_eq!(spec.to_short_syntax(), "127.0.0.1::80");
    }

    #[test]
    fn publish_malformed_yields_none() {
        assert!(parse_publish("a:b:c:d").is_none());
        assert!(parse_publish("8080:").is_none());
    }

    #[test]
    fn volume_bind_mount() {
        let spec = parse_volume("/srv/data:/data");
        assert_eq!(spec.kind, VolumeKind::Bind);
        assert_eq!(spec.source.as_deref(), Some("/srv/data"));
        assert_eq!(spec.target, "/data");
        assert!(!spec.read_only);
        assert_eq!(spec.to_short_syntax(), "/srv/data:/data");
    }

    #[test]
    fn volume_relative_bind_read_only() {
        let spec = parse_volume("./conf:/etc/app:ro");
        assert_eq!(spec.kind, VolumeKind::Bind);
        assert!(spec.read_only);
        assert_eq!(spec.to_short_syntax(), "./conf:/etc/app:ro");
    }

    #[test]
    fn volume_named() {
        let spec = parse_volume("data:/var/www");
        assert_eq!(spec.kind, VolumeKind::Volume);
        assert_eq!(spec.volume_name(), Some("data"));
        assert_eq!(spec.target, "/var/www");
    }

    #[test]
    fn volume_anonymous() {
        let spec = parse_volume("/cache");
        assert_eq!(spec.kind, VolumeKind::Volume);
        assert!(spec.source.is_none());
        assert_eq!(spec.volume_name(), None);
        assert_eq!(spec.target, "/cache");
    }

    #[test]
    fn volume_options_list_with_ro() {
        let spec = parse_volume("/a:/b:z,ro");
        assert!(spec.read_only);
        let spec = parse_volume("/a:/b:rw");
        assert!(!spec.read_only);
    }

    #[test]
    fn volume_windows_drive_source() {
        let spec = parse_volume(r"C:\data:/data");
        assert_eq!(spec.kind, VolumeKind::Bind);
        assert_eq!(spec.source.as_deref(), Some(r"C:\data"));
        assert_eq!(spec.target, "/data");
    }

    #[test]
    fn mount_bind_read_only() {
        let spec =
            parse_mount("type=bind,source=/src,target=/dst,readonly").expect("should parse");
        assert_eq!(spec.kind, VolumeKind::Bind);
        assert_eq!(spec.to_short_syntax(), "/src:/dst:ro");
    }

    #[test]
    fn mount_volume_with_short_keys() {
        let spec = parse_mount("type=volume,src=data,dst=/data").expect("should parse");
        assert_eq!(spec.kind, VolumeKind::Volume);
        assert_eq!(spec.to_short_syntax(), "data:/data");
    }

    #[test]
    fn mount_bind_keeps_kind_for_relative_source() {
        let spec = parse_mount("type=bind,source=mydir,target=/x").expect("should parse");
        assert_eq!(spec.kind, VolumeKind::Bind);
        assert!(!spec.has_host_source());
        assert_eq!(spec.volume_name(), None);
    }

    #[test]
    fn host_source_detection() {
        assert!(parse_volume("./conf:/etc/app").has_host_source());
        assert!(!parse_volume("data:/data").has_host_source());
        assert!(!parse_volume("/anon").has_host_source());
    }

    #[test]
    fn mount_readonly_false_is_writable() {
        let spec = parse_mount("type=bind,src=/a,dst=/b,readonly=false").expect("should parse");
        assert!(!spec.read_only);
    }

    #[test]
    fn mount_other_types_rejected() {
        assert!(parse_mount("type=tmpfs,target=/tmp").is_none());
        assert!(parse_mount("type=bind,target=/only").is_none());
    }

    #[test]
    fn env_with_value() {
        assert_eq!(parse_env("A=1"), ("A".into(), Some("1".into())));
    }

    #[test]
    fn env_bare_key() {
        assert_eq!(parse_env("HOME"), ("HOME".into(), None));
    }

    #[test]
    fn env_strips_one_layer_of_quotes() {
        assert_eq!(parse_env("A=\"x y\""), ("A".into(), Some("x y".into())));
        assert_eq!(parse_env("A='\"x\"'"), ("A".into(), Some("\"x\"".into())));
        assert_eq!(parse_env("A=\"x'"), ("A".into(), Some("\"x'".into())));
    }

    #[test]
    fn env_value_may_contain_equals() {
        assert_eq!(parse_env("URL=a=b"), ("URL".into(), Some("a=b".into())));
    }

    #[test]
    fn link_with_and_without_alias() {
        assert_eq!(parse_link("db:database"), ("db".into(), Some("database".into())));
        assert_eq!(parse_link("db"), ("db".into(), None));
    }

    #[test]
    fn device_single_path() {
        let spec = parse_device("/dev/snd");
        assert_eq!(spec.path_on_host, "/dev/snd");
        assert_eq!(spec.path_in_container, "/dev/snd");
        assert!(spec.permissions.is_none());
    }

    #[test]
    fn device_with_permissions() {
        let spec = parse_device("/dev/sda:/dev/xvda:rwm");
        assert_eq!(spec.path_in_container, "/dev/xvda");
        assert_eq!(spec.permissions.as_deref(), Some("rwm"));
    }

    #[test]
    fn ulimit_soft_and_hard() {
        let ulimit = parse_ulimit("nofile=1024:2048").expect("should parse");
        assert_eq!(ulimit.name, "nofile");
        assert_eq!(ulimit.soft, 1024);
        assert_eq!(ulimit.hard, 2048);
    }

    #[test]
    fn ulimit_hard_defaults_to_soft() {
        let ulimit = parse_ulimit("nproc=-1").expect("should parse");
        assert_eq!(ulimit.soft, -1);
        assert_eq!(ulimit.hard, -1);
    }

    #[test]
    fn ulimit_malformed_degrades_to_none() {
        assert!(parse_ulimit("nofile").is_none());
        assert!(parse_ulimit("nofile=1=2").is_none());
        assert!(parse_ulimit("nofile=lots").is_none());
    }

    #[test]
    fn expose_discards_protocol() {
        assert_eq!(parse_expose("8080"), Some(8080));
        assert_eq!(parse_expose("53/udp"), Some(53));
        assert_eq!(parse_expose("http"), None);
    }

    #[test]
    fn sysctl_value_defaults_to_empty() {
        assert_eq!(
            parse_sysctl("net.core.somaxconn=1024"),
            ("net.core.somaxconn".into(), "1024".into())
        );
        assert_eq!(parse_sysctl("kernel.shmmax"), ("kernel.shmmax".into(), String::new()));
    }

    #[test]
    fn add_host_colon_and_equals_forms() {
        assert_eq!(parse_add_host("db:10.0.0.2"), ("db".into(), "10.0.0.2".into()));
        assert_eq!(parse_add_host("db=10.0.0.2"), ("db".into(), "10.0.0.2".into()));
        assert_eq!(parse_add_host("v6:::1"), ("v6".into(), "::1".into()));
    }
}
