//! Compose document assembly.
//!
//! Assigns unique service names and collects the networks and named volumes
//! referenced by services into top-level sections.

use indexmap::IndexMap;
use serde::Serialize;

use runcompose_common::constants::{
    DEFAULT_NETWORK, DEFAULT_NETWORK_DRIVER, FALLBACK_SERVICE_PREFIX,
};

use crate::parser::specs;
use crate::service::{ServiceDescription, VolumeEntry, is_false};

/// Top-level network definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    /// Network driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Network is created outside the document.
    #[serde(skip_serializing_if = "is_false")]
    pub external: bool,
}

impl NetworkConfig {
    /// A network using the bridge driver.
    pub fn bridge() -> Self {
        Self {
            driver: Some(DEFAULT_NETWORK_DRIVER.to_owned()),
            external: false,
        }
    }
}

/// Top-level volume definition. The default renders as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeConfig {
    /// Volume driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Volume is created outside the document.
    #[serde(skip_serializing_if = "is_false")]
    pub external: bool,
}

/// A complete Compose document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeDocument {
    /// Compose file format version.
    pub version: String,
    /// Services keyed by unique name.
    pub services: IndexMap<String, ServiceDescription>,
    /// Networks referenced by services.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub networks: IndexMap<String, NetworkConfig>,
    /// Named volumes referenced by services.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub volumes: IndexMap<String, VolumeConfig>,
}

/// Builder for a [`ComposeDocument`] with optional pre-supplied top-level
/// networks and volumes.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    version: String,
    networks: IndexMap<String, NetworkConfig>,
    volumes: IndexMap<String, VolumeConfig>,
}

impl DocumentBuilder {
    /// Creates a builder for the given Compose version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            networks: IndexMap::new(),
            volumes: IndexMap::new(),
        }
    }

    /// Declares a network ahead of aggregation; it keeps this configuration.
    #[must_use]
    pub fn with_network(mut self, name: impl Into<String>, config: NetworkConfig) -> Self {
        let _ = self.networks.insert(name.into(), config);
        self
    }

    /// Declares a volume ahead of aggregation; it keeps this configuration.
    #[must_use]
    pub fn with_volume(mut self, name: impl Into<String>, config: VolumeConfig) -> Self {
        let _ = self.volumes.insert(name.into(), config);
        self
    }

    /// Assembles the document.
    ///
    /// `explicit_names[i]` is the name requested for `services[i]`; missing
    /// entries fall back to a name derived from the image.
    pub fn build(
        self,
        services: Vec<ServiceDescription>,
        explicit_names: &[Option<String>],
    ) -> ComposeDocument {
        let Self {
            version,
            mut networks,
            mut volumes,
        } = self;
        let mut named = IndexMap::new();

        for (index, service) in services.into_iter().enumerate() {
            collect_networks(&service, &mut networks);
            collect_volumes(&service, &mut volumes);

            let base = explicit_names
                .get(index)
                .cloned()
                .flatten()
                .or_else(|| service.image.as_deref().and_then(derive_service_name))
                .unwrap_or_else(|| format!("{FALLBACK_SERVICE_PREFIX}{}", index + 1));
            let name = unique_name(&named, base);
            let _ = named.insert(name, service);
        }

        tracing::info!(
            services = named.len(),
            networks = networks.len(),
            volumes = volumes.len(),
            "assembled compose document"
        );
        ComposeDocument {
            version,
            services: named,
            networks,
            volumes,
        }
    }
}

/// Assembles a document with no pre-supplied networks or volumes.
pub fn build_document(
    version: &str,
    services: Vec<ServiceDescription>,
    explicit_names: &[Option<String>],
) -> ComposeDocument {
    DocumentBuilder::new(version).build(services, explicit_names)
}

/// Derives a service name from an image reference.
///
/// `registry.io/library/nginx:1.25@sha256:...` becomes `nginx`.
pub fn derive_service_name(image: &str) -> Option<String> {
    let last = image.rsplit('/').next().unwrap_or(image);
    let without_digest = last.split_once('@').map_or(last, |(name, _)| name);
    let name = without_digest
        .split_once(':')
        .map_or(without_digest, |(name, _)| name);
    (!name.is_empty()).then(|| name.to_owned())
}

fn unique_name<V>(taken: &IndexMap<String, V>, base: String) -> String {
    if !taken.contains_key(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}_{suffix}");
        if !taken.contains_key(&candidate) {
            tracing::debug!(service = %candidate, "renamed colliding service");
            return candidate;
        }
        suffix += 1;
    }
}

fn collect_networks(
    service: &ServiceDescription,
    networks: &mut IndexMap<String, NetworkConfig>,
) {
    for name in service.networks.keys() {
        if name != DEFAULT_NETWORK && !networks.contains_key(name) {
            let _ = networks.insert(name.clone(), NetworkConfig::bridge());
        }
    }
}

fn collect_volumes(
    service: &ServiceDescription,
    volumes: &mut IndexMap<String, VolumeConfig>,
) {
    for entry in &service.volumes {
        let name = match entry {
            VolumeEntry::Long(spec) => spec.volume_name().map(str::to_owned),
            VolumeEntry::Short(short) => {
                specs::parse_volume(short).volume_name().map(str::to_owned)
            }
        };
        if let Some(name) = name.filter(|n| !volumes.contains_key(n)) {
            let _ = volumes.insert(name, VolumeConfig::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::NetworkAttachment;

    fn with_image(image: &str) -> ServiceDescription {
        ServiceDescription {
            image: Some(image.into()),
            ..ServiceDescription::default()
        }
    }

    fn keys<V>(map: &IndexMap<String, V>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    fn names(doc: &ComposeDocument) -> Vec<&str> {
        keys(&doc.services)
    }

    #[test]
    fn derive_name_strips_registry_tag_and_digest() {
        assert_eq!(derive_service_name("library/nginx:1.25").as_deref(), Some("nginx"));
        assert_eq!(derive_service_name("redis").as_deref(), Some("redis"));
        assert_eq!(
            derive_service_name("ghcr.io/acme/api@sha256:abc").as_deref(),
            Some("api")
        );
        assert_eq!(
            derive_service_name("localhost:5000/app:dev").as_deref(),
            Some("app")
        );
        assert_eq!(derive_service_name(""), None);
    }

    #[test]
    fn explicit_name_wins_over_image() {
        let doc = build_document("3.9", vec![with_image("nginx")], &[Some("web".into())]);
        assert_eq!(names(&doc), vec!["web"]);
    }

    #[test]
    fn fallback_name_uses_one_based_index() {
        let doc = build_document(
            "3.9",
            vec![with_image("nginx"), ServiceDescription::default()],
            &[],
        );
        assert_eq!(names(&doc), vec!["nginx", "service_2"]);
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let doc = build_document(
            "3.9",
            vec![with_image("nginx"), with_image("nginx:alpine"), with_image("nginx")],
            &[],
        );
        assert_eq!(names(&doc), vec!["nginx", "nginx_2", "nginx_3"]);
    }

    #[test]
    fn suffix_skips_names_already_taken() {
        let doc = build_document(
            "3.9",
            vec![with_image("a"), with_image("b"), with_image("a")],
            &[None, Some("a_2".into()), None],
        );
        assert_eq!(names(&doc), vec!["a", "a_2", "a_3"]);
    }

    #[test]
    fn networks_aggregate_in_first_seen_order_without_default() {
        let mut first = with_image("a");
        let _ = first.networks.insert("backend".to_owned(), NetworkAttachment::default());
        let mut second = with_image("b");
        let _ = second.networks.insert("default".to_owned(), NetworkAttachment::default());
        let _ = second.networks.insert("frontend".to_owned(), NetworkAttachment::default());
        let _ = second.networks.insert("backend".to_owned(), NetworkAttachment::default());

        let doc = build_document("3.9", vec![first, second], &[]);
        assert_eq!(keys(&doc.networks), vec!["backend", "frontend"]);
        assert_eq!(doc.networks.get("backend"), Some(&NetworkConfig::bridge()));
    }

    #[test]
    fn volumes_aggregate_from_long_and_short_entries() {
        let mut first = with_image("a");
        first.volumes = vec![
            VolumeEntry::Long(specs::parse_volume("data:/data")),
            VolumeEntry::Short("/host:/host".into()),
            VolumeEntry::Long(specs::parse_volume("/anon")),
            VolumeEntry::from(specs::parse_mount("type=bind,src=mydir,dst=/x").expect("mount")),
        ];
        let mut second = with_image("b");
        second.volumes = vec![
            VolumeEntry::Short("logs:/logs".into()),
            VolumeEntry::Long(specs::parse_volume("data:/backup:ro")),
        ];

        let doc = build_document("3.9", vec![first, second], &[]);
        assert_eq!(keys(&doc.volumes), vec!["data", "logs"]);
    }

    #[test]
    fn pre_supplied_configs_come_first_and_win() {
        let mut service = with_image("a");
        let _ = service.networks.insert("backend".to_owned(), NetworkAttachment::default());
        service.volumes = vec![VolumeEntry::Long(specs::parse_volume("data:/data"))];
        let external = VolumeConfig {
            driver: None,
            external: true,
        };

        let doc = DocumentBuilder::new("3.8")
            .with_network("shared", NetworkConfig::default())
            .with_network("backend", NetworkConfig::default())
            .with_volume("data", external.clone())
            .build(vec![service], &[]);

        assert_eq!(doc.version, "3.8");
        assert_eq!(keys(&doc.networks), vec!["shared", "backend"]);
        assert_eq!(doc.networks.get("backend"), Some(&NetworkConfig::default()));
        assert_eq!(doc.volumes.get("data"), Some(&external));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let doc = build_document("3.9", vec![with_image("redis")], &[]);
        let json = serde_json::to_string(&doc).expect("serialize");
        assert_eq!(json, r#"{"version":"3.9","services":{"redis":{"image":"redis"}}}"#);
    }
}
