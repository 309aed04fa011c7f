//! Pattern to Kubernetes manifest rendering
//!
//! Each deployable component (or legacy service) becomes one Kubernetes
//! resource. Resources are emitted as YAML documents separated by `---`, in
//! the order the pattern declares them.

use meshpack_core::{Component, Pattern, PatternError, Service};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Manifest rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to load pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("{resource} is missing {field}")]
    MissingField {
        resource: String,
        field: &'static str,
    },

    #[error("Failed to serialize {resource}: {source}")]
    Serialize {
        resource: String,
        source: serde_yaml::Error,
    },
}

/// Turns raw pattern input into a manifest document
pub trait ManifestRenderer: Send + Sync {
    fn render(&self, input: &str) -> Result<String, RenderError>;
}

/// Renders patterns into plain Kubernetes YAML
#[derive(Debug, Clone, Copy, Default)]
pub struct KubernetesRenderer;

impl ManifestRenderer for KubernetesRenderer {
    fn render(&self, input: &str) -> Result<String, RenderError> {
        let pattern = Pattern::from_yaml(input)?;
        render_pattern(&pattern)
    }
}

/// Render an already parsed pattern
pub fn render_pattern(pattern: &Pattern) -> Result<String, RenderError> {
    let mut documents = Vec::with_capacity(pattern.resource_count());

    for (index, component) in pattern.components.iter().enumerate() {
        if component.is_annotation() {
            tracing::debug!(component = %component.display_name, "skipping annotation component");
            continue;
        }
        let label = component_label(component, index);
        let resource = component_resource(component, &label)?;
        documents.push(to_document(resource, label)?);
    }

    for (key, service) in &pattern.services {
        let label = format!("service '{}'", key);
        let resource = service_resource(key, service, &label)?;
        documents.push(to_document(resource, label)?);
    }

    Ok(documents.join("---\n"))
}

fn component_label(component: &Component, index: usize) -> String {
    if component.display_name.is_empty() {
        format!("component #{}", index + 1)
    } else {
        format!("component '{}'", component.display_name)
    }
}

fn component_resource(component: &Component, label: &str) -> Result<Mapping, RenderError> {
    let kind = required(&component.component.kind, label, "kind")?;
    let api_version = required(&component.component.version, label, "version")?;

    let mut metadata = Mapping::new();
    let configured = match component.configuration.get("metadata") {
        Some(Value::Mapping(m)) => m.clone(),
        _ => Mapping::new(),
    };
    if !configured.contains_key("name") && !component.display_name.is_empty() {
        metadata.insert("name".into(), component.display_name.clone().into());
    }
    metadata.extend(configured);

    let mut resource = header(api_version, kind, metadata);
    append_body(&mut resource, &component.configuration);
    Ok(resource)
}

fn service_resource(key: &str, service: &Service, label: &str) -> Result<Mapping, RenderError> {
    let kind = required(&service.kind, label, "type")?;
    let api_version = required(&service.api_version, label, "apiVersion")?;

    let name = if service.name.is_empty() {
        key
    } else {
        service.name.as_str()
    };

    let mut metadata = Mapping::new();
    metadata.insert("name".into(), name.into());
    if !service.namespace.is_empty() {
        metadata.insert("namespace".into(), service.namespace.clone().into());
    }
    if let Some(Value::Mapping(extra)) = service.settings.get("metadata") {
        for (k, v) in extra {
            if !metadata.contains_key(k) {
                metadata.insert(k.clone(), v.clone());
            }
        }
    }

    let mut resource = header(api_version, kind, metadata);
    append_body(&mut resource, &service.settings);
    Ok(resource)
}

fn required<'a>(value: &'a str, label: &str, field: &'static str) -> Result<&'a str, RenderError> {
    if value.is_empty() {
        return Err(RenderError::MissingField {
            resource: label.to_string(),
            field,
        });
    }
    Ok(value)
}

fn header(api_version: &str, kind: &str, metadata: Mapping) -> Mapping {
    let mut resource = Mapping::new();
    resource.insert("apiVersion".into(), api_version.into());
    resource.insert("kind".into(), kind.into());
    resource.insert("metadata".into(), Value::Mapping(metadata));
    resource
}

/// Copy body keys, leaving the header fields alone
fn append_body(resource: &mut Mapping, body: &Mapping) {
    for (key, value) in body {
        if matches!(key.as_str(), Some("apiVersion" | "kind" | "metadata")) {
            continue;
        }
        resource.insert(key.clone(), value.clone());
    }
}

fn to_document(resource: Mapping, label: String) -> Result<String, RenderError> {
    serde_yaml::to_string(&Value::Mapping(resource)).map_err(|source| RenderError::Serialize {
        resource: label,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> Result<String, RenderError> {
        KubernetesRenderer.render(input)
    }

    #[test]
    fn test_render_components() {
        let manifest = render(
            r#"
name: shop
version: 1.0.0
components:
  - displayName: web
    component:
      kind: Deployment
      version: apps/v1
    configuration:
      metadata:
        labels:
          app: web
      spec:
        replicas: 2
  - displayName: web-svc
    component:
      kind: Service
      version: v1
    configuration:
      metadata:
        name: frontend
        namespace: shop
      spec:
        type: ClusterIP
"#,
        )
        .unwrap();

        insta::assert_snapshot!(manifest, @r"
        apiVersion: apps/v1
        kind: Deployment
        metadata:
          name: web
          labels:
            app: web
        spec:
          replicas: 2
        ---
        apiVersion: v1
        kind: Service
        metadata:
          name: frontend
          namespace: shop
        spec:
          type: ClusterIP
        ");
    }

    #[test]
    fn test_render_skips_annotations() {
        let manifest = render(
            r#"
name: shop
version: 1.0.0
components:
  - displayName: note
    component:
      kind: Comment
      version: core.meshery.io/v1alpha1
    metadata:
      isAnnotation: true
  - displayName: cfg
    component:
      kind: ConfigMap
      version: v1
"#,
        )
        .unwrap();

        assert!(!manifest.contains("Comment"));
        assert!(manifest.contains("kind: ConfigMap"));
        assert!(!manifest.contains("---"));
    }

    #[test]
    fn test_render_legacy_services() {
        let manifest = render(
            r#"
name: legacy
version: 0.0.1
services:
  cache:
    type: Deployment
    apiVersion: apps/v1
    namespace: infra
    settings:
      metadata:
        labels:
          tier: cache
      spec:
        replicas: 1
  settings:
    name: app-settings
    type: ConfigMap
    apiVersion: v1
    settings:
      data:
        mode: production
"#,
        )
        .unwrap();

        let docs: Vec<&str> = manifest.split("---\n").collect();
        assert_eq!(docs.len(), 2);

        let cache: Value = serde_yaml::from_str(docs[0]).unwrap();
        assert_eq!(cache["kind"], "Deployment");
        assert_eq!(cache["metadata"]["name"], "cache");
        assert_eq!(cache["metadata"]["namespace"], "infra");
        assert_eq!(cache["metadata"]["labels"]["tier"], "cache");
        assert_eq!(cache["spec"]["replicas"], 1);

        let settings: Value = serde_yaml::from_str(docs[1]).unwrap();
        assert_eq!(settings["metadata"]["name"], "app-settings");
        assert_eq!(settings["data"]["mode"], "production");
    }

    #[test]
    fn test_configuration_cannot_override_header() {
        let manifest = render(
            r#"
name: a
version: "1"
components:
  - displayName: x
    component:
      kind: ConfigMap
      version: v1
    configuration:
      kind: Secret
      data:
        k: v
"#,
        )
        .unwrap();

        let doc: Value = serde_yaml::from_str(&manifest).unwrap();
        assert_eq!(doc["kind"], "ConfigMap");
        assert_eq!(doc["data"]["k"], "v");
    }

    #[test]
    fn test_render_missing_kind() {
        let err = render(
            "name: a\nversion: '1'\ncomponents:\n  - component:\n      version: v1\n",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RenderError::MissingField { field: "kind", .. }
        ));
        assert_eq!(err.to_string(), "component #1 is missing kind");
    }

    #[test]
    fn test_render_missing_service_api_version() {
        let err = render("name: a\nversion: '1'\nservices:\n  db:\n    type: StatefulSet\n")
            .unwrap_err();
        assert_eq!(err.to_string(), "service 'db' is missing apiVersion");
    }

    #[test]
    fn test_render_empty_pattern() {
        assert_eq!(render("name: a\nversion: '1'\n").unwrap(), "");
    }

    #[test]
    fn test_render_invalid_input() {
        assert!(matches!(render(""), Err(RenderError::Pattern(_))));
    }
}
