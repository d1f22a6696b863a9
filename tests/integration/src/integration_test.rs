//! End-to-end integration tests over the fixture deployments
//!
//! These exercise the complete flow: document loading -> include and env
//! resolution -> merge -> validation -> context accessors and cluster settings.

use std::collections::HashMap;

use kh_config::{ClusterSettings, ContextResolver, Error, Mapping, Node, ResolverSettings};
use kh_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixture(name: &str) -> NormalizedPath {
    NormalizedPath::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/deployments")
        .join(name)
}

fn settings_for(name: &str) -> ResolverSettings {
    let root = fixture(name);
    ResolverSettings::new(root.join("config.yaml").to_native()).with_include_dir(root.to_native())
}

fn shop_env() -> HashMap<String, String> {
    [
        ("SHOP_IMAGE_VERSION", "1.4.2"),
        ("SHOP_K8S_TOKEN", "staging-token"),
        ("SHOP_DB_HOST", "db.shop.internal"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn yaml(text: &str) -> Node {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_staging_context() {
    let settings = settings_for("shop").with_strict_env(true);
    let env = shop_env();

    let context = ContextResolver::with_env(&settings, &env)
        .resolve_section("staging")
        .unwrap();

    assert_eq!(context.get("image"), Some(&Node::from("registry.example.com/shop:1.4.2")));
    assert_eq!(context.get("replicas"), Some(&Node::from(1)));
    assert_eq!(context.namespace(), Some("shop-staging"));
    // Section limits merge into the included resources
    assert_eq!(
        context.get("resources"),
        Some(&yaml("{requests: {cpu: 100m, memory: 128Mi}, limits: {cpu: 500m, memory: 512Mi}}"))
    );
    assert_eq!(
        context.get("probes"),
        Some(&yaml("{liveness: {path: /healthz, port: 8080}, readiness: {path: /ready, port: 8080}}"))
    );

    let rendered: Vec<String> = context
        .templates()
        .unwrap()
        .iter()
        .map(|entry| entry.rendered_name())
        .collect();
    assert_eq!(rendered, vec!["configmap.yaml", "deployment.yaml", "service.yaml"]);
}

#[test]
fn test_staging_cluster_settings() {
    let settings = settings_for("shop");
    let env = shop_env();
    let context = ContextResolver::with_env(&settings, &env)
        .resolve_section("staging")
        .unwrap();

    let cluster = ClusterSettings::from_context(&context).unwrap();
    assert_eq!(cluster.host, "https://staging.k8s.example.com:6443");
    assert_eq!(cluster.authorization_header(), "Bearer staging-token");
    assert!(!cluster.debug);

    let temp = TempDir::new().unwrap();
    let path = cluster.write_ca_certificate(temp.path()).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "-----BEGIN CERTIFICATE-----\n");
}

#[test]
fn test_production_nested_includes() {
    let settings = settings_for("shop").with_strict_env(true);
    let env = shop_env();

    let context = ContextResolver::with_env(&settings, &env)
        .resolve_section("production")
        .unwrap();

    assert_eq!(
        context.get("env"),
        Some(&yaml(
            "LOG_LEVEL: info\nDATABASE_URL: postgres://db.shop.internal:5432/shop\nFEATURES: {checkout: true, recommendations: false}\n"
        ))
    );
    assert_eq!(context.templates().unwrap().len(), 3);

    // Production carries no connection details
    let err = ClusterSettings::from_context(&context).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingRequiredVars { missing, .. }
            if missing == vec!["k8s_master_uri", "k8s_token", "k8s_ca_base64"]
    ));
}

#[test]
fn test_strict_mode_needs_every_variable() {
    let settings = settings_for("shop").with_strict_env(true);
    let mut env = shop_env();
    env.remove("SHOP_DB_HOST");

    // Staging never references the database host
    assert!(ContextResolver::with_env(&settings, &env).resolve_section("staging").is_ok());

    let err = ContextResolver::with_env(&settings, &env)
        .resolve_section("production")
        .unwrap_err();
    assert!(matches!(err, Error::MissingEnvVarStrict { name } if name == "SHOP_DB_HOST"));
}

#[test]
fn test_lenient_mode_blanks_missing_variables() {
    let settings = settings_for("shop");
    let env: HashMap<String, String> = HashMap::new();

    let context = ContextResolver::with_env(&settings, &env)
        .resolve_section("staging")
        .unwrap();

    assert_eq!(context.get("image"), Some(&Node::from("registry.example.com/shop:")));
    let err = context.check_required(&["app_name", "image_version"]).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredVars { missing, .. } if missing == vec!["image_version"]));
}

#[test]
fn test_include_loops_are_detected() {
    let settings = settings_for("loops");
    let env: HashMap<String, String> = HashMap::new();
    let resolver = ContextResolver::with_env(&settings, &env);

    for section in ["direct", "indirect"] {
        let err = resolver.resolve_section(section).unwrap_err();
        assert!(
            matches!(err, Error::InfiniteIncludeLoop { .. }),
            "section {section}: {err}"
        );
    }
}

#[test]
fn test_context_serializes_without_markers() {
    let settings = settings_for("shop");
    let env = shop_env();
    let context = ContextResolver::with_env(&settings, &env)
        .resolve_section("production")
        .unwrap();

    let text = serde_yaml::to_string(&context).unwrap();
    assert!(!text.contains("{{"), "unresolved marker in:\n{text}");

    let reparsed: Mapping = serde_yaml::from_str(&text).unwrap();
    assert_eq!(&reparsed, context.as_mapping());
}
