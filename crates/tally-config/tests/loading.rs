//! Layering of defaults, config files and environment variables.

use std::path::Path;

use figment::Jail;
use tally_config::{AnalyzerConfig, ConfigError, ExtractConfig, LogLevel};
use tally_graph::CodeLevel;

#[test]
fn defaults_without_file_or_env() {
    Jail::expect_with(|_jail| {
        let config = AnalyzerConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config, AnalyzerConfig::default());
        Ok(())
    });
}

#[test]
fn config_file_in_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tally.json",
            r#"{
                "root": "/app",
                "output_filename": "[name].[contenthash:8].js",
                "code_level": "no-original-source",
                "log_level": "debug"
            }"#,
        )?;
        let config = AnalyzerConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.root, Path::new("/app"));
        assert_eq!(config.output_filename.as_deref(), Some("[name].[contenthash:8].js"));
        assert_eq!(config.code_level, CodeLevel::NoOriginalSource);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.parallel_attribution);
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("tally.json", r#"{ "initial_only": false, "max_reexport_depth": 8 }"#)?;
        jail.set_env("TALLY_INITIAL_ONLY", "true");
        jail.set_env("TALLY_SOURCE_NAMESPACE", "my-app");
        let config = AnalyzerConfig::load(None).map_err(|e| e.to_string())?;
        assert!(config.initial_only);
        assert_eq!(config.max_reexport_depth, 8);
        assert_eq!(config.source_namespace.as_deref(), Some("my-app"));
        Ok(())
    });
}

#[test]
fn explicit_file_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("custom.json");
    let err = AnalyzerConfig::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
}

#[test]
fn explicit_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    std::fs::write(&path, r#"{ "parallel_attribution": false }"#).unwrap();

    let config = AnalyzerConfig::load(Some(&path)).unwrap();
    assert!(!config.parallel_attribution);
}

#[test]
fn invalid_values_are_rejected_after_loading() {
    Jail::expect_with(|jail| {
        jail.create_file("tally.json", r#"{ "max_reexport_depth": 0 }"#)?;
        let err = AnalyzerConfig::load(None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "max_reexport_depth"));
        Ok(())
    });
}

#[test]
fn malformed_file_is_a_load_error() {
    Jail::expect_with(|jail| {
        jail.create_file("tally.json", r#"{ "initial_only": "sometimes" }"#)?;
        let err = AnalyzerConfig::load(None).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
        Ok(())
    });
}

#[test]
fn figment_accepts_caller_overrides() {
    use figment::providers::Serialized;

    let figment = AnalyzerConfig::figment(None).merge(Serialized::default("root", "/srv/build"));
    let config = figment.extract_config().unwrap();
    assert_eq!(config.root, Path::new("/srv/build"));
}

#[test]
fn transform_options_follow_config() {
    let config = AnalyzerConfig {
        root: "/app".into(),
        runtime_prefixes: vec!["custom/runtime/".into()],
        ..AnalyzerConfig::default()
    };
    let options = config.transform_options();
    assert_eq!(options.root.as_deref(), Some(Path::new("/app")));
    assert!(options.is_runtime_identifier("custom/runtime/chunk"));
    assert!(!options.is_runtime_identifier("webpack/runtime/chunk"));
}

#[test]
fn toml_config_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tally.toml",
            r#"
                root = "/srv/app"
                initial_only = true
                ignored_bailouts = []
            "#,
        )?;
        let config = AnalyzerConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.root, Path::new("/srv/app"));
        assert!(config.initial_only);
        assert!(config.ignored_bailouts.is_empty());
        Ok(())
    });
}

#[test]
fn json_file_takes_precedence_over_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("tally.json", r#"{ "root": "/from/json" }"#)?;
        jail.create_file("tally.toml", r#"root = "/from/toml""#)?;
        let config = AnalyzerConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.root, Path::new("/from/json"));
        Ok(())
    });
}
