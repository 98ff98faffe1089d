//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// Write `contents` to a uniquely named file in the temp directory.
fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("psnav_test_{}_{name}.toml", std::process::id()));
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

/// Removes an environment variable on creation and again on drop.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        Self(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
fn default_config_path_contains_psnav_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("psnav") && path_str.ends_with("config.toml"),
        "got: {path_str}"
    );
}

#[test]
fn default_log_path_ends_with_psnav_log() {
    let path = default_log_path();
    assert!(path.to_string_lossy().ends_with("psnav.log"), "got: {path:?}");
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(result, Ok(None));
}

#[test]
fn load_config_file_parses_valid_toml() {
    let path = temp_config(
        "valid",
        r#"
shell = "powershell"
group_families = true
poll_interval_ms = 50
catalog = "/tmp/catalog.json"
log_file_path = "/tmp/psnav.log"
"#,
    );

    let config = load_config_file(&path)
        .expect("valid TOML")
        .expect("file exists");

    assert_eq!(config.shell.as_deref(), Some("powershell"));
    assert_eq!(config.group_families, Some(true));
    assert_eq!(config.poll_interval_ms, Some(50));
    assert_eq!(config.catalog, Some(PathBuf::from("/tmp/catalog.json")));
    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/psnav.log")));

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let path = temp_config("invalid", "this is not valid TOML ][}{");

    match load_config_file(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {other:?}"),
    }

    fs::remove_file(path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"monokai\"");
    assert!(result.is_err(), "unknown keys must be rejected");
}

#[test]
fn load_config_file_reports_directory_as_read_error() {
    let dir = env::temp_dir();
    assert!(matches!(
        load_config_file(&dir),
        Err(ConfigError::ReadError { .. })
    ));
}

// ===== merge_config =====

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.shell, "pwsh");
    assert!(!config.group_families);
    assert_eq!(config.poll_interval_ms, 30);
    assert_eq!(config.poll_interval(), Duration::from_millis(30));
    assert_eq!(config.catalog, None);
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let file = ConfigFile {
        shell: Some("powershell".into()),
        group_families: Some(true),
        catalog: Some(PathBuf::from("catalog.json")),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));

    assert_eq!(resolved.shell, "powershell");
    assert!(resolved.group_families);
    assert_eq!(resolved.catalog, Some(PathBuf::from("catalog.json")));
    assert_eq!(resolved.poll_interval_ms, 30, "unset field keeps default");
}

#[test]
fn merge_config_clamps_poll_interval() {
    let zero = ConfigFile {
        poll_interval_ms: Some(0),
        ..ConfigFile::default()
    };
    assert_eq!(merge_config(Some(zero)).poll_interval_ms, 1);

    let huge = ConfigFile {
        poll_interval_ms: Some(60_000),
        ..ConfigFile::default()
    };
    assert_eq!(merge_config(Some(huge)).poll_interval_ms, 1000);
}

// ===== environment =====

#[test]
#[serial(psnav_env)]
fn apply_env_overrides_respects_shell_and_catalog() {
    let _shell = EnvGuard::new(SHELL_ENV);
    let _catalog = EnvGuard::new(CATALOG_ENV);
    env::set_var(SHELL_ENV, "/opt/pwsh/pwsh");
    env::set_var(CATALOG_ENV, "/data/catalog.json");

    let config = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(config.shell, "/opt/pwsh/pwsh");
    assert_eq!(config.catalog, Some(PathBuf::from("/data/catalog.json")));
}

#[test]
#[serial(psnav_env)]
fn apply_env_overrides_ignores_empty_values() {
    let _shell = EnvGuard::new(SHELL_ENV);
    env::set_var(SHELL_ENV, "  ");

    let config = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(config.shell, "pwsh");
}

#[test]
#[serial(psnav_env)]
fn apply_env_overrides_no_change_when_unset() {
    let _shell = EnvGuard::new(SHELL_ENV);
    let _catalog = EnvGuard::new(CATALOG_ENV);

    assert_eq!(
        apply_env_overrides(ResolvedConfig::default()),
        ResolvedConfig::default()
    );
}

#[test]
#[serial(psnav_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let explicit = temp_config("explicit", "shell = \"explicit\"");
    let from_env = temp_config("env", "shell = \"from-env\"");
    env::set_var(CONFIG_ENV, &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()))
        .expect("valid")
        .expect("present");

    assert_eq!(config.shell.as_deref(), Some("explicit"));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(psnav_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let from_env = temp_config("env_only", "group_families = true");
    env::set_var(CONFIG_ENV, &from_env);

    let config = load_config_with_precedence(None)
        .expect("valid")
        .expect("present");

    assert_eq!(config.group_families, Some(true));

    fs::remove_file(from_env).ok();
}

#[test]
#[serial(psnav_config)]
fn load_config_with_precedence_env_path_missing_is_none() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    env::set_var(CONFIG_ENV, "/nonexistent/psnav/config.toml");

    assert_eq!(load_config_with_precedence(None), Ok(None));
}

// ===== CLI and full chain =====

#[test]
fn apply_cli_overrides_only_touches_given_flags() {
    let base = ResolvedConfig {
        shell: "from-file".into(),
        ..ResolvedConfig::default()
    };

    let unchanged = apply_cli_overrides(base.clone(), CliOverrides::default());
    assert_eq!(unchanged, base);

    let changed = apply_cli_overrides(
        base,
        CliOverrides {
            shell: Some("cli".into()),
            catalog: Some(PathBuf::from("cli.json")),
            group_families: Some(true),
        },
    );
    assert_eq!(changed.shell, "cli");
    assert_eq!(changed.catalog, Some(PathBuf::from("cli.json")));
    assert!(changed.group_families);
}

#[test]
#[serial(psnav_env)]
fn precedence_chain_file_then_env_then_cli() {
    let _shell = EnvGuard::new(SHELL_ENV);
    let _catalog = EnvGuard::new(CATALOG_ENV);
    let path = temp_config(
        "chain",
        r#"
shell = "file-shell"
catalog = "file.json"
group_families = true
"#,
    );
    env::set_var(SHELL_ENV, "env-shell");

    let config = resolve(
        Some(path.clone()),
        CliOverrides {
            catalog: Some(PathBuf::from("cli.json")),
            ..CliOverrides::default()
        },
    )
    .expect("resolves");

    assert_eq!(config.shell, "env-shell", "env beats file");
    assert_eq!(config.catalog, Some(PathBuf::from("cli.json")), "cli beats file");
    assert!(config.group_families, "file beats default");

    fs::remove_file(path).ok();
}

#[test]
fn resolve_propagates_parse_errors() {
    let path = temp_config("broken", "shell = ");
    let result = resolve(Some(path.clone()), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    fs::remove_file(path).ok();
}
