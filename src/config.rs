//! Configuration system for fzrank.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FZRANK_*)
//! 3. Project manifests (.fzrank-config/manifest.yaml, outermost first)
//! 4. User global (~/.config/fzrank/config.yaml)
//! 5. Built-in defaults (lowest priority)

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fzrank::CaseMode;

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration for fzrank.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Matching behaviour
    pub matching: MatchingConfig,
    /// Display settings
    pub display: DisplayConfig,
    /// Behavior settings
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Case handling: ignore, respect, smart
    pub case: CaseMode,
    /// Split queries on whitespace into tokens that must all match
    pub split_tokens: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            case: CaseMode::Smart,
            split_tokens: true,
        }
    }
}

/// Display settings.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplayConfig {
    /// Highlight colour for matched characters (null = yellow)
    pub highlight_color: Option<String>,
    /// Show matched ranges in pretty output
    pub show_ranges: bool,
    /// Maximum candidate width in columns (null = terminal width)
    pub max_width: Option<usize>,
}

/// Behavior defaults.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Maximum number of results (null = all)
    pub limit: Option<usize>,
    /// Drop results scoring below this value
    pub min_score: Option<i64>,
    /// Suppress hints
    pub quiet: bool,
}

// ============================================================================
// Config Source Tracking
// ============================================================================

/// Source of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default
    Default,
    /// User global config (~/.config/fzrank/config.yaml)
    UserGlobal,
    /// Project manifest (.fzrank-config/manifest.yaml)
    ProjectManifest(String),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::UserGlobal => write!(f, "~/.config/fzrank/config.yaml"),
            ConfigSource::ProjectManifest(path) => write!(f, "{}", path),
        }
    }
}

// ============================================================================
// Environment Variable Registry
// ============================================================================

/// Environment variable definition for documentation.
pub struct EnvVar {
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub config_path: &'static str,
    pub values: Option<&'static str>,
}

/// Registry of all supported environment variables.
pub const ENV_VARS: &[EnvVar] = &[
    EnvVar {
        name: "NO_COLOR",
        description: "Disable colored output (standard)",
        default: "unset",
        config_path: "-",
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "FORCE_COLOR",
        description: "Force colored output even when not a TTY",
        default: "unset",
        config_path: "-",
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "FZRANK_FORMAT",
        description: "Default output format",
        default: "pretty (auto-detects TTY)",
        config_path: "-",
        values: Some("pretty, plain, json, yaml"),
    },
    EnvVar {
        name: "FZRANK_CASE",
        description: "Default case handling",
        default: "smart",
        config_path: "matching.case",
        values: Some("ignore, respect, smart"),
    },
    EnvVar {
        name: "FZRANK_LIMIT",
        description: "Default maximum number of results",
        default: "unset (all)",
        config_path: "behavior.limit",
        values: Some("number"),
    },
    EnvVar {
        name: "FZRANK_QUIET",
        description: "Suppress hint messages",
        default: "false",
        config_path: "behavior.quiet",
        values: Some("1, true, yes"),
    },
];

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Parse a boolean environment variable.
///
/// Returns `Some(true)` for 1/true/yes, `Some(false)` for 0/false/no,
/// and `None` if unset, empty or unrecognised.
pub fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| {
        if v.is_empty() {
            return None;
        }
        match v.to_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        }
    })
}

/// Parse a string environment variable.
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

pub fn env_usize(name: &str) -> Option<usize> {
    env_string(name).and_then(|v| v.parse().ok())
}

/// Check if a string environment variable is set and non-empty.
pub fn env_is_set(name: &str) -> bool {
    std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false)
}

/// Parse FZRANK_CASE.
pub fn env_case() -> Option<CaseMode> {
    match env_string("FZRANK_CASE")?.to_lowercase().as_str() {
        "ignore" | "insensitive" => Some(CaseMode::Ignore),
        "respect" | "sensitive" => Some(CaseMode::Respect),
        "smart" => Some(CaseMode::Smart),
        _ => None,
    }
}

// ============================================================================
// Config Loading
// ============================================================================

/// Manifest file name within .fzrank-config/
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Config directory name
pub const CONFIG_DIR: &str = ".fzrank-config";

/// Result of loading configuration with source tracking.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The merged configuration
    pub config: Config,
    /// Sources that contributed to this config (in order of application)
    pub sources: Vec<ConfigSource>,
}

/// Load configuration from defaults, the user global file, and project
/// manifests in `cwd` and its ancestors.
///
/// Env vars and CLI flags are applied at point of use.
pub fn load_config(cwd: &Path) -> LoadedConfig {
    let mut config = Config::default();
    let mut sources = vec![ConfigSource::Default];

    if let Some(user_config_path) = user_config_path()
        && let Some(user_config) = load_manifest(&user_config_path)
    {
        merge(&mut config, &user_config);
        sources.push(ConfigSource::UserGlobal);
    }

    for path in collect_manifest_paths(cwd) {
        if let Some(manifest_config) = load_manifest(&path) {
            merge(&mut config, &manifest_config);
            sources.push(ConfigSource::ProjectManifest(
                path.to_string_lossy().to_string(),
            ));
        }
    }

    LoadedConfig { config, sources }
}

/// Get the user config file path (~/.config/fzrank/config.yaml).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fzrank").join("config.yaml"))
}

/// Load a manifest file, returning None if it doesn't exist or can't be parsed.
pub fn load_manifest(path: &Path) -> Option<Config> {
    let content = fs::read_to_string(path).ok()?;
    serde_yaml::from_str(&content).ok()
}

/// Collect existing manifests from the filesystem root down to `cwd`.
fn collect_manifest_paths(cwd: &Path) -> Vec<PathBuf> {
    let cwd = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    let mut paths: Vec<PathBuf> = cwd
        .ancestors()
        .map(|dir| dir.join(CONFIG_DIR).join(MANIFEST_FILE))
        .filter(|p| p.is_file())
        .collect();
    paths.reverse();
    paths
}

/// Merge overlay config into base config.
///
/// Non-default values in overlay override values in base.
pub fn merge(base: &mut Config, overlay: &Config) {
    let default_matching = MatchingConfig::default();
    if overlay.matching.case != default_matching.case {
        base.matching.case = overlay.matching.case;
    }
    if overlay.matching.split_tokens != default_matching.split_tokens {
        base.matching.split_tokens = overlay.matching.split_tokens;
    }

    if overlay.display.highlight_color.is_some() {
        base.display.highlight_color = overlay.display.highlight_color.clone();
    }
    if overlay.display.show_ranges {
        base.display.show_ranges = true;
    }
    if overlay.display.max_width.is_some() {
        base.display.max_width = overlay.display.max_width;
    }

    if overlay.behavior.limit.is_some() {
        base.behavior.limit = overlay.behavior.limit;
    }
    if overlay.behavior.min_score.is_some() {
        base.behavior.min_score = overlay.behavior.min_score;
    }
    if overlay.behavior.quiet {
        base.behavior.quiet = true;
    }
}

/// Generate JSON schema for the config.
pub fn json_schema() -> String {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

/// Effective case mode: FZRANK_CASE overrides the config file.
pub fn case_mode(config: &Config) -> CaseMode {
    env_case().unwrap_or(config.matching.case)
}

/// Effective result limit: FZRANK_LIMIT overrides the config file.
pub fn limit(config: &Config) -> Option<usize> {
    env_usize("FZRANK_LIMIT").or(config.behavior.limit)
}

/// Check if quiet mode is enabled (config or FZRANK_QUIET).
pub fn is_quiet(config: &Config) -> bool {
    config.behavior.quiet || env_bool("FZRANK_QUIET").unwrap_or(false)
}

/// Generate a template manifest with comments.
pub fn template_manifest() -> String {
    r#"# fzrank configuration manifest
# Place in .fzrank-config/manifest.yaml

# Matching
# matching:
#   case: smart         # ignore | respect | smart
#   split_tokens: true  # whitespace-separated tokens must all match

# Display settings
# display:
#   highlight_color: yellow
#   show_ranges: false
#   max_width: null     # null = terminal width

# Behavior settings
# behavior:
#   limit: null         # null = all results
#   min_score: null
#   quiet: false
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to serialize env var tests
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap();

        let originals: Vec<_> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(*k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => unsafe { std::env::set_var(k, val) },
                None => unsafe { std::env::remove_var(k) },
            }
        }

        let result = f();

        for (k, original) in originals {
            match original {
                Some(val) => unsafe { std::env::set_var(k, val) },
                None => unsafe { std::env::remove_var(k) },
            }
        }

        result
    }

    #[test]
    fn test_env_bool() {
        with_env(&[("FZRANK_TEST_BOOL", Some("YES"))], || {
            assert_eq!(env_bool("FZRANK_TEST_BOOL"), Some(true));
        });
        with_env(&[("FZRANK_TEST_BOOL", Some("0"))], || {
            assert_eq!(env_bool("FZRANK_TEST_BOOL"), Some(false));
        });
        with_env(&[("FZRANK_TEST_BOOL", Some("maybe"))], || {
            assert_eq!(env_bool("FZRANK_TEST_BOOL"), None);
        });
        with_env(&[("FZRANK_TEST_BOOL", None)], || {
            assert_eq!(env_bool("FZRANK_TEST_BOOL"), None);
        });
    }

    #[test]
    fn test_env_usize() {
        with_env(&[("FZRANK_TEST_NUM", Some("42"))], || {
            assert_eq!(env_usize("FZRANK_TEST_NUM"), Some(42));
        });
        with_env(&[("FZRANK_TEST_NUM", Some("-1"))], || {
            assert_eq!(env_usize("FZRANK_TEST_NUM"), None);
        });
        with_env(&[("FZRANK_TEST_NUM", Some(""))], || {
            assert!(!env_is_set("FZRANK_TEST_NUM"));
        });
    }

    #[test]
    fn test_env_case_overrides_config() {
        let mut config = Config::default();
        config.matching.case = CaseMode::Ignore;
        with_env(&[("FZRANK_CASE", Some("Respect"))], || {
            assert_eq!(case_mode(&config), CaseMode::Respect);
        });
        with_env(&[("FZRANK_CASE", Some("bogus"))], || {
            assert_eq!(case_mode(&config), CaseMode::Ignore);
        });
        with_env(&[("FZRANK_CASE", None)], || {
            assert_eq!(case_mode(&config), CaseMode::Ignore);
        });
    }

    #[test]
    fn test_limit_env_overrides_config() {
        let mut config = Config::default();
        config.behavior.limit = Some(5);
        with_env(&[("FZRANK_LIMIT", Some("2"))], || {
            assert_eq!(limit(&config), Some(2));
        });
        with_env(&[("FZRANK_LIMIT", None)], || {
            assert_eq!(limit(&config), Some(5));
        });
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.matching.case, CaseMode::Smart);
        assert!(config.matching.split_tokens);
        assert_eq!(config.behavior.limit, None);
        assert!(!config.behavior.quiet);
    }

    #[test]
    fn test_partial_manifest_parses() {
        let config: Config = serde_yaml::from_str("matching:\n  case: respect\n").unwrap();
        assert_eq!(config.matching.case, CaseMode::Respect);
        assert!(config.matching.split_tokens);
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut base = Config::default();
        let mut overlay = Config::default();
        overlay.matching.split_tokens = false;
        overlay.behavior.limit = Some(10);
        overlay.display.highlight_color = Some("red".to_string());

        merge(&mut base, &overlay);

        assert!(!base.matching.split_tokens);
        assert_eq!(base.behavior.limit, Some(10));
        assert_eq!(base.display.highlight_color.as_deref(), Some("red"));
        assert_eq!(base.matching.case, CaseMode::Smart);
    }

    #[test]
    fn test_merge_defaults_preserved() {
        let mut base = Config::default();
        base.behavior.limit = Some(3);
        merge(&mut base, &Config::default());
        assert_eq!(base.behavior.limit, Some(3));
    }

    #[test]
    fn test_load_manifest_skips_garbage() {
        let dir = std::env::temp_dir().join(format!("fzrank-config-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("bad.yaml");
        fs::write(&bad, "matching: [this is: not valid").unwrap();
        assert!(load_manifest(&bad).is_none());
        assert!(load_manifest(&dir.join("missing.yaml")).is_none());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_manifests_apply_outermost_first() {
        let root = std::env::temp_dir().join(format!("fzrank-walk-test-{}", std::process::id()));
        let inner = root.join("inner");
        fs::create_dir_all(inner.join(CONFIG_DIR)).unwrap();
        fs::create_dir_all(root.join(CONFIG_DIR)).unwrap();
        fs::write(
            root.join(CONFIG_DIR).join(MANIFEST_FILE),
            "behavior:\n  limit: 1\n",
        )
        .unwrap();
        fs::write(
            inner.join(CONFIG_DIR).join(MANIFEST_FILE),
            "behavior:\n  limit: 7\n",
        )
        .unwrap();

        let paths = collect_manifest_paths(&inner);
        let n = paths.len();
        assert!(n >= 2);
        assert!(paths[n - 1].starts_with(inner.canonicalize().unwrap()));

        let loaded = load_config(&inner);
        assert_eq!(loaded.config.behavior.limit, Some(7));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_json_schema_generates() {
        let schema = json_schema();
        assert!(schema.contains("MatchingConfig"));
        assert!(schema.contains("split_tokens"));
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Default.to_string(), "default");
        assert_eq!(
            ConfigSource::ProjectManifest("/x/.fzrank-config/manifest.yaml".to_string())
                .to_string(),
            "/x/.fzrank-config/manifest.yaml"
        );
    }

    #[test]
    fn test_template_manifest() {
        let template = template_manifest();
        assert!(template.contains("# fzrank configuration manifest"));
        assert!(template.contains("matching:"));
        assert!(template.contains("behavior:"));
    }
}
