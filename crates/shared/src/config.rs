//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Return-level constants and policies.
    #[serde(default)]
    pub filing: FilingConfig,
    /// Input configuration.
    #[serde(default)]
    pub input: InputConfig,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// How the filer GSTIN is chosen when the input names more than one seller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilerPolicy {
    /// Fail the conversion on the first row whose seller differs.
    #[default]
    RejectMixed,
    /// Keep the seller of the last row read, logging a warning.
    LastWins,
}

/// Constants stamped into the GSTR-1 document and the rules that pick
/// intra-state supplies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilingConfig {
    /// POS code of the filer's own state; supplies there are intra-state.
    pub home_state_code: String,
    /// POS code used for state names missing from the lookup table.
    pub fallback_state_code: String,
    /// Return format version.
    pub version: String,
    /// Placeholder hash expected by the offline tool.
    pub hash: String,
    /// `typ` marker of every B2CS line.
    pub supply_kind: String,
    /// GSTIN of the e-commerce operator collecting tax at source.
    pub collector_etin: String,
    /// `flag` of every collector entry.
    pub collector_flag: String,
    /// Mixed-seller handling.
    pub filer_policy: FilerPolicy,
}

impl Default for FilingConfig {
    fn default() -> Self {
        Self {
            home_state_code: "33".to_string(),
            fallback_state_code: "97".to_string(),
            version: "GST3.1.6".to_string(),
            hash: "hash".to_string(),
            supply_kind: "OE".to_string(),
            collector_etin: "33AAICA3918J1C0".to_string(),
            collector_flag: "N".to_string(),
            filer_policy: FilerPolicy::default(),
        }
    }
}

/// Input configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Sales report to convert.
    #[serde(default = "default_input_path")]
    pub path: String,
}

fn default_input_path() -> String {
    "input.csv".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the return is written into.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Print the written file back to stdout.
    #[serde(default = "default_echo")]
    pub echo: bool,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_echo() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            echo: default_echo(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GSTR1").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.filing.home_state_code, "33");
        assert_eq!(config.filing.fallback_state_code, "97");
        assert_eq!(config.filing.version, "GST3.1.6");
        assert_eq!(config.filing.hash, "hash");
        assert_eq!(config.filing.supply_kind, "OE");
        assert_eq!(config.filing.collector_etin, "33AAICA3918J1C0");
        assert_eq!(config.filing.collector_flag, "N");
        assert_eq!(config.filing.filer_policy, FilerPolicy::RejectMixed);
        assert_eq!(config.input.path, "input.csv");
        assert_eq!(config.output.dir, ".");
        assert!(config.output.echo);
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        temp_env::with_vars_unset(
            [
                "GSTR1__FILING__HOME_STATE_CODE",
                "GSTR1__FILING__FILER_POLICY",
                "GSTR1__INPUT__PATH",
            ],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.filing.home_state_code, "33");
                assert_eq!(config.input.path, "input.csv");
            },
        );
    }

    #[test]
    fn test_load_env_overrides() {
        temp_env::with_vars(
            [
                ("GSTR1__FILING__HOME_STATE_CODE", Some("09")),
                ("GSTR1__FILING__FILER_POLICY", Some("last_wins")),
                ("GSTR1__INPUT__PATH", Some("sales.csv")),
                ("GSTR1__OUTPUT__ECHO", Some("false")),
            ],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.filing.home_state_code, "09");
                assert_eq!(config.filing.filer_policy, FilerPolicy::LastWins);
                assert_eq!(config.filing.version, "GST3.1.6");
                assert_eq!(config.input.path, "sales.csv");
                assert!(!config.output.echo);
            },
        );
    }
}
