//! Settings loader implementation

use crate::schema::ManagerSettings;
use crate::validation::{SettingsValidator, ValidationReport};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::Path;
use tracing::warn;

/// Prefix of environment variables overriding settings
pub const ENV_PREFIX: &str = "ENVMGR_";

/// Settings loader that handles YAML files and environment variables
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from defaults, a YAML file and environment variables
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<ManagerSettings> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            bail!("Settings file not found: {}", config_path.display());
        }

        let settings: ManagerSettings = Self::defaults()
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| format!("Failed to parse settings from {}", config_path.display()))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from defaults and environment variables only
    pub fn from_env() -> Result<ManagerSettings> {
        let settings: ManagerSettings = Self::defaults()
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Failed to parse settings from environment")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a YAML string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<ManagerSettings> {
        let settings: ManagerSettings = Self::defaults()
            .merge(Yaml::string(yaml_content))
            .extract()
            .context("Failed to parse settings from string")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Write the default settings as YAML
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yaml::to_string(&ManagerSettings::default())
            .context("Failed to serialize default settings")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example settings file")?;

        Ok(())
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(ManagerSettings::default()))
    }

    /// Fail on validation errors; warnings are logged and returned
    fn validate(settings: &ManagerSettings) -> Result<ValidationReport> {
        let report = SettingsValidator::validate(settings);
        if report.has_errors() {
            let issues: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
            bail!("Invalid settings: {}", issues.join("; "));
        }
        for warning in &report.warnings {
            warn!(field = warning.field.as_str(), "{}", warning.message);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_string() {
        let yaml_content = r#"
files:
  - base.env
  - local.env
overwrite_existing: false
"#;

        let settings = SettingsLoader::load_from_str(yaml_content).unwrap();
        assert_eq!(settings.files, vec!["base.env", "local.env"]);
        assert!(!settings.overwrite_existing);
    }

    #[test]
    fn test_load_from_string_keeps_defaults() {
        let settings = SettingsLoader::load_from_str("overwrite_existing: false").unwrap();
        assert_eq!(settings.files, vec![".env"]);
    }

    #[test]
    fn test_validation_errors() {
        let result = SettingsLoader::load_from_str("files: []");
        assert!(result.is_err());

        let result = SettingsLoader::load_from_str("files: [\"\"]");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("File path cannot be empty"));
    }

    #[test]
    fn test_validation_warnings_are_reported_not_fatal() {
        let settings = SettingsLoader::load_from_str("files: [a.env, b.env, a.env]").unwrap();
        assert_eq!(settings.files.len(), 3);

        let report = SettingsLoader::validate(&settings).unwrap();
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "files[2]");
        assert!(report.warnings[0].message.contains("a.env"));
    }

    #[test]
    fn test_missing_file() {
        let result = SettingsLoader::load("/definitely/not/here/envmgr.yaml");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    #[serial]
    fn test_load_file_with_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "files: [app.env]").unwrap();
        writeln!(file, "overwrite_existing: true").unwrap();

        std::env::set_var("ENVMGR_OVERWRITE_EXISTING", "false");
        let settings = SettingsLoader::load(file.path());
        std::env::remove_var("ENVMGR_OVERWRITE_EXISTING");

        let settings = settings.unwrap();
        assert_eq!(settings.files, vec!["app.env"]);
        assert!(!settings.overwrite_existing);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("ENVMGR_FILES", r#"["one.env", "two.env"]"#);
        let settings = SettingsLoader::from_env();
        std::env::remove_var("ENVMGR_FILES");

        assert_eq!(settings.unwrap().files, vec!["one.env", "two.env"]);
    }

    #[test]
    #[serial]
    fn test_create_example() {
        let temp_file = NamedTempFile::new().unwrap();
        SettingsLoader::create_example(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("files:"));
        assert!(content.contains("overwrite_existing: true"));

        let settings = SettingsLoader::load(temp_file.path()).unwrap();
        assert_eq!(settings, ManagerSettings::default());
    }
}
