//! Configuration for the JsonForms components
//!
//! Values that used to be process-wide (the prefix-search limit, the meta
//! schema page) live here and are handed to each component when it is built.
//! The file format is TOML; every field has a default so a partial file, or
//! no file at all, is valid.

pub mod error;

pub use error::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFormsConfig {
    /// Root of the directory tree imported by `import`
    pub data_dir: PathBuf,
    /// Path of the sled database holding pages
    pub storage_path: PathBuf,
    /// Entry point used to build page URLs (`{script_path}?title=...`)
    pub script_path: String,
    /// Maximum number of titles returned by a prefix search
    pub query_limit: usize,
    /// Page holding the meta schema handed to the form editor
    pub meta_schema_title: String,
    /// Namespace holding JSON schemas
    pub schema_namespace: String,
    /// Namespace holding form descriptors
    pub form_namespace: String,
    /// Namespace name -> numeric id
    pub namespaces: BTreeMap<String, i32>,
    /// Recognized content model ids
    pub content_models: Vec<String>,
    /// Slot role -> default content model
    pub slot_roles: BTreeMap<String, String>,
    /// JSON pointer -> keys written first when imported JSON is re-encoded
    pub key_orders: BTreeMap<String, Vec<String>>,
}

fn default_namespaces() -> BTreeMap<String, i32> {
    [
        ("Talk", 1),
        ("User", 2),
        ("Project", 4),
        ("File", 6),
        ("MediaWiki", 8),
        ("Template", 10),
        ("Help", 12),
        ("Category", 14),
        ("Module", 828),
        ("JsonSchema", 2100),
        ("JsonForm", 2102),
    ]
    .into_iter()
    .map(|(name, id)| (name.to_string(), id))
    .collect()
}

fn default_content_models() -> Vec<String> {
    ["wikitext", "json", "javascript", "css", "text", "Scribunto"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for JsonFormsConfig {
    fn default() -> Self {
        let mut slot_roles = BTreeMap::new();
        slot_roles.insert("main".to_string(), "wikitext".to_string());

        Self {
            data_dir: PathBuf::from("data"),
            storage_path: PathBuf::from("storage"),
            script_path: "/index.php".to_string(),
            query_limit: 500,
            meta_schema_title: "JsonSchema:MetaSchema".to_string(),
            schema_namespace: "JsonSchema".to_string(),
            form_namespace: "JsonForm".to_string(),
            namespaces: default_namespaces(),
            content_models: default_content_models(),
            slot_roles,
            key_orders: BTreeMap::new(),
        }
    }
}

impl JsonFormsConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults are returned instead.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the components cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.query_limit == 0 {
            return Err(ConfigError::validation("query_limit must be greater than 0"));
        }
        if self.script_path.trim().is_empty() {
            return Err(ConfigError::validation("script_path cannot be empty"));
        }
        for (role, model) in &self.slot_roles {
            if !self.content_models.iter().any(|m| m == model) {
                return Err(ConfigError::validation(format!(
                    "slot role '{}' defaults to unknown content model '{}'",
                    role, model
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = JsonFormsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.query_limit, 500);
        assert_eq!(config.meta_schema_title, "JsonSchema:MetaSchema");
        assert_eq!(config.namespaces.get("JsonSchema"), Some(&2100));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = JsonFormsConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.script_path, "/index.php");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jsonforms.toml");
        std::fs::write(&path, "query_limit = 25\nscript_path = \"/w/index.php\"\n").unwrap();

        let config = JsonFormsConfig::load(&path).unwrap();
        assert_eq!(config.query_limit, 25);
        assert_eq!(config.script_path, "/w/index.php");
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_key_orders_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jsonforms.toml");
        std::fs::write(
            &path,
            "[key_orders]\n\"\" = [\"$schema\", \"title\"]\n\"/properties\" = [\"name\"]\n",
        )
        .unwrap();

        let config = JsonFormsConfig::load(&path).unwrap();
        assert_eq!(config.key_orders[""], vec!["$schema", "title"]);
        assert_eq!(config.key_orders["/properties"], vec!["name"]);
    }

    #[test]
    fn test_user_message_names_the_problem() {
        let err = ConfigError::validation("query_limit must be greater than 0");
        assert_eq!(
            err.user_message(),
            "Configuration validation failed: query_limit must be greater than 0"
        );
    }

    #[test]
    fn test_validation_rejects_unknown_role_model() {
        let mut config = JsonFormsConfig::default();
        config
            .slot_roles
            .insert("infobox".to_string(), "yaml".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_limit() {
        let config = JsonFormsConfig {
            query_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
