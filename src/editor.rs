//! Data handed to the browser-side form editor.
//!
//! A form page is bootstrapped from a form descriptor (`JsonForm:<name>`).
//! If the descriptor pins a schema, that schema is loaded; otherwise the
//! editor gets the list of schema pages to pick from. The meta schema is
//! always included.

use crate::config::JsonFormsConfig;
use crate::error::{JsonFormsError, JsonFormsResult};
use crate::schema::repository::SchemaRepository;
use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

/// Config variables exposed to client scripts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigVars {
    #[serde(rename = "jsonforms-schemas")]
    pub schemas: Vec<String>,
    #[serde(rename = "jsonforms-metaschema")]
    pub metaschema: Value,
}

/// Contents of the form wrapper's `data-form-data` attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub form_descriptor: Value,
    pub schema: Value,
    pub schema_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPayload {
    pub config_vars: ConfigVars,
    pub form_data: FormData,
}

pub struct EditorBootstrap<'a> {
    repository: &'a SchemaRepository,
    schema_namespace: String,
    form_namespace: String,
    meta_schema_title: String,
}

impl<'a> EditorBootstrap<'a> {
    pub fn new(repository: &'a SchemaRepository, config: &JsonFormsConfig) -> Self {
        Self {
            repository,
            schema_namespace: config.schema_namespace.clone(),
            form_namespace: config.form_namespace.clone(),
            meta_schema_title: config.meta_schema_title.clone(),
        }
    }

    pub fn build(&self, form_name: &str) -> JsonFormsResult<EditorPayload> {
        let descriptor_title = format!("{}:{}", self.form_namespace, form_name);
        let form_descriptor = self
            .repository
            .get_json_schema(&descriptor_title)?
            .filter(|d| !is_empty_json(d))
            .ok_or_else(|| {
                JsonFormsError::NotFound(format!("form descriptor {}", descriptor_title))
            })?;

        let pinned = form_descriptor
            .get("schema")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let (schemas, schema) = match &pinned {
            Some(name) => {
                let schema_title = format!("{}:{}", self.schema_namespace, name);
                let schema = self
                    .repository
                    .get_json_schema(&schema_title)?
                    .filter(|s| !is_empty_json(s))
                    .ok_or_else(|| {
                        JsonFormsError::NotFound(format!(
                            "schema {} named by form descriptor {}",
                            schema_title, descriptor_title
                        ))
                    })?;
                (Vec::new(), schema)
            }
            None => (
                self.repository.page_names_in(&self.schema_namespace)?,
                Value::Object(Map::new()),
            ),
        };

        let metaschema = match self.repository.get_json_schema(&self.meta_schema_title) {
            Ok(Some(metaschema)) => metaschema,
            Ok(None) => Value::Object(Map::new()),
            Err(e) => {
                warn!("Ignoring meta schema {}: {}", self.meta_schema_title, e);
                Value::Object(Map::new())
            }
        };

        info!(
            "Editor for {}: schema {}, {} schemas listed",
            descriptor_title,
            pinned.as_deref().unwrap_or("<none>"),
            schemas.len()
        );

        Ok(EditorPayload {
            config_vars: ConfigVars {
                schemas,
                metaschema,
            },
            form_data: FormData {
                form_descriptor,
                schema,
                schema_name: pinned,
            },
        })
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
