//! Connection settings for the todo server.
//!
//! Each setting resolves as: explicit provider block value, else its
//! `TODO_*` environment variable, else a fixed default. An unknown explicit
//! value stops resolution before anything else is looked at.

use serde::{Deserialize, Serialize};

use crate::framework::{AttributePath, Diagnostics, StringValue, Value};

/// The provider block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoProviderModel {
    #[serde(default)]
    pub host: StringValue,
    #[serde(default)]
    pub port: StringValue,
    #[serde(default)]
    pub schema: StringValue,
    #[serde(default)]
    pub apipath: StringValue,
}

/// One provider block attribute, where its fallbacks come from and how its
/// problems are reported.
#[derive(Clone, Copy)]
pub struct Setting {
    pub attribute: &'static str,
    pub env: &'static str,
    pub default: &'static str,
    /// How the setting is named inside diagnostic details.
    noun: &'static str,
    unknown_summary: &'static str,
    missing_summary: &'static str,
    configured: fn(&TodoProviderModel) -> &StringValue,
}

pub const HOST: Setting = Setting {
    attribute: "host",
    env: "TODO_HOST",
    default: "127.0.0.1",
    noun: "host",
    unknown_summary: "Unknown Todo API Host",
    missing_summary: "Missing Todo API Host",
    configured: |model| &model.host,
};

pub const PORT: Setting = Setting {
    attribute: "port",
    env: "TODO_PORT",
    default: "8080",
    noun: "port",
    unknown_summary: "Unknown Todo API Port",
    missing_summary: "Missing Todo API port",
    configured: |model| &model.port,
};

pub const SCHEMA: Setting = Setting {
    attribute: "schema",
    env: "TODO_SCHEMA",
    default: "http",
    noun: "schema",
    unknown_summary: "Unknown Todo API Schema",
    missing_summary: "Missing Todo API Schema",
    configured: |model| &model.schema,
};

pub const APIPATH: Setting = Setting {
    attribute: "apipath",
    env: "TODO_APIPATH",
    default: "/",
    noun: "path",
    unknown_summary: "Unknown Todo API API Path",
    missing_summary: "Missing Todo API Path",
    configured: |model| &model.apipath,
};

pub const SETTINGS: [Setting; 4] = [HOST, PORT, SCHEMA, APIPATH];

impl Setting {
    fn report_unknown(&self, diagnostics: &mut Diagnostics) {
        diagnostics.add_attribute_error(
            AttributePath::root(self.attribute),
            self.unknown_summary,
            format!(
                "The provider cannot create the Todo API client as there is an unknown configuration value for the Todo API {}. \
                 Either target apply the source of the value first, set the value statically in the configuration, or use the {} environment variable.",
                self.noun, self.env
            ),
        );
    }

    fn resolve(
        &self,
        model: &TodoProviderModel,
        env: &impl Fn(&str) -> Option<String>,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let value = match (self.configured)(model) {
            Value::Known(value) => value.clone(),
            Value::Null | Value::Unknown => env(self.env).unwrap_or_default(),
        };
        if !value.is_empty() {
            return value;
        }

        diagnostics.add_attribute_warning(
            AttributePath::root(self.attribute),
            format!("{} (using default value: {})", self.missing_summary, self.default),
            format!(
                "The provider is using a default value as there is a missing or empty value for the Todo API {}. \
                 Set the {} value in the configuration or use the {} environment variable. \
                 If either is already set, ensure the value is not empty.",
                self.noun, self.attribute, self.env
            ),
        );
        self.default.to_string()
    }
}

/// Fully resolved connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: String,
    pub schema: String,
    pub apipath: String,
}

impl ConnectionConfig {
    /// Resolves all four settings, or returns `None` with an error per
    /// unknown value.
    pub fn resolve<F>(model: &TodoProviderModel, env: F, diagnostics: &mut Diagnostics) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut unknown = false;
        for setting in SETTINGS {
            if (setting.configured)(model).is_unknown() {
                setting.report_unknown(diagnostics);
                unknown = true;
            }
        }
        if unknown {
            return None;
        }

        Some(Self {
            host: HOST.resolve(model, &env, diagnostics),
            port: PORT.resolve(model, &env, diagnostics),
            schema: SCHEMA.resolve(model, &env, diagnostics),
            apipath: APIPATH.resolve(model, &env, diagnostics),
        })
    }

    /// `schema://host:port/apipath`, with the path always rooted.
    pub fn base_url(&self) -> String {
        let separator = if self.apipath.starts_with('/') { "" } else { "/" };
        format!(
            "{}://{}:{}{separator}{}",
            self.schema, self.host, self.port, self.apipath
        )
    }
}
