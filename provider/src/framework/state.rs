//! JSON snapshots of provider config, plans and tracked state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use super::diag::Diagnostic;
use super::value::is_unknown_marker;

/// An object of attribute name to value. A `null` snapshot means the
/// resource is no longer tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Json);

impl Default for State {
    fn default() -> Self {
        Self::empty()
    }
}

impl State {
    /// An object with no attributes set.
    pub fn empty() -> Self {
        Self(Json::Object(Map::new()))
    }

    pub fn from_json(raw: Json) -> Self {
        Self(raw)
    }

    pub fn from_model<M: Serialize>(model: &M) -> Result<Self, Diagnostic> {
        let mut state = Self::empty();
        state.set(model)?;
        Ok(state)
    }

    pub fn as_json(&self) -> &Json {
        &self.0
    }

    pub fn into_json(self) -> Json {
        self.0
    }

    pub fn get<M: DeserializeOwned>(&self) -> Result<M, Diagnostic> {
        serde_json::from_value(self.0.clone()).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("An unexpected error was encountered trying to read the data: {e}"),
            )
        })
    }

    pub fn set<M: Serialize>(&mut self, model: &M) -> Result<(), Diagnostic> {
        self.0 = serde_json::to_value(model).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("An unexpected error was encountered trying to write the data: {e}"),
            )
        })?;
        Ok(())
    }

    /// Sets one root attribute, turning a removed snapshot back into an
    /// object.
    pub fn set_attribute<V: Serialize>(&mut self, name: &str, value: V) -> Result<(), Diagnostic> {
        let value = serde_json::to_value(value).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("An unexpected error was encountered trying to write {name}: {e}"),
            )
        })?;
        if !self.0.is_object() {
            self.0 = Json::Object(Map::new());
        }
        if let Json::Object(map) = &mut self.0 {
            map.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Raw value of one root attribute; `Null` when absent.
    pub fn attribute(&self, name: &str) -> &Json {
        self.0.get(name).unwrap_or(&Json::Null)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&String, &Json)> {
        self.0.as_object().into_iter().flat_map(|map| map.iter())
    }

    pub fn remove_resource(&mut self) {
        self.0 = Json::Null;
    }

    pub fn is_removed(&self) -> bool {
        self.0.is_null()
    }

    /// Names of attributes still holding the unknown marker.
    pub fn unknown_attributes(&self) -> Vec<String> {
        self.attributes()
            .filter(|(_, value)| is_unknown_marker(value))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
