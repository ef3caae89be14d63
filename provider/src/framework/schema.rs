//! Attribute schemas, config validation and plan computation.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value as Json};

use super::diag::{AttributePath, Diagnostics};
use super::state::State;
use super::value::{is_unknown_marker, unknown_marker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
    Int64,
    Bool,
}

impl AttributeKind {
    fn accepts(self, raw: &Json) -> bool {
        match self {
            AttributeKind::String => raw.is_string(),
            AttributeKind::Int64 => raw.is_i64(),
            AttributeKind::Bool => raw.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    /// Keep the prior state value in plans instead of marking it unknown.
    pub use_state_for_unknown: bool,
}

impl Attribute {
    fn of(kind: AttributeKind) -> Self {
        Self {
            kind,
            description: String::new(),
            required: false,
            optional: false,
            computed: false,
            use_state_for_unknown: false,
        }
    }

    pub fn string() -> Self {
        Self::of(AttributeKind::String)
    }

    pub fn int64() -> Self {
        Self::of(AttributeKind::Int64)
    }

    pub fn bool() -> Self {
        Self::of(AttributeKind::Bool)
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn use_state_for_unknown(mut self) -> Self {
        self.use_state_for_unknown = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Checks a configuration object against the schema. Unknown values pass
    /// every check except the read-only one.
    pub fn validate_config(&self, config: &State) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if !config.as_json().is_object() {
            diags.add_error(
                "Invalid Configuration",
                "The configuration must be an object of attribute values.",
            );
            return diags;
        }

        for (name, _) in config.attributes() {
            if !self.attributes.contains_key(name) {
                diags.add_attribute_error(
                    AttributePath::root(name),
                    "Unsupported argument",
                    format!("An argument named \"{name}\" is not expected here."),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            let raw = config.attribute(name);
            let path = AttributePath::root(name);
            if raw.is_null() {
                if attribute.required {
                    diags.add_attribute_error(
                        path,
                        "Missing Configuration for Required Attribute",
                        format!("Must set a configuration value for the {name} attribute."),
                    );
                }
                continue;
            }
            if attribute.computed && !attribute.required && !attribute.optional {
                diags.add_attribute_error(
                    path,
                    "Invalid Configuration for Read-Only Attribute",
                    format!("Cannot set value for the {name} attribute as the provider has marked it as read-only."),
                );
                continue;
            }
            if !is_unknown_marker(raw) && !attribute.kind.accepts(raw) {
                diags.add_attribute_error(
                    path,
                    "Incorrect attribute value type",
                    format!("Inappropriate value for attribute \"{name}\": {:?} required.", attribute.kind),
                );
            }
        }

        diags
    }

    /// Attributes that only configuration can set and that are still
    /// unknown in `values`. Such values cannot be applied or read with.
    pub fn unknown_inputs(&self, values: &State) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(_, attribute)| attribute.required || (attribute.optional && !attribute.computed))
            .filter(|(name, _)| is_unknown_marker(values.attribute(name)))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Proposed new state for a configuration. Configured values are taken
    /// as-is; a computed attribute left unset keeps its prior value when it
    /// uses state for unknown, and is otherwise unknown until apply.
    pub fn plan(&self, prior: Option<&State>, config: &State) -> State {
        let mut planned = Map::new();
        for (name, attribute) in &self.attributes {
            let configured = config.attribute(name);
            let value = if !configured.is_null() {
                configured.clone()
            } else if attribute.computed {
                match prior.map(|state| state.attribute(name)) {
                    Some(previous) if attribute.use_state_for_unknown && !previous.is_null() => {
                        previous.clone()
                    }
                    _ => unknown_marker(),
                }
            } else {
                Json::Null
            };
            planned.insert(name.clone(), value);
        }
        State::from_json(Json::Object(planned))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Schema {
        Schema::new("Manage a todo.")
            .attribute("id", Attribute::int64().computed().use_state_for_unknown())
            .attribute("description", Attribute::string().required())
            .attribute("completed", Attribute::bool().required())
    }

    #[test]
    fn valid_config_has_no_diagnostics() {
        let config = State::from_json(json!({"description": "Go Shopping", "completed": false}));
        assert!(schema().validate_config(&config).is_empty());
    }

    #[test]
    fn missing_required_attribute_is_an_error() {
        let config = State::from_json(json!({"description": "Go Shopping"}));
        let diags = schema().validate_config(&config);
        let errors: Vec<_> = diags.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute, Some(AttributePath::root("completed")));
    }

    #[test]
    fn read_only_attribute_cannot_be_configured() {
        let config =
            State::from_json(json!({"id": 4, "description": "Go Shopping", "completed": false}));
        let diags = schema().validate_config(&config);
        assert_eq!(
            diags.errors().next().unwrap().summary,
            "Invalid Configuration for Read-Only Attribute"
        );
    }

    #[test]
    fn wrong_type_and_unexpected_attributes_are_errors() {
        let config =
            State::from_json(json!({"description": 5, "completed": false, "priority": "high"}));
        let summaries: Vec<_> = schema()
            .validate_config(&config)
            .into_iter()
            .map(|d| d.summary)
            .collect();
        assert!(summaries.contains(&"Unsupported argument".to_string()));
        assert!(summaries.contains(&"Incorrect attribute value type".to_string()));
    }

    #[test]
    fn unknown_values_pass_type_checks() {
        let config = State::from_json(json!({"description": {"unknown": true}, "completed": true}));
        assert!(schema().validate_config(&config).is_empty());
    }

    #[test]
    fn create_plan_marks_computed_id_unknown() {
        let config = State::from_json(json!({"description": "Go Shopping", "completed": false}));
        let planned = schema().plan(None, &config);
        assert_eq!(planned.unknown_attributes(), vec!["id".to_string()]);
        assert_eq!(planned.attribute("description"), &json!("Go Shopping"));
    }

    #[test]
    fn update_plan_keeps_prior_id() {
        let prior =
            State::from_json(json!({"id": 9, "description": "Go Shopping", "completed": false}));
        let config = State::from_json(json!({"description": "Go shopping for avocados", "completed": true}));
        let planned = schema().plan(Some(&prior), &config);
        assert_eq!(planned.attribute("id"), &json!(9));
        assert_eq!(planned.attribute("completed"), &json!(true));
    }

    #[test]
    fn unknown_inputs_ignore_computed_attributes() {
        let planned = State::from_json(json!({
            "id": {"unknown": true},
            "description": "Go Shopping",
            "completed": {"unknown": true},
        }));
        assert_eq!(schema().unknown_inputs(&planned), vec!["completed".to_string()]);
    }
}
