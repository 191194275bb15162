//! Default rule-based form used as the base contract class.
//!
//! A [`FormDefinition`] is the body of a contract class: an ordered list of
//! properties and the rules attached to each. A [`Form`] is one instance of
//! that body bound to a model and options.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

use super::class::{Contract, Options};
use super::errors::ContractErrors;

/// JSON value kinds a property can be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl JsonKind {
    /// Returns true if the value is of this kind.
    #[must_use]
    pub fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    fn described(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::Array => "an array",
            Self::Object => "an object",
        }
    }
}

impl std::fmt::Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Custom check returning a message when the value is rejected.
pub type RuleFn = Arc<dyn Fn(&serde_json::Value) -> Option<String> + Send + Sync>;

/// A single check applied to a present property value.
#[derive(Clone)]
pub enum Rule {
    /// Value must be of the given JSON kind.
    Kind(JsonKind),
    /// Character count (strings) or element count (arrays, objects) bounds.
    Length {
        /// Inclusive minimum.
        min: Option<usize>,
        /// Inclusive maximum.
        max: Option<usize>,
    },
    /// String value must match the pattern.
    Format(Regex),
    /// Caller supplied check.
    Custom(RuleFn),
}

impl Rule {
    fn check(&self, value: &serde_json::Value) -> Option<String> {
        match self {
            Self::Kind(kind) => {
                (!kind.matches(value)).then(|| format!("must be {}", kind.described()))
            }
            Self::Length { min, max } => {
                let len = match value {
                    serde_json::Value::String(s) => s.chars().count(),
                    serde_json::Value::Array(a) => a.len(),
                    serde_json::Value::Object(o) => o.len(),
                    _ => return None,
                };
                match (min, max) {
                    (Some(min), _) if len < *min => {
                        Some(format!("is too short (minimum is {min})"))
                    }
                    (_, Some(max)) if len > *max => {
                        Some(format!("is too long (maximum is {max})"))
                    }
                    _ => None,
                }
            }
            Self::Format(pattern) => match value.as_str() {
                Some(s) if pattern.is_match(s) => None,
                _ => Some("is in invalid format".to_string()),
            },
            Self::Custom(check) => check(value),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Self::Length { min, max } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Format(pattern) => f.debug_tuple("Format").field(&pattern.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A declared form field and its rules.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    required: bool,
    rules: Vec<Rule>,
}

impl Property {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            rules: Vec::new(),
        }
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a blank value is rejected.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rejects missing, null and blank values.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Constrains the JSON kind.
    pub fn kind(&mut self, kind: JsonKind) -> &mut Self {
        self.rules.push(Rule::Kind(kind));
        self
    }

    /// Constrains length; either bound may be open.
    pub fn length(&mut self, min: Option<usize>, max: Option<usize>) -> &mut Self {
        self.rules.push(Rule::Length { min, max });
        self
    }

    /// Requires string values to match `pattern`.
    pub fn format(&mut self, pattern: Regex) -> &mut Self {
        self.rules.push(Rule::Format(pattern));
        self
    }

    /// Adds a custom check.
    pub fn rule<F>(&mut self, check: F) -> &mut Self
    where
        F: Fn(&serde_json::Value) -> Option<String> + Send + Sync + 'static,
    {
        self.rules.push(Rule::Custom(Arc::new(check)));
        self
    }
}

/// The body of a contract class.
#[derive(Debug, Clone, Default)]
pub struct FormDefinition {
    properties: Vec<Property>,
}

impl FormDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named property, declaring it if needed.
    pub fn property(&mut self, name: &str) -> &mut Property {
        let index = match self.properties.iter().position(|p| p.name == name) {
            Some(index) => index,
            None => {
                self.properties.push(Property::new(name));
                self.properties.len() - 1
            }
        };
        &mut self.properties[index]
    }

    /// Looks up a declared property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Instance of a [`FormDefinition`] bound to a model.
#[derive(Debug, Clone)]
pub struct Form {
    definition: FormDefinition,
    model: serde_json::Value,
    options: Options,
    fields: serde_json::Map<String, serde_json::Value>,
    errors: ContractErrors,
}

impl Form {
    /// Creates a form, reading declared fields from the model.
    #[must_use]
    pub fn new(definition: FormDefinition, model: serde_json::Value, options: Options) -> Self {
        let fields = definition
            .properties()
            .iter()
            .filter_map(|p| model.get(p.name()).map(|v| (p.name().to_string(), v.clone())))
            .collect();

        Self {
            definition,
            model,
            options,
            fields,
            errors: ContractErrors::new(),
        }
    }

    /// The definition this form was built from.
    #[must_use]
    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// The wrapped model.
    #[must_use]
    pub fn model(&self) -> &serde_json::Value {
        &self.model
    }

    /// Options passed at construction.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current field values.
    #[must_use]
    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.fields
    }

    /// Returns the model with the form's fields written onto it.
    ///
    /// A null model becomes an object of the fields; other non-object models
    /// are returned unchanged.
    #[must_use]
    pub fn sync(&self) -> serde_json::Value {
        match &self.model {
            serde_json::Value::Object(model) => {
                let mut synced = model.clone();
                for (key, value) in &self.fields {
                    synced.insert(key.clone(), value.clone());
                }
                serde_json::Value::Object(synced)
            }
            serde_json::Value::Null => serde_json::Value::Object(self.fields.clone()),
            other => other.clone(),
        }
    }
}

impl Contract for Form {
    fn validate(&mut self, params: &serde_json::Value) -> bool {
        self.errors.clear();

        for property in self.definition.properties() {
            if let Some(value) = params.get(property.name()) {
                self.fields.insert(property.name().to_string(), value.clone());
            }
        }

        for property in self.definition.properties() {
            let value = self.fields.get(property.name()).filter(|v| !is_blank(v));
            match value {
                None if property.is_required() => {
                    self.errors.add(property.name(), "must be filled");
                }
                None => {}
                Some(value) => {
                    for rule in property.rules() {
                        if let Some(message) = rule.check(value) {
                            self.errors.add(property.name(), message);
                        }
                    }
                }
            }
        }

        self.errors.is_empty()
    }

    fn errors(&self) -> ContractErrors {
        self.errors.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
