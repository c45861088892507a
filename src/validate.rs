//! Validator selection.
//!
//! A validator is given either as a set of rules or by name. Names may carry
//! a scene after a dot (`user.edit`) and are resolved into the application
//! namespace unless they already are fully qualified class names.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{HelperError, Result};
use crate::naming::studly;

/// Layer validators live in below the application namespace.
pub const VALIDATE_LAYER: &str = "validate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorSpec {
    /// Field name to rule string, checked by a plain validator.
    Rules(BTreeMap<String, String>),
    /// A dedicated validator class, optionally restricted to a scene.
    Named { class: String, scene: Option<String> },
}

impl ValidatorSpec {
    /// Parses a validator name. The empty string selects a plain validator
    /// without rules. Only the first two dot separated segments count.
    pub fn parse(spec: &str, namespace: &str) -> Self {
        if spec.is_empty() {
            return ValidatorSpec::Rules(BTreeMap::new());
        }
        let (name, scene) = match spec.find('.').filter(|&pos| pos > 0) {
            Some(pos) => {
                let scene = spec[pos + 1..].split('.').next().unwrap_or("");
                (&spec[..pos], (!scene.is_empty()).then(|| scene.to_owned()))
            }
            None => (spec, None),
        };
        let class = if name.contains('\\') {
            name.to_owned()
        } else {
            parse_class(namespace, VALIDATE_LAYER, name)
        };
        ValidatorSpec::Named { class, scene }
    }

    pub fn rules<K, V, I>(rules: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        ValidatorSpec::Rules(rules.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Rules from a JSON object whose values are rule strings.
    pub fn from_value(rules: &Value) -> Result<Self> {
        let Value::Object(map) = rules else {
            return Err(HelperError::ValidatorSpec(format!("expected an object of rules, got {rules}")));
        };
        map.iter()
            .map(|(field, rule)| match rule {
                Value::String(rule) => Ok((field.clone(), rule.clone())),
                other => Err(HelperError::ValidatorSpec(format!("rule for {field} is not a string: {other}"))),
            })
            .collect::<Result<BTreeMap<_, _>>>()
            .map(ValidatorSpec::Rules)
    }
}

/// Fully qualified class name for `name` in `layer` of `namespace`:
/// `parse_class("app", "validate", "admin/user_info")` is
/// `app\validate\admin\UserInfo`.
pub fn parse_class(namespace: &str, layer: &str, name: &str) -> String {
    let name = name.replace(['/', '.'], "\\");
    let (path, class) = match name.rsplit_once('\\') {
        Some((path, class)) => (format!("{path}\\"), class),
        None => (String::new(), name.as_str()),
    };
    format!("{namespace}\\{layer}\\{path}{}", studly(class))
}

/// A configured validator, ready to be handed to the validation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    spec: ValidatorSpec,
    messages: BTreeMap<String, String>,
    batch: bool,
    fail_exception: bool,
}

impl Validation {
    pub fn spec(&self) -> &ValidatorSpec {
        &self.spec
    }
    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }
    pub fn batch(&self) -> bool {
        self.batch
    }
    /// Failures are raised rather than collected, always true for validators
    /// built through [`validate`].
    pub fn fail_exception(&self) -> bool {
        self.fail_exception
    }
}

pub fn validate(spec: ValidatorSpec, messages: BTreeMap<String, String>, batch: bool) -> Validation {
    Validation {
        spec,
        messages,
        batch,
        fail_exception: true,
    }
}
