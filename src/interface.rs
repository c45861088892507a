//! One handle on every helper.
//!
//! [`Helpers`] bundles the [`Settings`] with the collaborators the helpers
//! forward to, so application code receives them once instead of reaching
//! for process-wide singletons. Store-backed helpers take the store per call
//! since they need it mutably.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::Settings;
use crate::error::Result;
use crate::input::{self, Filter, Input, InputProvider};
use crate::mixin::{self, MixinSet, ReflectionProvider};
use crate::naming::{self, NameStyle};
use crate::store::{self, KeyedStore, Operand, Outcome, SetOptions};
use crate::token;
use crate::validate::{self, Validation, ValidatorSpec};

pub struct Helpers<'a> {
    settings: &'a Settings,
    input: &'a dyn InputProvider,
    reflection: &'a dyn ReflectionProvider,
}

impl<'a> Helpers<'a> {
    pub fn new(settings: &'a Settings, input: &'a dyn InputProvider, reflection: &'a dyn ReflectionProvider) -> Self {
        Self { settings, input, reflection }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Request input, see [`input::resolve`] for the key syntax. Without a
    /// filter the configured default filter applies.
    pub fn input(&self, key: &str, default: Option<Value>, filter: Option<&Filter>) -> Input {
        match filter {
            Some(filter) => input::input(self.input, key, default, filter),
            None => input::input(self.input, key, default, &self.settings.default_filter()),
        }
    }

    pub fn class_uses(&self, class: &str) -> MixinSet {
        mixin::class_uses_recursive(self.reflection, class)
    }

    pub fn trait_uses(&self, mixin: &str) -> MixinSet {
        mixin::trait_uses_recursive(self.reflection, mixin)
    }

    pub fn parse_name(&self, name: &str, style: NameStyle, ucfirst: bool) -> String {
        naming::parse_name(name, style, ucfirst)
    }

    /// Validator by name (`user.edit`), resolved into the configured
    /// application namespace.
    pub fn validate(&self, spec: &str, messages: BTreeMap<String, String>, batch: bool) -> Validation {
        let spec = ValidatorSpec::parse(spec, &self.settings.app_namespace);
        validate::validate(spec, messages, batch)
    }

    /// Cache, cookie or session style access to `store`.
    pub fn store<S: KeyedStore + ?Sized>(
        &self,
        store: &mut S,
        name: Option<&str>,
        operand: Operand,
        options: &SetOptions,
    ) -> Result<Outcome> {
        store::dispatch(store, name, operand, options)
    }

    /// Config style read of `store`.
    pub fn config<S: KeyedStore + ?Sized>(&self, store: &S, name: &str, default: Value) -> Outcome {
        store::lookup(store, name, default)
    }

    /// Config style batch write, merged into `under` when given.
    pub fn config_set<S: KeyedStore + ?Sized>(
        &self,
        store: &mut S,
        values: Map<String, Value>,
        under: Option<&str>,
    ) -> Result<Outcome> {
        store::assign(store, values, under, &SetOptions::default())
    }

    /// Issues a token under the configured token name.
    pub fn token<S: KeyedStore + ?Sized>(&self, session: &mut S) -> Result<String> {
        token::build_token(session, &self.settings.token_name)
    }

    pub fn token_field<S: KeyedStore + ?Sized>(&self, session: &mut S) -> Result<String> {
        let token = self.token(session)?;
        Ok(token::token_field(&self.settings.token_name, &token))
    }

    pub fn token_meta<S: KeyedStore + ?Sized>(&self, session: &mut S) -> Result<String> {
        let token = self.token(session)?;
        Ok(token::token_meta(&token))
    }
}
