//! Helperkit – argument normalization and dispatch for web framework helpers.
//!
//! Framework helper functions are mostly thin: they look at their arguments,
//! decide what the caller meant, and forward to a subsystem that does the
//! real work. This crate holds that deciding part and leaves the subsystems
//! behind small traits:
//! * [`input::InputProvider`] – the request, asked for values per input source.
//! * [`mixin::ReflectionProvider`] – class ancestry and declared mixins.
//! * [`store::KeyedStore`] – cache, config, cookie and session stores.
//!
//! Each trait comes with an in-memory implementation ([`input::MemoryInput`],
//! [`mixin::ClassRegistry`], [`store::MemoryStore`]) for tests and for
//! applications without a framework underneath.
//!
//! ## Modules
//! * [`input`] – Dotted key resolution (`?route.id`) and input dispatch.
//! * [`naming`] – snake_case / camelCase conversion, class basenames.
//! * [`mixin`] – Recursive mixin discovery with cycle protection.
//! * [`store`] – The read / check / write / delete / clear convention of store helpers.
//! * [`validate`] – Validator selection by rules or by (scene qualified) name.
//! * [`token`] – Form tokens and their markup.
//! * [`interface`] – [`interface::Helpers`], settings plus collaborators in one handle.
//! * [`config`] – [`config::Settings`] from TOML and `HELPERKIT_*` variables.
//!
//! ## Quick Start
//! ```
//! use helperkit::input::{input, Filter, Input, MemoryInput, Source};
//! use helperkit::naming::{parse_name, NameStyle};
//! use serde_json::json;
//!
//! let request = MemoryInput::new().with(Source::Route, "id", json!(7));
//! assert_eq!(input(&request, "route.id", None, &Filter::none()), Input::Value(json!(7)));
//! assert_eq!(input(&request, "?route.name", None, &Filter::none()), Input::Exists(false));
//! assert_eq!(parse_name("UserName", NameStyle::Snake, false), "user_name");
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod interface;
pub mod logging;
pub mod mixin;
pub mod naming;
pub mod store;
pub mod token;
pub mod validate;

pub use error::{HelperError, Result};
pub use interface::Helpers;
