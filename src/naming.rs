//! Identifier style conversion.
//!
//! Only ASCII letters mark word boundaries: an uppercase `A-Z` starts a new
//! word in camel/Pascal input, and an underscore followed by `a-zA-Z` does in
//! snake input. Everything else passes through untouched, so the conversions
//! never fail and an empty name converts to an empty name.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref UNDERSCORED_LETTER: Regex = Regex::new(r"_([a-zA-Z])").unwrap();
    static ref STUDLY_SEPARATOR: Regex = Regex::new(r"[-_ ]+").unwrap();
}

/// Target style of [`parse_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// `UserName` -> `user_name`
    #[default]
    Snake,
    /// `user_name` -> `UserName` or `userName`
    Camel,
}

/// Converts `name` to `style`. `ucfirst` only matters for [`NameStyle::Camel`]
/// and picks Pascal case over camel case.
///
/// Consecutive capitals are not collapsed: `UserID` becomes `user_i_d`.
pub fn parse_name(name: &str, style: NameStyle, ucfirst: bool) -> String {
    match style {
        NameStyle::Snake => {
            let marked = UPPERCASE.replace_all(name, "_$0");
            marked.trim_matches('_').to_ascii_lowercase()
        }
        NameStyle::Camel => {
            let joined = UNDERSCORED_LETTER
                .replace_all(name, |caps: &Captures| caps[1].to_ascii_uppercase());
            if ucfirst {
                map_first(&joined, |c| c.to_ascii_uppercase())
            } else {
                map_first(&joined, |c| c.to_ascii_lowercase())
            }
        }
    }
}

pub fn snake(name: &str) -> String {
    parse_name(name, NameStyle::Snake, false)
}

pub fn camel(name: &str) -> String {
    parse_name(name, NameStyle::Camel, false)
}

pub fn pascal(name: &str) -> String {
    parse_name(name, NameStyle::Camel, true)
}

/// Upper-cases the first letter of every word and drops the separators
/// (`-`, `_` and spaces) between them. Used when turning a short name such as
/// `user-profile` into a class name.
pub fn studly(name: &str) -> String {
    STUDLY_SEPARATOR
        .split(name)
        .map(|word| map_first(word, |c| c.to_ascii_uppercase()))
        .collect()
}

/// The class name without its namespace. Both `\` and `/` count as
/// separators and trailing separators are ignored.
pub fn class_basename(class: &str) -> &str {
    let is_separator = |c: char| c == '\\' || c == '/';
    class
        .trim_end_matches(is_separator)
        .rsplit(is_separator)
        .next()
        .unwrap_or("")
}

fn map_first(s: &str, f: impl Fn(char) -> char) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut mapped = String::with_capacity(s.len());
            mapped.push(f(first));
            mapped.push_str(chars.as_str());
            mapped
        }
        None => String::new(),
    }
}
