use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an application module.
///
/// Equality and hashing are by string value, so a key built with
/// [`ModuleKey::new`] matches the one derived from the module type as long as
/// the strings agree.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(String);

impl ModuleKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Key derived from a module type: its unqualified type name
    /// (`my_app::modules::Analytics` becomes `Analytics`).
    pub fn of<M: ?Sized>() -> Self {
        Self(short_type_name(std::any::type_name::<M>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Drops module paths from every type in the name, generic arguments included.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(c);
        } else {
            path.push(c);
        }
    }
    out.push_str(last_segment(&path));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleKey({})", self.0)
    }
}

impl From<&str> for ModuleKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModuleKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ModuleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    struct Analytics;
    #[allow(dead_code)]
    struct Wrapper<T>(T);

    #[test]
    fn type_key_uses_unqualified_name() {
        assert_eq!(ModuleKey::of::<Analytics>().as_str(), "Analytics");
        assert_eq!(ModuleKey::of::<Analytics>(), ModuleKey::new("Analytics"));
    }

    #[allow(dead_code)]
    struct Pair<A, B>(A, B);

    #[test]
    fn generic_arguments_are_unqualified_too() {
        assert_eq!(
            ModuleKey::of::<Wrapper<Analytics>>().as_str(),
            "Wrapper<Analytics>"
        );
        assert_eq!(
            ModuleKey::of::<Pair<Analytics, Wrapper<Analytics>>>().as_str(),
            "Pair<Analytics, Wrapper<Analytics>>"
        );
    }

    #[test]
    fn short_name_handles_references_and_tuples() {
        assert_eq!(
            short_type_name("app::Holder<&app::mods::A, (core::B, [x::C; 2])>"),
            "Holder<&A, (B, [C; 2])>"
        );
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn display_and_debug() {
        let key = ModuleKey::from("Logging");
        assert_eq!(key.to_string(), "Logging");
        assert_eq!(format!("{key:?}"), "ModuleKey(Logging)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = ModuleKey::new("Feature");
        assert_eq!(serde_json::to_value(&key).unwrap(), serde_json::json!("Feature"));
        let back: ModuleKey = serde_json::from_str("\"Feature\"").unwrap();
        assert_eq!(back, key);
    }
}
