//! Submodule key to issue label mapping.

use std::collections::BTreeMap;

/// Prefix shared by all submodule labels.
pub const SUBMODULE_LABEL_PREFIX: &str = "submodule:";

/// Key of the shared-configuration submodule.
pub const SHARED_KEY: &str = "shared";

/// Label alias of the shared-configuration submodule.
pub const SHARED_ALIAS: &str = "copilotage-shared";

/// Maps registry keys to their `submodule:<alias>` labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMapper {
    aliases: BTreeMap<String, String>,
}

impl Default for LabelMapper {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert(SHARED_KEY.to_string(), SHARED_ALIAS.to_string());
        Self { aliases }
    }
}

impl LabelMapper {
    /// Returns the default mapper extended with extra aliases.
    ///
    /// Extra entries override built-in ones for the same key.
    pub fn with_aliases<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapper = Self::default();
        for (key, alias) in extra {
            mapper
                .aliases
                .insert(key.into().to_lowercase(), alias.into());
        }
        mapper
    }

    /// Returns the alias used in labels for a key.
    pub fn alias<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).map_or(key, String::as_str)
    }

    /// Returns the label for a key.
    pub fn label(&self, key: &str) -> String {
        format!("{SUBMODULE_LABEL_PREFIX}{}", self.alias(key))
    }

    /// Returns the labels for several keys, preserving order.
    pub fn labels<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        keys.iter().map(|k| self.label(k.as_ref())).collect()
    }
}
