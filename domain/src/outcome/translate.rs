//! Translation hook for user-facing strings.
//!
//! Fixed phrases are passed through a [`Translator`] keyed by their English
//! text. The default is the identity function.

use std::collections::HashMap;

pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Lookup-table translator; unknown keys fall back to the key itself.
#[derive(Debug, Clone, Default)]
pub struct TableTranslator {
    entries: HashMap<String, String>,
}

impl TableTranslator {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Translator for TableTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Adapts a plain `key -> string` function.
pub struct FnTranslator<F>(pub F);

impl<F> Translator for FnTranslator<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn translate(&self, key: &str) -> String {
        (self.0)(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(IdentityTranslator.translate("Did you mean:"), "Did you mean:");
    }

    #[test]
    fn test_table_falls_back_to_key() {
        let t = TableTranslator::new([("Did you mean:", "Meinten Sie:")]);
        assert_eq!(t.translate("Did you mean:"), "Meinten Sie:");
        assert_eq!(t.translate("Available tools:"), "Available tools:");
    }

    #[test]
    fn test_closure_translator() {
        let upper = FnTranslator(|key: &str| key.to_uppercase());
        assert_eq!(upper.translate("ok"), "OK");
    }
}
