//! Synonym-key field lookup over a document value tree.

use crate::models::tree::StructuredValue;

/// Finds fields in a [`StructuredValue`] by trying synonym keys in order.
///
/// For each key the root mapping is checked first, then each container
/// mapping directly below the root. Nothing deeper is searched.
#[derive(Debug, Clone)]
pub struct FieldLocator<'a> {
    containers: &'a [String],
}

impl<'a> FieldLocator<'a> {
    pub fn new(containers: &'a [String]) -> Self {
        Self { containers }
    }

    /// First non-empty value for any of `keys`.
    pub fn find<'t, S: AsRef<str>>(
        &self,
        tree: &'t StructuredValue,
        keys: &[S],
    ) -> Option<&'t StructuredValue> {
        keys.iter().find_map(|key| self.find_key(tree, key.as_ref()))
    }

    fn find_key<'t>(&self, tree: &'t StructuredValue, key: &str) -> Option<&'t StructuredValue> {
        if let Some(value) = tree.get(key).filter(|v| v.is_truthy()) {
            return Some(value);
        }

        self.containers
            .iter()
            .filter_map(|container| tree.get(container))
            .find_map(|inner| inner.get(key).filter(|v| v.is_truthy()))
    }

    /// First non-empty value reached by any of the key `paths`.
    ///
    /// Paths are followed exactly from the root; containers play no part,
    /// so this needs no locator instance.
    pub fn find_path<'t, S: AsRef<str>>(
        tree: &'t StructuredValue,
        paths: &[Vec<S>],
    ) -> Option<&'t StructuredValue> {
        paths
            .iter()
            .filter_map(|path| tree.get_path(path.as_slice()))
            .find(|v| v.is_truthy())
    }
}
