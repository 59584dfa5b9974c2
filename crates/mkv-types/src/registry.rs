use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::error::TypeError;
use crate::matroska::MATROSKA_TYPES;
use crate::type_info::ElementTypeInfo;

static MATROSKA: LazyLock<TypeRegistry> = LazyLock::new(|| {
    TypeRegistry::from_table_unchecked(MATROSKA_TYPES)
});

/// Lookup table from element id to its schema entry.
///
/// A registry is built once per document type and is immutable
/// afterwards. Cloning is cheap (the table is shared behind an `Arc`), so
/// every reader can carry its own handle.
///
/// ```text
///   TypeRegistry::matroska()          built-in Matroska/WebM table
///   TypeRegistry::new(entries)?       custom table, duplicate ids rejected
/// ```
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    by_id: Arc<HashMap<u32, ElementTypeInfo>>,
}

impl TypeRegistry {
    /// Build a registry from a table of entries.
    ///
    /// # Errors
    ///
    /// [`TypeError::DuplicateId`] if two entries share an id.
    pub fn new(entries: impl IntoIterator<Item = ElementTypeInfo>) -> Result<Self, TypeError> {
        let mut by_id = HashMap::new();
        for info in entries {
            if let Some(existing) = by_id.insert(info.id, info) {
                return Err(TypeError::DuplicateId {
                    id: info.id,
                    first: existing.name,
                    second: info.name,
                });
            }
        }
        Ok(Self {
            by_id: Arc::new(by_id),
        })
    }

    /// The built-in Matroska / WebM schema.
    #[must_use]
    pub fn matroska() -> Self {
        MATROSKA.clone()
    }

    // The built-in table is checked for duplicates by a unit test below.
    fn from_table_unchecked(table: &[ElementTypeInfo]) -> Self {
        let by_id = table.iter().map(|info| (info.id, *info)).collect();
        Self {
            by_id: Arc::new(by_id),
        }
    }

    /// Resolve an id, `None` if the schema does not know it.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&ElementTypeInfo> {
        self.by_id.get(&id)
    }

    /// Resolve an element by its schema name (linear scan).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ElementTypeInfo> {
        self.by_id.values().find(|info| info.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementTypeInfo> {
        self.by_id.values()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::matroska()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ElementKind;
    use crate::matroska;

    #[test]
    fn builtin_table_has_no_duplicates() {
        let checked = TypeRegistry::new(MATROSKA_TYPES.iter().copied()).unwrap();
        assert_eq!(checked.len(), MATROSKA_TYPES.len());
        assert_eq!(TypeRegistry::matroska().len(), MATROSKA_TYPES.len());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let entries = [
            ElementTypeInfo::new(0x81, "A", 0, ElementKind::Binary),
            ElementTypeInfo::new(0x81, "B", 1, ElementKind::UInteger),
        ];
        let err = TypeRegistry::new(entries).unwrap_err();
        assert!(matches!(
            err,
            TypeError::DuplicateId {
                id: 0x81,
                first: "A",
                second: "B"
            }
        ));
    }

    #[test]
    fn resolves_known_ids() {
        let registry = TypeRegistry::matroska();

        let ebml = registry.get(matroska::EBML).unwrap();
        assert_eq!(ebml.name, "EBML");
        assert_eq!(ebml.level, 0);
        assert!(ebml.is_master());

        let void = registry.get(matroska::VOID).unwrap();
        assert!(void.is_global());

        let simple_tag = registry.get(matroska::SIMPLE_TAG).unwrap();
        assert!(simple_tag.recursive);

        assert!(registry.get(0x4FFF).is_none());
    }

    #[test]
    fn lookup_by_name() {
        let registry = TypeRegistry::matroska();
        assert_eq!(registry.by_name("simpleblock").unwrap().id, matroska::SIMPLE_BLOCK);
        assert!(registry.by_name("NoSuchElement").is_none());
    }
}
