use crate::kind::ElementKind;

/// Schema entry for one element id.
///
/// `level` is the nesting depth the schema allows the element at. A
/// negative level marks a global element (Void, CRC-32) that may appear
/// anywhere and never closes an open container by its appearance.
///
/// `recursive` documents that a master may contain itself (`ChapterAtom`,
/// `SimpleTag`). It does not change how a stream is tokenized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementTypeInfo {
    pub id: u32,
    pub name: &'static str,
    pub level: i32,
    pub kind: ElementKind,
    pub recursive: bool,
}

impl ElementTypeInfo {
    #[must_use]
    pub const fn new(id: u32, name: &'static str, level: i32, kind: ElementKind) -> Self {
        Self {
            id,
            name,
            level,
            kind,
            recursive: false,
        }
    }

    #[must_use]
    pub const fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.level < 0
    }

    #[must_use]
    pub fn is_master(&self) -> bool {
        self.kind.is_master()
    }
}

impl std::fmt::Display for ElementTypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:#X})", self.name, self.id)
    }
}
