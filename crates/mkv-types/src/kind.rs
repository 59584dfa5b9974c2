/// Value kind of an element, as declared by the schema.
///
/// ```text
/// ┌──────────┬────────────────────────────────────────────┐
/// │ Kind     │ Content encoding                           │
/// ├──────────┼────────────────────────────────────────────┤
/// │ Integer  │ big-endian two's complement, 0-8 bytes     │
/// │ UInteger │ big-endian unsigned, 0-8 bytes             │
/// │ Float    │ IEEE 754, 4 or 8 bytes                     │
/// │ String   │ ASCII, trailing NULs are padding           │
/// │ Utf8     │ UTF-8, trailing NULs are padding           │
/// │ Date     │ signed ns offset from 2001-01-01T00:00:00Z │
/// │ Master   │ a sequence of child elements               │
/// │ Binary   │ opaque bytes                               │
/// └──────────┴────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Integer,
    UInteger,
    Float,
    String,
    Utf8,
    Date,
    Master,
    Binary,
}

impl ElementKind {
    /// Whether elements of this kind contain child elements.
    #[must_use]
    pub fn is_master(self) -> bool {
        matches!(self, Self::Master)
    }

    /// Lowercase label used by the CLI and in logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::UInteger => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Utf8 => "utf8",
            Self::Date => "date",
            Self::Master => "master",
            Self::Binary => "binary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_master_is_container() {
        let kinds = [
            ElementKind::Integer,
            ElementKind::UInteger,
            ElementKind::Float,
            ElementKind::String,
            ElementKind::Utf8,
            ElementKind::Date,
            ElementKind::Binary,
        ];
        for kind in kinds {
            assert!(!kind.is_master(), "{kind:?} should be a leaf");
        }
        assert!(ElementKind::Master.is_master());
    }
}
