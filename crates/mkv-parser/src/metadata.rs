use std::fmt;

use mkv_types::ElementTypeInfo;

use crate::tokenizer::ParserElement;

/// Schema info plus the element's position in document order.
///
/// `element_count` is assigned when the first byte of the element's id is
/// read, starting at 0. Skipped unknown elements take a number too, so the
/// counts of surfaced elements can have gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementMetadata {
    pub type_info: ElementTypeInfo,
    pub element_count: u64,
}

impl ElementMetadata {
    pub fn id(&self) -> u32 {
        self.type_info.id
    }

    pub fn name(&self) -> &'static str {
        self.type_info.name
    }
}

impl fmt::Display for ElementMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_info, self.element_count)
    }
}

/// Ancestors of the element being reported, outermost first.
///
/// A borrowed view over the tokenizer's open-container stack. Nothing is
/// copied unless [`to_vec`](Self::to_vec) is called.
#[derive(Clone, Copy)]
pub struct ElementPath<'a> {
    stack: &'a [ParserElement],
}

impl<'a> ElementPath<'a> {
    pub(crate) fn new(stack: &'a [ParserElement]) -> Self {
        Self { stack }
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementMetadata> + 'a {
        self.stack.iter().filter_map(ParserElement::metadata)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ElementMetadata> {
        self.iter().collect()
    }
}

impl fmt::Debug for ElementPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
