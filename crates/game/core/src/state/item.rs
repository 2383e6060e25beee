use crate::state::EntityId;

/// Equipped item as far as combat cares about it: identity plus tag paths.
///
/// Tags are slash-delimited paths such as `/equip/hand/wand/ice_wand/`; a query
/// matches when it occurs anywhere inside one of the item's tag paths.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: EntityId,
    pub class_id: u32,
    pub tags: Vec<String>,
}

impl Item {
    pub fn new(id: EntityId, class_id: u32) -> Self {
        Self {
            id,
            class_id,
            tags: Vec::new(),
        }
    }

    /// Adds a tag path (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        !tag.is_empty() && self.tags.iter().any(|t| t.contains(tag))
    }
}
