use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

/// A node in the category tree.
///
/// The parent link is held by id; nothing prevents a cycle. Products that
/// reference a category are looked up through the category repository
/// rather than stored on the value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id),
            name: name.into(),
            description: Some(description.into()),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
