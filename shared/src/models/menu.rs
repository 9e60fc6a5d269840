//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// Order lines embed a copy of the item, so editing the menu never changes
/// historical orders. Items are soft-deleted by clearing `active`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Price in centavos
    pub price: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub active: bool,
}

impl MenuItem {
    /// Create an active item (id is assigned by [`Menu::add_item`])
    pub fn new(name: impl Into<String>, price: i64, category: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            category: category.into(),
            active: true,
        }
    }
}

/// The restaurant menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default, deserialize_with = "crate::util::null_as_default")]
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct categories of active items, in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for item in self.items.iter().filter(|i| i.active) {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }

    /// Active items of one category, in menu order
    pub fn items_by_category(&self, category: &str) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|i| i.active && i.category == category)
            .collect()
    }

    /// All active items, in menu order
    pub fn active_items(&self) -> Vec<&MenuItem> {
        self.items.iter().filter(|i| i.active).collect()
    }

    pub fn get(&self, id: i64) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Append an item, assigning the next id and marking it active.
    ///
    /// Returns the assigned id.
    pub fn add_item(&mut self, mut item: MenuItem) -> i64 {
        item.id = self.next_id();
        item.active = true;
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Soft delete: clears the active flag. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.active = false;
        }
    }

    /// Replace the item with the same id. Unknown ids are ignored.
    pub fn update_item(&mut self, updated: MenuItem) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == updated.id) {
            *item = updated;
        }
    }

    /// Highest assigned id plus one
    pub fn next_id(&self) -> i64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }
}
