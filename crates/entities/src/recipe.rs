//! Recipe entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned to recipes created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A recipe published by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier.
    pub id: Uuid,
    /// Recipe title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Free-text ingredient list. Comma separated on input; stored in the
    /// canonical `", "`-joined form once normalized.
    pub ingredients: String,
    /// Preparation steps.
    pub steps: String,
    /// Category label (e.g. breakfast, dinner, dessert).
    pub category: String,
    /// The user who published this recipe.
    pub author_id: Uuid,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a new recipe with empty optional fields and the default
    /// category.
    pub fn new(author_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            ingredients: String::new(),
            steps: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the ingredient list.
    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    /// Sets the preparation steps.
    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = steps.into();
        self
    }

    /// Sets the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_creation_defaults() {
        let author = Uuid::new_v4();
        let recipe = Recipe::new(author, "Tortilla de patatas");

        assert_eq!(recipe.title, "Tortilla de patatas");
        assert_eq!(recipe.category, DEFAULT_CATEGORY);
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.author_id, author);
    }

    #[test]
    fn test_recipe_builder() {
        let recipe = Recipe::new(Uuid::new_v4(), "Gazpacho")
            .with_description("Cold tomato soup")
            .with_ingredients("tomato, cucumber, garlic")
            .with_steps("Blend everything.")
            .with_category("Lunch");

        assert_eq!(recipe.description, "Cold tomato soup");
        assert_eq!(recipe.ingredients, "tomato, cucumber, garlic");
        assert_eq!(recipe.category, "Lunch");
    }
}
