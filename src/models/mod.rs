use serde::{Deserialize, Serialize};

pub mod dish;
pub mod preferences;

pub use dish::{
    Category, Diet, Dish, Ingredient, IngredientFlags, SpicyLevel, SweetnessLevel, TriState,
};
pub use preferences::{Preferences, SortBy};

/// Wire form of an ordinal level: either the label ("Medium") or its ordinal (2)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LevelInput {
    Ordinal(u8),
    Label(String),
}

/// Contribution of each scoring term to a dish's total score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub category: f64,
    pub spicy: f64,
    pub sweetness: f64,
    pub popularity: f64,
}

impl ScoreBreakdown {
    /// Unweighted sum of all terms
    pub fn total(&self) -> f64 {
        self.category + self.spicy + self.sweetness + self.popularity
    }
}

/// A dish that passed filtering, with its match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub dish: Dish,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}
