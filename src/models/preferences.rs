use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Category, Diet, Ingredient, SpicyLevel, SweetnessLevel};

/// Result ordering requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Score first, popularity as tie-break
    #[default]
    #[serde(alias = "score", alias = "best-match")]
    BestMatch,
    /// Popularity first, score as tie-break
    Popularity,
}

/// Preferences for a single recommendation request
///
/// Require flags (`vegetarian`, `vegan`, `halal_friendly`) keep only dishes
/// where the flag is known to be true. Avoid flags drop only dishes known to
/// contain the ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Categories to restrict to; empty means any category
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    #[serde(default = "default_spicy_tolerance")]
    pub spicy_tolerance: SpicyLevel,
    /// Preferred sweetness; `None` disables the sweetness term
    #[serde(default)]
    pub sweet_pref: Option<SweetnessLevel>,

    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub halal_friendly: bool,

    #[serde(default)]
    pub avoid_pork: bool,
    #[serde(default)]
    pub avoid_beef: bool,
    #[serde(default)]
    pub avoid_chicken: bool,
    #[serde(default)]
    pub avoid_seafood: bool,
    #[serde(default)]
    pub avoid_egg: bool,
    #[serde(default)]
    pub avoid_dairy: bool,
    #[serde(default)]
    pub avoid_gluten: bool,
    #[serde(default)]
    pub avoid_peanuts: bool,

    #[serde(default)]
    pub sort_by: SortBy,
}

fn default_spicy_tolerance() -> SpicyLevel {
    SpicyLevel::Medium
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences {
    /// Preferences with no restrictions and medium spice tolerance
    pub fn new() -> Self {
        Self {
            categories: BTreeSet::new(),
            spicy_tolerance: default_spicy_tolerance(),
            sweet_pref: None,
            vegetarian: false,
            vegan: false,
            halal_friendly: false,
            avoid_pork: false,
            avoid_beef: false,
            avoid_chicken: false,
            avoid_seafood: false,
            avoid_egg: false,
            avoid_dairy: false,
            avoid_gluten: false,
            avoid_peanuts: false,
            sort_by: SortBy::default(),
        }
    }

    pub fn requires(&self, diet: Diet) -> bool {
        match diet {
            Diet::Vegetarian => self.vegetarian,
            Diet::Vegan => self.vegan,
            Diet::HalalFriendly => self.halal_friendly,
        }
    }

    pub fn avoids(&self, ingredient: Ingredient) -> bool {
        match ingredient {
            Ingredient::Pork => self.avoid_pork,
            Ingredient::Beef => self.avoid_beef,
            Ingredient::Chicken => self.avoid_chicken,
            Ingredient::Seafood => self.avoid_seafood,
            Ingredient::Egg => self.avoid_egg,
            Ingredient::Dairy => self.avoid_dairy,
            Ingredient::Gluten => self.avoid_gluten,
            Ingredient::Peanuts => self.avoid_peanuts,
        }
    }

    /// Sets the avoid flag for an ingredient
    pub fn set_avoid(&mut self, ingredient: Ingredient, avoid: bool) {
        let slot = match ingredient {
            Ingredient::Pork => &mut self.avoid_pork,
            Ingredient::Beef => &mut self.avoid_beef,
            Ingredient::Chicken => &mut self.avoid_chicken,
            Ingredient::Seafood => &mut self.avoid_seafood,
            Ingredient::Egg => &mut self.avoid_egg,
            Ingredient::Dairy => &mut self.avoid_dairy,
            Ingredient::Gluten => &mut self.avoid_gluten,
            Ingredient::Peanuts => &mut self.avoid_peanuts,
        };
        *slot = avoid;
    }

    pub fn required_diets(&self) -> impl Iterator<Item = Diet> + '_ {
        Diet::ALL.into_iter().filter(move |d| self.requires(*d))
    }

    pub fn avoided_ingredients(&self) -> impl Iterator<Item = Ingredient> + '_ {
        Ingredient::ALL.into_iter().filter(move |i| self.avoids(*i))
    }
}
