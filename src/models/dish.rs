use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::LevelInput;

/// Menu section a dish belongs to. The set is closed: the catalog loader
/// rejects any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Category {
    Rice,
    Stew,
    Noodles,
    Soup,
    Bbq,
    SnackStreet,
    Dessert,
    Side,
    Seafood,
}

impl Category {
    /// All categories in canonical display order
    pub const ALL: [Category; 9] = [
        Category::Rice,
        Category::Stew,
        Category::Noodles,
        Category::Soup,
        Category::Bbq,
        Category::SnackStreet,
        Category::Dessert,
        Category::Side,
        Category::Seafood,
    ];

    /// Label as it appears in the catalog source
    pub fn label(self) -> &'static str {
        match self {
            Category::Rice => "Rice",
            Category::Stew => "Stew",
            Category::Noodles => "Noodles",
            Category::Soup => "Soup",
            Category::Bbq => "BBQ",
            Category::SnackStreet => "Snack/Street",
            Category::Dessert => "Dessert",
            Category::Side => "Side",
            Category::Seafood => "Seafood",
        }
    }

    /// Matches a label case-insensitively after trimming
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(raw))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.label()
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Category::from_label(&value).ok_or_else(|| format!("unknown category '{}'", value))
    }
}

/// Spice level on a 0-3 ordinal scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "LevelInput", into = "&'static str")]
pub enum SpicyLevel {
    NotSpicy = 0,
    Mild = 1,
    Medium = 2,
    Hot = 3,
}

impl SpicyLevel {
    pub const ALL: [SpicyLevel; 4] = [
        SpicyLevel::NotSpicy,
        SpicyLevel::Mild,
        SpicyLevel::Medium,
        SpicyLevel::Hot,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            SpicyLevel::NotSpicy => "None",
            SpicyLevel::Mild => "Mild",
            SpicyLevel::Medium => "Medium",
            SpicyLevel::Hot => "Hot",
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(raw))
    }
}

impl From<SpicyLevel> for &'static str {
    fn from(level: SpicyLevel) -> Self {
        level.label()
    }
}

impl TryFrom<LevelInput> for SpicyLevel {
    type Error = String;

    fn try_from(input: LevelInput) -> Result<Self, Self::Error> {
        match input {
            LevelInput::Ordinal(n) => {
                Self::from_ordinal(n).ok_or_else(|| format!("spicy level {} out of range 0-3", n))
            }
            LevelInput::Label(s) => {
                Self::from_label(&s).ok_or_else(|| format!("unknown spicy level '{}'", s))
            }
        }
    }
}

/// Sweetness on a 0-2 ordinal scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "LevelInput", into = "&'static str")]
pub enum SweetnessLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl SweetnessLevel {
    pub const ALL: [SweetnessLevel; 3] = [
        SweetnessLevel::Low,
        SweetnessLevel::Medium,
        SweetnessLevel::High,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            SweetnessLevel::Low => "Low",
            SweetnessLevel::Medium => "Medium",
            SweetnessLevel::High => "High",
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(raw))
    }
}

impl From<SweetnessLevel> for &'static str {
    fn from(level: SweetnessLevel) -> Self {
        level.label()
    }
}

impl TryFrom<LevelInput> for SweetnessLevel {
    type Error = String;

    fn try_from(input: LevelInput) -> Result<Self, Self::Error> {
        match input {
            LevelInput::Ordinal(n) => Self::from_ordinal(n)
                .ok_or_else(|| format!("sweetness level {} out of range 0-2", n)),
            LevelInput::Label(s) => {
                Self::from_label(&s).ok_or_else(|| format!("unknown sweetness level '{}'", s))
            }
        }
    }
}

/// A boolean attribute that may not be recorded for a dish.
///
/// `Unknown` is not `False`: a dish of unknown vegan status fails a vegan
/// requirement, while a dish of unknown peanut content survives a peanut
/// exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    True,
    False,
    #[default]
    Unknown,
}

impl TriState {
    /// Parses a catalog flag: "true"/"yes" and "false"/"no", ignoring case and
    /// surrounding whitespace. Anything else is `Unknown`.
    pub fn parse_flag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => TriState::True,
            "false" | "no" => TriState::False,
            _ => TriState::Unknown,
        }
    }

    pub fn is_true(self) -> bool {
        self == TriState::True
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::True,
            Some(false) => TriState::False,
            None => TriState::Unknown,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Unknown => None,
        }
    }
}

/// Dietary labels a preference can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diet {
    Vegetarian,
    Vegan,
    HalalFriendly,
}

impl Diet {
    pub const ALL: [Diet; 3] = [Diet::Vegetarian, Diet::Vegan, Diet::HalalFriendly];

    /// Catalog column holding this flag
    pub fn column(self) -> &'static str {
        match self {
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::HalalFriendly => "halal_friendly",
        }
    }
}

/// Ingredients and allergens tracked per dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ingredient {
    Pork,
    Beef,
    Chicken,
    Seafood,
    Egg,
    Dairy,
    Gluten,
    Peanuts,
}

impl Ingredient {
    pub const ALL: [Ingredient; 8] = [
        Ingredient::Pork,
        Ingredient::Beef,
        Ingredient::Chicken,
        Ingredient::Seafood,
        Ingredient::Egg,
        Ingredient::Dairy,
        Ingredient::Gluten,
        Ingredient::Peanuts,
    ];

    /// Suffix used in `contains_*` columns and `avoid_*` preference fields
    pub fn key(self) -> &'static str {
        match self {
            Ingredient::Pork => "pork",
            Ingredient::Beef => "beef",
            Ingredient::Chicken => "chicken",
            Ingredient::Seafood => "seafood",
            Ingredient::Egg => "egg",
            Ingredient::Dairy => "dairy",
            Ingredient::Gluten => "gluten",
            Ingredient::Peanuts => "peanuts",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.key() == key)
    }
}

/// Per-ingredient presence flags for a dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngredientFlags {
    pub pork: TriState,
    pub beef: TriState,
    pub chicken: TriState,
    pub seafood: TriState,
    pub egg: TriState,
    pub dairy: TriState,
    pub gluten: TriState,
    pub peanuts: TriState,
}

impl IngredientFlags {
    pub fn get(&self, ingredient: Ingredient) -> TriState {
        match ingredient {
            Ingredient::Pork => self.pork,
            Ingredient::Beef => self.beef,
            Ingredient::Chicken => self.chicken,
            Ingredient::Seafood => self.seafood,
            Ingredient::Egg => self.egg,
            Ingredient::Dairy => self.dairy,
            Ingredient::Gluten => self.gluten,
            Ingredient::Peanuts => self.peanuts,
        }
    }

    pub fn set(&mut self, ingredient: Ingredient, value: TriState) {
        let slot = match ingredient {
            Ingredient::Pork => &mut self.pork,
            Ingredient::Beef => &mut self.beef,
            Ingredient::Chicken => &mut self.chicken,
            Ingredient::Seafood => &mut self.seafood,
            Ingredient::Egg => &mut self.egg,
            Ingredient::Dairy => &mut self.dairy,
            Ingredient::Gluten => &mut self.gluten,
            Ingredient::Peanuts => &mut self.peanuts,
        };
        *slot = value;
    }
}

/// Popularity assumed when the catalog has no usable value
pub const DEFAULT_POPULARITY: f64 = 3.0;
pub const MIN_POPULARITY: f64 = 1.0;
pub const MAX_POPULARITY: f64 = 5.0;

/// One catalog row after normalization. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Image file reference, `None` when the dish has no visual asset
    pub image: Option<String>,
    pub spicy: Option<SpicyLevel>,
    pub sweetness: Option<SweetnessLevel>,
    /// Always within [1, 5]
    pub popularity: f64,
    pub vegetarian: TriState,
    pub vegan: TriState,
    pub halal_friendly: TriState,
    pub contains: IngredientFlags,
}

impl Dish {
    /// Creates a dish with every optional attribute unknown and default popularity
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            image: None,
            spicy: None,
            sweetness: None,
            popularity: DEFAULT_POPULARITY,
            vegetarian: TriState::Unknown,
            vegan: TriState::Unknown,
            halal_friendly: TriState::Unknown,
            contains: IngredientFlags::default(),
        }
    }

    pub fn diet(&self, diet: Diet) -> TriState {
        match diet {
            Diet::Vegetarian => self.vegetarian,
            Diet::Vegan => self.vegan,
            Diet::HalalFriendly => self.halal_friendly,
        }
    }

    pub fn set_diet(&mut self, diet: Diet, value: TriState) {
        match diet {
            Diet::Vegetarian => self.vegetarian = value,
            Diet::Vegan => self.vegan = value,
            Diet::HalalFriendly => self.halal_friendly = value,
        }
    }
}

/// Clamps a popularity value into the valid range, substituting the default
/// for NaN
pub fn clamp_popularity(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_POPULARITY
    } else {
        value.clamp(MIN_POPULARITY, MAX_POPULARITY)
    }
}
