use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::models::{
    dish::{clamp_popularity, DEFAULT_POPULARITY},
    Category, Diet, Dish, Ingredient, SpicyLevel, SweetnessLevel, TriState,
};

/// Prefix shared by all ingredient/allergen columns
pub const INGREDIENT_PREFIX: &str = "contains_";

/// Error types for catalog loading
///
/// Any of these aborts the whole load; a partial catalog is never returned.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("Catalog is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
    #[error("Row {row}: unknown category '{value}'")]
    UnknownCategory { row: usize, value: String },
}

/// The read-only set of dishes recommendations are drawn from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    dishes: Vec<Dish>,
}

impl Catalog {
    /// Wraps already-normalized dishes, keeping their order
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }

    /// Loads a catalog from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let catalog = Self::load(file)?;

        tracing::info!(
            path = %path.display(),
            dishes = catalog.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Loads and normalizes a catalog from CSV text with a header row
    ///
    /// Flags, taste labels and popularity are coerced silently: unrecognised
    /// values become unknown (or the default popularity). Only a missing or
    /// invalid name/category is an error.
    pub fn load<R: Read>(source: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(source);

        let columns = Columns::from_headers(reader.headers()?)?;

        let mut dishes = Vec::new();
        let mut defaulted_popularity = 0usize;

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = idx + 1;

            let (dish, popularity_defaulted) = columns.parse_row(&record, row)?;
            if popularity_defaulted {
                defaulted_popularity += 1;
            }
            dishes.push(dish);
        }

        tracing::debug!(
            dishes = dishes.len(),
            defaulted_popularity,
            "Catalog normalized"
        );

        Ok(Self { dishes })
    }

    /// All dishes in source order
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Looks up a dish by name, ignoring case and surrounding whitespace
    pub fn find(&self, name: &str) -> Option<&Dish> {
        let name = name.trim();
        self.dishes
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

/// Column positions resolved from the header row
struct Columns {
    name: usize,
    category: usize,
    description: Option<usize>,
    image: Option<usize>,
    spicy: Option<usize>,
    sweetness: Option<usize>,
    popularity: Option<usize>,
    diets: Vec<(Diet, usize)>,
    ingredients: Vec<(Ingredient, usize)>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let mut ingredients = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let Some(key) = header.trim().strip_prefix(INGREDIENT_PREFIX) else {
                continue;
            };
            match Ingredient::from_key(key) {
                Some(ingredient) => ingredients.push((ingredient, idx)),
                None => tracing::debug!(column = header, "Ignoring untracked ingredient column"),
            }
        }

        let diets = Diet::ALL
            .into_iter()
            .filter_map(|diet| position(diet.column()).map(|idx| (diet, idx)))
            .collect();

        Ok(Self {
            name: position("name").ok_or(CatalogError::MissingColumn("name"))?,
            category: position("category").ok_or(CatalogError::MissingColumn("category"))?,
            description: position("description"),
            image: position("image"),
            spicy: position("spicy"),
            sweetness: position("sweetness"),
            popularity: position("popularity"),
            diets,
            ingredients,
        })
    }

    /// Builds a dish from one record. The flag is true when popularity fell
    /// back to the default.
    fn parse_row(&self, record: &csv::StringRecord, row: usize) -> Result<(Dish, bool), CatalogError> {
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim);

        let name = field(Some(self.name)).unwrap_or_default();
        if name.is_empty() {
            return Err(CatalogError::MissingField { row, field: "name" });
        }

        let raw_category = field(Some(self.category)).unwrap_or_default();
        if raw_category.is_empty() {
            return Err(CatalogError::MissingField { row, field: "category" });
        }
        let category = Category::from_label(raw_category).ok_or_else(|| {
            CatalogError::UnknownCategory {
                row,
                value: raw_category.to_string(),
            }
        })?;

        let mut dish = Dish::new(name, category);
        dish.description = field(self.description).unwrap_or_default().to_string();
        dish.image = field(self.image)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        dish.spicy = field(self.spicy).and_then(SpicyLevel::from_label);
        dish.sweetness = field(self.sweetness).and_then(SweetnessLevel::from_label);

        let (popularity, defaulted) = parse_popularity(field(self.popularity));
        dish.popularity = popularity;

        for &(diet, idx) in &self.diets {
            dish.set_diet(diet, field(Some(idx)).map_or(TriState::Unknown, TriState::parse_flag));
        }
        for &(ingredient, idx) in &self.ingredients {
            dish.contains.set(
                ingredient,
                field(Some(idx)).map_or(TriState::Unknown, TriState::parse_flag),
            );
        }

        Ok((dish, defaulted))
    }
}

/// Parses and clamps a popularity value; the flag reports a fallback to the default
fn parse_popularity(raw: Option<&str>) -> (f64, bool) {
    match raw.and_then(|s| s.parse::<f64>().ok()) {
        Some(value) if !value.is_nan() => (clamp_popularity(value), false),
        _ => (DEFAULT_POPULARITY, true),
    }
}
