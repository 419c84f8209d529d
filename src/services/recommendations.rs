use std::cmp::Ordering;

use crate::models::{Dish, Preferences, Recommendation, ScoreBreakdown, SortBy};
use crate::services::catalog::Catalog;

/// Number of results returned when the caller does not ask for a specific count
pub const DEFAULT_TOP_K: usize = 12;

/// Weights for the soft-scoring terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Bonus for a dish in one of the preferred categories
    pub category: f64,
    /// Full spicy credit for a dish at or under the tolerance
    pub spicy: f64,
    /// Spicy credit lost per level above the tolerance
    pub spicy_step_penalty: f64,
    /// Full credit for an exact sweetness match
    pub sweetness: f64,
    /// Sweetness credit lost per level of distance
    pub sweetness_step_penalty: f64,
    /// Multiplier on popularity / 5
    pub popularity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category: 2.0,
            spicy: 2.0,
            spicy_step_penalty: 0.7,
            sweetness: 1.0,
            sweetness_step_penalty: 0.6,
            popularity: 1.0,
        }
    }
}

/// Returns true when the dish satisfies every hard constraint in `prefs`
///
/// Dietary requirements need the dish flag to be exactly true, so an unknown
/// flag fails. Ingredient avoidance only drops dishes known to contain the
/// ingredient, so an unknown flag passes.
pub fn passes_hard_filters(dish: &Dish, prefs: &Preferences) -> bool {
    if !prefs.categories.is_empty() && !prefs.categories.contains(&dish.category) {
        return false;
    }

    if prefs.required_diets().any(|diet| !dish.diet(diet).is_true()) {
        return false;
    }

    !prefs
        .avoided_ingredients()
        .any(|ingredient| dish.contains.get(ingredient).is_true())
}

/// Scores a dish against the preferences, term by term
pub fn score_dish(dish: &Dish, prefs: &Preferences, weights: &ScoreWeights) -> ScoreBreakdown {
    let category = if !prefs.categories.is_empty() && prefs.categories.contains(&dish.category) {
        weights.category
    } else {
        0.0
    };

    let spicy = match dish.spicy {
        Some(level) => {
            let tolerance = prefs.spicy_tolerance.ordinal();
            if level.ordinal() <= tolerance {
                weights.spicy
            } else {
                let excess = f64::from(level.ordinal() - tolerance);
                (weights.spicy - weights.spicy_step_penalty * excess).max(0.0)
            }
        }
        None => 0.0,
    };

    let sweetness = match (prefs.sweet_pref, dish.sweetness) {
        (Some(wanted), Some(actual)) => {
            let distance = f64::from(wanted.ordinal().abs_diff(actual.ordinal()));
            (weights.sweetness - weights.sweetness_step_penalty * distance).max(0.0)
        }
        _ => 0.0,
    };

    let popularity = weights.popularity * (dish.popularity / 5.0);

    ScoreBreakdown {
        category,
        spicy,
        sweetness,
        popularity,
    }
}

/// Ranks catalog dishes against a preference record
pub struct Recommender<'a> {
    catalog: &'a Catalog,
    weights: ScoreWeights,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender using the default weights
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_weights(catalog, ScoreWeights::default())
    }

    pub fn with_weights(catalog: &'a Catalog, weights: ScoreWeights) -> Self {
        Self { catalog, weights }
    }

    /// Filters, scores, sorts and truncates
    ///
    /// Ties on both sort keys keep catalog order. An empty result is a valid
    /// outcome, not an error.
    pub fn recommend(
        &self,
        prefs: &Preferences,
        top_k: usize,
        sort_by: SortBy,
    ) -> Vec<Recommendation> {
        let mut results: Vec<Recommendation> = self
            .catalog
            .dishes()
            .iter()
            .filter(|dish| passes_hard_filters(dish, prefs))
            .map(|dish| {
                let breakdown = score_dish(dish, prefs, &self.weights);
                Recommendation {
                    dish: dish.clone(),
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        let matched = results.len();

        // sort_by is stable, so equal keys stay in catalog order
        results.sort_by(|a, b| compare(a, b, sort_by));
        results.truncate(top_k);

        tracing::debug!(
            catalog = self.catalog.len(),
            matched,
            returned = results.len(),
            sort_by = ?sort_by,
            "Recommendations ranked"
        );

        results
    }
}

/// Recommends dishes with the default weights
pub fn recommend(
    catalog: &Catalog,
    prefs: &Preferences,
    top_k: usize,
    sort_by: SortBy,
) -> Vec<Recommendation> {
    Recommender::new(catalog).recommend(prefs, top_k, sort_by)
}

/// Descending order on the primary key, then descending on the other
fn compare(a: &Recommendation, b: &Recommendation, sort_by: SortBy) -> Ordering {
    let by_score = b.score.total_cmp(&a.score);
    let by_popularity = b.dish.popularity.total_cmp(&a.dish.popularity);

    match sort_by {
        SortBy::BestMatch => by_score.then(by_popularity),
        SortBy::Popularity => by_popularity.then(by_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Diet, Ingredient, SpicyLevel, SweetnessLevel, TriState};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn dish(name: &str, category: Category, spicy: Option<SpicyLevel>, popularity: f64) -> Dish {
        let mut dish = Dish::new(name, category);
        dish.spicy = spicy;
        dish.popularity = popularity;
        dish
    }

    /// Dish A (medium, pop 4, no pork) and dish B (hot, pop 5, pork)
    fn stew_catalog() -> Catalog {
        let mut a = dish("Doenjang Jjigae", Category::Stew, Some(SpicyLevel::Medium), 4.0);
        a.contains.pork = TriState::False;
        let mut b = dish("Kimchi Jjigae", Category::Stew, Some(SpicyLevel::Hot), 5.0);
        b.contains.pork = TriState::True;
        Catalog::new(vec![a, b])
    }

    fn names(results: &[Recommendation]) -> Vec<&str> {
        results.iter().map(|r| r.dish.name.as_str()).collect()
    }

    #[test]
    fn test_avoid_pork_best_match_scenario() {
        let catalog = stew_catalog();
        let mut prefs = Preferences::new();
        prefs.avoid_pork = true;
        prefs.spicy_tolerance = SpicyLevel::Medium;

        let results = recommend(&catalog, &prefs, DEFAULT_TOP_K, SortBy::BestMatch);

        assert_eq!(names(&results), vec!["Doenjang Jjigae"]);
        let top = &results[0];
        assert!(approx(top.breakdown.spicy, 2.0));
        assert!(approx(top.breakdown.popularity, 0.8));
        assert!(approx(top.breakdown.category, 0.0));
        assert!(approx(top.breakdown.sweetness, 0.0));
        assert!(approx(top.score, 2.8));
    }

    #[test]
    fn test_sort_by_popularity_scenario() {
        let catalog = stew_catalog();
        let mut prefs = Preferences::new();
        prefs.spicy_tolerance = SpicyLevel::Hot;

        let results = recommend(&catalog, &prefs, DEFAULT_TOP_K, SortBy::Popularity);
        assert_eq!(names(&results), vec!["Kimchi Jjigae", "Doenjang Jjigae"]);
    }

    #[test]
    fn test_best_match_equal_keys_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            dish("First", Category::Rice, None, 2.0),
            dish("Second", Category::Rice, None, 2.0),
        ]);
        let results = recommend(&catalog, &Preferences::new(), 10, SortBy::BestMatch);
        assert_eq!(names(&results), vec!["First", "Second"]);
    }

    #[test]
    fn test_best_match_breaks_score_ties_by_popularity() {
        // without the popularity term both dishes score exactly 2.0
        let catalog = Catalog::new(vec![
            dish("Gyeranjjim", Category::Side, Some(SpicyLevel::Mild), 2.0),
            dish("Japchae", Category::Side, Some(SpicyLevel::NotSpicy), 5.0),
        ]);
        let weights = ScoreWeights {
            popularity: 0.0,
            ..ScoreWeights::default()
        };
        let results = Recommender::with_weights(&catalog, weights).recommend(
            &Preferences::new(),
            10,
            SortBy::BestMatch,
        );

        assert!(approx(results[0].score, results[1].score));
        assert_eq!(names(&results), vec!["Japchae", "Gyeranjjim"]);
    }

    #[test]
    fn test_best_match_orders_by_score_first() {
        let catalog = Catalog::new(vec![
            dish("Mild One", Category::Rice, Some(SpicyLevel::Mild), 2.0),
            dish("Unknown Spice", Category::Rice, None, 5.0),
        ]);
        let results = recommend(&catalog, &Preferences::new(), 10, SortBy::BestMatch);
        // 2.0 + 0.4 beats 0.0 + 1.0
        assert_eq!(names(&results), vec!["Mild One", "Unknown Spice"]);
    }

    #[test]
    fn test_popularity_sort_uses_score_as_tie_break() {
        let catalog = Catalog::new(vec![
            dish("Hot", Category::Soup, Some(SpicyLevel::Hot), 4.0),
            dish("Mild", Category::Soup, Some(SpicyLevel::Mild), 4.0),
        ]);
        let mut prefs = Preferences::new();
        prefs.spicy_tolerance = SpicyLevel::Mild;

        let results = recommend(&catalog, &prefs, 10, SortBy::Popularity);
        assert_eq!(names(&results), vec!["Mild", "Hot"]);
    }

    #[test]
    fn test_category_filter_and_bonus() {
        let catalog = Catalog::new(vec![
            dish("Bibimbap", Category::Rice, None, 3.0),
            dish("Naengmyeon", Category::Noodles, None, 3.0),
        ]);
        let mut prefs = Preferences::new();
        prefs.categories.insert(Category::Noodles);

        let results = recommend(&catalog, &prefs, 10, SortBy::BestMatch);
        assert_eq!(names(&results), vec!["Naengmyeon"]);
        assert!(approx(results[0].breakdown.category, 2.0));
    }

    #[test]
    fn test_category_bonus_scored_independently_of_filter() {
        let mut prefs = Preferences::new();
        prefs.categories.insert(Category::Dessert);
        let weights = ScoreWeights::default();

        let in_category = score_dish(&Dish::new("Hotteok", Category::Dessert), &prefs, &weights);
        let out_of_category = score_dish(&Dish::new("Japchae", Category::Noodles), &prefs, &weights);
        assert!(approx(in_category.category, 2.0));
        assert!(approx(out_of_category.category, 0.0));
    }

    #[test]
    fn test_require_flag_excludes_unknown() {
        let mut vegan = Dish::new("Vegan Bibimbap", Category::Rice);
        vegan.vegan = TriState::True;
        let unknown = Dish::new("Mystery Banchan", Category::Side);
        let mut not_vegan = Dish::new("Bulgogi", Category::Bbq);
        not_vegan.vegan = TriState::False;

        let mut prefs = Preferences::new();
        prefs.vegan = true;

        assert!(passes_hard_filters(&vegan, &prefs));
        assert!(!passes_hard_filters(&unknown, &prefs));
        assert!(!passes_hard_filters(&not_vegan, &prefs));
    }

    #[test]
    fn test_avoid_flag_keeps_unknown() {
        let unknown = Dish::new("Hotteok", Category::Dessert);
        let mut safe = Dish::new("Sikhye", Category::Dessert);
        safe.contains.peanuts = TriState::False;
        let mut nuts = Dish::new("Peanut Hotteok", Category::Dessert);
        nuts.contains.peanuts = TriState::True;

        let mut prefs = Preferences::new();
        prefs.avoid_peanuts = true;

        assert!(passes_hard_filters(&unknown, &prefs));
        assert!(passes_hard_filters(&safe, &prefs));
        assert!(!passes_hard_filters(&nuts, &prefs));
    }

    #[test]
    fn test_every_require_and_avoid_flag_applies() {
        for diet in Diet::ALL {
            let mut dish = Dish::new("Dish", Category::Side);
            let mut prefs = Preferences::new();
            match diet {
                Diet::Vegetarian => prefs.vegetarian = true,
                Diet::Vegan => prefs.vegan = true,
                Diet::HalalFriendly => prefs.halal_friendly = true,
            }
            assert!(!passes_hard_filters(&dish, &prefs), "{:?} unknown", diet);
            dish.set_diet(diet, TriState::True);
            assert!(passes_hard_filters(&dish, &prefs), "{:?} true", diet);
        }

        for ingredient in Ingredient::ALL {
            let mut dish = Dish::new("Dish", Category::Side);
            let mut prefs = Preferences::new();
            prefs.set_avoid(ingredient, true);
            assert!(passes_hard_filters(&dish, &prefs), "{:?} unknown", ingredient);
            dish.contains.set(ingredient, TriState::True);
            assert!(!passes_hard_filters(&dish, &prefs), "{:?} true", ingredient);
        }
    }

    #[test]
    fn test_spicy_penalty_per_step() {
        let weights = ScoreWeights::default();
        let mut prefs = Preferences::new();
        prefs.spicy_tolerance = SpicyLevel::Mild;

        let hot = dish("Buldak", Category::SnackStreet, Some(SpicyLevel::Hot), 3.0);
        let breakdown = score_dish(&hot, &prefs, &weights);
        assert!(approx(breakdown.spicy, 0.6));

        prefs.spicy_tolerance = SpicyLevel::NotSpicy;
        let breakdown = score_dish(&hot, &prefs, &weights);
        // 2.0 - 0.7 * 3 floors at zero
        assert!(approx(breakdown.spicy, 0.0));

        let unknown = dish("Mystery", Category::Side, None, 3.0);
        assert!(approx(score_dish(&unknown, &prefs, &weights).spicy, 0.0));
    }

    #[test]
    fn test_sweetness_term() {
        let weights = ScoreWeights::default();
        let mut dessert = Dish::new("Bingsu", Category::Dessert);
        dessert.sweetness = Some(SweetnessLevel::High);

        let mut prefs = Preferences::new();
        assert!(approx(score_dish(&dessert, &prefs, &weights).sweetness, 0.0));

        prefs.sweet_pref = Some(SweetnessLevel::High);
        assert!(approx(score_dish(&dessert, &prefs, &weights).sweetness, 1.0));

        prefs.sweet_pref = Some(SweetnessLevel::Medium);
        assert!(approx(score_dish(&dessert, &prefs, &weights).sweetness, 0.4));

        prefs.sweet_pref = Some(SweetnessLevel::Low);
        assert!(approx(score_dish(&dessert, &prefs, &weights).sweetness, 0.0));

        let plain = Dish::new("Rice", Category::Rice);
        assert!(approx(score_dish(&plain, &prefs, &weights).sweetness, 0.0));
    }

    #[test]
    fn test_popularity_term_uses_defaulted_value() {
        let weights = ScoreWeights::default();
        let dish = Dish::new("Gimbap", Category::Rice);
        let breakdown = score_dish(&dish, &Preferences::new(), &weights);
        assert!(approx(breakdown.popularity, 0.6));
    }

    #[test]
    fn test_top_k_truncation() {
        let catalog = stew_catalog();
        let prefs = Preferences::new();

        assert!(recommend(&catalog, &prefs, 0, SortBy::BestMatch).is_empty());
        assert_eq!(recommend(&catalog, &prefs, 1, SortBy::BestMatch).len(), 1);
        assert_eq!(recommend(&catalog, &prefs, 1_000_000, SortBy::BestMatch).len(), 2);
    }

    #[test]
    fn test_no_survivors_returns_empty() {
        let catalog = stew_catalog();
        let mut prefs = Preferences::new();
        prefs.vegetarian = true;

        assert!(recommend(&catalog, &prefs, DEFAULT_TOP_K, SortBy::BestMatch).is_empty());
        assert!(recommend(&Catalog::default(), &Preferences::new(), 5, SortBy::Popularity).is_empty());
    }

    #[test]
    fn test_custom_weights() {
        let catalog = stew_catalog();
        let weights = ScoreWeights {
            popularity: 0.0,
            ..ScoreWeights::default()
        };
        let results = Recommender::with_weights(&catalog, weights).recommend(
            &Preferences::new(),
            10,
            SortBy::BestMatch,
        );
        assert!(results.iter().all(|r| approx(r.breakdown.popularity, 0.0)));
    }
}
