use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Category, Dish},
    routes::AppState,
};

/// Handler listing the category labels in display order
pub async fn list_categories() -> Json<Vec<Category>> {
    Json(Category::ALL.to_vec())
}

/// Handler listing every dish in catalog order
pub async fn list_dishes(State(state): State<Arc<AppState>>) -> Json<Vec<Dish>> {
    Json(state.catalog.dishes().to_vec())
}

/// Handler for a single dish by name
pub async fn get_dish(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Json<Dish>> {
    state
        .catalog
        .find(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Dish '{}'", name)))
}
