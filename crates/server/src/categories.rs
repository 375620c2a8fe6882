//! Categories API endpoints

use api_types::{
    Message,
    category::{CategoryNew, CategoryStatView, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Caller, NewCategoryCmd};

use crate::{ServerError, server::ServerState, views};

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(caller).await?;
    Ok(Json(categories.into_iter().map(views::category).collect()))
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let mut cmd = NewCategoryCmd::new(payload.name);
    cmd.kind = payload.kind;
    cmd.color = payload.color;
    cmd.icon = payload.icon;
    cmd.parent_category_id = payload.parent_category_id;

    let category = state.engine.create_category(caller, cmd).await?;
    Ok((StatusCode::CREATED, Json(views::category(category))))
}

pub async fn remove(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_category(caller, id).await?;
    Ok(Json(Message::new("Category deleted successfully")))
}

pub async fn stats(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryStatView>>, ServerError> {
    let stats = state.engine.category_stats(caller).await?;
    Ok(Json(stats.into_iter().map(views::category_stat).collect()))
}
