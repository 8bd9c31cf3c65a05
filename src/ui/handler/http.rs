//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::CodeBlockId,
    infrastructure::dto::http::{
        CodeBlockDetailDto, CodeBlockSummaryDto, RatingResponseDto, SubmitRatingDto,
    },
    ui::state::AppState,
    usecase::{RatingError, SubmitRatingUseCase},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the lobby list of code blocks
pub async fn list_code_blocks(State(state): State<Arc<AppState>>) -> Json<Vec<CodeBlockSummaryDto>> {
    let blocks = state.repository.list_code_blocks().await;

    let summaries = blocks
        .into_iter()
        .map(|block| CodeBlockSummaryDto {
            id: block.id.into_string(),
            code_block_name: block.name,
            total_rating: block.rating.total,
            num_ratings: block.rating.count,
        })
        .collect();

    Json(summaries)
}

/// Get one code block by id
pub async fn get_code_block(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CodeBlockDetailDto>, StatusCode> {
    let code_block_id = CodeBlockId::try_from(id).map_err(|_| StatusCode::NOT_FOUND)?;
    let block = state
        .repository
        .get_code_block(&code_block_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(CodeBlockDetailDto {
        id: block.id.into_string(),
        code_block_name: block.name,
        initial_code: block.initial_code.into_string(),
        solution: block.solution.into_string(),
        total_rating: block.rating.total,
        num_ratings: block.rating.count,
    }))
}

/// Get the current average rating of a code block
pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RatingResponseDto>, StatusCode> {
    let code_block_id = CodeBlockId::try_from(id).map_err(|_| StatusCode::NOT_FOUND)?;
    let rating = state
        .repository
        .get_rating(&code_block_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(RatingResponseDto {
        average_rating: rating.average(),
    }))
}

/// Submit a rating for a code block and return the new average
pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SubmitRatingDto>,
) -> Result<Json<RatingResponseDto>, StatusCode> {
    let code_block_id = CodeBlockId::try_from(id).map_err(|_| StatusCode::NOT_FOUND)?;

    let usecase = SubmitRatingUseCase::new(state.repository.clone());
    match usecase.execute(&code_block_id, body.rating).await {
        Ok(average) => Ok(Json(RatingResponseDto {
            average_rating: average,
        })),
        Err(RatingError::InvalidRating(e)) => {
            tracing::warn!("Rejected rating for '{}': {}", code_block_id, e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(RatingError::CodeBlockNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
