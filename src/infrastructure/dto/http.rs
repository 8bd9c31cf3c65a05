//! HTTP API DTOs for the collaborative editing application.
//!
//! Field names follow the wire contract the lobby and editor clients expect
//! (`_id`, `codeBlockName`, `averageRating`, ...).

use serde::{Deserialize, Serialize};

/// Code block summary for the lobby list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlockSummaryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub code_block_name: String,
    pub total_rating: u64,
    pub num_ratings: u64,
}

/// Code block detail for the editor page endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlockDetailDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub code_block_name: String,
    pub initial_code: String,
    pub solution: String,
    pub total_rating: u64,
    pub num_ratings: u64,
}

/// Rating submission request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingDto {
    pub rating: i64,
}

/// Rating aggregate response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponseDto {
    pub average_rating: f64,
}
