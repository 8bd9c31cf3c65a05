//! UseCase: 評価送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitRatingUseCase::execute() メソッド
//! - 値域チェック(1..=5)と集計の更新、新しい平均の返却
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証:値域外の評価は集計を変更する前に拒否される
//! - 平均の再計算が正しいことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系:評価の記録と平均の返却
//! - 異常系:値域外の評価(0, 6)、存在しないコードブロック ID

use std::sync::Arc;

use crate::domain::{CodeBlockId, CodeBlockRepository, RatingScore};

use super::error::RatingError;

/// 評価送信のユースケース
pub struct SubmitRatingUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn CodeBlockRepository>,
}

impl SubmitRatingUseCase {
    /// 新しい SubmitRatingUseCase を作成
    pub fn new(repository: Arc<dyn CodeBlockRepository>) -> Self {
        Self { repository }
    }

    /// 評価送信を実行
    ///
    /// 同一の閲覧者による再送信の排除は行いません(観測されたシステムに一致)。
    ///
    /// # Arguments
    ///
    /// * `code_block_id` - 評価対象のコードブロック ID
    /// * `rating` - 送信された評価値
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - 更新後の平均評価
    /// * `Err(RatingError)` - 送信失敗
    pub async fn execute(
        &self,
        code_block_id: &CodeBlockId,
        rating: i64,
    ) -> Result<f64, RatingError> {
        // 1. 値域チェック(集計を変更する前に検証)
        let score = RatingScore::new(rating).map_err(RatingError::InvalidRating)?;

        // 2. 集計を更新して新しい平均を返す
        let aggregate = self
            .repository
            .add_rating(code_block_id, score)
            .await
            .map_err(|_| RatingError::CodeBlockNotFound(code_block_id.to_string()))?;

        Ok(aggregate.average())
    }
}
