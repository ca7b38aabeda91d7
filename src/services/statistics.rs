//! 统计服务 - 业务能力层

use crate::models::ProcessedResult;
use serde::{Deserialize, Serialize};

/// 一次运行的统计信息
///
/// 恒等式：`success_count + error_count + na_count == total_questions`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_questions: usize,
    pub error_count: usize,
    pub na_count: usize,
    pub success_count: usize,
}

/// 对当前结果列表重新计算统计信息
///
/// 每次都从头计算，不做增量缓存，避免结果列表变化后统计漂移。
pub fn calculate_statistics(results: &[ProcessedResult]) -> Statistics {
    let total_questions = results.len();
    let error_count = results.iter().filter(|r| r.error.is_some()).count();
    let na_count = results
        .iter()
        .filter(|r| r.error.is_none() && r.is_not_available())
        .count();
    let success_count = total_questions - error_count - na_count;

    Statistics {
        total_questions,
        error_count,
        na_count,
        success_count,
    }
}
