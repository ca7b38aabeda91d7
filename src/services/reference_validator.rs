//! 页码引用校验服务 - 业务能力层
//!
//! 答题服务声称引用的页码可能是幻觉，这里把它们和实际检索到的页面
//! 做比对，保证最终引用的每一页都确实被检索到过。

use crate::models::{EvidenceRef, RetrievedPassage};
use std::collections::HashSet;
use tracing::warn;

/// 校验后引用数量的默认下限
pub const MIN_PAGES: usize = 2;
/// 校验后引用数量的默认上限
pub const MAX_PAGES: usize = 8;

/// 校验答案声称引用的页码
///
/// 处理步骤：
/// 1. 丢弃不在检索结果中的页码（幻觉过滤，记录警告但不报错），
///    同时按首次出现去重；
/// 2. 若剩余数量不足 `min_pages`，按检索结果的相关度顺序补齐
///    （跳过已有页码），直到达到 `min_pages` 或候选耗尽；
/// 3. 若超过 `max_pages`，截断为前 `max_pages` 条，
///    保持"声称页在前、补齐页在后"的顺序。
pub fn validate_page_references(
    claimed_pages: &[u32],
    retrieval_results: &[RetrievedPassage],
    min_pages: usize,
    max_pages: usize,
) -> Vec<u32> {
    let retrieved_pages: HashSet<u32> = retrieval_results.iter().map(|r| r.page).collect();

    let mut validated = Vec::new();
    let mut seen = HashSet::new();
    for &page in claimed_pages {
        if retrieved_pages.contains(&page) && seen.insert(page) {
            validated.push(page);
        }
    }

    let dropped: Vec<u32> = claimed_pages
        .iter()
        .copied()
        .filter(|p| !retrieved_pages.contains(p))
        .collect();
    if !dropped.is_empty() {
        warn!("已移除 {} 个幻觉页码引用: {:?}", dropped.len(), dropped);
    }

    if validated.len() < min_pages {
        for result in retrieval_results {
            if seen.insert(result.page) {
                validated.push(result.page);
                if validated.len() >= min_pages {
                    break;
                }
            }
        }
    }

    if validated.len() > max_pages {
        warn!("引用数量从 {} 截断到 {}", validated.len(), max_pages);
        validated.truncate(max_pages);
    }

    validated
}

/// 把校验后的页码转换为证据引用
pub fn build_references(pages: &[u32], pdf_sha1: &str) -> Vec<EvidenceRef> {
    pages
        .iter()
        .map(|&page| EvidenceRef {
            pdf_sha1: pdf_sha1.to_string(),
            page_index: page,
        })
        .collect()
}
