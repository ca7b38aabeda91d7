//! 问题上下文封装

use crate::models::Question;

/// 单个问题的处理上下文
///
/// `index` 在加载问题清单时一次性分配（0 起始），之后只读；
/// 它同时也是详情台账中的槽位下标。
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    pub index: usize,
    pub text: String,
    pub schema: String,
}

impl QuestionCtx {
    pub fn new(index: usize, question: &Question) -> Self {
        Self {
            index,
            text: question.text.clone(),
            schema: question.kind.clone(),
        }
    }
}
