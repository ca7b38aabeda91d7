//! 错误类型定义
//!
//! 流水线内部的所有失败都归入 [`PipelineError`] 的五个分类之一，
//! 并且只在流水线边界（`QuestionFlow::process`）被捕获一次：
//! 记录错误详情、转换为错误结果，绝不中断同批次的其他问题。

use thiserror::Error;

/// 单个问题处理过程中可能出现的错误
///
/// `Display` 输出固定为 `"<错误类别>: <描述>"` 格式，
/// 该字符串会原样写入错误结果的 `error` 字段。
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 问题文本未匹配到任何已知公司
    #[error("NoEntityFound: 问题中未找到任何已知公司名称")]
    NoEntityFound,

    /// 检索未返回任何上下文
    #[error("NoContextFound: 未检索到相关上下文 (公司: {entity})")]
    NoContextFound { entity: String },

    /// 对比问题拆解结果缺少某个公司的子问题
    #[error("DecompositionIncomplete: 对比问题拆解缺少公司 {entity} 的子问题")]
    DecompositionIncomplete { entity: String },

    /// 对比问题的某个子任务失败（整个对比问题随之失败）
    #[error("SubQuestionFailure: 公司 {entity} 的子问题处理失败: {source}")]
    SubQuestionFailure {
        entity: String,
        #[source]
        source: Box<PipelineError>,
    },

    /// 外部协作方（检索服务 / 答题服务）调用失败
    #[error("CollaboratorError: {operation} 调用失败: {message}")]
    Collaborator { operation: String, message: String },
}

impl PipelineError {
    /// 包装一个外部协作方错误
    pub fn collaborator(operation: impl Into<String>, err: &anyhow::Error) -> Self {
        PipelineError::Collaborator {
            operation: operation.into(),
            message: format!("{err:#}"),
        }
    }
}

/// 将错误及其全部来源链格式化为多行文本
///
/// 写入 `AnswerDetail` 的 `error_traceback` 字段，便于事后排查。
pub fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut lines = vec![err.to_string()];
    let mut cur = err.source();
    while let Some(src) = cur {
        lines.push(format!("caused by: {src}"));
        cur = src.source();
    }
    lines.join("\n")
}

/// 流水线结果类型别名
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_kind_prefix() {
        assert_eq!(
            PipelineError::NoEntityFound.to_string(),
            "NoEntityFound: 问题中未找到任何已知公司名称"
        );

        let err = PipelineError::NoContextFound {
            entity: "宁德时代".to_string(),
        };
        assert!(err.to_string().starts_with("NoContextFound: "));
    }

    #[test]
    fn test_sub_question_failure_nests_source() {
        let inner = PipelineError::NoContextFound {
            entity: "Acme Inc".to_string(),
        };
        let outer = PipelineError::SubQuestionFailure {
            entity: "Acme Inc".to_string(),
            source: Box::new(inner),
        };

        let text = outer.to_string();
        assert!(text.starts_with("SubQuestionFailure: "));
        assert!(text.contains("NoContextFound"));
    }

    #[test]
    fn test_format_error_chain_walks_sources() {
        let inner = PipelineError::NoEntityFound;
        let outer = PipelineError::SubQuestionFailure {
            entity: "X".to_string(),
            source: Box::new(inner),
        };

        let chain = format_error_chain(&outer);
        assert!(chain.contains("caused by: NoEntityFound"));
    }
}
