//! 单问题处理流程 - 流程层
//!
//! 核心职责：定义"一个问题"的完整处理流程
//!
//! 流程顺序：
//! 1. 识别公司名称（0 家报错，1 家直接作答，多家走对比流程）
//! 2. 检索上下文（相关度模式或全文档模式）
//! 3. 调用答题服务
//! 4. 严格引用模式下校验页码引用
//! 5. 写入答案详情台账（成功或失败，恰好一条）
//!
//! 本流程承诺不向外抛错：所有失败都在 [`QuestionFlow::process`]
//! 边界处转换为错误结果，绝不影响同批次的其他问题。

use std::sync::Arc;

use tracing::{error, info};

use crate::clients::{AnsweringService, Retriever};
use crate::config::Config;
use crate::error::{format_error_chain, PipelineError, PipelineResult};
use crate::infrastructure::DetailStore;
use crate::models::{Answer, AnswerDetail, DetailRef, ProcessedResult, RetrievedPassage};
use crate::services::reference_validator::{
    build_references, validate_page_references, MAX_PAGES, MIN_PAGES,
};
use crate::services::EntityExtractor;
use crate::workflow::comparative;
use crate::workflow::question_ctx::QuestionCtx;

/// 单问题处理流程
///
/// 所有字段都是共享句柄，克隆开销很小；批次调度器为每个并发任务
/// 克隆一份，任务之间除详情台账外不共享任何可变状态。
#[derive(Clone)]
pub struct QuestionFlow {
    pub(crate) retriever: Arc<dyn Retriever>,
    pub(crate) answering: Arc<dyn AnsweringService>,
    pub(crate) extractor: Arc<EntityExtractor>,
    pub(crate) details: Arc<DetailStore>,
    pub(crate) config: Arc<Config>,
}

impl QuestionFlow {
    /// 创建新的问题处理流程
    pub fn new(
        retriever: Arc<dyn Retriever>,
        answering: Arc<dyn AnsweringService>,
        extractor: Arc<EntityExtractor>,
        details: Arc<DetailStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            retriever,
            answering,
            extractor,
            details,
            config,
        }
    }

    /// 处理一个问题，保证恰好写入一条详情记录，绝不向外抛错
    pub async fn process(&self, ctx: &QuestionCtx) -> ProcessedResult {
        match self.run(ctx).await {
            Ok(answer) => {
                let detail = AnswerDetail::from_answer(&answer, DetailRef::new(ctx.index));
                let detail_ref = self.details.put(ctx.index, detail);

                info!("[问题 {}] ✓ 处理完成", ctx.index);

                ProcessedResult {
                    question_text: ctx.text.clone(),
                    kind: ctx.schema.clone(),
                    value: answer.final_value,
                    references: answer.references,
                    error: None,
                    answer_details: detail_ref,
                }
            }
            Err(err) => self.handle_error(ctx, err),
        }
    }

    /// 问题处理主体，失败时返回 [`PipelineError`]
    async fn run(&self, ctx: &QuestionCtx) -> PipelineResult<Answer> {
        let companies = self.extractor.extract(&ctx.text);

        match companies.len() {
            0 => Err(PipelineError::NoEntityFound),
            1 => {
                info!("[问题 {}] 🏢 识别到公司: {}", ctx.index, companies[0]);
                self.answer_for_company(&companies[0], &ctx.text, &ctx.schema)
                    .await
            }
            n => {
                info!("[问题 {}] 🏢 识别到 {} 家公司，进入对比流程", ctx.index, n);
                comparative::process_comparative(self, ctx, companies).await
            }
        }
    }

    /// 为单家公司执行"检索 + 作答"
    ///
    /// 对比流程的每个子任务也走这里，因此错误映射保持一致。
    pub(crate) async fn answer_for_company(
        &self,
        company_name: &str,
        question: &str,
        schema: &str,
    ) -> PipelineResult<Answer> {
        let retrieval_results = if self.config.full_context {
            self.retriever.retrieve_all(company_name).await
        } else {
            self.retriever
                .retrieve(
                    company_name,
                    question,
                    self.config.llm_reranking_sample_size,
                    self.config.top_n_retrieval,
                    self.config.return_parent_pages,
                )
                .await
        }
        .map_err(|e| PipelineError::collaborator("检索服务", &e))?;

        if retrieval_results.is_empty() {
            return Err(PipelineError::NoContextFound {
                entity: company_name.to_string(),
            });
        }

        let rag_context = format_retrieval_results(&retrieval_results);
        let mut answer = self
            .answering
            .answer(question, &rag_context, schema)
            .await
            .map_err(|e| PipelineError::collaborator("答题服务", &e))?;

        if self.config.strict_references {
            let validated = validate_page_references(
                &answer.relevant_pages,
                &retrieval_results,
                MIN_PAGES,
                MAX_PAGES,
            );
            answer.references =
                build_references(&validated, &self.extractor.resolve(company_name));
            answer.relevant_pages = validated;
        }

        Ok(answer)
    }

    /// 流水线边界的统一错误处理
    ///
    /// 记录日志、写入错误详情、返回错误结果。
    fn handle_error(&self, ctx: &QuestionCtx, err: PipelineError) -> ProcessedResult {
        error!("[问题 {}] ❌ 处理失败: {}", ctx.index, err);

        let traceback = format_error_chain(&err);
        let detail = AnswerDetail::from_error(traceback, DetailRef::new(ctx.index));
        let detail_ref = self.details.put(ctx.index, detail);

        ProcessedResult {
            question_text: ctx.text.clone(),
            kind: ctx.schema.clone(),
            value: serde_json::Value::Null,
            references: Vec::new(),
            error: Some(err.to_string()),
            answer_details: detail_ref,
        }
    }
}

/// 把检索结果拼接为答题上下文
///
/// 每个段落标注来源页码，段落之间用分隔线隔开。
pub(crate) fn format_retrieval_results(retrieval_results: &[RetrievedPassage]) -> String {
    let parts: Vec<String> = retrieval_results
        .iter()
        .map(|result| {
            format!(
                "Text retrieved from page {}: \n\"\"\"\n{}\n\"\"\"",
                result.page, result.text
            )
        })
        .collect();

    parts.join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_retrieval_results_labels_pages() {
        let passages = vec![
            RetrievedPassage {
                page: 3,
                text: "营收 120 万".to_string(),
            },
            RetrievedPassage {
                page: 7,
                text: "净利润 30 万".to_string(),
            },
        ];

        let context = format_retrieval_results(&passages);
        assert!(context.contains("Text retrieved from page 3"));
        assert!(context.contains("Text retrieved from page 7"));
        assert!(context.contains("\n\n---\n\n"));
    }

    #[test]
    fn test_format_retrieval_results_empty() {
        assert_eq!(format_retrieval_results(&[]), "");
    }
}
