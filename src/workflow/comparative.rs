//! 对比问题处理 - 流程层
//!
//! 处理涉及多家公司的问题：
//! 1. 请答题服务把对比问题拆解为每家公司一个子问题
//! 2. 每家公司并发执行一轮"检索 + 作答"（每家一个任务，不受批次并发数限制）
//! 3. 合并各公司的证据引用并按 (sha1, 页码) 去重，保留首次出现
//! 4. 以各公司答案为上下文，再调用一次答题服务合成最终对比答案
//!
//! 任何一家公司的子任务失败都会导致整个对比问题失败：
//! 不产出部分对比答案，但也不影响同批次的其他问题。

use std::collections::HashSet;

use serde_json::{json, Value};
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Answer, EvidenceRef};
use crate::workflow::question_ctx::QuestionCtx;
use crate::workflow::question_flow::QuestionFlow;

/// 对比子问题固定使用的答案形态
const SUB_QUESTION_SCHEMA: &str = "number";

/// 处理一个对比问题，返回合成后的单个答案
pub async fn process_comparative(
    flow: &QuestionFlow,
    ctx: &QuestionCtx,
    companies: Vec<String>,
) -> PipelineResult<Answer> {
    // 第一步：拆解为每家公司的子问题
    let mapping = flow
        .answering
        .decompose(&ctx.text, &companies)
        .await
        .map_err(|e| PipelineError::collaborator("问题拆解", &e))?;

    let mut sub_questions = Vec::with_capacity(companies.len());
    for company in &companies {
        let sub_question = mapping
            .get(company)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| PipelineError::DecompositionIncomplete {
                entity: company.clone(),
            })?;
        sub_questions.push((company.clone(), sub_question.clone()));
    }

    info!(
        "[问题 {}] 🔀 对比问题已拆解为 {} 个子问题，开始并发处理",
        ctx.index,
        sub_questions.len()
    );

    // 第二步：每家公司一个并发任务
    let mut handles = Vec::with_capacity(sub_questions.len());
    for (company, sub_question) in sub_questions {
        let flow = flow.clone();
        handles.push(tokio::spawn(async move {
            let answer = flow
                .answer_for_company(&company, &sub_question, SUB_QUESTION_SCHEMA)
                .await;
            (company, answer)
        }));
    }

    // 等全部子任务结束后再按派发顺序检查；任一失败即判定整个对比问题失败
    let joined = futures::future::join_all(handles).await;

    let mut individual_answers = serde_json::Map::new();
    let mut aggregated_references: Vec<EvidenceRef> = Vec::new();
    for join_result in joined {
        let (company, answer) = join_result.map_err(|e| PipelineError::Collaborator {
            operation: "对比子任务".to_string(),
            message: e.to_string(),
        })?;
        let answer = answer.map_err(|e| PipelineError::SubQuestionFailure {
            entity: company.clone(),
            source: Box::new(e),
        })?;

        aggregated_references.extend(answer.references.iter().cloned());
        individual_answers.insert(
            company,
            json!({
                "final_answer": answer.final_value,
                "step_by_step_analysis": answer.step_by_step_analysis,
                "reasoning_summary": answer.reasoning_summary,
            }),
        );
    }

    // 第三步：跨公司去重，保留首次出现
    let references = dedup_references(aggregated_references);

    // 第四步：以各公司答案为上下文合成最终答案
    let context = serde_json::to_string_pretty(&Value::Object(individual_answers)).map_err(|e| {
        PipelineError::Collaborator {
            operation: "对比上下文序列化".to_string(),
            message: e.to_string(),
        }
    })?;

    let mut combined = flow
        .answering
        .answer(&ctx.text, &context, "comparative")
        .await
        .map_err(|e| PipelineError::collaborator("答题服务", &e))?;

    combined.references = references;

    info!("[问题 {}] ✓ 对比答案合成完成", ctx.index);

    Ok(combined)
}

/// 按 (pdf_sha1, page_index) 去重，保留首次出现
fn dedup_references(references: Vec<EvidenceRef>) -> Vec<EvidenceRef> {
    let mut seen = HashSet::new();
    references
        .into_iter()
        .filter(|r| seen.insert((r.pdf_sha1.clone(), r.page_index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(sha1: &str, page: u32) -> EvidenceRef {
        EvidenceRef {
            pdf_sha1: sha1.to_string(),
            page_index: page,
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let refs = vec![
            evidence("a", 1),
            evidence("b", 1),
            evidence("a", 1),
            evidence("a", 2),
        ];

        let deduped = dedup_references(refs);
        assert_eq!(
            deduped,
            vec![evidence("a", 1), evidence("b", 1), evidence("a", 2)]
        );
    }

    #[test]
    fn test_dedup_same_page_different_company_kept() {
        let refs = vec![evidence("a", 5), evidence("b", 5)];
        assert_eq!(dedup_references(refs).len(), 2);
    }
}
