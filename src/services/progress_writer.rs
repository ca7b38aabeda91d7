//! 进度持久化服务 - 业务能力层
//!
//! 每批次结束后把当前全部结果落盘，进程崩溃最多丢失一个在途批次。
//!
//! 输出两种产物：
//! - 调试产物 `<stem>_debug.json`：完整结果 + 详情台账 + 统计信息，
//!   页码保持内部的 1 起始，便于人工核对；
//! - 提交产物（可选）：按提交格式转换，页码转为 0 起始，
//!   "N/A" 答案的引用清空。

use crate::config::Config;
use crate::models::{AnswerDetail, EvidenceRef, ProcessedResult, NOT_AVAILABLE};
use crate::services::statistics::{calculate_statistics, Statistics};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// 调试产物的顶层结构
#[derive(Serialize)]
struct DebugArtifact<'a> {
    questions: &'a [ProcessedResult],
    answer_details: &'a [Option<AnswerDetail>],
    statistics: Statistics,
}

/// 提交产物中的单条答案
#[derive(Debug, Serialize)]
pub struct SubmissionAnswer {
    pub question_text: String,
    pub kind: String,
    pub value: Value,
    pub references: Vec<EvidenceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_process: Option<String>,
}

/// 提交产物的顶层结构
#[derive(Serialize)]
struct SubmissionArtifact<'a> {
    answers: Vec<SubmissionAnswer>,
    team_email: &'a str,
    submission_name: &'a str,
    details: &'a str,
}

/// 进度持久化服务
pub struct ProgressWriter {
    output_path: PathBuf,
    submission_file: bool,
    team_email: String,
    submission_name: String,
    pipeline_details: String,
}

impl ProgressWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            output_path: PathBuf::from(&config.output_path),
            submission_file: config.submission_file,
            team_email: config.team_email.clone(),
            submission_name: config.submission_name.clone(),
            pipeline_details: config.pipeline_details.clone(),
        }
    }

    /// 调试产物路径：`<stem>_debug.<ext>`
    fn debug_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let ext = self
            .output_path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "json".to_string());
        self.output_path
            .with_file_name(format!("{stem}_debug.{ext}"))
    }

    /// 落盘当前进度
    ///
    /// 统计信息每次都重新计算。提交模式下同时更新提交文件。
    pub async fn flush(
        &self,
        processed: &[ProcessedResult],
        details: &[Option<AnswerDetail>],
    ) -> Result<()> {
        let statistics = calculate_statistics(processed);
        let artifact = DebugArtifact {
            questions: processed,
            answer_details: details,
            statistics,
        };

        let debug_path = self.debug_path();
        write_json(&debug_path, &artifact).await?;
        debug!("调试产物已写入: {}", debug_path.display());

        if self.submission_file {
            let submission = SubmissionArtifact {
                answers: build_submission_answers(processed, details),
                team_email: &self.team_email,
                submission_name: &self.submission_name,
                details: &self.pipeline_details,
            };
            write_json(&self.output_path, &submission).await?;
            debug!("提交产物已写入: {}", self.output_path.display());
        }

        Ok(())
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)
        .await
        .with_context(|| format!("无法写入文件: {}", path.display()))?;
    Ok(())
}

/// 把内部结果转换为提交格式
///
/// 转换规则：
/// 1. 出错的结果答案强制为 "N/A"；
/// 2. 答案为 "N/A" 时引用清空；
/// 3. 其余引用的页码从 1 起始转为 0 起始；
/// 4. 成功结果附带详情中的逐步分析作为 `reasoning_process`。
pub fn build_submission_answers(
    processed: &[ProcessedResult],
    details: &[Option<AnswerDetail>],
) -> Vec<SubmissionAnswer> {
    processed
        .iter()
        .map(|result| {
            let value = if result.error.is_some() {
                json!(NOT_AVAILABLE)
            } else {
                result.value.clone()
            };

            let references = if value.as_str() == Some(NOT_AVAILABLE) {
                Vec::new()
            } else {
                result
                    .references
                    .iter()
                    .map(|r| EvidenceRef {
                        pdf_sha1: r.pdf_sha1.clone(),
                        page_index: r.page_index.saturating_sub(1),
                    })
                    .collect()
            };

            let reasoning_process = details
                .get(result.answer_details.index())
                .and_then(|slot| slot.as_ref())
                .and_then(|detail| detail.step_by_step_analysis())
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            SubmissionAnswer {
                question_text: result.question_text.clone(),
                kind: result.kind.clone(),
                value,
                references,
                reasoning_process,
            }
        })
        .collect()
}
