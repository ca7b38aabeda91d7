//! 批量问题处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量问题的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载公司子集、创建检索和答题客户端
//! 2. **批量加载**：读取问题清单并分配下标
//! 3. **并发控制**：按并发数分批，批内用 Semaphore + tokio::spawn 并发
//! 4. **顺序保证**：按派发顺序收取结果，最终顺序恒等于输入顺序
//! 5. **进度持久化**：每批完成后落盘，崩溃最多丢一个在途批次
//! 6. **全局统计**：汇总全部问题的处理结果
//!
//! ## 设计特点
//!
//! - **批间串行，批内并发**：峰值外部 API 并发被限制在配置值
//! - **失败隔离**：单个问题失败只产生一条错误结果，批次继续
//! - **向下委托**：单个问题的细节全部委托给 workflow::QuestionFlow

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{error, warn};

use crate::clients::{AnsweringService, LlmClient, RetrievalClient, Retriever};
use crate::config::Config;
use crate::infrastructure::DetailStore;
use crate::models::{
    load_entity_subset, load_questions, AnswerDetail, DetailRef, ProcessedResult, Question,
};
use crate::services::statistics::calculate_statistics;
use crate::services::{EntityExtractor, ProgressWriter, Statistics};
use crate::utils::logging::{
    log_batch_complete, log_batch_start, log_questions_loaded, log_startup, print_final_stats,
};
use crate::workflow::{QuestionCtx, QuestionFlow};

/// 一次完整运行的产出
pub struct BatchRunReport {
    /// 处理结果，顺序与输入问题一致
    pub questions: Vec<ProcessedResult>,
    /// 详情台账快照，长度等于问题总数，运行结束后无空槽
    pub answer_details: Vec<Option<AnswerDetail>>,
    pub statistics: Statistics,
}

/// 批量问题处理器
pub struct BatchProcessor {
    config: Arc<Config>,
    retriever: Arc<dyn Retriever>,
    answering: Arc<dyn AnsweringService>,
    extractor: Arc<EntityExtractor>,
}

impl BatchProcessor {
    pub fn new(
        config: Config,
        retriever: Arc<dyn Retriever>,
        answering: Arc<dyn AnsweringService>,
        extractor: Arc<EntityExtractor>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            retriever,
            answering,
            extractor,
        }
    }

    /// 处理整个问题清单
    ///
    /// 下标在此处一次性分配；详情台账按问题总数预分配。
    pub async fn run(&self, questions: &[Question]) -> Result<BatchRunReport> {
        let total = questions.len();
        let details = Arc::new(DetailStore::with_capacity(total));
        let flow = QuestionFlow::new(
            self.retriever.clone(),
            self.answering.clone(),
            self.extractor.clone(),
            details.clone(),
            self.config.clone(),
        );
        let writer = ProgressWriter::new(&self.config);

        let ctxs: Vec<QuestionCtx> = questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionCtx::new(index, q))
            .collect();

        let parallel = self.config.parallel_requests;
        let mut processed: Vec<ProcessedResult> = Vec::with_capacity(total);

        if parallel <= 1 {
            // 串行模式：严格按下标顺序逐个处理，每个问题完成后落盘
            for ctx in &ctxs {
                let result = flow.process(ctx).await;
                processed.push(result);
                writer.flush(&processed, &details.snapshot()).await?;
            }
        } else {
            let semaphore = Arc::new(Semaphore::new(parallel));
            let total_batches = (total + parallel - 1) / parallel;

            for (batch_idx, batch) in ctxs.chunks(parallel).enumerate() {
                let batch_num = batch_idx + 1;
                let batch_start = batch_idx * parallel;
                log_batch_start(
                    batch_num,
                    total_batches,
                    batch_start + 1,
                    batch_start + batch.len(),
                    total,
                );

                let batch_results = self
                    .process_batch(batch, &flow, semaphore.clone(), &details)
                    .await?;

                let success = batch_results.iter().filter(|r| r.error.is_none()).count();
                log_batch_complete(batch_num, success, batch_results.len());

                processed.extend(batch_results);

                // 每批落盘一次，崩溃最多丢失一个在途批次
                writer.flush(&processed, &details.snapshot()).await?;
            }
        }

        let statistics = calculate_statistics(&processed);

        Ok(BatchRunReport {
            questions: processed,
            answer_details: details.snapshot(),
            statistics,
        })
    }

    /// 处理单个批次，按派发顺序收取结果
    async fn process_batch(
        &self,
        batch: &[QuestionCtx],
        flow: &QuestionFlow,
        semaphore: Arc<Semaphore>,
        details: &DetailStore,
    ) -> Result<Vec<ProcessedResult>> {
        let mut handles = Vec::with_capacity(batch.len());

        for ctx in batch {
            let permit = semaphore.clone().acquire_owned().await?;
            let flow = flow.clone();
            let task_ctx = ctx.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                flow.process(&task_ctx).await
            });
            handles.push((ctx.clone(), handle));
        }

        // 结果位置在派发时就已固定，与完成先后无关
        let mut results = Vec::with_capacity(handles.len());
        for (ctx, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    // 流程层承诺不 panic，这里只是兜底保证台账无空槽
                    error!("[问题 {}] ❌ 任务执行失败: {}", ctx.index, e);
                    task_failure_result(&ctx, details, &e)
                }
            };
            results.push(result);
        }

        Ok(results)
    }
}

/// 任务层面失败（如 panic）的兜底结果
fn task_failure_result(
    ctx: &QuestionCtx,
    details: &DetailStore,
    err: &tokio::task::JoinError,
) -> ProcessedResult {
    let message = format!("CollaboratorError: 处理任务异常终止: {err}");
    let detail = AnswerDetail::from_error(message.clone(), DetailRef::new(ctx.index));
    let detail_ref = details.put(ctx.index, detail);

    ProcessedResult {
        question_text: ctx.text.clone(),
        kind: ctx.schema.clone(),
        value: serde_json::Value::Null,
        references: Vec::new(),
        error: Some(message),
        answer_details: detail_ref,
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    processor: BatchProcessor,
}

impl App {
    /// 初始化应用：加载公司子集、创建外部协作方客户端
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let subset = load_entity_subset(Path::new(&config.subset_file)).await?;
        let extractor = Arc::new(EntityExtractor::new(subset));

        let retriever: Arc<dyn Retriever> = Arc::new(RetrievalClient::new(&config));
        let answering: Arc<dyn AnsweringService> = Arc::new(LlmClient::new(&config));

        let processor = BatchProcessor::new(config.clone(), retriever, answering, extractor);

        Ok(Self { config, processor })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let questions = load_questions(Path::new(&self.config.questions_file)).await?;

        if questions.is_empty() {
            warn!("⚠️ 问题清单为空，程序结束");
            return Ok(());
        }

        log_questions_loaded(questions.len(), self.config.parallel_requests);

        let report = self.processor.run(&questions).await?;

        print_final_stats(&report.statistics, &self.config.output_path);

        Ok(())
    }
}
