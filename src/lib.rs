//! # RAG Question Processor
//!
//! 针对公司年报的批量问答编排引擎：把一批自然语言问题变成一批
//! 经过校验、可交叉审计的结构化答案。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有共享资源，只暴露能力
//! - `DetailStore` - 答案详情台账，批次内唯一的共享可变状态
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，只处理单个问题
//! - `EntityExtractor` - 公司名称识别与 sha1 解析能力
//! - `reference_validator` - 页码引用防幻觉校验能力
//! - `ProgressWriter` - 进度落盘能力（调试产物 + 提交产物）
//! - `clients/` - 外部协作方（检索服务、答题服务）的 trait 与实现
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个问题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（下标 + 问题文本 + 答案形态）
//! - `QuestionFlow` - 流程编排（识别 → 检索 → 作答 → 校验 → 记录）
//! - `comparative` - 多公司对比问题的拆解与合成
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量调度、并发控制、进度持久化
//!
//! ## 核心不变量
//!
//! - 结果顺序恒等于输入问题顺序，与并发完成先后无关
//! - 每个问题下标在详情台账中恰好一条记录（成功或失败）
//! - 单个问题的失败绝不中断或污染同批次的其他问题
//! - 最终引用的每一页都确实出现在该问题的检索结果中

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;
