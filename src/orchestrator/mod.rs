//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Question>，批间串行、批内并发)
//!     ↓
//! workflow::QuestionFlow (处理单个 Question)
//!     ↓  多公司问题
//! workflow::comparative (拆解 → 并发子任务 → 合成)
//!     ↓
//! services (能力层：识别 / 校验 / 统计 / 落盘)
//!     ↓
//! clients (外部协作方：检索服务 / 答题服务)
//! ```
//!
//! ## 设计原则
//!
//! 1. **顺序不变量**：结果顺序恒等于输入顺序，与完成先后无关
//! 2. **失败隔离**：单个问题的失败不会中断批次
//! 3. **无业务逻辑**：只做调度、统计和落盘，不做具体业务判断

pub mod batch_processor;

pub use batch_processor::{App, BatchProcessor, BatchRunReport};
