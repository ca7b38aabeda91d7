//! 流程层
//!
//! 定义"一个问题"的完整处理流程：
//! - [`question_ctx`]：上下文封装（下标 + 文本 + 答案形态）
//! - [`question_flow`]：单问题流程（识别 → 检索 → 作答 → 校验 → 记录）
//! - [`comparative`]：多公司对比问题的拆解、并发子任务与答案合成

pub mod comparative;
pub mod question_ctx;
pub mod question_flow;

pub use question_ctx::QuestionCtx;
pub use question_flow::QuestionFlow;
