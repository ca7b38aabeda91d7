//! 外部协作方客户端
//!
//! 编排引擎只依赖这里的两个 trait：
//! - [`Retriever`]：段落检索服务
//! - [`AnsweringService`]：答题服务
//!
//! 生产实现分别是 [`RetrievalClient`]（HTTP）和 [`LlmClient`]（OpenAI 兼容 API）；
//! 测试中用桩实现替换。超时等待由协作方自己负责，这里不做取消。

pub mod llm_client;
pub mod retrieval_client;

pub use llm_client::LlmClient;
pub use retrieval_client::RetrievalClient;

use crate::models::{Answer, RetrievedPassage};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 段落检索服务
#[async_trait]
pub trait Retriever: Send + Sync {
    /// 按相关度检索某公司文档中与 query 最相关的段落
    async fn retrieve(
        &self,
        company_name: &str,
        query: &str,
        sample_size: usize,
        top_n: usize,
        return_parent_pages: bool,
    ) -> Result<Vec<RetrievedPassage>>;

    /// 全文档模式：返回某公司文档的全部页面
    async fn retrieve_all(&self, company_name: &str) -> Result<Vec<RetrievedPassage>>;
}

/// 答题服务
#[async_trait]
pub trait AnsweringService: Send + Sync {
    /// 基于检索上下文回答问题，按 schema 约束答案形态
    async fn answer(&self, question: &str, context: &str, schema: &str) -> Result<Answer>;

    /// 把对比问题拆解为每家公司一个独立子问题
    ///
    /// 返回"公司名 → 子问题"映射。
    async fn decompose(
        &self,
        question: &str,
        companies: &[String],
    ) -> Result<HashMap<String, String>>;
}
