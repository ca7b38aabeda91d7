//! 检索服务客户端
//!
//! 封装所有与检索服务相关的 HTTP 调用逻辑

use crate::clients::Retriever;
use crate::config::Config;
use crate::models::RetrievedPassage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// 检索服务客户端
pub struct RetrievalClient {
    http: reqwest::Client,
    base_url: String,
}

impl RetrievalClient {
    /// 创建新的检索客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.retrieval_api_base_url.clone(),
        }
    }

    async fn post_for_passages(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<Vec<RetrievedPassage>> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("检索请求失败: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("检索服务返回错误状态 ({url}): {status}");
        }

        let passages: Vec<RetrievedPassage> = response
            .json()
            .await
            .with_context(|| format!("无法解析检索响应: {url}"))?;

        debug!("检索到 {} 个段落 ({})", passages.len(), endpoint);

        Ok(passages)
    }
}

#[async_trait]
impl Retriever for RetrievalClient {
    async fn retrieve(
        &self,
        company_name: &str,
        query: &str,
        sample_size: usize,
        top_n: usize,
        return_parent_pages: bool,
    ) -> Result<Vec<RetrievedPassage>> {
        self.post_for_passages(
            "retrieve",
            json!({
                "company_name": company_name,
                "query": query,
                "llm_reranking_sample_size": sample_size,
                "top_n": top_n,
                "return_parent_pages": return_parent_pages,
            }),
        )
        .await
    }

    async fn retrieve_all(&self, company_name: &str) -> Result<Vec<RetrievedPassage>> {
        self.post_for_passages("retrieve_all", json!({ "company_name": company_name }))
            .await
    }
}
