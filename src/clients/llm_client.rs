//! 答题服务客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）
//!
//! 所有答案都要求模型输出固定结构的 JSON，解析失败视为协作方错误。

use crate::clients::AnsweringService;
use crate::config::Config;
use crate::models::Answer;
use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 答题服务客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

/// 模型返回的结构化答案载荷
#[derive(Debug, Deserialize)]
struct AnswerPayload {
    final_answer: Value,
    #[serde(default)]
    step_by_step_analysis: String,
    #[serde(default)]
    reasoning_summary: String,
    #[serde(default)]
    relevant_pages: Vec<u32>,
}

impl LlmClient {
    /// 创建新的答题客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.answering_model.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// 返回 (响应文本, 响应元数据)。其他所有功能都基于此函数。
    async fn send_to_llm(&self, user_message: &str, system_message: &str) -> Result<(String, Value)> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(2048u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        let response_data = json!({
            "model": self.model_name,
            "usage": serde_json::to_value(&response.usage).unwrap_or(Value::Null),
        });

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        debug!("LLM API 调用成功");

        Ok((content.trim().to_string(), response_data))
    }

    /// 构建按 schema 约束答案形态的系统提示词
    fn answer_system_prompt(schema: &str) -> String {
        let value_rule = match schema {
            "number" => "final_answer 必须是一个数字；上下文中没有答案时为字符串 \"N/A\"",
            "boolean" => "final_answer 必须是布尔值 true 或 false；上下文中没有答案时为字符串 \"N/A\"",
            "name" => "final_answer 必须是一个名称字符串；上下文中没有答案时为 \"N/A\"",
            "names" => "final_answer 必须是名称字符串数组；上下文中没有答案时为 \"N/A\"",
            "comparative" => "final_answer 必须是各公司答案比较后胜出的公司名称；无法比较时为 \"N/A\"",
            _ => "final_answer 为简短的答案字符串；上下文中没有答案时为 \"N/A\"",
        };

        format!(
            "你是一名严谨的年报分析助手。只能依据给定的上下文回答问题，\
             禁止使用任何外部知识。必须输出一个 JSON 对象，且只输出 JSON，包含以下字段：\n\
             - step_by_step_analysis: 逐步分析过程\n\
             - reasoning_summary: 一句话推理摘要\n\
             - relevant_pages: 实际支撑答案的页码数组（只能引用上下文中标注的页码）\n\
             - final_answer: 最终答案\n\
             约束：{value_rule}。"
        )
    }

    /// 解析模型输出为答案载荷
    fn parse_answer_payload(content: &str) -> Result<AnswerPayload> {
        let stripped = strip_code_fence(content);
        serde_json::from_str(stripped)
            .with_context(|| format!("无法解析 LLM 答案 JSON: {stripped}"))
    }
}

/// 去掉模型输出外围的 Markdown 代码围栏
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过围栏后的语言标记（如 "json"）
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl AnsweringService for LlmClient {
    async fn answer(&self, question: &str, context: &str, schema: &str) -> Result<Answer> {
        let system_message = Self::answer_system_prompt(schema);
        let user_message = format!("上下文:\n{context}\n\n---\n\n问题:\n{question}");

        let (content, response_data) = self.send_to_llm(&user_message, &system_message).await?;
        let payload = Self::parse_answer_payload(&content)?;

        Ok(Answer {
            final_value: payload.final_answer,
            step_by_step_analysis: payload.step_by_step_analysis,
            reasoning_summary: payload.reasoning_summary,
            relevant_pages: payload.relevant_pages,
            references: Vec::new(),
            raw_response: response_data,
        })
    }

    async fn decompose(
        &self,
        question: &str,
        companies: &[String],
    ) -> Result<HashMap<String, String>> {
        let system_message = "你是一名问题改写助手。给定一个涉及多家公司的对比问题，\
                              把它改写为每家公司一个可独立检索的子问题。\
                              必须输出一个 JSON 对象，且只输出 JSON：\
                              键为公司名称（必须与输入完全一致），值为该公司的子问题。";
        let user_message = format!(
            "对比问题:\n{question}\n\n公司列表:\n{}",
            companies.join("\n")
        );

        let (content, _) = self.send_to_llm(&user_message, system_message).await?;
        let stripped = strip_code_fence(&content);
        let mapping: HashMap<String, String> = serde_json::from_str(stripped)
            .with_context(|| format!("无法解析子问题映射 JSON: {stripped}"))?;

        Ok(mapping)
    }
}
