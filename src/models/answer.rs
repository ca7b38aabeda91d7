//! 答案相关数据模型
//!
//! 页码约定：内部统一使用 1 起始页码，只在导出提交文件时转换为 0 起始。

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// 检索服务返回的单个段落
///
/// 列表顺序为相关度顺序，不是页码顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// 段落所在页码（1 起始）
    pub page: u32,
    /// 段落文本
    pub text: String,
}

/// 证据引用：答案指向某公司年报中某一页的指针
///
/// 只有经过引用校验的页码才会出现在这里。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// 公司年报 PDF 的 sha1（公司未解析时为空字符串）
    pub pdf_sha1: String,
    /// 页码（内部 1 起始）
    pub page_index: u32,
}

/// 答题服务返回的结构化答案
#[derive(Debug, Clone)]
pub struct Answer {
    /// 最终答案值（"N/A" 表示材料中没有答案，属于成功而非错误）
    pub final_value: Value,
    /// 逐步分析过程
    pub step_by_step_analysis: String,
    /// 推理摘要
    pub reasoning_summary: String,
    /// 答案声称引用的页码（校验前可能含幻觉页码）
    pub relevant_pages: Vec<u32>,
    /// 校验后的证据引用
    pub references: Vec<EvidenceRef>,
    /// 答题服务的原始响应元数据（模型、用量等）
    pub raw_response: Value,
}

/// 指向答案详情台账中某一条记录的引用
///
/// 序列化为 `{"$ref": "#/answer_details/<index>"}`，与调试产物中
/// `answer_details` 数组的下标一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRef(usize);

impl DetailRef {
    const PREFIX: &'static str = "#/answer_details/";

    pub fn new(index: usize) -> Self {
        DetailRef(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// JSON Pointer 形式的字符串表示
    pub fn as_pointer(&self) -> String {
        format!("{}{}", Self::PREFIX, self.0)
    }

    /// 从字符串表示解析引用
    ///
    /// 格式不合法时返回 `None`，绝不 panic。
    pub fn parse(pointer: &str) -> Option<Self> {
        let index = pointer.strip_prefix(Self::PREFIX)?.parse().ok()?;
        Some(DetailRef(index))
    }
}

impl Serialize for DetailRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("DetailRef", 1)?;
        s.serialize_field("$ref", &self.as_pointer())?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for DetailRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            #[serde(rename = "$ref")]
            pointer: String,
        }
        let repr = Repr::deserialize(deserializer)?;
        DetailRef::parse(&repr.pointer)
            .ok_or_else(|| D::Error::custom(format!("非法的详情引用: {}", repr.pointer)))
    }
}

/// 单个问题的答案详情记录
///
/// 每个问题下标恰好写入一条，成功与失败两种形态；
/// `self` 字段是指回自身下标的引用字符串。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerDetail {
    Success {
        step_by_step_analysis: String,
        reasoning_summary: String,
        relevant_pages: Vec<u32>,
        response_data: Value,
        #[serde(rename = "self")]
        self_ref: String,
    },
    Error {
        error_traceback: String,
        #[serde(rename = "self")]
        self_ref: String,
    },
}

impl AnswerDetail {
    /// 由成功答案构造详情记录
    pub fn from_answer(answer: &Answer, detail_ref: DetailRef) -> Self {
        AnswerDetail::Success {
            step_by_step_analysis: answer.step_by_step_analysis.clone(),
            reasoning_summary: answer.reasoning_summary.clone(),
            relevant_pages: answer.relevant_pages.clone(),
            response_data: answer.raw_response.clone(),
            self_ref: detail_ref.as_pointer(),
        }
    }

    /// 由错误链构造详情记录
    pub fn from_error(traceback: String, detail_ref: DetailRef) -> Self {
        AnswerDetail::Error {
            error_traceback: traceback,
            self_ref: detail_ref.as_pointer(),
        }
    }

    /// 记录自身的引用字符串
    pub fn self_ref(&self) -> &str {
        match self {
            AnswerDetail::Success { self_ref, .. } | AnswerDetail::Error { self_ref, .. } => {
                self_ref
            }
        }
    }

    /// 成功记录的逐步分析文本
    pub fn step_by_step_analysis(&self) -> Option<&str> {
        match self {
            AnswerDetail::Success {
                step_by_step_analysis,
                ..
            } => Some(step_by_step_analysis),
            AnswerDetail::Error { .. } => None,
        }
    }
}

/// 单个问题的最终处理结果
///
/// 结果列表的顺序始终与输入问题顺序一致。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedResult {
    pub question_text: String,
    pub kind: String,
    /// 最终答案值；出错时为 null
    pub value: Value,
    pub references: Vec<EvidenceRef>,
    /// 出错时为 `"<错误类别>: <描述>"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub answer_details: DetailRef,
}

impl ProcessedResult {
    /// 答案是否为 "N/A" 哨兵值（有效的"无答案"回答，不是错误）
    pub fn is_not_available(&self) -> bool {
        self.value.as_str() == Some(crate::models::NOT_AVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_ref_pointer_round_trip() {
        let r = DetailRef::new(7);
        assert_eq!(r.as_pointer(), "#/answer_details/7");
        assert_eq!(DetailRef::parse("#/answer_details/7"), Some(r));
    }

    #[test]
    fn test_detail_ref_parse_rejects_malformed() {
        assert_eq!(DetailRef::parse(""), None);
        assert_eq!(DetailRef::parse("#/answer_details/"), None);
        assert_eq!(DetailRef::parse("#/answer_details/abc"), None);
        assert_eq!(DetailRef::parse("#/other/3"), None);
    }

    #[test]
    fn test_detail_ref_serializes_as_json_ref() {
        let v = serde_json::to_value(DetailRef::new(3)).unwrap();
        assert_eq!(v, json!({"$ref": "#/answer_details/3"}));
    }

    #[test]
    fn test_answer_detail_error_shape() {
        let detail = AnswerDetail::from_error("boom".to_string(), DetailRef::new(0));
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["error_traceback"], "boom");
        assert_eq!(v["self"], "#/answer_details/0");
        assert!(v.get("step_by_step_analysis").is_none());
    }

    #[test]
    fn test_processed_result_skips_absent_error() {
        let result = ProcessedResult {
            question_text: "test".to_string(),
            kind: "number".to_string(),
            value: json!(42),
            references: vec![],
            error: None,
            answer_details: DetailRef::new(0),
        };
        let v = serde_json::to_value(&result).unwrap();
        assert!(v.get("error").is_none());
        assert_eq!(v["answer_details"]["$ref"], "#/answer_details/0");
    }
}
