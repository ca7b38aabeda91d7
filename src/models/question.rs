//! 问题相关数据模型

use serde::{Deserialize, Serialize};

/// 输入问题
///
/// 来自问题清单 JSON 文件，加载后只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 问题文本
    pub text: String,
    /// 答案形态标签（"number" / "name" / "boolean" / "comparative" 等）
    pub kind: String,
}

/// 公司条目
///
/// 来自公司子集 JSON 文件，用于实体识别和 sha1 解析。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// 公司名称（问题文本中按此名称做精确匹配）
    pub company_name: String,
    /// 对应年报 PDF 的 sha1，作为稳定标识
    pub sha1: String,
}
