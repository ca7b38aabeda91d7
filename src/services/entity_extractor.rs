//! 公司名称识别服务 - 业务能力层
//!
//! 只负责两件事：从问题文本中识别公司名称、把公司名称解析为 sha1。
//! 不出现 Vec<Question>，不关心流程顺序。

use crate::models::EntityRecord;
use regex::Regex;
use tracing::debug;

/// 公司名称识别服务
///
/// 识别规则（顺序敏感，不能改变）：
/// - 名称按长度从长到短依次尝试，防止短名称抢先匹配到长名称的子串
/// - 匹配不区分大小写，且要求名称后面紧跟非单词字符或行尾
/// - 每匹配到一个名称，就把匹配片段从工作文本中删除后再继续，
///   因此互相重叠的名称不会被重复计入
pub struct EntityExtractor {
    /// 已按名称长度降序排列
    records: Vec<EntityRecord>,
}

impl EntityExtractor {
    /// 创建识别服务，内部按名称长度降序排序
    pub fn new(mut records: Vec<EntityRecord>) -> Self {
        records.sort_by(|a, b| b.company_name.len().cmp(&a.company_name.len()));
        Self { records }
    }

    /// 从问题文本中识别公司名称
    ///
    /// 返回顺序为匹配顺序（即名称长度降序下的首次命中顺序）。
    pub fn extract(&self, question_text: &str) -> Vec<String> {
        let mut remaining = question_text.to_string();
        let mut found = Vec::new();

        for record in &self.records {
            let pattern = format!(r"(?i){}(?:\W|$)", regex::escape(&record.company_name));
            // 名称来自可信的子集文件，转义后一定是合法正则
            let Ok(re) = Regex::new(&pattern) else {
                continue;
            };

            if re.is_match(&remaining) {
                found.push(record.company_name.clone());
                remaining = re.replace_all(&remaining, "").into_owned();
            }
        }

        debug!("识别到 {} 家公司: {:?}", found.len(), found);

        found
    }

    /// 把公司名称解析为 sha1
    ///
    /// 未收录的公司返回空字符串（不视为错误）。
    pub fn resolve(&self, company_name: &str) -> String {
        self.records
            .iter()
            .find(|r| r.company_name == company_name)
            .map(|r| r.sha1.clone())
            .unwrap_or_default()
    }
}
