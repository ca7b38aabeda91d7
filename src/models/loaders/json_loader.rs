//! 从 JSON 文件加载问题清单和公司子集

use crate::models::question::{EntityRecord, Question};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载问题清单
///
/// 文件格式：`[{"text": "...", "kind": "number"}, ...]`
pub async fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取问题文件: {}", path.display()))?;

    let questions: Vec<Question> = serde_json::from_str(&content)
        .with_context(|| format!("无法解析问题文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 个问题", questions.len());

    Ok(questions)
}

/// 从 JSON 文件加载公司子集
///
/// 文件格式：`[{"company_name": "...", "sha1": "..."}, ...]`
pub async fn load_entity_subset(path: &Path) -> Result<Vec<EntityRecord>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取公司子集文件: {}", path.display()))?;

    let records: Vec<EntityRecord> = serde_json::from_str(&content)
        .with_context(|| format!("无法解析公司子集文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 家公司", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rag_qp_loader_{}_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_questions() {
        let path = temp_file(
            "questions.json",
            r#"[{"text": "What was the revenue of \"Acme Inc\"?", "kind": "number"}]"#,
        );

        let questions = load_questions(&path).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].kind, "number");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_entity_subset() {
        let path = temp_file(
            "subset.json",
            r#"[{"company_name": "Acme Inc", "sha1": "abc123"}]"#,
        );

        let records = load_entity_subset(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sha1, "abc123");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_questions_missing_file() {
        let result = load_questions(Path::new("/nonexistent/questions.json")).await;
        assert!(result.is_err());
    }
}
