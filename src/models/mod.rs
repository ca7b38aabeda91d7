pub mod answer;
pub mod loaders;
pub mod question;

pub use answer::{Answer, AnswerDetail, DetailRef, EvidenceRef, ProcessedResult, RetrievedPassage};
pub use loaders::{load_entity_subset, load_questions};
pub use question::{EntityRecord, Question};

/// "无答案"哨兵值
///
/// 答题服务在材料中找不到答案时返回该值，视为成功结果而非错误。
pub const NOT_AVAILABLE: &str = "N/A";
