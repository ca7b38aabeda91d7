/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的问题数量（也是每批的大小）
    pub parallel_requests: usize,
    /// 常规检索返回的段落数量
    pub top_n_retrieval: usize,
    /// 检索服务内部重排序的候选数量
    pub llm_reranking_sample_size: usize,
    /// 检索时是否返回父级整页
    pub return_parent_pages: bool,
    /// 是否使用全文档模式（不做相关度检索，直接取全部页面）
    pub full_context: bool,
    /// 是否启用严格引用模式（校验页码引用并附加证据引用）
    pub strict_references: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub answering_model: String,
    // --- 检索服务配置 ---
    pub retrieval_api_base_url: String,
    // --- 输入输出 ---
    /// 问题清单 JSON 文件
    pub questions_file: String,
    /// 公司子集 JSON 文件
    pub subset_file: String,
    /// 输出文件路径（调试产物写到 <stem>_debug.json）
    pub output_path: String,
    /// 是否额外生成提交文件
    pub submission_file: bool,
    pub team_email: String,
    pub submission_name: String,
    pub pipeline_details: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel_requests: 10,
            top_n_retrieval: 10,
            llm_reranking_sample_size: 20,
            return_parent_pages: false,
            full_context: false,
            strict_references: true,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            answering_model: "gpt-4o-2024-08-06".to_string(),
            retrieval_api_base_url: "http://127.0.0.1:8040".to_string(),
            questions_file: "questions.json".to_string(),
            subset_file: "subset.json".to_string(),
            output_path: "questions_with_answers.json".to_string(),
            submission_file: false,
            team_email: String::new(),
            submission_name: String::new(),
            pipeline_details: String::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            parallel_requests: std::env::var("PARALLEL_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.parallel_requests),
            top_n_retrieval: std::env::var("TOP_N_RETRIEVAL").ok().and_then(|v| v.parse().ok()).unwrap_or(default.top_n_retrieval),
            llm_reranking_sample_size: std::env::var("LLM_RERANKING_SAMPLE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_reranking_sample_size),
            return_parent_pages: std::env::var("RETURN_PARENT_PAGES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.return_parent_pages),
            full_context: std::env::var("FULL_CONTEXT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.full_context),
            strict_references: std::env::var("STRICT_REFERENCES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.strict_references),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            answering_model: std::env::var("ANSWERING_MODEL").unwrap_or(default.answering_model),
            retrieval_api_base_url: std::env::var("RETRIEVAL_API_BASE_URL").unwrap_or(default.retrieval_api_base_url),
            questions_file: std::env::var("QUESTIONS_FILE").unwrap_or(default.questions_file),
            subset_file: std::env::var("SUBSET_FILE").unwrap_or(default.subset_file),
            output_path: std::env::var("OUTPUT_PATH").unwrap_or(default.output_path),
            submission_file: std::env::var("SUBMISSION_FILE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submission_file),
            team_email: std::env::var("TEAM_EMAIL").unwrap_or(default.team_email),
            submission_name: std::env::var("SUBMISSION_NAME").unwrap_or(default.submission_name),
            pipeline_details: std::env::var("PIPELINE_DETAILS").unwrap_or(default.pipeline_details),
        }
    }
}
