use anyhow::Result;
use rag_question_processor::config::Config;
use rag_question_processor::orchestrator::App;
use rag_question_processor::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
