//! 日志工具模块
//!
//! 提供 tracing 初始化和各阶段的横幅输出

use crate::config::Config;
use crate::services::Statistics;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 默认 info 级别，可用 RUST_LOG 环境变量覆盖。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量问答处理模式");
    info!("📊 并发数: {}", config.parallel_requests);
    info!("🤖 答题模型: {}", config.answering_model);
    if config.full_context {
        info!("📖 检索模式: 全文档");
    } else {
        info!("📖 检索模式: top-{} 相关度", config.top_n_retrieval);
    }
    info!("{}", "=".repeat(60));
}

/// 记录问题加载信息
pub fn log_questions_loaded(total: usize, parallel: usize) {
    info!("✓ 共 {} 个待处理的问题", total);
    info!("📋 将以每批 {} 个的方式处理", parallel);
    info!("💡 每批完成后先落盘进度，再开始下一批\n");
}

/// 记录批次开始信息
pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批问题: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &Statistics, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success_count, stats.total_questions);
    info!("➖ N/A 答案: {}", stats.na_count);
    info!("❌ 错误: {}", stats.error_count);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_path);
}
