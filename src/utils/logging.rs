use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info。
/// 重复调用不会 panic（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n评测运行日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(judge_base_url: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 远程评测模式");
    info!("🌐 评测机地址: {}", judge_base_url);
    info!("📊 最大并发题目数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_tasks_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待评测的题目", total);
    info!("📋 最多同时评测 {} 个题目\n", max_concurrent);
}

/// 记录单个题目开始
pub fn log_task_start(task_index: usize, title: &str, language: &str, hidden_cases: usize) {
    info!(
        "[题目 {}] 开始评测: {} ({}), 隐藏用例 {} 个",
        task_index,
        truncate_text(title, 40),
        language,
        hidden_cases
    );
}

/// 记录单个题目完成
pub fn log_task_complete(task_index: usize, sample_passed: bool, hidden_passed: usize, hidden_total: usize) {
    let mark = if sample_passed && hidden_passed == hidden_total {
        "✅"
    } else {
        "❌"
    };
    info!(
        "[题目 {}] {} 样例: {}, 隐藏用例: {}/{}",
        task_index,
        mark,
        if sample_passed { "通过" } else { "未通过" },
        hidden_passed,
        hidden_total
    );
}

/// 打印最终统计信息
///
/// # 参数
/// - `passed`: 全部通过的题目数
/// - `failed`: 有用例未通过的题目数
/// - `errored`: 评测失败（未得到判定）的题目数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(passed: usize, failed: usize, errored: usize, log_file_path: &str) {
    let total = passed + failed + errored;
    info!("\n{}", "=".repeat(60));
    info!("📊 全部评测完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 全部通过: {}/{}", passed, total);
    info!("❌ 未通过: {}", failed);
    info!("⚠️ 评测失败: {}", errored);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
