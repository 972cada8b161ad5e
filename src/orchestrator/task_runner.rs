//! 题目批量运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是命令行程序的入口，负责批量题目的评测和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化结果日志、创建评测接口（注入凭据）
//! 2. **批量加载**：扫描并加载所有题目（`Vec<PracticeTask>`）
//! 3. **并发控制**：使用 Semaphore 限制同时评测的题目数量
//! 4. **取消**：Ctrl-C 触发取消信号，停止所有轮询
//! 5. **全局统计**：汇总所有题目的评测结果

use crate::api::ExecutionApi;
use crate::config::Config;
use crate::models::{ApiError, PracticeTask, Verdict};
use crate::utils::logging::{
    init_log_file, log_startup, log_task_complete, log_task_start, log_tasks_loaded,
    print_final_stats,
};
use crate::utils::{CancelHandle, CancelSignal};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 单个题目的评测报告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub task_index: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Verdict>,
    pub hidden: Vec<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl TaskReport {
    fn new(task_index: usize, task: &PracticeTask) -> Self {
        Self {
            task_index,
            title: task.title.clone(),
            file_path: task.file_path.clone(),
            sample: None,
            hidden: Vec::new(),
            error: None,
        }
    }

    /// 样例和全部隐藏用例都通过
    pub fn all_passed(&self) -> bool {
        self.error.is_none()
            && self.sample.as_ref().map_or(false, |v| v.passed)
            && self.hidden.iter().all(|v| v.passed)
    }

    pub fn hidden_passed(&self) -> usize {
        self.hidden.iter().filter(|v| v.passed).count()
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    api: Arc<ExecutionApi>,
    cancel: CancelHandle,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化结果日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config.judge_api_base_url, config.max_concurrent_tasks);

        if config.judge_api_key.is_empty() {
            warn!("⚠️ 未配置 RAPIDAPI_KEY，请求将不带 API Key");
        }

        let api = ExecutionApi::new(&config).context("无法创建评测机客户端")?;

        Ok(Self {
            config,
            api: Arc::new(api),
            cancel: CancelHandle::new(),
        })
    }

    /// 取消句柄（用于外部触发取消）
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<Vec<TaskReport>> {
        // 加载所有题目
        info!("\n📁 正在扫描待评测的题目...");
        let tasks = crate::models::load_all_toml_files(&self.config.task_folder).await?;

        if tasks.is_empty() {
            warn!("⚠️ 没有找到待评测的TOML文件，程序结束");
            return Ok(Vec::new());
        }

        log_tasks_loaded(tasks.len(), self.config.max_concurrent_tasks);

        // Ctrl-C 触发取消
        let ctrl_c = tokio::spawn({
            let cancel = self.cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("⚠️ 收到中断信号，正在取消评测...");
                    cancel.cancel();
                }
            }
        });

        let reports = self.run_all_tasks(tasks).await;
        ctrl_c.abort();
        let reports = reports?;

        // 输出最终统计
        let passed = reports.iter().filter(|r| r.all_passed()).count();
        let errored = reports.iter().filter(|r| r.error.is_some()).count();
        let failed = reports.len() - passed - errored;
        print_final_stats(passed, failed, errored, &self.config.output_log_file);

        Ok(reports)
    }

    /// 并发评测所有题目
    async fn run_all_tasks(&self, tasks: Vec<PracticeTask>) -> Result<Vec<TaskReport>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_tasks.max(1)));
        let mut handles = Vec::with_capacity(tasks.len());

        for (idx, task) in tasks.into_iter().enumerate() {
            let task_index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let api = self.api.clone();
            let cancel = self.cancel.signal();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                run_task(&api, &task, task_index, &cancel).await
            });
            handles.push((task_index, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (task_index, handle) in handles {
            match handle.await {
                Ok(report) => {
                    self.append_report(&report);
                    reports.push(report);
                }
                Err(e) => {
                    error!("[题目 {}] 任务执行失败: {}", task_index, e);
                }
            }
        }

        Ok(reports)
    }

    /// 以 JSON 行追加评测报告
    fn append_report(&self, report: &TaskReport) {
        let line = match serde_json::to_string(report) {
            Ok(line) => line,
            Err(e) => {
                error!("[题目 {}] 报告序列化失败: {}", report.task_index, e);
                return;
            }
        };

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_log_file)
            .and_then(|mut file| writeln!(file, "{}", line));

        if let Err(e) = written {
            error!("写入结果文件失败 ({}): {}", self.config.output_log_file, e);
        }
    }
}

/// 评测单个题目：先样例，再隐藏用例
///
/// 样例评测失败（未得到判定）时不再运行隐藏用例。
pub async fn run_task(
    api: &ExecutionApi,
    task: &PracticeTask,
    task_index: usize,
    cancel: &CancelSignal,
) -> TaskReport {
    log_task_start(
        task_index,
        &task.title,
        &task.language,
        task.hidden_test_cases.len(),
    );

    let mut report = TaskReport::new(task_index, task);

    match api.execute(task.sample_request(), cancel).await {
        Ok(response) => report.sample = Some(response.data),
        Err(e) => {
            error!("[题目 {}] ❌ 样例评测失败: {}", task_index, e);
            report.error = Some(e);
            return report;
        }
    }

    if !task.hidden_test_cases.is_empty() {
        match api.run_hidden_tests(task.hidden_tests_request(), cancel).await {
            Ok(response) => report.hidden = response.data,
            Err(e) => {
                error!("[题目 {}] ❌ 隐藏用例评测失败: {}", task_index, e);
                report.error = Some(e);
                return report;
            }
        }
    }

    log_task_complete(
        task_index,
        report.sample.as_ref().map_or(false, |v| v.passed),
        report.hidden_passed(),
        report.hidden.len(),
    );

    report
}
