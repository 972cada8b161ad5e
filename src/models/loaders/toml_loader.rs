use crate::error::{AppResult, FileError};
use crate::models::task::PracticeTask;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 PracticeTask 对象
///
/// 如果题目通过 `code_file` 指定代码文件，会一并读入 `code`。
pub async fn load_toml_to_task(toml_file_path: &Path) -> AppResult<PracticeTask> {
    let path_display = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path_display.clone(),
            source,
        })?;

    let mut task: PracticeTask =
        toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: path_display.clone(),
            source,
        })?;

    if task.code.is_none() {
        if let Some(code_file) = &task.code_file {
            let code_path = toml_file_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(code_file);
            let code = fs::read_to_string(&code_path)
                .await
                .map_err(|source| FileError::ReadFailed {
                    path: code_path.display().to_string(),
                    source,
                })?;
            task.code = Some(code);
        }
    }

    // 设置文件路径
    task.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(task)
}

/// 从文件夹中加载所有 TOML 文件（按文件名排序），单个文件加载失败只记录警告
pub async fn load_all_toml_files(folder_path: &str) -> AppResult<Vec<PracticeTask>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: folder_path.to_string(),
            source,
        })?;

    let mut toml_files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| FileError::ReadFailed {
            path: folder_path.to_string(),
            source,
        })?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut tasks = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_task(&path).await {
            Ok(task) => {
                tracing::info!(
                    "成功加载题目 {}，隐藏用例 {} 个",
                    task.title,
                    task.hidden_test_cases.len()
                );
                tasks.push(task);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(tasks)
}
