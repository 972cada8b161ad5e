use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 评测机 API 配置 ---
    pub judge_api_base_url: String,
    pub judge_api_host: String,
    /// 为空时不发送 key 头
    pub judge_api_key: String,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 轮询配置 ---
    /// 两次轮询之间的间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 最大轮询次数
    pub max_poll_attempts: u32,
    /// 单个用例从提交到得出结果的截止时间（秒）
    pub evaluation_timeout_secs: u64,
    // --- 驱动程序配置 ---
    /// 同时处理的题目数量
    pub max_concurrent_tasks: usize,
    /// 题目 TOML 文件存放目录
    pub task_folder: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge_api_base_url: "https://judge0-ce.p.rapidapi.com".to_string(),
            judge_api_host: "judge0-ce.p.rapidapi.com".to_string(),
            judge_api_key: String::new(),
            request_timeout_secs: 15,
            poll_interval_ms: 2000,
            max_poll_attempts: 30,
            evaluation_timeout_secs: 120,
            max_concurrent_tasks: 4,
            task_folder: "tasks".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值回退到默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 使用自定义查找函数读取配置，无法解析的值回退到默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::read(&EnvReader {
            lookup,
            strict: false,
        })
        .unwrap_or_default()
    }

    /// 使用自定义查找函数读取配置，遇到无法解析的值直接报错
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::read(&EnvReader {
            lookup,
            strict: true,
        })
    }

    fn read<F>(env: &EnvReader<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Ok(Self {
            judge_api_base_url: env.string("JUDGE_API_BASE_URL").unwrap_or(default.judge_api_base_url),
            judge_api_host: env.string("JUDGE_API_HOST").unwrap_or(default.judge_api_host),
            judge_api_key: env.string("RAPIDAPI_KEY").unwrap_or(default.judge_api_key),
            request_timeout_secs: env
                .parsed("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            poll_interval_ms: env
                .parsed("POLL_INTERVAL_MS", "u64")?
                .unwrap_or(default.poll_interval_ms),
            max_poll_attempts: env
                .parsed("MAX_POLL_ATTEMPTS", "u32")?
                .unwrap_or(default.max_poll_attempts),
            evaluation_timeout_secs: env
                .parsed("EVALUATION_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.evaluation_timeout_secs),
            max_concurrent_tasks: env
                .parsed("MAX_CONCURRENT_TASKS", "usize")?
                .unwrap_or(default.max_concurrent_tasks),
            task_folder: env.string("TASK_FOLDER").unwrap_or(default.task_folder),
            output_log_file: env.string("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: env
                .parsed("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn evaluation_timeout(&self) -> Duration {
        Duration::from_secs(self.evaluation_timeout_secs)
    }
}

/// 环境变量读取器
///
/// `strict` 为 false 时，无法解析的值按缺失处理。
struct EnvReader<F> {
    lookup: F,
    strict: bool,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, var_name: &str) -> Option<String> {
        (self.lookup)(var_name)
    }

    fn parsed<T: FromStr>(&self, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
        let Some(value) = (self.lookup)(var_name) else {
            return Ok(None);
        };
        match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) if !self.strict => Ok(None),
            Err(_) => Err(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        }
    }
}
