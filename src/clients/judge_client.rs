/// 评测机 API 客户端
///
/// 封装所有与远程评测机相关的调用逻辑
use crate::config::Config;
use crate::error::JudgeError;
use crate::models::{
    JudgeResult, Language, SubmissionCreated, SubmissionRequest, SubmissionToken,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const API_HOST_HEADER: &str = "x-rapidapi-host";
const API_KEY_HEADER: &str = "x-rapidapi-key";

/// 评测机客户端
///
/// 凭据在构造时注入，之后的每个请求都带上同样的请求头。
/// 内部的 `reqwest::Client` 自带连接池，clone 开销很小。
#[derive(Debug, Clone)]
pub struct JudgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl JudgeClient {
    /// 创建新的评测机客户端
    pub fn new(config: &Config) -> Result<Self, JudgeError> {
        let base_url = config.judge_api_base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        if !config.judge_api_host.is_empty() {
            match HeaderValue::from_str(&config.judge_api_host) {
                Ok(value) => {
                    headers.insert(API_HOST_HEADER, value);
                }
                Err(_) => warn!("评测机 Host 配置包含非法字符，已忽略"),
            }
        }
        if !config.judge_api_key.is_empty() {
            match HeaderValue::from_str(&config.judge_api_key) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(API_KEY_HEADER, value);
                }
                Err(_) => warn!("评测机 API Key 包含非法字符，已忽略"),
            }
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|source| JudgeError::Unavailable {
                endpoint: base_url.clone(),
                source,
            })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 提交代码
    ///
    /// # 参数
    /// - `language`: 语言标识（cpp / python / java / javascript）
    /// - `source_code`: 源代码
    /// - `stdin`: 标准输入
    ///
    /// # 返回
    /// 返回评测机分配的 token。语言不受支持时不会发出任何请求。
    pub async fn submit(
        &self,
        language: &str,
        source_code: &str,
        stdin: &str,
    ) -> Result<SubmissionToken, JudgeError> {
        let language: Language = language.parse()?;
        self.submit_request(&SubmissionRequest::new(language, source_code, stdin))
            .await
    }

    /// 提交已构建好的请求
    pub async fn submit_request(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionToken, JudgeError> {
        let endpoint = format!("{}/submissions", self.base_url);
        debug!(
            "提交代码: language_id={}, 代码长度 {} 字节, stdin 长度 {} 字节",
            request.language_id,
            request.source_code.len(),
            request.stdin.len()
        );

        let response = self
            .http
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| JudgeError::Unavailable {
                endpoint: endpoint.clone(),
                source,
            })?;

        let created: SubmissionCreated = read_json(&endpoint, response).await?;
        debug!("提交成功, token={}", created.token);

        Ok(created.token)
    }

    /// 查询提交状态
    pub async fn fetch_submission(
        &self,
        token: &SubmissionToken,
    ) -> Result<JudgeResult, JudgeError> {
        let endpoint = format!("{}/submissions/{}", self.base_url, token);

        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|source| JudgeError::Unavailable {
                endpoint: endpoint.clone(),
                source,
            })?;

        read_json(&endpoint, response).await
    }
}

/// 检查状态码并解析 JSON 响应
async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, JudgeError> {
    let status = response.status();
    if !status.is_success() {
        return Err(JudgeError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| JudgeError::InvalidResponse {
            endpoint: endpoint.to_string(),
            source,
        })
}
