//! 用例处理上下文
//!
//! 封装"我正在评测哪个用例"这一信息，只用于日志

use std::fmt::Display;

/// 用例处理上下文
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseCtx {
    /// 隐藏用例下标（从0开始），样例为 None
    pub case_index: Option<usize>,
}

impl CaseCtx {
    /// 样例用例
    pub fn sample() -> Self {
        Self::default()
    }

    /// 第 `case_index` 个隐藏用例
    pub fn hidden(case_index: usize) -> Self {
        Self {
            case_index: Some(case_index),
        }
    }
}

impl Display for CaseCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.case_index {
            Some(index) => write!(f, "[隐藏用例 #{}]", index + 1),
            None => write!(f, "[样例]"),
        }
    }
}
