use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JudgeError;

/// 支持的编程语言
///
/// 枚举值即评测机的语言 ID，这张表必须与评测机保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C++ (GCC 7.4.0)
    Cpp = 54,
    /// Python (3.8.1)
    Python = 71,
    /// Java (OpenJDK 13.0.1)
    Java = 62,
    /// JavaScript (Node.js 12.14.0)
    Javascript = 63,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Cpp,
        Language::Python,
        Language::Java,
        Language::Javascript,
    ];

    /// 获取评测机语言 ID
    pub fn judge_id(self) -> u32 {
        self as u32
    }

    /// 获取请求中使用的语言标识
    pub fn key(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Java => "java",
            Language::Javascript => "javascript",
        }
    }

    /// 从评测机语言 ID 解析
    pub fn from_judge_id(id: u32) -> Option<Self> {
        match id {
            54 => Some(Language::Cpp),
            71 => Some(Language::Python),
            62 => Some(Language::Java),
            63 => Some(Language::Javascript),
            _ => None,
        }
    }
}

impl FromStr for Language {
    type Err = JudgeError;

    /// 只接受精确的小写标识
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpp" => Ok(Language::Cpp),
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "javascript" => Ok(Language::Javascript),
            other => Err(JudgeError::UnsupportedLanguage {
                language: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_ids_match_fixed_table() {
        assert_eq!(Language::Cpp.judge_id(), 54);
        assert_eq!(Language::Python.judge_id(), 71);
        assert_eq!(Language::Java.judge_id(), 62);
        assert_eq!(Language::Javascript.judge_id(), 63);
    }

    #[test]
    fn keys_parse_back_to_same_language() {
        for language in Language::ALL {
            assert_eq!(language.key().parse::<Language>().unwrap(), language);
            assert_eq!(Language::from_judge_id(language.judge_id()), Some(language));
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        for key in ["ruby", "", "Python", "c++", "js"] {
            match key.parse::<Language>() {
                Err(JudgeError::UnsupportedLanguage { language }) => assert_eq!(language, key),
                other => panic!("expected UnsupportedLanguage for {:?}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn serializes_as_lowercase_key() {
        let json = serde_json::to_string(&Language::Javascript).unwrap();
        assert_eq!(json, "\"javascript\"");
    }
}
