//! API 模块
//!
//! 面向调用方（HTTP 处理层）的评测接口：运行样例、运行隐藏用例

pub mod execute;

pub use execute::ExecutionApi;
