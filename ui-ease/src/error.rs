//! # Error 模块
//!
//! 定义 ui-ease 中使用的错误类型。
//!
//! 过渡运行期的操作（Show/Hide/SetValue 等）从不失败：越界值被限制、
//! NaN 被修正、不可运行的表面退化为立即设值。错误只出现在加载配置与
//! 构造过渡时。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 字段值无效
    #[error("配置字段 '{field}' 无效：{message}")]
    InvalidField { field: String, message: String },

    /// 读写文件失败
    #[error("配置文件 {path} 读写失败：{message}")]
    Io { path: String, message: String },

    /// 解析失败
    #[error("配置解析失败：{message}")]
    Parse { message: String },

    /// 序列化失败
    #[error("配置序列化失败：{message}")]
    Serialize { message: String },
}

/// ui-ease 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EaseError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 表面缺少过渡所需的能力
    #[error("表面不可用：{what}")]
    MissingSurface { what: String },
}

/// Result 类型别名
pub type EaseResult<T> = Result<T, EaseError>;
