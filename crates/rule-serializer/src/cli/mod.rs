//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `check` - 解码规则文档并输出摘要
//! - `normalize` - 输出规整化的规则文档
//!
//! # 使用示例
//!
//! ```bash
//! # 校验规则文档
//! rule-codec check rule.json
//!
//! # 规整化并写入文件
//! rule-codec normalize rule.json --compact -o normalized.json
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::{CommandRunner, RuleSummary};
