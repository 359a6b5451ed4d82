//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 规则编解码命令行工具
///
/// 读取 JSON 格式的规则文档，校验或规整化输出。
#[derive(Parser, Debug)]
#[command(name = "rule-codec")]
#[command(version, about = "规则在线格式编解码工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别，覆盖配置文件 (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 解码规则文档并输出摘要
    Check {
        /// 规则文档路径
        file: PathBuf,
    },

    /// 解码后重新编码，输出规整化的规则文档
    ///
    /// 默认写到标准输出。
    Normalize {
        /// 规则文档路径
        file: PathBuf,

        /// 输出文件路径
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 输出紧凑格式，覆盖 codec.pretty
        #[arg(long)]
        compact: bool,
    },
}
