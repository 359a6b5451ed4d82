//! 规则序列化
//!
//! 内存规则模型与在线格式之间的双向映射：
//! - `wire`：与表达式树镜像的可序列化节点
//! - `ExpressionEncoder` / `ExpressionDecoder`：表达式节点编解码
//! - `RuleMapper`：规则级映射与 JSON 辅助函数
//! - `cli`：`rule-codec` 命令行工具

pub mod cli;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod mapper;
pub mod wire;

pub use decoder::{DecodeContext, ExpressionDecoder};
pub use encoder::ExpressionEncoder;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use mapper::{RuleMapper, from_json_str, to_json_string};
pub use wire::{
    AndSer, AttributeSer, BooleanSlot, CustomValueSer, ExpressionSer, FactSer, FieldSer,
    FunctionSer, LiteralSer, NotSer, OperatorSer, OrSer, ParameterSer, ParameterSlot, PredicateSer,
    ReferenceSer, RuleSer, ValueSer, ValuesSer,
};
