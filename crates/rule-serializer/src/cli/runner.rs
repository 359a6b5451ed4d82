//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rule_model::Rule;
use rule_shared::config::CodecConfig;
use tracing::{debug, info, warn};

use crate::mapper::{RuleMapper, from_json_str, to_json_string};
use crate::wire::RuleSer;

/// 规则文档摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSummary {
    pub name: String,
    pub attributes: usize,
    pub facts: usize,
    pub predicate_nodes: usize,
    pub actions: usize,
}

impl RuleSummary {
    fn of(rule: &Rule) -> Self {
        Self {
            name: rule.name().to_string(),
            attributes: rule.attributes().len(),
            facts: rule.facts().len(),
            predicate_nodes: rule.predicate().node_count(),
            actions: rule.actions().len(),
        }
    }
}

/// 命令执行器
pub struct CommandRunner {
    mapper: RuleMapper,
    config: CodecConfig,
}

impl CommandRunner {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            mapper: RuleMapper::default(),
            config,
        }
    }

    /// 执行 check 命令
    pub fn run_check(&self, file: &Path) -> Result<RuleSummary> {
        let (wire, rule) = self.load(file)?;
        let canonical = self
            .mapper
            .to_wire(&rule)
            .with_context(|| format!("编码规则 '{}' 失败", rule.name()))?;
        if canonical != wire {
            warn!(file = %file.display(), "规则文档不是规整格式，可使用 normalize 命令规整");
        }

        let summary = RuleSummary::of(&rule);
        info!(
            rule_name = %summary.name,
            facts = summary.facts,
            actions = summary.actions,
            "规则文档校验通过"
        );
        Ok(summary)
    }

    /// 执行 normalize 命令，返回规整化后的 JSON 文本
    pub fn run_normalize(&self, file: &Path, output: Option<&Path>, compact: bool) -> Result<String> {
        let (_, rule) = self.load(file)?;
        let wire = self
            .mapper
            .to_wire(&rule)
            .with_context(|| format!("编码规则 '{}' 失败", rule.name()))?;

        let pretty = self.config.pretty && !compact;
        let text = to_json_string(&wire, pretty).context("序列化规则文档失败")?;

        if let Some(output) = output {
            fs::write(output, &text)
                .with_context(|| format!("写入 {} 失败", output.display()))?;
            info!(output = %output.display(), "规整化结果已写入");
        }

        Ok(text)
    }

    /// 读取并解码规则文档；开启往返校验时重新编码比对
    fn load(&self, file: &Path) -> Result<(RuleSer, Rule)> {
        let input = fs::read_to_string(file)
            .with_context(|| format!("读取 {} 失败", file.display()))?;
        let wire = from_json_str(&input)
            .with_context(|| format!("解析 {} 失败", file.display()))?;
        let rule = self
            .mapper
            .from_wire(&wire)
            .with_context(|| format!("解码 {} 失败", file.display()))?;

        if self.config.verify_round_trip {
            let encoded = self
                .mapper
                .to_wire(&rule)
                .with_context(|| format!("编码规则 '{}' 失败", rule.name()))?;
            let decoded = self.mapper.from_wire(&encoded)?;
            if decoded != rule {
                bail!("规则 '{}' 往返转换结果不一致", rule.name());
            }
            debug!(rule_name = %rule.name(), "往返校验通过");
        }

        Ok((wire, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const RULE_JSON: &str = r#"{
        "attribute": [
            {"name": "ruleName", "value": {"type": "String", "value": "limit-check"}},
            {"name": "limit", "value": {"type": "Long", "value": "100"}}
        ],
        "fact": [{"name": "order", "type": "Order"}],
        "predicate": {
            "operator": {
                "type": "less",
                "operand": [
                    {"field": {"ref": "order", "path": "amount", "type": "Long"}},
                    {"reference": {"ref": "limit"}}
                ]
            }
        },
        "action": [
            {"name": "notify", "returnType": "Void", "parameter": [
                {"name": "context", "reference": {"ref": "ctx"}}
            ]}
        ]
    }"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_check_summary() {
        let file = write_temp(RULE_JSON);
        let summary = CommandRunner::new(CodecConfig::default())
            .run_check(file.path())
            .unwrap();

        assert_eq!(
            summary,
            RuleSummary {
                name: "limit-check".to_string(),
                attributes: 2,
                facts: 1,
                predicate_nodes: 3,
                actions: 1,
            }
        );
    }

    #[test]
    fn test_check_reports_malformed_document() {
        let file = write_temp(r#"{"predicate": {}}"#);
        let result = CommandRunner::new(CodecConfig::default()).run_check(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_writes_output() {
        let input = write_temp(RULE_JSON);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("normalized.json");

        let text = CommandRunner::new(CodecConfig::default())
            .run_normalize(input.path(), Some(&output), true)
            .unwrap();

        assert!(!text.contains('\n'));
        assert_eq!(fs::read_to_string(&output).unwrap(), text);
        assert_eq!(
            from_json_str(&text).unwrap(),
            from_json_str(RULE_JSON).unwrap()
        );
    }
}
