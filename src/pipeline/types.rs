// Pipeline 核心类型定义
//
// - 子命令 (Command)
// - 单个数据集的处理结果 (DatasetOutcome / DatasetReport)
// - 整次运行的汇总 (RunSummary)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::statistics::AlignmentStats;

/// 子命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// 生成发音词典
    #[default]
    Dictionary,
    /// 写出 .lab 转写
    Labels,
    /// 为 TextGrid 补充 hanzis / pinyins 层
    Patch,
    /// 统计对齐结果
    Stats,
}

impl Command {
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::Dictionary => "dictionary",
            Command::Labels => "labels",
            Command::Patch => "patch",
            Command::Stats => "stats",
        }
    }

    /// 是否逐个数据集执行
    pub fn is_per_dataset(&self) -> bool {
        !matches!(self, Command::Stats)
    }

    /// 读取语料时是否去掉声调
    ///
    /// 词典按无声调音节建立；补层保留声调；.lab 由配置决定
    pub fn remove_tone(&self, keep_tone: bool) -> bool {
        match self {
            Command::Dictionary => true,
            Command::Labels => !keep_tone,
            Command::Patch | Command::Stats => false,
        }
    }
}

impl std::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "dictionary" => Ok(Command::Dictionary),
            "labels" => Ok(Command::Labels),
            "patch" => Ok(Command::Patch),
            "stats" => Ok(Command::Stats),
            other => anyhow::bail!("未知的子命令: {}", other),
        }
    }
}

/// 单个数据集的处理结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetOutcome {
    Completed {
        /// 有效语句数
        utterances: usize,
        /// 写出的条目 / 文件数
        written: usize,
        /// 输出文件（词典）
        output: Option<PathBuf>,
        /// 中途停止的原因（补层）
        stopped: Option<String>,
    },
    Skipped {
        reason: String,
    },
}

impl DatasetOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        DatasetOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DatasetOutcome::Completed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub dataset: String,
    pub outcome: DatasetOutcome,
}

/// 一次运行的汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub command: Command,
    pub datasets: Vec<DatasetReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<AlignmentStats>,
}

impl RunSummary {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            datasets: Vec::new(),
            stats: None,
        }
    }

    pub fn completed(&self) -> usize {
        self.datasets
            .iter()
            .filter(|report| report.outcome.is_completed())
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.datasets.len() - self.completed()
    }

    /// 记录汇总日志
    pub fn log(&self) {
        for report in &self.datasets {
            match &report.outcome {
                DatasetOutcome::Completed {
                    utterances,
                    written,
                    stopped,
                    ..
                } => {
                    tracing::info!(
                        "[{}] 完成: {} 条语句，写出 {}",
                        report.dataset,
                        utterances,
                        written
                    );
                    if let Some(reason) = stopped {
                        tracing::warn!("[{}] 提前停止: {}", report.dataset, reason);
                    }
                }
                DatasetOutcome::Skipped { reason } => {
                    tracing::warn!("[{}] 已跳过: {}", report.dataset, reason);
                }
            }
        }
        tracing::info!(
            "{} 结束：完成 {} 个数据集，跳过 {} 个",
            self.command.display_name(),
            self.completed(),
            self.skipped()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_str() {
        assert_eq!("patch".parse::<Command>().unwrap(), Command::Patch);
        assert!("align".parse::<Command>().is_err());
        assert_eq!(Command::default(), Command::Dictionary);
    }

    #[test]
    fn test_remove_tone() {
        assert!(Command::Dictionary.remove_tone(true));
        assert!(!Command::Patch.remove_tone(false));
        assert!(Command::Labels.remove_tone(false));
        assert!(!Command::Labels.remove_tone(true));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new(Command::Dictionary);
        summary.datasets.push(DatasetReport {
            dataset: "aishell3".to_string(),
            outcome: DatasetOutcome::Completed {
                utterances: 3,
                written: 5,
                output: None,
                stopped: None,
            },
        });
        summary.datasets.push(DatasetReport {
            dataset: "unknown".to_string(),
            outcome: DatasetOutcome::skipped("没有可用的处理器"),
        });
        assert_eq!(summary.completed(), 1);
        assert_eq!(summary.skipped(), 1);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"status\":\"skipped\""));
        assert!(!json.contains("\"stats\""));
    }
}
