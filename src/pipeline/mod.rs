// Pipeline 模块 - 按数据集执行子命令
//
// 数据集 → 处理器（注册表解析，可回退）→ 语句序列 → 子命令：
// - dictionary: 生成 `<dataset>_pinyin_dictionary.txt`
// - labels: 写出 .lab
// - patch: 为 TextGrid 补层
// - stats: 统计整个根目录下的对齐结果
//
// 找不到处理器的数据集跳过并记入汇总，其余数据集照常处理

mod types;

use std::path::Path;

use anyhow::{Context, Result};

use crate::annotation_patcher::patch_dataset;
use crate::config::PrepConfig;
use crate::corpus::{sorted_subdirectories, ProcessorRegistry};
use crate::dictionary_builder::{collect_syllables, DictionaryBuilder};
use crate::dictionary_utils::write_dataset_dictionary;
use crate::labels::write_labels;
use crate::phonetic::{converter_for, PhoneticConverter};
use crate::statistics::collect_stats;

pub use types::*;

/// 统计结果文件名
pub const STATS_FILE: &str = "alignment_stats.json";

pub struct PrepPipeline {
    config: PrepConfig,
    registry: ProcessorRegistry,
    converter: Box<dyn PhoneticConverter>,
}

impl PrepPipeline {
    /// 按配置创建，未知的音标后端直接报错
    pub fn new(config: PrepConfig) -> Result<Self> {
        Self::with_registry(config, ProcessorRegistry::with_builtin())
    }

    pub fn with_registry(config: PrepConfig, mut registry: ProcessorRegistry) -> Result<Self> {
        config.validate()?;
        let converter = converter_for(&config.phonetic_backend)?;
        registry.set_fallback(config.fallback_processor.clone());
        tracing::debug!(
            "音标后端: {}，回退处理器: {:?}",
            converter.name(),
            config.fallback_processor
        );
        Ok(Self {
            config,
            registry,
            converter,
        })
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// 要处理的数据集：配置中的名称，或根目录下全部子目录
    pub fn discover_datasets(&self) -> Result<Vec<String>> {
        if !self.config.datasets.is_empty() {
            return Ok(self.config.datasets.clone());
        }

        let root = &self.config.dataset_root;
        let names = sorted_subdirectories(root)
            .with_context(|| format!("无法列出数据集根目录 {}", root.display()))?
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        Ok(names)
    }

    pub fn run(&self, command: Command) -> Result<RunSummary> {
        let mut summary = RunSummary::new(command);

        if !command.is_per_dataset() {
            summary.stats = Some(self.run_stats()?);
            summary.log();
            return Ok(summary);
        }

        for dataset in self.discover_datasets()? {
            tracing::info!("处理数据集: {}", dataset);
            let outcome = self.run_dataset(command, &dataset)?;
            summary.datasets.push(DatasetReport { dataset, outcome });
        }

        summary.log();
        Ok(summary)
    }

    /// 处理单个数据集
    ///
    /// 找不到目录或处理器时返回 Skipped；语料解析与儿化错误向上传播
    pub fn run_dataset(&self, command: Command, dataset: &str) -> Result<DatasetOutcome> {
        let dataset_path = self.config.dataset_root.join(dataset);
        if !dataset_path.is_dir() {
            let reason = format!("数据集目录不存在: {}", dataset_path.display());
            tracing::warn!("{}", reason);
            return Ok(DatasetOutcome::skipped(reason));
        }

        let Some(processor) = self.registry.resolve(dataset) else {
            let reason = format!("没有找到数据集 {} 的处理器", dataset);
            tracing::warn!("{}", reason);
            return Ok(DatasetOutcome::skipped(reason));
        };

        let utterances = processor
            .process(&dataset_path, command.remove_tone(self.config.keep_tone))
            .with_context(|| format!("处理器 {} 读取数据集 {} 失败", processor.name(), dataset))?;
        tracing::info!("数据集 {}: {} 条有效语句", dataset, utterances.len());

        let outcome = match command {
            Command::Dictionary => {
                let syllables = collect_syllables(&utterances);
                let entries = DictionaryBuilder::new(self.converter.as_ref()).build(&syllables)?;
                let path = write_dataset_dictionary(&self.config.output_dir, dataset, &entries)?;
                DatasetOutcome::Completed {
                    utterances: utterances.len(),
                    written: entries.len(),
                    output: Some(path),
                    stopped: None,
                }
            }
            Command::Labels => {
                let written = write_labels(
                    &dataset_path,
                    &utterances,
                    self.config.label_mode,
                    self.config.add_spacing,
                )?;
                DatasetOutcome::Completed {
                    utterances: utterances.len(),
                    written,
                    output: None,
                    stopped: None,
                }
            }
            Command::Patch => {
                let report = patch_dataset(&dataset_path, &utterances);
                DatasetOutcome::Completed {
                    utterances: utterances.len(),
                    written: report.patched,
                    output: None,
                    stopped: report.stopped,
                }
            }
            Command::Stats => anyhow::bail!("stats 不按数据集执行"),
        };
        Ok(outcome)
    }

    fn run_stats(&self) -> Result<crate::statistics::AlignmentStats> {
        let stats = collect_stats(&self.config.dataset_root)?;
        let path = self.config.output_dir.join(STATS_FILE);
        write_json(&path, &stats.to_json()?)?;
        tracing::info!("统计结果已写入: {:?}", path);
        Ok(stats)
    }
}

fn write_json(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("写入 {} 失败", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary_utils::{dictionary_file_name, load_dictionary};
    use crate::textgrid::{Interval, TextGrid, Tier};
    use std::path::PathBuf;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// general 格式的数据集（已带 .pinyin，不依赖汉字转拼音）
    fn general_dataset(root: &Path, name: &str) -> PathBuf {
        let speaker = root.join(name).join("spk01");
        write(&speaker.join("a.hanzi"), "一点儿");
        write(&speaker.join("a.pinyin"), "yi4 dian3 er5");
        write(&speaker.join("b.hanzi"), "你好");
        write(&speaker.join("b.pinyin"), "ni3");
        speaker
    }

    fn config(root: &Path) -> PrepConfig {
        PrepConfig {
            dataset_root: root.join("datasets"),
            output_dir: root.join("out"),
            ..PrepConfig::default()
        }
    }

    #[test]
    fn test_dictionary_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        general_dataset(&config.dataset_root, "mine");

        let pipeline = PrepPipeline::new(config.clone()).unwrap();
        let summary = pipeline.run(Command::Dictionary).unwrap();
        assert_eq!(summary.completed(), 1);

        let path = config.output_dir.join(dictionary_file_name("mine"));
        let lines: Vec<String> = load_dictionary(&path)
            .unwrap()
            .iter()
            .map(|e| format!("{}\t{}", e.syllable, e.phones))
            .collect();
        // 数量不一致的 b 不贡献音节
        assert_eq!(lines, vec!["dianr\tt j ɐ ɻ", "yi\ti"]);
    }

    #[test]
    fn test_unknown_dataset_skipped_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.fallback_processor = None;
        general_dataset(&config.dataset_root, "general");
        general_dataset(&config.dataset_root, "mine");

        let summary = PrepPipeline::new(config).unwrap().run(Command::Dictionary).unwrap();
        assert_eq!(summary.datasets.len(), 2);
        assert!(summary.datasets[0].outcome.is_completed());
        assert_eq!(summary.datasets[1].dataset, "mine");
        assert!(matches!(
            summary.datasets[1].outcome,
            DatasetOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn test_missing_configured_dataset_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.datasets = vec!["absent".to_string()];
        std::fs::create_dir_all(&config.dataset_root).unwrap();

        let summary = PrepPipeline::new(config).unwrap().run(Command::Labels).unwrap();
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn test_unknown_backend_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.phonetic_backend = "espeak".to_string();
        assert!(PrepPipeline::new(config).is_err());
    }

    #[test]
    fn test_labels_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.label_mode = crate::config::LabelMode::Pinyin;
        config.keep_tone = true;
        let speaker = general_dataset(&config.dataset_root, "mine");

        let summary = PrepPipeline::new(config).unwrap().run(Command::Labels).unwrap();
        assert_eq!(summary.completed(), 1);
        assert_eq!(
            std::fs::read_to_string(speaker.join("a.lab")).unwrap(),
            "yi4 dianr3"
        );
        assert!(!speaker.join("b.lab").exists());
    }

    #[test]
    fn test_patch_then_stats_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let speaker = general_dataset(&config.dataset_root, "mine");

        let mut grid = TextGrid::new(0.0, 1.0);
        let mut words = Tier::interval_tier("words", 0.0, 1.0);
        let mut phones = Tier::interval_tier("phones", 0.0, 1.0);
        for (xmin, xmax, word) in [(0.0, 0.4, "yi4"), (0.4, 1.0, "dianr3")] {
            words.push_interval(Interval {
                xmin,
                xmax,
                text: word.to_string(),
            });
        }
        for (xmin, xmax, phone) in [(0.0, 0.4, "i˥˩"), (0.4, 0.6, "t"), (0.6, 1.0, "ɐ˨˩˦")] {
            phones.push_interval(Interval {
                xmin,
                xmax,
                text: phone.to_string(),
            });
        }
        grid.tiers.push(words);
        grid.tiers.push(phones);
        grid.write(&speaker.join("a.TextGrid")).unwrap();

        let pipeline = PrepPipeline::new(config.clone()).unwrap();
        let summary = pipeline.run(Command::Patch).unwrap();
        assert_eq!(
            summary.datasets[0].outcome,
            DatasetOutcome::Completed {
                utterances: 1,
                written: 1,
                output: None,
                stopped: None,
            }
        );

        let summary = pipeline.run(Command::Stats).unwrap();
        let stats = summary.stats.unwrap();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.erhua_words[0].phones, vec!["t", "ɐ˨˩˦"]);
        assert!(config.output_dir.join(STATS_FILE).exists());
    }
}
