//! 语料处理器
//!
//! 每种数据集格式一个处理器，统一产出 [`Utterance`] 序列。
//! 处理器按数据集目录名在注册表中查找，未注册的名称可回退到通用处理器。

mod aishell3;
mod biaobei;
mod general;
pub mod text;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use aishell3::Aishell3Processor;
pub use biaobei::BiaobeiProcessor;
pub use general::GeneralProcessor;
pub(crate) use general::sorted_subdirectories;

/// 一条语料（一个音频对应的转写）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// (拼音音节, 汉字) 对
    pub words: Vec<(String, String)>,
    /// 语句 ID（不含扩展名）
    pub id: String,
    /// 相对数据集根目录的音频所在目录
    pub wav_path: PathBuf,
    /// 说话人
    pub speaker: String,
}

impl Utterance {
    /// 由对齐好的拼音与汉字构造
    ///
    /// 数量不一致时记录警告并返回 None，调用方跳过该语句
    pub fn from_parts(
        id: impl Into<String>,
        pinyin: Vec<String>,
        hanzi: Vec<String>,
        wav_path: impl Into<PathBuf>,
        speaker: impl Into<String>,
    ) -> Option<Self> {
        let id = id.into();
        if pinyin.len() != hanzi.len() {
            tracing::warn!(
                "语句 {} 拼音与汉字数量不一致 ({} vs {})，已跳过: {:?} / {:?}",
                id,
                pinyin.len(),
                hanzi.len(),
                pinyin,
                hanzi
            );
            return None;
        }

        Some(Self {
            words: pinyin.into_iter().zip(hanzi).collect(),
            id,
            wav_path: wav_path.into(),
            speaker: speaker.into(),
        })
    }

    /// 拼音音节
    pub fn syllables(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|(syllable, _)| syllable.as_str())
    }

    /// 汉字
    pub fn hanzi(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|(_, hanzi)| hanzi.as_str())
    }
}

/// 数据集处理器
pub trait DatasetProcessor {
    /// 注册名（与数据集目录名对应）
    fn name(&self) -> &str;

    /// 读取数据集，返回全部有效语句
    fn process(&self, dataset_path: &Path, remove_tone: bool) -> Result<Vec<Utterance>>;
}

/// 处理器注册表
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn DatasetProcessor>>,
    /// 未注册名称时回退使用的处理器名
    fallback: Option<String>,
}

impl ProcessorRegistry {
    /// 创建空注册表（无回退）
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            fallback: None,
        }
    }

    /// 内置处理器：aishell3、biaobei、general（回退到 general）
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Aishell3Processor));
        registry.register(Box::new(BiaobeiProcessor));
        registry.register(Box::new(GeneralProcessor));
        registry.set_fallback(Some(GeneralProcessor::NAME.to_string()));
        registry
    }

    /// 注册处理器（同名覆盖）
    pub fn register(&mut self, processor: Box<dyn DatasetProcessor>) {
        self.processors.retain(|p| p.name() != processor.name());
        self.processors.push(processor);
    }

    /// 设置回退处理器，None 表示不回退
    pub fn set_fallback(&mut self, fallback: Option<String>) {
        self.fallback = fallback;
    }

    fn get(&self, name: &str) -> Option<&dyn DatasetProcessor> {
        self.processors
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// 按数据集名解析处理器
    pub fn resolve(&self, dataset_name: &str) -> Option<&dyn DatasetProcessor> {
        if let Some(processor) = self.get(dataset_name) {
            return Some(processor);
        }
        let fallback = self.fallback.as_deref()?;
        tracing::debug!("数据集 {} 无专用处理器，使用 {}", dataset_name, fallback);
        self.get(fallback)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
