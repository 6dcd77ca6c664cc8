// 配置文件
//
// JSON 格式，默认位于 `<config_dir>/MandarinMfaPrep/config.json`，
// 所有字段都有默认值，缺失的字段按默认值补齐

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::phonetic::DEFAULT_BACKEND;

const APP_DIR: &str = "MandarinMfaPrep";
const CONFIG_FILE: &str = "config.json";

/// .lab 文件内容使用的文字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    Hanzi,
    Pinyin,
}

impl std::str::FromStr for LabelMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hanzi" => Ok(Self::Hanzi),
            "pinyin" => Ok(Self::Pinyin),
            other => anyhow::bail!("未知的标注模式: {}（可选 hanzi / pinyin）", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// 数据集根目录，每个子目录是一个数据集
    #[serde(default = "default_dataset_root")]
    pub dataset_root: PathBuf,
    /// 要处理的数据集名，为空时处理根目录下全部子目录
    #[serde(default)]
    pub datasets: Vec<String>,
    /// 词典输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// 拼音转 IPA 后端
    #[serde(default = "default_phonetic_backend")]
    pub phonetic_backend: String,
    /// 未注册数据集回退使用的处理器，null 表示直接跳过
    #[serde(default = "default_fallback_processor")]
    pub fallback_processor: Option<String>,
    #[serde(default)]
    pub label_mode: LabelMode,
    /// 每个字之间加空格（每个字视作一个词）
    #[serde(default = "default_add_spacing")]
    pub add_spacing: bool,
    /// .lab 中的拼音保留声调
    #[serde(default)]
    pub keep_tone: bool,
}

fn default_dataset_root() -> PathBuf {
    PathBuf::from("dataset")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_phonetic_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

fn default_fallback_processor() -> Option<String> {
    Some(crate::corpus::GeneralProcessor::NAME.to_string())
}

fn default_add_spacing() -> bool {
    true
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            dataset_root: default_dataset_root(),
            datasets: Vec::new(),
            output_dir: default_output_dir(),
            phonetic_backend: default_phonetic_backend(),
            fallback_processor: default_fallback_processor(),
            label_mode: LabelMode::default(),
            add_spacing: default_add_spacing(),
            keep_tone: false,
        }
    }
}

impl PrepConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// 加载配置，返回 (配置, 文件是否存在)
    ///
    /// `path` 为空时使用默认位置；文件不存在时返回默认配置
    pub fn load(path: Option<&Path>) -> Result<(Self, bool)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        tracing::debug!("尝试从以下路径加载配置: {:?}", path);

        if !path.exists() {
            tracing::debug!("配置文件不存在，使用默认配置");
            return Ok((Self::default(), false));
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("读取配置失败: {}", path.display()))?;
        let config: PrepConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置失败: {}", path.display()))?;
        tracing::info!("已加载配置: {:?}", path);
        Ok((config, true))
    }

    /// 以格式化 JSON 保存（先写临时文件再替换）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("写入临时文件失败: {}", temp_path.display()))?;
        crate::dictionary_utils::replace_file(&temp_path, path)?;
        tracing::info!("保存配置到: {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.phonetic_backend.trim().is_empty() {
            anyhow::bail!("phonetic_backend 不能为空");
        }
        if self.fallback_processor.as_deref().is_some_and(|p| p.trim().is_empty()) {
            anyhow::bail!("fallback_processor 不能为空字符串，禁用回退请使用 null");
        }
        Ok(())
    }
}
