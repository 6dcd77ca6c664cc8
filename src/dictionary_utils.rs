// 发音词典工具函数
//
// 词典文件格式：UTF-8 纯文本，每行 `音节<TAB>音素1 音素2 ...`，
// 按音节、音素串字典序排列，无额外元数据

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 词典文件名后缀
pub const DICTIONARY_SUFFIX: &str = "_pinyin_dictionary.txt";

/// 词典条目
///
/// 字段顺序决定排序：先按音节，再按音素串
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// 无声调拼音音节
    pub syllable: String,
    /// 空格分隔的 IPA 音素串
    pub phones: String,
}

impl DictionaryEntry {
    pub fn new(syllable: impl Into<String>, phones: impl Into<String>) -> Self {
        Self {
            syllable: syllable.into(),
            phones: phones.into(),
        }
    }
}

/// 数据集对应的词典文件名
pub fn dictionary_file_name(dataset: &str) -> String {
    format!("{}{}", dataset, DICTIONARY_SUFFIX)
}

/// 格式化为词典行（不含换行）
pub fn format_entry(entry: &DictionaryEntry) -> String {
    format!("{}\t{}", entry.syllable, entry.phones)
}

/// 解析词典行
///
/// 空行或缺少制表符时返回 None
pub fn parse_entry(line: &str) -> Option<DictionaryEntry> {
    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
    let (syllable, phones) = line.split_once('\t')?;
    if syllable.is_empty() {
        return None;
    }
    Some(DictionaryEntry::new(syllable, phones))
}

/// 序列化全部条目（每条一行，以换行结尾）
pub fn render_dictionary(entries: &[DictionaryEntry]) -> String {
    let mut content = String::new();
    for entry in entries {
        content.push_str(&format_entry(entry));
        content.push('\n');
    }
    content
}

/// 读取词典文件
pub fn load_dictionary(path: &Path) -> Result<Vec<DictionaryEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取词典失败: {}", path.display()))?;
    Ok(content.lines().filter_map(parse_entry).collect())
}

/// 写入词典（完全覆盖）
///
/// 先写临时文件再重命名，避免中途失败留下半截文件
pub fn save_dictionary_atomic(path: &Path, entries: &[DictionaryEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let unique_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = path.with_extension(format!("tmp.{}", unique_suffix));

    {
        let mut tmp_file = std::fs::File::create(&tmp_path)?;
        use std::io::Write;
        tmp_file.write_all(render_dictionary(entries).as_bytes())?;
        tmp_file.sync_all()?;
    }

    if let Err(err) = replace_file(&tmp_path, path) {
        if let Err(cleanup_err) = std::fs::remove_file(&tmp_path) {
            tracing::warn!("替换词典失败后清理临时文件失败: {}", cleanup_err);
        }
        return Err(err);
    }

    Ok(())
}

/// 将词典写到输出目录，返回文件路径
pub fn write_dataset_dictionary(
    output_dir: &Path,
    dataset: &str,
    entries: &[DictionaryEntry],
) -> Result<PathBuf> {
    let path = output_dir.join(dictionary_file_name(dataset));
    save_dictionary_atomic(&path, entries)?;
    tracing::info!("已写入词典 {} 条: {:?}", entries.len(), path);
    Ok(path)
}

/// 用临时文件替换目标文件
pub(crate) fn replace_file(tmp_path: &Path, target_path: &Path) -> Result<()> {
    if target_path.exists() {
        std::fs::remove_file(target_path)?;
    }
    std::fs::rename(tmp_path, target_path)
        .with_context(|| format!("替换文件失败: {}", target_path.display()))?;
    Ok(())
}
