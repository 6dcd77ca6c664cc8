// 对齐用 .lab 转写文件
//
// 每条语句写到 `<dataset>/<wav_path>/<id>.lab`，与音频同目录

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::LabelMode;
use crate::corpus::Utterance;

pub const LAB_EXTENSION: &str = "lab";

/// 语句的 .lab 文本
///
/// `add_spacing` 时每个字（音节）视作一个词，以单个空格分隔
pub fn label_text(utterance: &Utterance, mode: LabelMode, add_spacing: bool) -> String {
    let separator = if add_spacing { " " } else { "" };
    let units: Vec<&str> = match mode {
        LabelMode::Hanzi => utterance.hanzi().collect(),
        LabelMode::Pinyin => utterance.syllables().collect(),
    };
    units.join(separator)
}

pub fn label_path(dataset_path: &Path, utterance: &Utterance) -> PathBuf {
    dataset_path
        .join(&utterance.wav_path)
        .join(format!("{}.{}", utterance.id, LAB_EXTENSION))
}

/// 写出整个数据集的 .lab 文件，返回写入数量
pub fn write_labels(
    dataset_path: &Path,
    utterances: &[Utterance],
    mode: LabelMode,
    add_spacing: bool,
) -> Result<usize> {
    for utterance in utterances {
        let path = label_path(dataset_path, utterance);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("创建目录失败: {}", parent.display()))?;
        }
        std::fs::write(&path, label_text(utterance, mode, add_spacing))
            .with_context(|| format!("写入 {} 失败", path.display()))?;
    }

    tracing::info!("已写入 {} 个 .lab 文件", utterances.len());
    Ok(utterances.len())
}
