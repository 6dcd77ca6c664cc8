//! 通用处理器
//!
//! 目录结构：`<dataset>/<speaker>/<id>.hanzi`，可选同名 `.pinyin`。
//! 缺少 `.pinyin` 时用汉字转拼音后端生成，并写回磁盘供下次复用。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::corpus::text::{process_hanzi, process_pinyin, process_text};
use crate::corpus::{DatasetProcessor, Utterance};

const HANZI_EXT: &str = "hanzi";
const PINYIN_EXT: &str = "pinyin";

/// 通用处理器
pub struct GeneralProcessor;

impl GeneralProcessor {
    pub const NAME: &'static str = "general";

    /// 读取 `.pinyin`，不存在时生成并写回
    fn load_or_generate_pinyin(hanzi_path: &Path, chinese_text: &str) -> Result<String> {
        let pinyin_path = hanzi_path.with_extension(PINYIN_EXT);
        if pinyin_path.exists() {
            return std::fs::read_to_string(&pinyin_path)
                .with_context(|| format!("读取 {} 失败", pinyin_path.display()));
        }

        let pinyin = hanzi_to_pinyin(chinese_text)?;
        std::fs::write(&pinyin_path, &pinyin)
            .with_context(|| format!("写入 {} 失败", pinyin_path.display()))?;
        tracing::debug!("已生成拼音: {:?}", pinyin_path);
        Ok(pinyin)
    }

    fn process_speaker(
        speaker_dir: &Path,
        speaker: &str,
        remove_tone: bool,
    ) -> Result<Vec<Utterance>> {
        let mut utterances = Vec::new();

        for hanzi_path in sorted_files_with_extension(speaker_dir, HANZI_EXT)? {
            let chinese_text = std::fs::read_to_string(&hanzi_path)
                .with_context(|| format!("读取 {} 失败", hanzi_path.display()))?;
            let chinese_text = chinese_text.trim();
            let pinyin_text = Self::load_or_generate_pinyin(&hanzi_path, chinese_text)?;

            let hanzi = process_hanzi(&process_text(chinese_text));
            let pinyin = process_pinyin(&pinyin_text, &hanzi, remove_tone);

            let id = hanzi_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();

            utterances.extend(Utterance::from_parts(id, pinyin, hanzi, speaker, speaker));
        }

        Ok(utterances)
    }
}

impl DatasetProcessor for GeneralProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, dataset_path: &Path, remove_tone: bool) -> Result<Vec<Utterance>> {
        let mut utterances = Vec::new();

        for speaker_dir in sorted_subdirectories(dataset_path)? {
            let speaker = speaker_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let before = utterances.len();
            utterances.extend(Self::process_speaker(&speaker_dir, &speaker, remove_tone)?);
            tracing::info!("说话人 {}: {} 条语句", speaker, utterances.len() - before);
        }

        Ok(utterances)
    }
}

/// 列出目录下的子目录（按名称排序）
pub(crate) fn sorted_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("读取目录 {} 失败", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn sorted_files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("读取目录 {} 失败", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == ext))
        .collect();
    files.sort();
    Ok(files)
}

/// 汉字转带数字声调的拼音（空格分隔），轻声标 5
#[cfg(feature = "hanzi-g2p")]
fn hanzi_to_pinyin(text: &str) -> Result<String> {
    use pinyin::ToPinyin;

    let mut syllables = Vec::new();
    for ch in text.chars() {
        if let Some(pinyin) = ch.to_pinyin() {
            let syllable = pinyin.with_tone_num_end();
            if crate::syllable::split_tone(syllable).1.is_some() {
                syllables.push(syllable.to_string());
            } else {
                syllables.push(format!("{}5", syllable));
            }
        }
    }
    Ok(syllables.join(" "))
}

#[cfg(not(feature = "hanzi-g2p"))]
fn hanzi_to_pinyin(_text: &str) -> Result<String> {
    anyhow::bail!("缺少 .pinyin 文件且未启用 hanzi-g2p 特性，无法从汉字生成拼音")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_process_with_existing_pinyin() {
        let dir = tempfile::tempdir().unwrap();
        let speaker = dir.path().join("spk01");
        write(&speaker.join("a.hanzi"), "小孩儿，玩。\n");
        write(&speaker.join("a.pinyin"), "xiao3 hai2 er5 wan2");
        write(&speaker.join("b.hanzi"), "你好");
        write(&speaker.join("b.pinyin"), "ni3");
        // 非目录条目被忽略
        write(&dir.path().join("README"), "");

        let utterances = GeneralProcessor.process(dir.path(), true).unwrap();
        assert_eq!(utterances.len(), 1);
        let utterance = &utterances[0];
        assert_eq!(utterance.id, "a");
        assert_eq!(utterance.speaker, "spk01");
        assert_eq!(utterance.wav_path, PathBuf::from("spk01"));
        assert_eq!(
            utterance.syllables().collect::<Vec<_>>(),
            vec!["xiao", "hair", "wan"]
        );
    }

    #[cfg(feature = "hanzi-g2p")]
    #[test]
    fn test_missing_pinyin_is_generated() {
        let dir = tempfile::tempdir().unwrap();
        let speaker = dir.path().join("spk01");
        write(&speaker.join("a.hanzi"), "你好");

        let utterances = GeneralProcessor.process(dir.path(), false).unwrap();
        assert_eq!(
            utterances[0].syllables().collect::<Vec<_>>(),
            vec!["ni3", "hao3"]
        );
        let written = std::fs::read_to_string(speaker.join("a.pinyin")).unwrap();
        assert_eq!(written, "ni3 hao3");
    }

    #[cfg(not(feature = "hanzi-g2p"))]
    #[test]
    fn test_missing_pinyin_without_backend_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("spk01").join("a.hanzi"), "你好");
        assert!(GeneralProcessor.process(dir.path(), false).is_err());
    }
}
