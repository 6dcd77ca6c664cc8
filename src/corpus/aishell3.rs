//! AISHELL-3 处理器
//!
//! `train/content.txt`、`test/content.txt`，每行 `<wav>\t汉 pin 汉 pin ...`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::corpus::text::process_pinyin;
use crate::corpus::{DatasetProcessor, Utterance};

lazy_static::lazy_static! {
    /// 繁体、日文及生僻字替换
    static ref REPLACE_HANZI: HashMap<&'static str, &'static str> = HashMap::from([
        ("聖", "圣"),
        ("龑", "䶮"),
        ("姍", "姗"),
        ("見", "见"),
        ("靂", "雳"),
        ("時", "时"),
        ("咘", "布"),
        ("芓", "字"),
        ("會", "会"),
        ("甯", "宁"),
        ("堺", "界"),
        ("沒", "没"),
        ("脹", "胀"),
        ("妳", "你"),
        ("愛", "爱"),
        ("後", "后"),
        ("峯", "峰"),
        ("給", "给"),
        ("龍", "龙"),
        ("魟", "𫚉"),
        ("扞", "捍"),
        ("們", "们"),
        ("鮑", "鲍"),
        ("堃", "坤"),
        ("來", "来"),
        ("渀", "奔"),
    ]);

    /// 原始标注有误的语句
    static ref MANUAL_FIXES: HashMap<&'static str, &'static str> = HashMap::from([
        (
            "SSB17450244.wav",
            "他 ta1 不 bu2 到 dao4 两 liang3 岁 sui4 的 de5 儿 er2 子 zi5 碰 peng4 触 chu4 车 che1 钥 yao4 匙 shi5",
        ),
        (
            "SSB09660370.wav",
            "偶 ou3 像 xiang4 喜 xi3 剧 ju4 电 dian4 视 shi4 剧 ju4 有 you3 什 shen2 么 me5",
        ),
    ]);
}

const SPLITS: [&str; 2] = ["train", "test"];
const CONTENT_FILE: &str = "content.txt";
/// wav 文件名末尾 8 个字符（4 位序号 + ".wav"）之前是说话人
const UTTERANCE_SUFFIX_LEN: usize = 8;

/// AISHELL-3 处理器
pub struct Aishell3Processor;

impl Aishell3Processor {
    pub const NAME: &'static str = "aishell3";

    fn parse_line(split: &str, line: &str, remove_tone: bool) -> Option<Utterance> {
        let Some((wav_filename, text)) = line.trim_end().split_once('\t') else {
            tracing::warn!("无法解析的 content 行: {:?}", line);
            return None;
        };
        let text = MANUAL_FIXES.get(wav_filename).copied().unwrap_or(text);

        let Some(speaker) = wav_filename
            .len()
            .checked_sub(UTTERANCE_SUFFIX_LEN)
            .and_then(|end| wav_filename.get(..end))
        else {
            tracing::warn!("wav 文件名过短: {}", wav_filename);
            return None;
        };
        let id = wav_filename.strip_suffix(".wav").unwrap_or(wav_filename);

        let tokens: Vec<&str> = text.split(' ').collect();
        let hanzi: Vec<String> = tokens
            .iter()
            .step_by(2)
            .map(|h| REPLACE_HANZI.get(h).copied().unwrap_or(*h).to_string())
            .collect();
        let pinyin: Vec<&str> = tokens.iter().skip(1).step_by(2).copied().collect();

        let pinyin = process_pinyin(&pinyin.join(" "), &hanzi, remove_tone);

        let wav_path: PathBuf = [split, "wav", speaker].iter().collect();
        Utterance::from_parts(id, pinyin, hanzi, wav_path, speaker)
    }
}

impl DatasetProcessor for Aishell3Processor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, dataset_path: &Path, remove_tone: bool) -> Result<Vec<Utterance>> {
        let mut utterances = Vec::new();
        let mut found_any = false;

        for split in SPLITS {
            let content_path = dataset_path.join(split).join(CONTENT_FILE);
            if !content_path.exists() {
                tracing::warn!("缺少 {:?}，跳过该划分", content_path);
                continue;
            }
            found_any = true;

            let content = std::fs::read_to_string(&content_path)
                .with_context(|| format!("读取 {} 失败", content_path.display()))?;
            utterances.extend(
                content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .filter_map(|line| Self::parse_line(split, line, remove_tone)),
            );
        }

        if !found_any {
            anyhow::bail!("{} 下没有 train/test 的 {}", dataset_path.display(), CONTENT_FILE);
        }

        Ok(utterances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_content(root: &Path, split: &str, content: &str) {
        let dir = root.join(split);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONTENT_FILE), content).unwrap();
    }

    #[test]
    fn test_parse_line() {
        let utterance = Aishell3Processor::parse_line(
            "train",
            "SSB00050001.wav\t广 guang3 州 zhou1 女 nv3 大 da4 学 xue2 生 sheng1",
            true,
        )
        .unwrap();
        assert_eq!(utterance.id, "SSB00050001");
        assert_eq!(utterance.speaker, "SSB0005");
        assert_eq!(utterance.wav_path, PathBuf::from("train/wav/SSB0005"));
        assert_eq!(
            utterance.syllables().collect::<Vec<_>>(),
            vec!["guang", "zhou", "nv", "da", "xue", "sheng"]
        );
    }

    #[test]
    fn test_replace_hanzi_and_keep_tone() {
        let utterance = Aishell3Processor::parse_line(
            "test",
            "SSB00050002.wav\t後 hou4 來 lai2",
            false,
        )
        .unwrap();
        assert_eq!(utterance.hanzi().collect::<Vec<_>>(), vec!["后", "来"]);
        assert_eq!(utterance.syllables().collect::<Vec<_>>(), vec!["hou4", "lai2"]);
    }

    #[test]
    fn test_manual_fix_applied() {
        let utterance =
            Aishell3Processor::parse_line("train", "SSB09660370.wav\t乱 luan4", true).unwrap();
        assert_eq!(utterance.words.len(), 10);
        assert_eq!(utterance.words[0], ("ou".to_string(), "偶".to_string()));
    }

    #[test]
    fn test_process_skips_mismatched_utterance() {
        let dir = tempfile::tempdir().unwrap();
        write_content(
            dir.path(),
            "train",
            "SSB00050001.wav\t你 ni3 好 hao3\n\
             SSB00050002.wav\t坏 huai4 掉 diao4 了\n\
             SSB00050003.wav\t花 hua1 儿 er5\n",
        );
        write_content(dir.path(), "test", "SSB00060001.wav\t好 hao3\n");

        let utterances = Aishell3Processor.process(dir.path(), true).unwrap();
        let ids: Vec<&str> = utterances.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["SSB00050001", "SSB00050003", "SSB00060001"]);
    }

    #[test]
    fn test_process_requires_content() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Aishell3Processor.process(dir.path(), true).is_err());
    }
}
