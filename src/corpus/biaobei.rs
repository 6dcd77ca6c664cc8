//! 标贝（BZNSYP）处理器
//!
//! `ProsodyLabeling/000001-010000.txt` 两行一组：
//! `<id>\t<带韵律标注的汉字>`，下一行为拼音

use std::path::Path;

use anyhow::{Context, Result};

use crate::corpus::text::{process_hanzi, process_pinyin, process_text};
use crate::corpus::{DatasetProcessor, Utterance};

const LABEL_FILE: [&str; 2] = ["ProsodyLabeling", "000001-010000.txt"];
const WAV_DIR: &str = "Wave";
const SPEAKER: &str = "0";

/// 原始拼音标注有误的句子
const MANUAL_FIX: (&str, &str) = (
    "这图#2难不成#2是#1Ｐ过的#4？",
    "zhe4 tu2 nan2 bu4 cheng2 shi4 pi1 guo4 de5",
);

/// 标贝处理器
pub struct BiaobeiProcessor;

impl BiaobeiProcessor {
    pub const NAME: &'static str = "biaobei";

    fn parse_pair(header: &str, pinyin_line: &str, remove_tone: bool) -> Option<Utterance> {
        let header = header.trim().trim_start_matches('\u{feff}');
        let Some((id, chinese_text)) = header.split_once('\t') else {
            tracing::warn!("无法解析的标注行: {:?}", header);
            return None;
        };

        let pinyin_text = if chinese_text == MANUAL_FIX.0 {
            MANUAL_FIX.1
        } else {
            pinyin_line.trim()
        };

        let hanzi = process_hanzi(&process_text(chinese_text));
        let pinyin = process_pinyin(pinyin_text, &hanzi, remove_tone);
        Utterance::from_parts(id, pinyin, hanzi, WAV_DIR, SPEAKER)
    }
}

impl DatasetProcessor for BiaobeiProcessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, dataset_path: &Path, remove_tone: bool) -> Result<Vec<Utterance>> {
        let label_path = LABEL_FILE
            .iter()
            .fold(dataset_path.to_path_buf(), |path, part| path.join(part));
        let content = std::fs::read_to_string(&label_path)
            .with_context(|| format!("读取 {} 失败", label_path.display()))?;

        let lines: Vec<&str> = content.lines().collect();
        Ok(lines
            .chunks_exact(2)
            .filter_map(|pair| Self::parse_pair(pair[0], pair[1], remove_tone))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        let utterance = BiaobeiProcessor::parse_pair(
            "000001\t卡尔普#2陪外孙#1玩滑梯#4。",
            "\tka2 er2 pu3 pei2 wai4 sun1 wan2 hua2 ti1",
            true,
        )
        .unwrap();
        assert_eq!(utterance.id, "000001");
        assert_eq!(utterance.speaker, "0");
        assert_eq!(utterance.words.len(), 9);
        assert_eq!(utterance.words[1], ("er".to_string(), "尔".to_string()));
    }

    #[test]
    fn test_parse_pair_erhua() {
        let utterance = BiaobeiProcessor::parse_pair(
            "000002\t玩#1一会儿#4。",
            "wan2 yi2 hui4 er5",
            true,
        )
        .unwrap();
        assert_eq!(
            utterance.words,
            vec![
                ("wan".to_string(), "玩".to_string()),
                ("yi".to_string(), "一".to_string()),
                ("huir".to_string(), "会儿".to_string()),
            ]
        );
    }

    #[test]
    fn test_manual_fix() {
        let utterance =
            BiaobeiProcessor::parse_pair("009999\t这图#2难不成#2是#1Ｐ过的#4？", "broken", true);
        // 全角 Ｐ 保留为一个字，与修正后的 pi1 对齐
        assert_eq!(utterance.map(|u| u.words.len()), Some(9));
    }

    #[test]
    fn test_process_file() {
        let dir = tempfile::tempdir().unwrap();
        let label_dir = dir.path().join("ProsodyLabeling");
        std::fs::create_dir_all(&label_dir).unwrap();
        std::fs::write(
            label_dir.join("000001-010000.txt"),
            "\u{feff}000001\t你好#4。\n\tni3 hao3\n000002\t不对#4\n\tbu2\n000003\t好#4\n\thao3\n",
        )
        .unwrap();

        let utterances = BiaobeiProcessor.process(dir.path(), true).unwrap();
        let ids: Vec<&str> = utterances.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["000001", "000003"]);
        assert_eq!(utterances[0].wav_path, std::path::PathBuf::from("Wave"));
    }
}
