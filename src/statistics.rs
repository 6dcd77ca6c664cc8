//! 对齐结果统计
//!
//! 扫描补层后的 TextGrid，统计静音占比、音素集合与儿化词的对齐情况

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::annotation_patcher::{HANZIS_TIER, PHONES_TIER, PINYINS_TIER};
use crate::corpus::text::ER_CHAR;
use crate::textgrid::{Interval, TextGrid};

/// 静音 / 未知音素标记
const SILENCE_PHONES: [&str; 2] = ["sp", "spn"];

/// 调型符号 → 调号，长的在前
const TONE_CONTOURS: [(&str, &str); 4] = [("˨˩˦", "3"), ("˥˩", "4"), ("˧˥", "2"), ("˥", "1")];

/// 一个儿化词及其对齐到的音素
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErhuaOccurrence {
    pub file: PathBuf,
    pub hanzi: String,
    pub pinyin: String,
    pub phones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentStats {
    pub files: usize,
    pub silence_phones: usize,
    pub speech_phones: usize,
    pub silence_ratio: f64,
    pub phone_set: BTreeSet<String>,
    pub erhua_words: Vec<ErhuaOccurrence>,
}

impl AlignmentStats {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn add_grid(&mut self, file: &Path, grid: &TextGrid) -> Result<()> {
        let (Some(hanzis), Some(phones)) = (grid.tier(HANZIS_TIER), grid.tier(PHONES_TIER)) else {
            anyhow::bail!("缺少 {} 或 {} 层", HANZIS_TIER, PHONES_TIER);
        };
        let phones: Vec<&Interval> = phones.annotated_intervals().collect();

        for phone in &phones {
            let label = phone.text.trim();
            if SILENCE_PHONES.contains(&label) {
                self.silence_phones += 1;
            } else {
                self.speech_phones += 1;
            }
            self.phone_set.insert(contour_to_digit(label));
        }

        let mut pinyins = grid
            .tier(PINYINS_TIER)
            .map(|tier| tier.annotated_intervals().map(|i| i.text.clone()).collect())
            .unwrap_or_else(Vec::new)
            .into_iter();

        for word in hanzis.annotated_intervals() {
            let pinyin = pinyins.next().unwrap_or_default();
            if !word.text.contains(ER_CHAR) {
                continue;
            }
            let aligned = phones
                .iter()
                .filter(|p| p.xmin >= word.xmin && p.xmax <= word.xmax)
                .map(|p| p.text.clone())
                .collect();
            self.erhua_words.push(ErhuaOccurrence {
                file: file.to_path_buf(),
                hanzi: word.text.clone(),
                pinyin,
                phones: aligned,
            });
        }

        self.files += 1;
        Ok(())
    }

    fn finish(&mut self) {
        let total = self.silence_phones + self.speech_phones;
        self.silence_ratio = if total == 0 {
            0.0
        } else {
            self.silence_phones as f64 / total as f64
        };
    }
}

/// 调型符号替换为数字调号，如 `a˨˩˦` → `a3`
pub fn contour_to_digit(phone: &str) -> String {
    TONE_CONTOURS
        .iter()
        .fold(phone.to_string(), |acc, (contour, digit)| acc.replace(contour, digit))
}

/// 递归收集目录下的 .TextGrid 文件（按路径排序）
fn find_textgrids(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("读取目录 {} 失败", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            find_textgrids(&path, found)?;
        } else if path.extension().is_some_and(|e| e == "TextGrid") {
            found.push(path);
        }
    }
    Ok(())
}

/// 统计目录下全部已补层的 TextGrid，无法解析的文件记录警告后跳过
pub fn collect_stats(root: &Path) -> Result<AlignmentStats> {
    let mut files = Vec::new();
    find_textgrids(root, &mut files)?;
    files.sort();

    let mut stats = AlignmentStats::default();
    for file in &files {
        let result = TextGrid::read(file).and_then(|grid| stats.add_grid(file, &grid));
        if let Err(e) = result {
            tracing::warn!("跳过 {}: {:#}", file.display(), e);
        }
    }
    stats.finish();

    tracing::info!(
        "统计 {} 个 TextGrid，静音占比 {:.4}，音素 {} 种，儿化词 {} 个",
        stats.files,
        stats.silence_ratio,
        stats.phone_set.len(),
        stats.erhua_words.len()
    );
    Ok(stats)
}
