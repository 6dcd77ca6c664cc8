// TextGrid 标注层补充
//
// MFA 对齐结果只有 words / phones 两层，这里按语料补出
// hanzis（汉字）和 pinyins（拼音）两层，原地覆盖写回：
//   hanzis, pinyins, phones

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::corpus::Utterance;
use crate::textgrid::{Interval, TextGrid, Tier};

pub const WORDS_TIER: &str = "words";
pub const PHONES_TIER: &str = "phones";
pub const HANZIS_TIER: &str = "hanzis";
pub const PINYINS_TIER: &str = "pinyins";

const TEXTGRID_EXTENSION: &str = "TextGrid";

/// 单个数据集的补层结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// 成功改写的文件数
    pub patched: usize,
    /// 导致提前停止的原因
    pub stopped: Option<String>,
}

pub fn textgrid_path(dataset_path: &Path, utterance: &Utterance) -> PathBuf {
    dataset_path
        .join(&utterance.wav_path)
        .join(format!("{}.{}", utterance.id, TEXTGRID_EXTENSION))
}

/// 由 words 层的非空区间生成新层，文本依次取自 `texts`
fn derived_tier<'a>(
    name: &str,
    words: &Tier,
    texts: impl Iterator<Item = &'a str>,
) -> Tier {
    let mut tier = Tier::interval_tier(name, words.xmin, words.xmax);
    for (interval, text) in words.annotated_intervals().zip(texts) {
        tier.push_interval(Interval {
            xmin: interval.xmin,
            xmax: interval.xmax,
            text: text.to_string(),
        });
    }
    tier
}

/// 补出 hanzis / pinyins 层
///
/// 缺少 words 或 phones 层视为已处理过，返回错误
pub fn patch_textgrid(grid: &TextGrid, utterance: &Utterance) -> Result<TextGrid> {
    let (Some(words), Some(phones)) = (grid.tier(WORDS_TIER), grid.tier(PHONES_TIER)) else {
        anyhow::bail!("缺少 {} 或 {} 层，文件可能已处理过", WORDS_TIER, PHONES_TIER);
    };

    let annotated = words.annotated_intervals().count();
    if annotated != utterance.words.len() {
        anyhow::bail!(
            "{} 层有 {} 个非空区间，语句 {} 有 {} 个词",
            WORDS_TIER,
            annotated,
            utterance.id,
            utterance.words.len()
        );
    }

    let mut patched = TextGrid::new(grid.xmin, grid.xmax);
    patched
        .tiers
        .push(derived_tier(HANZIS_TIER, words, utterance.hanzi()));
    patched
        .tiers
        .push(derived_tier(PINYINS_TIER, words, utterance.syllables()));
    patched.tiers.push(phones.clone());
    Ok(patched)
}

/// 改写数据集中全部语句的 TextGrid
///
/// 遇到缺失文件或改写失败时记录警告并停止该数据集
pub fn patch_dataset(dataset_path: &Path, utterances: &[Utterance]) -> PatchReport {
    let mut report = PatchReport::default();

    for utterance in utterances {
        let path = textgrid_path(dataset_path, utterance);
        if !path.exists() {
            let reason = format!("缺少 TextGrid 文件: {}", path.display());
            tracing::warn!("数据集 {} {}", dataset_path.display(), reason);
            report.stopped = Some(reason);
            break;
        }

        let result = TextGrid::read(&path)
            .and_then(|grid| patch_textgrid(&grid, utterance))
            .and_then(|patched| patched.write(&path));
        if let Err(e) = result {
            let reason = format!("{}: {:#}", path.display(), e);
            tracing::warn!("补充标注层失败，停止处理该数据集 {}", reason);
            report.stopped = Some(reason);
            break;
        }
        report.patched += 1;
    }

    tracing::info!("已改写 {} 个 TextGrid", report.patched);
    report
}
