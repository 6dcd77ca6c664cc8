// 发音词典构建
//
// 收集语料中的唯一音节 → 逐个转 IPA（儿化音节走儿化引擎）→ 去重排序

use std::collections::{BTreeSet, HashSet};

use anyhow::Result;

use crate::corpus::Utterance;
use crate::dictionary_utils::DictionaryEntry;
use crate::erhua::{render_phones, ErhuaEngine, PhoneSequence};
use crate::phonetic::PhoneticConverter;
use crate::syllable::{erhua_base, is_erhua, strip_tone};

/// "yo" 的通用转换结果 `w o` 有误，统一修正为 `j ɔ`
const YO_SYLLABLE: &str = "yo";
const YO_WRONG: [&str; 2] = ["w", "o"];
const YO_FIXED: [&str; 2] = ["j", "ɔ"];

/// 从语料收集唯一的无声调音节
pub fn collect_syllables<'a, I>(utterances: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a Utterance>,
{
    utterances
        .into_iter()
        .flat_map(|utterance| utterance.syllables())
        .map(|syllable| strip_tone(syllable).to_string())
        .filter(|syllable| !syllable.is_empty())
        .collect()
}

/// 词典构建器
pub struct DictionaryBuilder<'a> {
    converter: &'a dyn PhoneticConverter,
    erhua: ErhuaEngine,
}

impl<'a> DictionaryBuilder<'a> {
    pub fn new(converter: &'a dyn PhoneticConverter) -> Self {
        Self::with_engine(converter, ErhuaEngine::new())
    }

    pub fn with_engine(converter: &'a dyn PhoneticConverter, erhua: ErhuaEngine) -> Self {
        Self { converter, erhua }
    }

    /// 构建词典：去重并按 (音节, 音素串) 排序
    ///
    /// 儿化规则未命中属于内部错误，直接返回 Err
    pub fn build<I, S>(&self, syllables: I) -> Result<Vec<DictionaryEntry>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: HashSet<String> = syllables
            .into_iter()
            .map(|s| strip_tone(s.as_ref()).to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut entries = BTreeSet::new();
        for syllable in &unique {
            let pronunciations = self.pronunciations(syllable)?;
            if pronunciations.is_empty() {
                tracing::warn!("音节 {} 没有可用的 IPA 转写，已跳过", syllable);
                continue;
            }
            for phones in pronunciations {
                entries.insert(DictionaryEntry::new(syllable.as_str(), render_phones(&phones)));
            }
        }

        tracing::info!(
            "共 {} 个音节（儿化 {} 个），生成 {} 条词典条目",
            unique.len(),
            unique.iter().filter(|s| is_erhua(s)).count(),
            entries.len()
        );

        Ok(entries.into_iter().collect())
    }

    /// 单个音节的全部候选发音（占位符尚未展开）
    pub fn pronunciations(&self, syllable: &str) -> Result<Vec<PhoneSequence>> {
        if !is_erhua(syllable) {
            return Ok(self.base_candidates(syllable));
        }

        let mut result: Vec<PhoneSequence> = Vec::new();
        for base_phones in self.base_candidates(erhua_base(syllable)) {
            for candidate in self.erhua.apply(syllable, &base_phones)? {
                if !result.contains(&candidate) {
                    result.push(candidate);
                }
            }
        }
        Ok(result)
    }

    /// 调用转换后端，并修正 "yo"
    fn base_candidates(&self, syllable: &str) -> Vec<PhoneSequence> {
        let mut candidates = self.converter.convert(syllable);
        if syllable == YO_SYLLABLE {
            for phones in candidates.iter_mut() {
                if phones.iter().map(String::as_str).eq(YO_WRONG) {
                    *phones = YO_FIXED.iter().map(|s| s.to_string()).collect();
                }
            }
        }
        candidates
    }
}
