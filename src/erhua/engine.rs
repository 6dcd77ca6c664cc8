//! 儿化转换引擎
//!
//! 输入儿化音节（如 "dianr"）及其基础音节的音素序列（如 dian 的 `t j ɛ n`），
//! 输出儿化后的一个或多个候选音素序列。
//!
//! ## 处理流程
//! 1. 去掉鼻音韵尾（n / ŋ）
//! 2. 序列仍多于一个符号时，再去掉韵核
//! 3. 按规则表顺序查找第一条匹配的后缀规则（后缀对照音节的规范拼写）
//! 4. 拼接替换片段（片段首符号与剩余序列末符号相同时去重）
//! 5. 同一音节内去除重复候选

use anyhow::Result;

use crate::erhua::rules::ERHUA_RULES;
use crate::erhua::types::{
    ErhuaRule, PhoneSequence, NASAL_CODAS, RHOTIC_OFFGLIDE, RHOTIC_PLACEHOLDER,
};
use crate::syllable::canonical_spelling;

/// 儿化引擎（持有有序规则表）
#[derive(Debug, Clone, Copy)]
pub struct ErhuaEngine {
    rules: &'static [ErhuaRule],
}

impl ErhuaEngine {
    /// 使用内置规则表创建引擎
    pub fn new() -> Self {
        Self::with_rules(ERHUA_RULES)
    }

    /// 使用指定规则表创建引擎
    pub fn with_rules(rules: &'static [ErhuaRule]) -> Self {
        Self { rules }
    }

    /// 查找第一条匹配的规则
    pub fn find_rule(&self, erhua_syllable: &str) -> Option<&'static ErhuaRule> {
        let spelling = canonical_spelling(erhua_syllable);
        self.rules
            .iter()
            .find(|rule| rule.matches_spelling(erhua_syllable, &spelling))
    }

    /// 对单个候选音素序列应用儿化
    ///
    /// 规则表覆盖所有以 "r" 结尾的音节，未匹配说明规则表不完整，返回错误（不可吞掉）
    pub fn apply(
        &self,
        erhua_syllable: &str,
        base_phones: &[String],
    ) -> Result<Vec<PhoneSequence>> {
        let trimmed = trim_base(base_phones);

        let rule = self.find_rule(erhua_syllable).ok_or_else(|| {
            anyhow::anyhow!("儿化规则表缺少匹配后缀: {}", erhua_syllable)
        })?;

        let mut candidates: Vec<PhoneSequence> = Vec::with_capacity(rule.replacements.len());
        for fragment in rule.replacements {
            let fragment = match (fragment.first(), trimmed.last()) {
                (Some(first), Some(last)) if *first == last.as_str() => &fragment[1..],
                _ => &fragment[..],
            };

            let mut candidate = trimmed.clone();
            candidate.extend(fragment.iter().map(|symbol| symbol.to_string()));

            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        tracing::debug!(
            "儿化 {} 命中规则 {:?}，候选 {:?}",
            erhua_syllable,
            rule.suffix,
            candidates
        );

        Ok(candidates)
    }
}

impl Default for ErhuaEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 使用内置规则表对单个候选应用儿化
pub fn apply_erhua(erhua_syllable: &str, base_phones: &[String]) -> Result<Vec<PhoneSequence>> {
    ErhuaEngine::new().apply(erhua_syllable, base_phones)
}

/// 去掉鼻音韵尾，再在多于一个符号时去掉韵核
fn trim_base(base_phones: &[String]) -> PhoneSequence {
    let mut trimmed = base_phones.to_vec();

    if trimmed
        .last()
        .is_some_and(|last| NASAL_CODAS.contains(&last.as_str()))
    {
        trimmed.pop();
    }

    if trimmed.len() > 1 {
        trimmed.pop();
    }

    trimmed
}

/// 展开儿化占位符（"ɐʳ" -> "ɐ ɻ"）
pub fn expand_rhotic_placeholder(text: &str) -> String {
    text.replace(RHOTIC_PLACEHOLDER, RHOTIC_OFFGLIDE)
}

/// 将音素序列转为词典中的文本形式：空格连接并展开占位符
pub fn render_phones(phones: &[String]) -> String {
    expand_rhotic_placeholder(&phones.join(" "))
}
