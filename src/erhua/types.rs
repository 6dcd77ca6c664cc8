//! 儿化类型定义

use crate::syllable::canonical_spelling;

/// 音素序列（每个元素是一个 IPA 符号，可能由多个字符组成，如 "ɑ̃"）
pub type PhoneSequence = Vec<String>;

/// 规则表内部使用的儿化占位符
///
/// 出现在替换片段的符号末尾（如 "ɐʳ"），表示"韵核 + 卷舌"，
/// 输出时展开为 [`RHOTIC_OFFGLIDE`]
pub const RHOTIC_PLACEHOLDER: char = 'ʳ';

/// 占位符展开后的文本：空格 + 卷舌近音
pub const RHOTIC_OFFGLIDE: &str = " ɻ";

/// 儿化时被吸收的鼻音韵尾（齿龈鼻音、软腭鼻音）
pub const NASAL_CODAS: [&str; 2] = ["n", "ŋ"];

/// 儿化规则
///
/// `suffix` 为规范拼写下的拼音后缀（含儿化 "r"，见 [`canonical_spelling`]），
/// `replacements` 为一个或多个可接受的替换片段，每个片段 1-2 个符号。
/// 以 `'` 开头的后缀只对零声母音节生效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErhuaRule {
    pub suffix: &'static str,
    pub replacements: &'static [&'static [&'static str]],
}

impl ErhuaRule {
    /// 规则是否适用于该儿化音节
    ///
    /// 后缀必须是音节规范拼写的后缀，音节本身等于后缀时不匹配
    pub fn matches(&self, syllable: &str) -> bool {
        self.matches_spelling(syllable, &canonical_spelling(syllable))
    }

    /// 同 [`matches`](Self::matches)，`spelling` 为已算好的规范拼写
    pub fn matches_spelling(&self, syllable: &str, spelling: &str) -> bool {
        spelling.ends_with(self.suffix) && syllable != self.suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_matches_proper_suffix_only() {
        let rule = ErhuaRule {
            suffix: "anr",
            replacements: &[&["ɐʳ"]],
        };
        assert!(rule.matches("dianr"));
        assert!(rule.matches("wanr"));
        assert!(!rule.matches("anr"));
        assert!(!rule.matches("dian"));
    }

    #[test]
    fn test_rule_matches_canonical_spelling() {
        let zero_initial = ErhuaRule {
            suffix: "'anr",
            replacements: &[&["a", "ɻ"]],
        };
        assert!(zero_initial.matches("anr"));
        assert!(!zero_initial.matches("wanr"));
        assert!(!zero_initial.matches("dianr"));

        let umlaut = ErhuaRule {
            suffix: "ür",
            replacements: &[&["ɚ"]],
        };
        assert!(umlaut.matches("lvr"));
        assert!(umlaut.matches("jur"));
        assert!(!umlaut.matches("gur"));
    }
}
