//! 儿化规则表
//!
//! 有序列表，查找时取第一条匹配的规则。
//! 后缀按规范拼写书写（见 [`canonical_spelling`](crate::syllable::canonical_spelling)）：
//! j q x 后的 u 写作 ü，零声母音节以 `'` 开头。
//! 更具体（更长）的后缀必须排在它的泛化后缀之前，例如 "iongr" 在 "ongr" 之前、
//! "'our" 在 "our" 和 "ur" 之前，所有规则都在兜底规则 "r" 之前。
//!
//! 有声母的音节：裁剪后剩下声母（和介音），片段只含儿化韵核。
//! 零声母音节：裁剪后只剩韵核本身，片段以同一韵核开头，拼接时去重，
//! 效果是保留韵核、只追加儿化部分。

use crate::erhua::types::ErhuaRule;

/// 规则表版本（替换片段以此版本为准）
pub const RULE_TABLE_VERSION: &str = "1.0";

/// 儿化规则表（顺序有意义，不可改为哈希表）
pub const ERHUA_RULES: &[ErhuaRule] = &[
    // 后鼻音韵尾
    ErhuaRule {
        suffix: "iongr",
        replacements: &[&["ʊ̃ʳ"]],
    },
    ErhuaRule {
        suffix: "ongr",
        replacements: &[&["ʊ̃ʳ"]],
    },
    ErhuaRule {
        suffix: "'angr",
        replacements: &[&["ɑ", "ɻ"]],
    },
    ErhuaRule {
        suffix: "angr",
        replacements: &[&["ɑ̃ʳ"]],
    },
    ErhuaRule {
        suffix: "'ingr",
        replacements: &[&["i", "ɤ̃ʳ"]],
    },
    ErhuaRule {
        suffix: "ingr",
        replacements: &[&["ɤ̃ʳ"]],
    },
    ErhuaRule {
        suffix: "'engr",
        replacements: &[&["ɤ", "ɻ"]],
    },
    ErhuaRule {
        suffix: "engr",
        replacements: &[&["ɤ̃ʳ"]],
    },
    // 前鼻音韵尾
    ErhuaRule {
        suffix: "'ünr",
        replacements: &[&["y", "ɚ"]],
    },
    ErhuaRule {
        suffix: "ünr",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "unr",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "'inr",
        replacements: &[&["i", "ɚ"]],
    },
    ErhuaRule {
        suffix: "inr",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "'enr",
        replacements: &[&["ə", "ɻ"]],
    },
    ErhuaRule {
        suffix: "enr",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "'anr",
        replacements: &[&["a", "ɻ"]],
    },
    ErhuaRule {
        suffix: "anr",
        replacements: &[&["ɐʳ"]],
    },
    // 复韵母
    ErhuaRule {
        suffix: "iaor",
        replacements: &[&["ɑu̯ʳ"]],
    },
    ErhuaRule {
        suffix: "'aor",
        replacements: &[&["au̯", "ɻ"]],
    },
    ErhuaRule {
        suffix: "aor",
        replacements: &[&["ou̯˞"]],
    },
    ErhuaRule {
        suffix: "iur",
        replacements: &[&["ou̯ʳ"]],
    },
    ErhuaRule {
        suffix: "'our",
        replacements: &[&["ou̯", "ɻ"]],
    },
    ErhuaRule {
        suffix: "our",
        replacements: &[&["ou̯˞"]],
    },
    ErhuaRule {
        suffix: "uir",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "'eir",
        replacements: &[&["ei̯", "ɻ"]],
    },
    ErhuaRule {
        suffix: "eir",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "'air",
        replacements: &[&["ai̯", "ɻ"]],
    },
    ErhuaRule {
        suffix: "air",
        replacements: &[&["ɐʳ"]],
    },
    ErhuaRule {
        suffix: "ier",
        replacements: &[&["ɛʳ"]],
    },
    ErhuaRule {
        suffix: "üer",
        replacements: &[&["œʳ"]],
    },
    // 单韵母
    ErhuaRule {
        suffix: "er",
        replacements: &[&["ɤʳ"]],
    },
    ErhuaRule {
        suffix: "'or",
        replacements: &[&["o", "ɻ"]],
    },
    ErhuaRule {
        suffix: "or",
        replacements: &[&["ɔʳ"]],
    },
    ErhuaRule {
        suffix: "'ar",
        replacements: &[&["a", "ɻ"]],
    },
    ErhuaRule {
        suffix: "ar",
        replacements: &[&["ɐʳ"]],
    },
    ErhuaRule {
        suffix: "'ir",
        replacements: &[&["i", "ɚ"]],
    },
    ErhuaRule {
        suffix: "ir",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "jür",
        replacements: &[&["ɥɚ"]],
    },
    ErhuaRule {
        suffix: "qür",
        replacements: &[&["ɥɚ"]],
    },
    ErhuaRule {
        suffix: "xür",
        replacements: &[&["ɥɚ"]],
    },
    ErhuaRule {
        suffix: "'ür",
        replacements: &[&["y", "ɚ"]],
    },
    ErhuaRule {
        suffix: "ür",
        replacements: &[&["ɚ"]],
    },
    ErhuaRule {
        suffix: "'ur",
        replacements: &[&["u", "ɻ"]],
    },
    ErhuaRule {
        suffix: "ur",
        replacements: &[&["u˞"]],
    },
    // 自成音节的鼻音
    ErhuaRule {
        suffix: "mr",
        replacements: &[&["m̩ʳ"]],
    },
    ErhuaRule {
        suffix: "ngr",
        replacements: &[&["ŋ̍ʳ"]],
    },
    // 兜底
    ErhuaRule {
        suffix: "r",
        replacements: &[&["ɻ"]],
    },
];
