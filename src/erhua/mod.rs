//! 儿化（Erhua）转换层
//!
//! 将儿化音节的基础 IPA 转写改写为儿化后的 IPA 转写。
//!
//! ## 组成
//! - types: 音素序列、规则结构、占位符常量
//! - rules: 有序儿化规则表
//! - engine: 裁剪 + 后缀查找 + 片段拼接

mod engine;
mod rules;
mod types;

pub use engine::{apply_erhua, expand_rhotic_placeholder, render_phones, ErhuaEngine};
pub use rules::{ERHUA_RULES, RULE_TABLE_VERSION};
pub use types::{ErhuaRule, PhoneSequence, RHOTIC_OFFGLIDE, RHOTIC_PLACEHOLDER};
