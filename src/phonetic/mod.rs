//! 音标转换后端
//!
//! 给定无声调拼音音节，返回零个或多个候选 IPA 音素序列。
//! 后端按名称在注册表中解析，未知名称视为致命配置错误。

mod pinyin_ipa;

use anyhow::Result;

use crate::erhua::PhoneSequence;

pub use pinyin_ipa::PinyinIpaConverter;

/// 默认后端名称
pub const DEFAULT_BACKEND: &str = "pinyin-ipa";

/// 音标转换器
pub trait PhoneticConverter {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// 转换无声调拼音音节，无法识别时返回空列表
    fn convert(&self, syllable: &str) -> Vec<PhoneSequence>;
}

/// 按名称创建转换器
pub fn converter_for(name: &str) -> Result<Box<dyn PhoneticConverter>> {
    match name {
        "pinyin-ipa" | "pinyin_to_ipa" => Ok(Box::new(PinyinIpaConverter::new())),
        other => anyhow::bail!("未知的音标转换后端: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_for_known_backend() {
        let converter = converter_for(DEFAULT_BACKEND).unwrap();
        assert_eq!(converter.name(), "pinyin-ipa");
        assert_eq!(converter.convert("ma"), vec![vec!["m".to_string(), "a".to_string()]]);
    }

    #[test]
    fn test_converter_for_unknown_backend() {
        assert!(converter_for("espeak").is_err());
    }
}
