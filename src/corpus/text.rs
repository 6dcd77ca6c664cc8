//! 语料文本预处理
//!
//! 汉字切分、儿化合并、拼音与汉字对齐

use unicode_normalization::UnicodeNormalization;

use crate::syllable::split_tone;

/// 需要丢弃的标点（ASCII 标点 + 常见中文标点）
const CJK_PUNCTUATION: &str = "。，、；：“”（）《》〈〉【】{}！？…—「」～•■『』·";

/// 儿化字
pub const ER_CHAR: char = '儿';

/// 与"儿"相邻但不构成儿化的字
const NON_ERHUA_PREFIXES: [char; 2] = ['虐', '二'];

fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() || CJK_PUNCTUATION.contains(ch)
}

/// 清洗汉字文本并拆成单字
///
/// - NFC 归一化
/// - 去掉韵律标注 `#1` `#2` ...
/// - 去掉标点与空白
pub fn process_text(text: &str) -> Vec<String> {
    let normalized: String = text.nfc().collect();

    let mut result = Vec::with_capacity(normalized.chars().count());
    let mut chars = normalized.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '#' && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                chars.next();
            }
            continue;
        }
        if is_punctuation(ch) || ch.is_whitespace() {
            continue;
        }
        result.push(ch.to_string());
    }
    result
}

/// 将"X儿"合并为一个单位（"虐儿"、"二儿"除外）
pub fn process_hanzi(chars: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let current = &chars[i];
        let merge = chars.get(i + 1).is_some_and(|next| next.starts_with(ER_CHAR))
            && !current
                .chars()
                .next()
                .is_some_and(|c| NON_ERHUA_PREFIXES.contains(&c));

        if merge {
            result.push(format!("{}{}", current, ER_CHAR));
            i += 2;
        } else {
            result.push(current.clone());
            i += 1;
        }
    }
    result
}

/// 对齐拼音与汉字，合并儿化音节
///
/// 当下一个拼音以 "er" 开头、对应汉字以"儿"结尾、当前拼音尚未儿化时，
/// 把 "dian3 er5" 合并为 "dianr3"（去声调时为 "dianr"）
pub fn process_pinyin(pinyin: &str, hanzi: &[String], remove_tone: bool) -> Vec<String> {
    let words: Vec<&str> = pinyin.split_whitespace().collect();
    let mut result = Vec::with_capacity(words.len());

    let mut i = 0;
    let mut hanzi_index = 0;
    while i < words.len() {
        let current = words[i];
        let next = words.get(i + 1).copied().unwrap_or("");
        let (base, tone) = split_tone(current);

        let append_er = next.starts_with("er")
            && hanzi
                .get(hanzi_index)
                .is_some_and(|h| h.ends_with(ER_CHAR));

        if append_er && !base.ends_with('r') {
            match tone {
                Some(tone) if !remove_tone => result.push(format!("{}r{}", base, tone)),
                _ => result.push(format!("{}r", base)),
            }
            i += 2;
        } else {
            result.push(if remove_tone { base } else { current }.to_string());
            i += 1;
        }
        hanzi_index += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<String> {
        text.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_process_text_strips_prosody_and_punctuation() {
        assert_eq!(
            process_text("卡尔普#2陪外孙#1玩滑梯#4。"),
            chars("卡尔普陪外孙玩滑梯")
        );
        assert_eq!(process_text("你好，世界！"), chars("你好世界"));
        assert_eq!(process_text("a b"), chars("ab"));
        // 非数字的 # 作为标点去掉
        assert_eq!(process_text("#好"), chars("好"));
    }

    #[test]
    fn test_process_hanzi_merges_er() {
        assert_eq!(
            process_hanzi(&chars("一点儿")),
            vec!["一", "点儿"]
        );
        assert_eq!(process_hanzi(&chars("二儿子")), vec!["二", "儿", "子"]);
        assert_eq!(process_hanzi(&chars("虐儿")), vec!["虐", "儿"]);
        assert_eq!(process_hanzi(&chars("儿子")), vec!["儿", "子"]);
    }

    #[test]
    fn test_process_pinyin_merges_erhua() {
        let hanzi = process_hanzi(&chars("一点儿"));
        assert_eq!(
            process_pinyin("yi4 dian3 er5", &hanzi, true),
            vec!["yi", "dianr"]
        );
        assert_eq!(
            process_pinyin("yi4 dian3 er5", &hanzi, false),
            vec!["yi4", "dianr3"]
        );
    }

    #[test]
    fn test_process_pinyin_keeps_lexical_er() {
        let hanzi = chars("儿子");
        assert_eq!(process_pinyin("er2 zi5", &hanzi, true), vec!["er", "zi"]);
    }

    #[test]
    fn test_process_pinyin_already_erhua() {
        // 已儿化的音节不再合并，导致与汉字数量不一致
        let hanzi = process_hanzi(&chars("点儿"));
        assert_eq!(
            process_pinyin("dianr3 er5", &hanzi, true),
            vec!["dianr", "er"]
        );
    }
}
