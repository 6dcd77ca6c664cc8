// 拼音音节工具函数
//
// 声调以结尾的 ASCII 数字 1-5 表示（如 dian4、de5）
// 儿化以结尾的 "r" 表示，"er" 本身是独立音节而非儿化

/// 判断音节是否为儿化音节
///
/// 规则：以 "r" 结尾且不等于 "er"
pub fn is_erhua(syllable: &str) -> bool {
    syllable.ends_with('r') && syllable != "er"
}

/// 拆分音节与声调
///
/// - "dian4" -> ("dian", Some(4))
/// - "dian" -> ("dian", None)
pub fn split_tone(syllable: &str) -> (&str, Option<u8>) {
    match syllable.as_bytes().last() {
        Some(&b) if (b'1'..=b'5').contains(&b) => {
            (&syllable[..syllable.len() - 1], Some(b - b'0'))
        }
        _ => (syllable, None),
    }
}

/// 去除声调数字
pub fn strip_tone(syllable: &str) -> &str {
    split_tone(syllable).0
}

/// 去掉儿化标记，得到基础音节（"dianr" -> "dian"）
///
/// 非儿化音节原样返回
pub fn erhua_base(syllable: &str) -> &str {
    if is_erhua(syllable) {
        &syllable[..syllable.len() - 1]
    } else {
        syllable
    }
}

/// 零声母标记（拼音隔音符号）
pub const ZERO_INITIAL_MARK: char = '\'';

/// 儿化规则查找用的规范拼写
///
/// - 小写，v / u: 写作 ü
/// - j q x 后的 u 还原为 ü（"jur" -> "jür"）
/// - 零声母音节去掉 y / w 拼写、还原韵母，并在前面加 `'`
///   （"yur" -> "'ür"，"wanr" -> "'uanr"，"anr" -> "'anr"）
///
/// iu / ui / un 等缩写保持原样
pub fn canonical_spelling(syllable: &str) -> String {
    let spelling = syllable
        .trim()
        .to_lowercase()
        .replace("u:", "ü")
        .replace('v', "ü");

    if let Some(rest) = spelling.strip_prefix('y') {
        let final_ = if rest.starts_with('i') {
            rest.to_string()
        } else if let Some(tail) = rest.strip_prefix('u') {
            format!("ü{}", tail)
        } else {
            format!("i{}", rest)
        };
        return format!("{}{}", ZERO_INITIAL_MARK, final_);
    }

    if let Some(rest) = spelling.strip_prefix('w') {
        let final_ = if rest.starts_with('u') {
            rest.to_string()
        } else {
            format!("u{}", rest)
        };
        return format!("{}{}", ZERO_INITIAL_MARK, final_);
    }

    if spelling.starts_with(|c: char| matches!(c, 'a' | 'e' | 'o' | 'i' | 'u' | 'ü' | 'ê')) {
        return format!("{}{}", ZERO_INITIAL_MARK, spelling);
    }

    for initial in ["j", "q", "x"] {
        if let Some(tail) = spelling
            .strip_prefix(initial)
            .and_then(|rest| rest.strip_prefix('u'))
        {
            return format!("{}ü{}", initial, tail);
        }
    }

    spelling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_erhua() {
        assert!(is_erhua("dianr"));
        assert!(is_erhua("huar"));
        assert!(!is_erhua("er"));
        assert!(!is_erhua("dian"));
        assert!(!is_erhua(""));
    }

    #[test]
    fn test_is_erhua_bare_r() {
        // 字面规则："r" 以 r 结尾且不等于 "er"
        assert!(is_erhua("r"));
    }

    #[test]
    fn test_split_tone() {
        assert_eq!(split_tone("dian4"), ("dian", Some(4)));
        assert_eq!(split_tone("de5"), ("de", Some(5)));
        assert_eq!(split_tone("dianr3"), ("dianr", Some(3)));
        assert_eq!(split_tone("dian"), ("dian", None));
        assert_eq!(split_tone("a0"), ("a0", None));
        assert_eq!(split_tone(""), ("", None));
    }

    #[test]
    fn test_erhua_base() {
        assert_eq!(erhua_base("dianr"), "dian");
        assert_eq!(erhua_base("er"), "er");
        assert_eq!(erhua_base("ma"), "ma");
    }

    #[test]
    fn test_canonical_spelling() {
        assert_eq!(canonical_spelling("dianr"), "dianr");
        assert_eq!(canonical_spelling("jur"), "jür");
        assert_eq!(canonical_spelling("quanr"), "qüanr");
        assert_eq!(canonical_spelling("lvr"), "lür");
        assert_eq!(canonical_spelling("nu:er"), "nüer");
        assert_eq!(canonical_spelling("Guir"), "guir");
    }

    #[test]
    fn test_canonical_spelling_zero_initial() {
        assert_eq!(canonical_spelling("anr"), "'anr");
        assert_eq!(canonical_spelling("yir"), "'ir");
        assert_eq!(canonical_spelling("yingr"), "'ingr");
        assert_eq!(canonical_spelling("yer"), "'ier");
        assert_eq!(canonical_spelling("your"), "'iour");
        assert_eq!(canonical_spelling("yur"), "'ür");
        assert_eq!(canonical_spelling("yuanr"), "'üanr");
        assert_eq!(canonical_spelling("wur"), "'ur");
        assert_eq!(canonical_spelling("wanr"), "'uanr");
        // 自成音节的鼻音不是零声母
        assert_eq!(canonical_spelling("ngr"), "ngr");
        assert_eq!(canonical_spelling("hmr"), "hmr");
    }
}
