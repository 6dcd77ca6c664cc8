//! 拼音 → IPA 转换（表驱动）
//!
//! 声母表 + 韵母表，处理 y/w 拼写、iu/ui/un 缩写、j/q/x 后的 ü、
//! 舌尖元音以及自成音节的鼻音。

use crate::erhua::PhoneSequence;
use crate::phonetic::PhoneticConverter;
use crate::syllable::strip_tone;

/// 声母表（双字母声母在前）
const INITIALS: &[(&str, &str)] = &[
    ("zh", "ʈʂ"),
    ("ch", "ʈʂʰ"),
    ("sh", "ʂ"),
    ("b", "p"),
    ("p", "pʰ"),
    ("m", "m"),
    ("f", "f"),
    ("d", "t"),
    ("t", "tʰ"),
    ("n", "n"),
    ("l", "l"),
    ("g", "k"),
    ("k", "kʰ"),
    ("h", "x"),
    ("j", "tɕ"),
    ("q", "tɕʰ"),
    ("x", "ɕ"),
    ("r", "ʐ"),
    ("z", "ts"),
    ("c", "tsʰ"),
    ("s", "s"),
];

/// 韵母表（已展开 y/w 拼写与缩写）
const FINALS: &[(&str, &[&str])] = &[
    ("a", &["a"]),
    ("ai", &["ai̯"]),
    ("ao", &["au̯"]),
    ("an", &["a", "n"]),
    ("ang", &["ɑ", "ŋ"]),
    ("o", &["o"]),
    ("ou", &["ou̯"]),
    ("ong", &["ʊ", "ŋ"]),
    ("e", &["ɤ"]),
    ("ê", &["ɛ"]),
    ("ei", &["ei̯"]),
    ("en", &["ə", "n"]),
    ("eng", &["ɤ", "ŋ"]),
    ("er", &["ɚ"]),
    ("i", &["i"]),
    ("ia", &["j", "a"]),
    ("iao", &["j", "au̯"]),
    ("ie", &["j", "ɛ"]),
    ("io", &["j", "ɔ"]),
    ("iou", &["j", "ou̯"]),
    ("ian", &["j", "ɛ", "n"]),
    ("in", &["i", "n"]),
    ("iang", &["j", "ɑ", "ŋ"]),
    ("ing", &["i", "ŋ"]),
    ("iong", &["j", "ʊ", "ŋ"]),
    ("u", &["u"]),
    ("ua", &["w", "a"]),
    ("uo", &["w", "o"]),
    ("uai", &["w", "ai̯"]),
    ("uei", &["w", "ei̯"]),
    ("uan", &["w", "a", "n"]),
    ("uen", &["w", "ə", "n"]),
    ("uang", &["w", "ɑ", "ŋ"]),
    ("ueng", &["w", "ɤ", "ŋ"]),
    ("ü", &["y"]),
    ("üe", &["ɥ", "ɛ"]),
    ("üan", &["ɥ", "ɛ", "n"]),
    ("ün", &["y", "n"]),
];

/// 自成音节的鼻音与叹词
const SYLLABIC: &[(&str, &[&str])] = &[
    ("m", &["m̩"]),
    ("n", &["n̩"]),
    ("ng", &["ŋ̍"]),
    ("hm", &["h", "m̩"]),
    ("hng", &["h", "ŋ̍"]),
];

/// 内置拼音转 IPA 后端
#[derive(Debug, Clone, Copy, Default)]
pub struct PinyinIpaConverter;

impl PinyinIpaConverter {
    pub fn new() -> Self {
        Self
    }
}

impl PhoneticConverter for PinyinIpaConverter {
    fn name(&self) -> &str {
        "pinyin-ipa"
    }

    fn convert(&self, syllable: &str) -> Vec<PhoneSequence> {
        let normalized = normalize_spelling(strip_tone(syllable));
        if normalized.is_empty() {
            return Vec::new();
        }

        if let Some((_, symbols)) = SYLLABIC.iter().find(|(s, _)| *s == normalized) {
            return vec![to_sequence(symbols)];
        }

        let Some((initial, final_)) = split_syllable(&normalized) else {
            return Vec::new();
        };

        // 舌尖元音
        if final_ == "i" {
            match initial {
                "z" | "c" | "s" => return vec![with_initial(initial, &["ɹ̩"])],
                "zh" | "ch" | "sh" | "r" => return vec![with_initial(initial, &["ɻ̩"])],
                _ => {}
            }
        }

        // 唇音后的 o 带 w 介音
        if final_ == "o" {
            match initial {
                "b" | "p" | "m" | "f" => return vec![with_initial(initial, &["w", "o"])],
                // 叹词 o 有两种读法
                "" => return vec![to_sequence(&["o"]), to_sequence(&["w", "o"])],
                _ => {}
            }
        }

        match FINALS.iter().find(|(f, _)| *f == final_) {
            Some((_, symbols)) => vec![with_initial(initial, symbols)],
            None => {
                tracing::debug!("无法识别的拼音韵母: {} ({})", final_, syllable);
                Vec::new()
            }
        }
    }
}

/// 小写化并统一 ü 的写法（v / u: -> ü）
fn normalize_spelling(syllable: &str) -> String {
    syllable
        .trim()
        .to_lowercase()
        .replace("u:", "ü")
        .replace('v', "ü")
}

/// 拆分为 (声母, 展开后的韵母)
///
/// 零声母返回空字符串声母
fn split_syllable(syllable: &str) -> Option<(&'static str, String)> {
    if let Some(rest) = syllable.strip_prefix('y') {
        let final_ = if rest.starts_with('i') {
            rest.to_string()
        } else if let Some(tail) = rest.strip_prefix('u') {
            format!("ü{}", tail)
        } else {
            format!("i{}", rest)
        };
        return Some(("", final_));
    }

    if let Some(rest) = syllable.strip_prefix('w') {
        let final_ = if rest.starts_with('u') {
            rest.to_string()
        } else {
            format!("u{}", rest)
        };
        return Some(("", final_));
    }

    let (initial, rest) = match INITIALS.iter().find(|(i, _)| syllable.starts_with(i)) {
        Some((initial, _)) => (*initial, &syllable[initial.len()..]),
        None => ("", syllable),
    };

    if rest.is_empty() {
        return None;
    }

    let mut final_ = rest.to_string();

    // j q x 后的 u 实为 ü
    if matches!(initial, "j" | "q" | "x") {
        if let Some(tail) = final_.strip_prefix('u') {
            final_ = format!("ü{}", tail);
        }
    }

    if !initial.is_empty() {
        final_ = match final_.as_str() {
            "iu" => "iou".to_string(),
            "ui" => "uei".to_string(),
            "un" => "uen".to_string(),
            _ => final_,
        };
    }

    Some((initial, final_))
}

fn initial_ipa(initial: &str) -> Option<&'static str> {
    INITIALS
        .iter()
        .find(|(i, _)| *i == initial)
        .map(|(_, ipa)| *ipa)
}

fn with_initial(initial: &str, symbols: &[&str]) -> PhoneSequence {
    let mut sequence = PhoneSequence::with_capacity(symbols.len() + 1);
    if let Some(ipa) = initial_ipa(initial) {
        sequence.push(ipa.to_string());
    }
    sequence.extend(symbols.iter().map(|s| s.to_string()));
    sequence
}

fn to_sequence(symbols: &[&str]) -> PhoneSequence {
    symbols.iter().map(|s| s.to_string()).collect()
}
