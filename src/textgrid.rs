// Praat TextGrid 读写
//
// 支持 long 格式（ooTextFile）的区间层与点层。
// 写出时区间层中的空隙用空文本区间补齐

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

/// 区间
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub xmin: f64,
    pub xmax: f64,
    pub text: String,
}

/// 点
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub time: f64,
    pub mark: String,
}

/// 层内容
#[derive(Debug, Clone, PartialEq)]
pub enum TierItems {
    Intervals(Vec<Interval>),
    Points(Vec<Point>),
}

/// 标注层
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    pub items: TierItems,
}

impl Tier {
    /// 创建空区间层
    pub fn interval_tier(name: impl Into<String>, xmin: f64, xmax: f64) -> Self {
        Self {
            name: name.into(),
            xmin,
            xmax,
            items: TierItems::Intervals(Vec::new()),
        }
    }

    /// 区间（点层返回空）
    pub fn intervals(&self) -> &[Interval] {
        match &self.items {
            TierItems::Intervals(intervals) => intervals,
            TierItems::Points(_) => &[],
        }
    }

    /// 文本非空的区间
    pub fn annotated_intervals(&self) -> impl Iterator<Item = &Interval> {
        self.intervals()
            .iter()
            .filter(|interval| !interval.text.trim().is_empty())
    }

    /// 添加区间（点层上调用无效果）
    pub fn push_interval(&mut self, interval: Interval) {
        if let TierItems::Intervals(intervals) = &mut self.items {
            intervals.push(interval);
        }
    }
}

/// TextGrid 文档
#[derive(Debug, Clone, PartialEq)]
pub struct TextGrid {
    pub xmin: f64,
    pub xmax: f64,
    pub tiers: Vec<Tier>,
}

impl TextGrid {
    pub fn new(xmin: f64, xmax: f64) -> Self {
        Self {
            xmin,
            xmax,
            tiers: Vec::new(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取 TextGrid 失败: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("解析 TextGrid 失败: {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_long_format())
            .with_context(|| format!("写入 TextGrid 失败: {}", path.display()))
    }

    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.name == name)
    }

    pub fn has_tier(&self, name: &str) -> bool {
        self.tier(name).is_some()
    }

    /// 解析 long 格式文本
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}');
        if !content.contains("ooTextFile") {
            anyhow::bail!("缺少 ooTextFile 文件头");
        }

        let mut grid = TextGrid::new(0.0, 0.0);
        let mut pending_xmin = 0.0;
        let mut pending_xmax = 0.0;
        let mut pending_time = 0.0;
        let mut in_items = false;

        for (key, value) in key_values(content)? {
            match key.as_str() {
                "class" => {
                    let value = unquote(&value);
                    let items = match value.as_str() {
                        "IntervalTier" => TierItems::Intervals(Vec::new()),
                        "TextTier" | "PointTier" => TierItems::Points(Vec::new()),
                        "TextGrid" => continue,
                        other => anyhow::bail!("不支持的层类型: {}", other),
                    };
                    grid.tiers.push(Tier {
                        name: String::new(),
                        xmin: 0.0,
                        xmax: 0.0,
                        items,
                    });
                    in_items = false;
                }
                "name" => {
                    if let Some(tier) = grid.tiers.last_mut() {
                        tier.name = unquote(&value);
                    }
                }
                "xmin" | "xmax" => {
                    let number = parse_number(&value)?;
                    match (grid.tiers.last_mut(), in_items) {
                        (None, _) if key == "xmin" => grid.xmin = number,
                        (None, _) => grid.xmax = number,
                        (Some(tier), false) if key == "xmin" => tier.xmin = number,
                        (Some(tier), false) => tier.xmax = number,
                        (Some(_), true) if key == "xmin" => pending_xmin = number,
                        (Some(_), true) => pending_xmax = number,
                    }
                }
                "intervals: size" | "points: size" => in_items = true,
                "text" => {
                    if let Some(tier) = grid.tiers.last_mut() {
                        tier.push_interval(Interval {
                            xmin: pending_xmin,
                            xmax: pending_xmax,
                            text: unquote(&value),
                        });
                    }
                }
                "number" | "time" => pending_time = parse_number(&value)?,
                "mark" => {
                    if let Some(Tier {
                        items: TierItems::Points(points),
                        ..
                    }) = grid.tiers.last_mut()
                    {
                        points.push(Point {
                            time: pending_time,
                            mark: unquote(&value),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(grid)
    }

    /// 序列化为 long 格式
    pub fn to_long_format(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "File type = \"ooTextFile\"");
        let _ = writeln!(out, "Object class = \"TextGrid\"");
        let _ = writeln!(out);
        let _ = writeln!(out, "xmin = {}", self.xmin);
        let _ = writeln!(out, "xmax = {}", self.xmax);
        let _ = writeln!(out, "tiers? <exists>");
        let _ = writeln!(out, "size = {}", self.tiers.len());
        let _ = writeln!(out, "item []:");

        for (i, tier) in self.tiers.iter().enumerate() {
            let _ = writeln!(out, "    item [{}]:", i + 1);
            let class = match tier.items {
                TierItems::Intervals(_) => "IntervalTier",
                TierItems::Points(_) => "TextTier",
            };
            let _ = writeln!(out, "        class = \"{}\"", class);
            let _ = writeln!(out, "        name = {}", quote(&tier.name));
            let _ = writeln!(out, "        xmin = {}", tier.xmin);
            let _ = writeln!(out, "        xmax = {}", tier.xmax);

            match &tier.items {
                TierItems::Intervals(intervals) => {
                    let filled = fill_gaps(intervals, tier.xmin, tier.xmax);
                    let _ = writeln!(out, "        intervals: size = {}", filled.len());
                    for (j, interval) in filled.iter().enumerate() {
                        let _ = writeln!(out, "        intervals [{}]:", j + 1);
                        let _ = writeln!(out, "            xmin = {}", interval.xmin);
                        let _ = writeln!(out, "            xmax = {}", interval.xmax);
                        let _ = writeln!(out, "            text = {}", quote(&interval.text));
                    }
                }
                TierItems::Points(points) => {
                    let _ = writeln!(out, "        points: size = {}", points.len());
                    for (j, point) in points.iter().enumerate() {
                        let _ = writeln!(out, "        points [{}]:", j + 1);
                        let _ = writeln!(out, "            number = {}", point.time);
                        let _ = writeln!(out, "            mark = {}", quote(&point.mark));
                    }
                }
            }
        }

        out
    }
}

/// 按时间排序并用空区间补齐空隙
fn fill_gaps(intervals: &[Interval], xmin: f64, xmax: f64) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));

    let mut filled = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut cursor = xmin;
    for interval in sorted {
        if interval.xmin > cursor {
            filled.push(Interval {
                xmin: cursor,
                xmax: interval.xmin,
                text: String::new(),
            });
        }
        cursor = interval.xmax;
        filled.push(interval);
    }
    if cursor < xmax {
        filled.push(Interval {
            xmin: cursor,
            xmax,
            text: String::new(),
        });
    }
    filled
}

/// 提取 `key = value` 对，支持跨行的引号字符串
fn key_values(content: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        let mut value = value.trim().to_string();

        if value.starts_with('"') {
            while !is_closed_string(&value) {
                let next = lines
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("字符串未闭合: {}", key))?;
                value.push('\n');
                value.push_str(next);
                value = value.trim_end().to_string();
            }
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}

/// 引号字符串是否已闭合（`""` 为转义的引号）
fn is_closed_string(value: &str) -> bool {
    let inner = &value[1..];
    let quotes = inner.chars().filter(|&c| c == '"').count();
    inner.ends_with('"') && quotes % 2 == 1
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    inner.replace("\"\"", "\"")
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn parse_number(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("无效的数值: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 1.5
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 1.5
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 0.2
            text = ""
        intervals [2]:
            xmin = 0.2
            xmax = 0.9
            text = "ni3"
        intervals [3]:
            xmin = 0.9
            xmax = 1.5
            text = "hao3"
    item [2]:
        class = "TextTier"
        name = "events"
        xmin = 0
        xmax = 1.5
        points: size = 1
        points [1]:
            number = 0.5
            mark = "say ""hi"""
"#;

    #[test]
    fn test_parse_long_format() {
        let grid = TextGrid::parse(SAMPLE).unwrap();
        assert_eq!(grid.xmax, 1.5);
        assert_eq!(grid.tiers.len(), 2);

        let words = grid.tier("words").unwrap();
        assert_eq!(words.intervals().len(), 3);
        assert_eq!(words.intervals()[1].text, "ni3");
        assert_eq!(words.intervals()[1].xmin, 0.2);
        assert_eq!(words.annotated_intervals().count(), 2);

        let events = grid.tier("events").unwrap();
        assert_eq!(
            events.items,
            TierItems::Points(vec![Point {
                time: 0.5,
                mark: "say \"hi\"".to_string()
            }])
        );
    }

    #[test]
    fn test_write_then_parse() {
        let grid = TextGrid::parse(SAMPLE).unwrap();
        let reparsed = TextGrid::parse(&grid.to_long_format()).unwrap();
        assert_eq!(reparsed, grid);
    }

    #[test]
    fn test_gaps_filled_on_write() {
        let mut grid = TextGrid::new(0.0, 2.0);
        let mut tier = Tier::interval_tier("hanzis", 0.0, 2.0);
        tier.push_interval(Interval {
            xmin: 0.5,
            xmax: 1.0,
            text: "你".to_string(),
        });
        grid.tiers.push(tier);

        let reparsed = TextGrid::parse(&grid.to_long_format()).unwrap();
        let texts: Vec<&str> = reparsed.tiers[0]
            .intervals()
            .iter()
            .map(|i| i.text.as_str())
            .collect();
        assert_eq!(texts, vec!["", "你", ""]);
    }

    #[test]
    fn test_multiline_text() {
        let content = SAMPLE.replace("text = \"hao3\"", "text = \"hao3\nline\"");
        let grid = TextGrid::parse(&content).unwrap();
        assert_eq!(grid.tier("words").unwrap().intervals()[2].text, "hao3\nline");
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(TextGrid::parse("not a textgrid").is_err());
    }
}
