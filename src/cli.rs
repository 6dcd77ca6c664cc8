//! 命令行参数
//!
//! `mandarin-mfa-prep [dictionary|labels|patch|stats] [options]`，
//! 命令行选项覆盖配置文件中的同名字段

use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{LabelMode, PrepConfig};
use crate::pipeline::Command;

pub const USAGE: &str = "Prepare Mandarin corpora for Montreal Forced Aligner.

Usage: mandarin-mfa-prep [command] [options]

Commands:

  dictionary  - Build <dataset>_pinyin_dictionary.txt for every dataset (default)
  labels      - Write a .lab transcript next to every utterance
  patch       - Add hanzis / pinyins tiers to aligned TextGrid files
  stats       - Summarise aligned TextGrid files as JSON

Options:

  -c, --config <path>        - Config file (default: <config dir>/MandarinMfaPrep/config.json)
  -r, --dataset-root <dir>   - Directory holding one sub-directory per dataset
  -o, --output-dir <dir>     - Where dictionaries and statistics are written
  -d, --dataset <name>       - Process only this dataset (repeatable)
  -b, --backend <name>       - Phonetic backend (default: pinyin-ipa)
  --label-mode <hanzi|pinyin> - Text written to .lab files
  --keep-tone                - Keep tone digits in pinyin .lab files
  --no-spacing               - Do not separate characters with spaces in .lab files
  --no-fallback              - Skip datasets without a dedicated processor
  --save-config              - Write the effective config back to the config file
  -h, --help                 - Show this help
";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub dataset_root: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub datasets: Vec<String>,
    pub phonetic_backend: Option<String>,
    pub label_mode: Option<LabelMode>,
    pub keep_tone: bool,
    pub no_spacing: bool,
    pub no_fallback: bool,
    pub save_config: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn from_env() -> Result<Self, lexopt::Error> {
        Self::parse(lexopt::Parser::from_env())
    }

    pub fn from_args<I>(args: I) -> Result<Self, lexopt::Error>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        Self::parse(lexopt::Parser::from_args(args))
    }

    fn parse(mut parser: lexopt::Parser) -> Result<Self, lexopt::Error> {
        use lexopt::prelude::*;

        let mut args = CliArgs::default();
        let mut command_seen = false;

        while let Some(arg) = parser.next()? {
            match arg {
                Value(val) if !command_seen => {
                    args.command = val.parse()?;
                    command_seen = true;
                }
                Short('c') | Long("config") => args.config = Some(parser.value()?.into()),
                Short('r') | Long("dataset-root") => {
                    args.dataset_root = Some(parser.value()?.into());
                }
                Short('o') | Long("output-dir") => args.output_dir = Some(parser.value()?.into()),
                Short('d') | Long("dataset") => args.datasets.push(parser.value()?.string()?),
                Short('b') | Long("backend") => {
                    args.phonetic_backend = Some(parser.value()?.string()?);
                }
                Long("label-mode") => args.label_mode = Some(parser.value()?.parse()?),
                Long("keep-tone") => args.keep_tone = true,
                Long("no-spacing") => args.no_spacing = true,
                Long("no-fallback") => args.no_fallback = true,
                Long("save-config") => args.save_config = true,
                Short('h') | Long("help") => args.help = true,
                _ => return Err(arg.unexpected()),
            }
        }

        Ok(args)
    }

    /// 用命令行选项覆盖配置
    pub fn apply(&self, config: &mut PrepConfig) {
        if let Some(root) = &self.dataset_root {
            config.dataset_root = root.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if !self.datasets.is_empty() {
            config.datasets = self.datasets.clone();
        }
        if let Some(backend) = &self.phonetic_backend {
            config.phonetic_backend = backend.clone();
        }
        if let Some(mode) = self.label_mode {
            config.label_mode = mode;
        }
        if self.keep_tone {
            config.keep_tone = true;
        }
        if self.no_spacing {
            config.add_spacing = false;
        }
        if self.no_fallback {
            config.fallback_processor = None;
        }
    }
}
