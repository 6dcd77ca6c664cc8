// 普通话语料 MFA 预处理
//
// 拼音 / 汉字归一化 → 儿化感知的拼音转 IPA 词典 → TextGrid 补层

mod annotation_patcher;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod dictionary_builder;
pub mod dictionary_utils;
pub mod erhua;
mod labels;
pub mod phonetic;
pub mod pipeline;
mod statistics;
pub mod syllable;
pub mod textgrid;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub use annotation_patcher::{patch_dataset, patch_textgrid, PatchReport};
pub use cli::CliArgs;
pub use config::{LabelMode, PrepConfig};
pub use labels::{label_text, write_labels};
pub use pipeline::{Command, DatasetOutcome, PrepPipeline, RunSummary};
pub use statistics::{collect_stats, AlignmentStats};

/// 按命令行参数执行一次预处理
///
/// 配置文件不存在时使用默认配置，命令行选项覆盖配置字段
pub fn prepare(args: &CliArgs) -> Result<RunSummary> {
    let (mut config, existed) = PrepConfig::load(args.config.as_deref())?;
    if !existed {
        tracing::info!("未找到配置文件，使用默认配置");
    }
    args.apply(&mut config);

    if args.save_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => PrepConfig::config_path()?,
        };
        config.save(&path)?;
    }

    tracing::info!(
        "执行 {}，数据集根目录: {:?}",
        args.command.display_name(),
        config.dataset_root
    );
    PrepPipeline::new(config)?.run(args.command)
}

pub fn run() -> Result<()> {
    // 初始化日志，默认 info，可用 RUST_LOG 覆盖
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::from_env()?;
    if args.help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let summary = prepare(&args)?;
    if let Some(stats) = &summary.stats {
        println!("{}", stats.to_json()?);
    }
    Ok(())
}
