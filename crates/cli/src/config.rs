// crates/cli/src/config.rs
use crate::args::Args;
use crate::error::AppError;
use crate::options::OutputFormat;
pub use stampindex_engine::config::{
    Config, ConfigBuilder, ExclusionSet, WalkOptions, WalkOptionsBuilder,
};
use std::path::PathBuf;

/// Everything a run needs: the engine configuration plus output settings.
///
/// Verbosity is not part of it; logging is set up before the conversion so
/// that warnings raised while building the exclusion set are shown.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub engine: Config,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub append: bool,
    pub format: OutputFormat,
    pub tag: String,
    pub inactive_timestamps: bool,
}

impl TryFrom<Args> for RunConfig {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let engine = engine_config_from_args(&args)?;

        let output = OutputConfig {
            path: args.output.output,
            append: args.output.append,
            format: args.output.format,
            tag: args.output.tag,
            inactive_timestamps: args.output.inactive_timestamps,
        };

        Ok(Self { engine, output })
    }
}

fn engine_config_from_args(args: &Args) -> Result<Config, AppError> {
    let scan = &args.scan;
    let walk = WalkOptionsBuilder::default()
        .roots(scan.folders.clone())
        .exclude(ExclusionSet::new(scan.exclude.iter().cloned())?)
        .follow_links(scan.follow_links)
        .build()?;

    let config = ConfigBuilder::default().walk(walk).build()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("stampindex").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_args_to_config() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_str().unwrap();
        let sub = temp.path().join("old");
        std::fs::create_dir(&sub).unwrap();

        let args = parse(&["-f", root, "-x", sub.to_str().unwrap(), "-l", "--format", "jsonl"]);
        let cfg = RunConfig::try_from(args).unwrap();

        assert_eq!(cfg.engine.walk.roots, vec![temp.path().to_path_buf()]);
        assert!(cfg.engine.walk.follow_links);
        assert!(cfg.engine.walk.exclude.contains(&sub));
        assert_eq!(cfg.output.format, OutputFormat::Jsonl);
        assert_eq!(cfg.output.tag, "filedatestamps");
        assert_eq!(cfg.output.path, None);
    }

    #[test]
    fn test_missing_folder_is_config_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let args = parse(&["-f", missing.to_str().unwrap()]);
        let err = RunConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_exclude_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let args = parse(&["-f", temp.path().to_str().unwrap(), "-x", file.to_str().unwrap()]);
        assert!(RunConfig::try_from(args).is_err());
    }
}
