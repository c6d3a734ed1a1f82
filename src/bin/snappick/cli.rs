use clap::{Parser, Subcommand};
use std::path::PathBuf;

use SnapPick::config::SnapConfig;

const EXPR_HELP: &str = "\
<EXPR> examples:
  /var/foo.sql.gz  A specific file
  4.5*             All files in the snapshot dir beginning with '4.5'
  @4.5             All files in the snapshot dir which are less than 4.5
  @4.5.10          All files in the snapshot dir which are less than 4.5.10
  @4.2..5.1.0      All files after 4.2 and before 5.1.0
  @4.2..           All files after 4.2
  @4.2..5.1.0:10   At most 10 files after 4.2 and before 5.1.0";

/// Pick database snapshots by version range
#[derive(Parser, Debug)]
#[command(
    name = "snappick",
    version,
    about = "Pick representative database snapshots by version range",
    args_conflicts_with_subcommands = true,
    after_help = EXPR_HELP
)]
pub struct Cli {
    /// Snapshot directory (overrides SNAPPICK_DIR)
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Fixed RNG seed for reproducible sampling (overrides SNAPPICK_SEED)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print the result as a JSON array
    #[arg(long, default_value_t = false)]
    pub json: bool,
    /// Print selection counters (JSON) to stderr when done
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
    /// File paths, globs or @-range expressions
    #[arg(value_name = "EXPR")]
    pub exprs: Vec<String>,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Parse an @-range expression and print it as JSON
    ///
    /// Пример:
    ///   snappick parse @4.2..4.5:10
    ///   {"minVer":"4.2","maxVer":"4.5","maxCount":10}
    Parse {
        #[arg(value_name = "EXPR")]
        expr: String,
    },
    /// Rescan database*/ folders and refresh the metadata cache (databases.json)
    UpdateJson {
        /// Project root containing database*/ folders (overrides SNAPPICK_PROJECT)
        #[arg(long)]
        project: Option<PathBuf>,
        /// Metadata file (default: <project>/databases.json)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Decompressor for .bz2 dumps (overrides SNAPPICK_BZCAT)
        #[arg(long)]
        bzcat: Option<String>,
    },
}

impl Cli {
    /// Env config with command-line overrides applied.
    pub fn config(&self) -> SnapConfig {
        let mut cfg = SnapConfig::from_env();
        if let Some(dir) = &self.dir {
            cfg = cfg.with_snapshot_dir(dir.clone());
        }
        if self.seed.is_some() {
            cfg = cfg.with_seed(self.seed);
        }
        if let Some(Cmd::UpdateJson { project, out, bzcat }) = &self.cmd {
            if let Some(p) = project {
                cfg = cfg.with_project_root(p.clone());
            }
            if out.is_some() {
                cfg = cfg.with_metadata_file(out.clone());
            }
            if let Some(b) = bzcat {
                cfg = cfg.with_bzcat(b.clone());
            }
        }
        cfg.build()
    }
}

pub fn usage() -> String {
    use clap::CommandFactory;
    Cli::command().render_usage().to_string()
}

pub fn help() -> String {
    use clap::CommandFactory;
    Cli::command().render_help().to_string()
}
