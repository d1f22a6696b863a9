//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kh_config::ResolverSettings;
use kh_config::settings::{DEFAULT_COMMON_SECTION, DEFAULT_CONFIG_FILE, DEFAULT_MAX_DEPTH};

/// k8s-handle context resolution - resolve, validate and inspect deployment configs
#[derive(Parser, Debug)]
#[command(name = "kh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config document to read sections from
    #[arg(short, long = "config", global = true, env = "KH_CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Name of the section shared by every deployment
    #[arg(long, global = true, default_value = DEFAULT_COMMON_SECTION)]
    pub common_section: String,

    /// Directory relative include paths are resolved against
    #[arg(long, global = true)]
    pub include_dir: Option<PathBuf>,

    /// Maximum nesting depth while resolving includes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved context of a section
    ///
    /// Examples:
    ///   kh resolve -s staging
    ///   kh resolve -s production --strict --format json
    Resolve {
        #[command(flatten)]
        target: SectionArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Check that variables are set in the resolved context
    ///
    /// Examples:
    ///   kh check -s staging -r k8s_namespace -r image_version
    Check {
        #[command(flatten)]
        target: SectionArgs,

        /// Variable that must be present and non-empty
        #[arg(short, long = "require", value_name = "NAME")]
        required: Vec<String>,
    },

    /// Show cluster connection settings of a section
    Cluster {
        #[command(flatten)]
        target: SectionArgs,

        /// Write the decoded CA certificate into this directory
        #[arg(long, value_name = "DIR")]
        ca_dir: Option<PathBuf>,
    },
}

/// Section selection shared by every command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SectionArgs {
    /// Section to resolve
    #[arg(short, long)]
    pub section: String,

    /// Fail on references to unset environment variables
    #[arg(long)]
    pub strict: bool,
}

/// Output formats for `kh resolve`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl Cli {
    /// Resolver settings built from the global flags and `target`.
    pub fn settings(&self, target: &SectionArgs) -> ResolverSettings {
        let settings = ResolverSettings::new(&self.config_file)
            .with_common_section(&self.common_section)
            .with_strict_env(target.strict)
            .with_max_depth(self.max_depth);

        match &self.include_dir {
            Some(dir) => settings.with_include_dir(dir),
            None => settings,
        }
    }
}
