use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "protocol-extract",
    version,
    about = "Structural extraction tooling for clinical-trial protocol documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Extract(ExtractArgs),
    Section(SectionArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = ".cache/protocols")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = ".cache/protocols")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output_path: Option<PathBuf>,

    #[arg(long)]
    pub profile: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub store: bool,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub media_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SectionArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub profile: Option<PathBuf>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value = "")]
    pub default: String,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/protocols")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
