use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Snapshot record to export (defaults to the autosave record)
    #[arg(short, long)]
    pub record: Option<PathBuf>,

    /// Output file (defaults to outFile from the config)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Write the page to stdout instead of a file
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = open_session(args.record.as_deref(), &config, cwd)?;
    let html = session.export();

    if args.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(html.as_bytes())?;
        out.flush()?;
        return Ok(());
    }

    let out_path = match args.out {
        Some(path) if path.is_absolute() => path,
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_out_file(cwd),
    };

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, &html)?;

    println!(
        "  {} Exported {} elements → {}",
        "✓".green(),
        session.element_count(),
        out_path.display()
    );

    Ok(())
}
