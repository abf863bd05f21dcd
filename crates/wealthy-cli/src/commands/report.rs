//! Report command implementation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wealthy_core::{Pipeline, ReportDocument, ReportFormat};

use crate::cli::RecordArgs;

pub fn cmd_report(
    pipeline: &Pipeline,
    args: &RecordArgs,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format: ReportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    if let Some(path) = write_report(pipeline, args, format, output)? {
        println!("📄 Report written to {}", path.display());
    }

    Ok(())
}

/// Render the report to `output` (a file, or a directory to receive the
/// suggested file name) or to stdout. Returns the written path, if any.
pub fn write_report(
    pipeline: &Pipeline,
    args: &RecordArgs,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let record = args.to_record()?;
    let result = pipeline.evaluate(&record)?;
    let document = ReportDocument::build(&record, &result, &pipeline.config().presentation);
    let rendered = document.render(format)?;

    let Some(output) = output else {
        print!("{}", rendered);
        return Ok(None);
    };

    let path = if output.is_dir() {
        output.join(document.suggested_file_name(format))
    } else {
        output.to_path_buf()
    };

    fs::write(&path, rendered)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    tracing::debug!(path = %path.display(), format = format.as_str(), "Report written");
    Ok(Some(path))
}
