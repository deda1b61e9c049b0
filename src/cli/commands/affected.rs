//! Affected command - binaries to rebuild after a package change

use crate::affected::{affected_by, AffectedBinary, PackagePattern};
use crate::cli::args::{AffectedArgs, OutputFormat};
use crate::cli::scan::{discover, output_format};
use crate::config::Config;
use crate::error::BinscopeResult;
use crate::ui::{self, UiContext};
use console::style;
use tracing::debug;

/// Execute the affected command
pub async fn execute(args: AffectedArgs, config: &Config) -> BinscopeResult<()> {
    let format = output_format(args.format, config)?;
    let patterns: Vec<PackagePattern> = args
        .packages
        .iter()
        .map(|p| PackagePattern::parse(p))
        .collect();

    let discovery = discover(&args.scan, config, format).await?;
    let affected = affected_by(&discovery.binaries, &patterns);
    debug!(
        "{} of {} binaries affected",
        affected.len(),
        discovery.binaries.len()
    );

    match format {
        OutputFormat::Table => print_table(&affected),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&affected)?),
        OutputFormat::Plain => {
            for binary in &affected {
                println!("{}", binary.name);
            }
        }
    }

    Ok(())
}

fn print_table(affected: &[AffectedBinary]) {
    let ctx = UiContext::detect();

    if affected.is_empty() {
        ui::step_info(&ctx, "No binaries affected");
        return;
    }

    ui::intro(&ctx, "Affected binaries");
    for binary in affected {
        ui::step_ok_detail(
            &ctx,
            &binary.name,
            &binary.entry_file.display().to_string(),
        );
        for import in &binary.matched {
            println!("    {}", style(import).dim());
        }
    }
}
