use crate::colors::ColorScheme;
use crate::importer::ImportSummary;

pub fn format_summary(summary: &ImportSummary, colors: &ColorScheme) -> String {
    format!(
        "{} processed={} downloaded={} changed={} skipped={} errors={}",
        colors.stats("Done."),
        colors.number(&summary.processed.to_string()),
        colors.number(&summary.downloaded.to_string()),
        colors.number(&summary.changed.to_string()),
        colors.skipped(&summary.skipped.to_string()),
        if summary.errors > 0 {
            colors.error(&summary.errors.to_string())
        } else {
            colors.number(&summary.errors.to_string())
        }
    )
}

pub fn display_summary(summary: &ImportSummary, colors: &ColorScheme) {
    println!("{}", format_summary(summary, colors));
}
