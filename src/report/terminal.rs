use super::AnalysisResult;
use crate::analysis::{SizeReport, UnusedReport};
use crate::discovery::ResourceKind;
use crate::util::bytes_to_mb_str;
use colored::Colorize;
use std::path::Path;

/// Entries listed per section unless configured otherwise
pub const DEFAULT_TOP: usize = 5;

/// Short colored console summary printed after a report is written
pub struct TerminalSummary {
    /// Number of largest entries listed per section
    top: usize,
}

impl TerminalSummary {
    pub fn new() -> Self {
        Self { top: DEFAULT_TOP }
    }

    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    pub fn print_unused(&self, report: &UnusedReport, dest: &Path) {
        println!();
        println!(
            "{}",
            format!(
                "Scanned {} assets against {} reference sources",
                report.asset_count, report.source_count
            )
            .bold()
        );

        if report.unbound.is_empty() {
            println!("{}", "No unreferenced assets found!".green().bold());
        } else {
            println!(
                "{}",
                format!(
                    "{} unreferenced assets ({} MB)",
                    report.unbound.total_count,
                    bytes_to_mb_str(report.unbound.total_size_bytes)
                )
                .yellow()
                .bold()
            );
            self.print_kinds(&report.unbound);
        }

        if !report.not_dynamically_loaded.is_empty() {
            println!(
                "{}",
                format!(
                    "{} assets in the dynamic-load directory are never loaded from code ({} MB)",
                    report.not_dynamically_loaded.total_count,
                    bytes_to_mb_str(report.not_dynamically_loaded.total_size_bytes)
                )
                .cyan()
            );
        }

        if !report.no_metadata.is_empty() {
            println!(
                "{}",
                format!(
                    "⚠ {} assets have no metadata and could not be checked",
                    report.no_metadata.total_count
                )
                .yellow()
            );
        }

        println!("{} {}", "Report written to:".dimmed(), dest.display());
    }

    pub fn print_size(&self, report: &SizeReport, dest: &Path) {
        println!();
        println!(
            "{}",
            format!(
                "{} files, {} MB in {}",
                report.result.total_count,
                bytes_to_mb_str(report.result.total_size_bytes),
                report.root.display()
            )
            .bold()
        );

        for group in report.result.groups.iter().take(self.top) {
            println!(
                "  {} {:>10} MB  {} files",
                format!("{:<12}", group.key).cyan(),
                bytes_to_mb_str(group.total_size_bytes),
                group.files.len()
            );
        }
        if report.result.groups.len() > self.top {
            println!(
                "  {}",
                format!("... and {} more types", report.result.groups.len() - self.top).dimmed()
            );
        }

        println!("{} {}", "Report written to:".dimmed(), dest.display());
    }

    fn print_kinds(&self, result: &AnalysisResult<ResourceKind>) {
        for group in &result.groups {
            println!(
                "  {} {} ({} MB)",
                "○".dimmed(),
                format!("{}: {}", group.key, group.files.len()).white(),
                bytes_to_mb_str(group.total_size_bytes)
            );
            for file in group.files.iter().take(self.top) {
                println!("      {}", file.path.display().to_string().dimmed());
            }
            if group.files.len() > self.top {
                println!(
                    "      {}",
                    format!("... and {} more", group.files.len() - self.top).dimmed()
                );
            }
        }
    }
}

impl Default for TerminalSummary {
    fn default() -> Self {
        Self::new()
    }
}
