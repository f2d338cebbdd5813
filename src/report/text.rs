// Plain-text report rendering. Downstream tooling parses these files, so the
// line layout and number precision must not change.

use super::AnalysisResult;
use crate::analysis::{SizeReport, UnusedReport};
use crate::util::{bytes_to_kb_str, bytes_to_mb_str};
use std::fmt::Display;

pub const UNREFERENCED_TITLE: &str = "未引用文件";
pub const NOT_DYNAMICALLY_LOADED_TITLE: &str = "非动态加载(可移出resources)的文件";
pub const NO_METADATA_TITLE: &str = "无元数据(无法判定引用)的文件";

fn file_line(size_bytes: u64, path: &std::path::Path) -> String {
    format!(
        "空间: {} KB, 文件: {}",
        bytes_to_kb_str(size_bytes),
        path.display()
    )
}

/// Render one titled section: header with totals, then one line per file
pub fn render_unused_section<K>(title: &str, result: &AnalysisResult<K>) -> String {
    let lines: Vec<String> = result
        .files()
        .map(|f| file_line(f.size_bytes, &f.path))
        .collect();

    format!(
        "\n--- {} ---\n总数: {}, 总空间: {} MB\n{}",
        title,
        result.total_count,
        bytes_to_mb_str(result.total_size_bytes),
        lines.join("\n")
    )
}

/// Render the unused-asset report.
///
/// The unreferenced and not-dynamically-loaded sections are always present;
/// the no-metadata section is appended only when it lists something.
pub fn render_unused_report(report: &UnusedReport) -> String {
    let mut sections = vec![
        render_unused_section(UNREFERENCED_TITLE, &report.unbound),
        render_unused_section(NOT_DYNAMICALLY_LOADED_TITLE, &report.not_dynamically_loaded),
    ];
    if !report.no_metadata.is_empty() {
        sections.push(render_unused_section(NO_METADATA_TITLE, &report.no_metadata));
    }
    sections.join("\n")
}

/// Render the by-extension size report: a summary block sorted by total size,
/// followed by a detail block per extension.
pub fn render_size_report(report: &SizeReport) -> String {
    render_size_result(&report.root.display(), &report.result)
}

fn render_size_result<K: Display>(root: &dyn Display, result: &AnalysisResult<K>) -> String {
    let mut summary = vec![format!(
        "总空间: {} MB, 目录: {}\n",
        bytes_to_mb_str(result.total_size_bytes),
        root
    )];
    for group in &result.groups {
        summary.push(format!(
            "类型: {}, 个数: {}, 占用空间: {} MB",
            group.key,
            group.files.len(),
            bytes_to_mb_str(group.total_size_bytes)
        ));
    }

    let mut detail = Vec::new();
    for group in &result.groups {
        detail.push(format!("\n--- {} 类型详情 ---", group.key));
        for file in &group.files {
            detail.push(file_line(file.size_bytes, &file.path));
        }
    }

    format!("{}\n{}", summary.join("\n"), detail.join("\n"))
}
