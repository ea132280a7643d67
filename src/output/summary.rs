use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::report::CommunityReport;

use super::styling::{bright, bright_green, bright_red, bright_yellow, cyan, dim};
use super::tables::{color_coded_stale_days_cell, create_table};

/// Prints a human-readable summary of the community PR report to stdout.
///
/// Displays two color-coded tables:
/// - Stale PRs: one row per owner with backlog size and oldest stale days
/// - Recognition: per-member merged, closed and help-wanted counts
pub fn print_summary(report: &CommunityReport) {
    println!("{}", render_summary(report));
}

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn render_summary(report: &CommunityReport) -> String {
    let mut output = String::new();

    let total_stale: usize = report.stale.groups.iter().map(|g| g.rows.len()).sum();
    let overdue: usize = report
        .stale
        .groups
        .iter()
        .flat_map(|g| &g.rows)
        .filter(|r| r.overdue)
        .count();

    add_section_header(&mut output, "\u{1f4ca}", "Overview");

    let overdue_display = if overdue == 0 {
        bright_green(overdue)
    } else if overdue <= 5 {
        bright_yellow(overdue)
    } else {
        bright_red(overdue)
    };

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Project:"),
        cyan(&report.project),
        dim("Stale community PRs:"),
        bright_yellow(total_stale),
        dim("Beyond SLA:"),
        overdue_display,
        dim("Recognized members:"),
        bright_yellow(report.recognition.members.len()),
    );

    add_section_header(&mut output, "\u{1f552}", "Stale Community PRs by Owner");

    if report.stale.groups.is_empty() {
        let _ = writeln!(output, "  {}\n", dim("No stale community pull requests."));
    } else {
        let mut table = create_table();
        table.set_header(create_cyan_header(&["Owner", "Stale PRs", "Oldest (days)"]));

        for group in &report.stale.groups {
            // Rows are oldest-first, so the first row carries the maximum age
            let oldest = group.rows.first().map_or(0, |r| r.stale_days);
            table.add_row(vec![
                Cell::new(&group.owner),
                Cell::new(group.rows.len()),
                color_coded_stale_days_cell(oldest, report.stale.sla_days),
            ]);
        }

        let _ = writeln!(output, "{table}\n");
    }

    add_section_header(&mut output, "\u{1f31f}", "Recognition");

    if report.recognition.members.is_empty() {
        let _ = writeln!(
            output,
            "  {}",
            dim(format!(
                "No completed community PRs in the last {} days.",
                report.recognition.window_days
            ))
        );
    } else {
        let mut table = create_table();
        table.set_header(create_cyan_header(&[
            "Member",
            "Merged",
            "Closed",
            "Help wanted",
        ]));

        for member in &report.recognition.members {
            table.add_row(vec![
                Cell::new(&member.member),
                Cell::new(member.merged).fg(TableColor::Green),
                Cell::new(member.closed_without_merge),
                Cell::new(member.help_wanted_conversions),
            ]);
        }

        let _ = writeln!(output, "{table}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        MemberRecognition, RecognitionReport, StaleGroup, StaleReport, StaleRow,
    };
    use chrono::Utc;

    fn create_report() -> CommunityReport {
        CommunityReport {
            project: "owner/repo".to_string(),
            generated_at: Utc::now(),
            stale: StaleReport {
                cutoff_days: 14,
                sla_days: 60,
                groups: vec![StaleGroup {
                    owner: "Alice Adams".to_string(),
                    rows: vec![StaleRow {
                        number: 1,
                        title: "Fix the build".to_string(),
                        url: "https://github.com/owner/repo/pull/1".to_string(),
                        assignee: None,
                        area: Some("infra".to_string()),
                        last_activity: Utc::now(),
                        stale_days: 21,
                        overdue: false,
                    }],
                }],
            },
            recognition: RecognitionReport {
                window_days: 7,
                members: vec![MemberRecognition {
                    member: "Bob Bishop".to_string(),
                    merged: 2,
                    closed_without_merge: 1,
                    help_wanted_conversions: 0,
                }],
            },
        }
    }

    #[test]
    fn test_summary_contains_owners_and_members() {
        let summary = render_summary(&create_report());

        assert!(summary.contains("owner/repo"));
        assert!(summary.contains("Alice Adams"));
        assert!(summary.contains("Bob Bishop"));
        assert!(summary.contains("21"));
    }

    #[test]
    fn test_summary_handles_empty_report() {
        let report = CommunityReport {
            project: "owner/repo".to_string(),
            generated_at: Utc::now(),
            stale: StaleReport {
                cutoff_days: 14,
                sla_days: 60,
                groups: vec![],
            },
            recognition: RecognitionReport {
                window_days: 7,
                members: vec![],
            },
        };

        let summary = render_summary(&report);
        assert!(summary.contains("No stale community pull requests."));
        assert!(summary.contains("No completed community PRs in the last 7 days."));
    }
}
