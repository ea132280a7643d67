use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::report::CommunityReport;

/// Placeholder markers replaced when the report is rendered into a template.
const TEMPLATE_BODY: &str = "##BODY##";
const TEMPLATE_RECOGNITIONS: &str = "##RECOGNITIONS##";
const TEMPLATE_DATE: &str = "##DATE##";

/// Built-in page template used when no custom template file is given.
const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Community Pull Request Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; }
        h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
        p { font-weight: bold; margin-bottom: 4px; }
        table { border-collapse: collapse; margin: 10px 0 25px 0; }
        th, td { padding: 6px 12px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background: #3498db; color: white; }
        td.c1 { min-width: 30em; }
        td.c2, td.c3 { min-width: 12em; }
        td.c4 { text-align: right; }
        td.prDaysBeyondSLA { color: #e74c3c; font-weight: bold; }
    </style>
</head>
<body>
    <h1>Community Pull Requests - ##DATE##</h1>
    ##BODY##
    ##RECOGNITIONS##
</body>
</html>
"#;

/// Escapes text for safe embedding in HTML element content and attributes.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the stale-PR section: one `<p>` owner heading per group followed
/// by a table of that owner's stale pull requests, oldest first.
fn render_stale_body(report: &CommunityReport) -> String {
    let mut body = String::new();

    for group in &report.stale.groups {
        let _ = writeln!(body, "<p>{}</p>", escape_html(&group.owner));
        body.push_str("<table>\n");
        body.push_str(
            "<thead><tr><th>Pull Request</th><th>Assignee</th><th>Area</th><th>Stale Days</th></tr></thead>\n",
        );
        body.push_str("<tbody>\n");

        for row in &group.rows {
            body.push_str("<tr>\n");
            let _ = writeln!(
                body,
                "<td class=\"c1\"><a href=\"{}\">{}</a></td>",
                escape_html(&row.url),
                escape_html(&row.title)
            );
            let _ = writeln!(
                body,
                "<td class=\"c2\">{}</td>",
                escape_html(row.assignee.as_deref().unwrap_or(""))
            );
            let _ = writeln!(
                body,
                "<td class=\"c3\">{}</td>",
                escape_html(row.area.as_deref().unwrap_or(""))
            );
            if row.overdue {
                let _ = writeln!(
                    body,
                    "<td class=\"c4 prDaysBeyondSLA\">{} \u{26a0}\u{fe0f}</td>",
                    row.stale_days
                );
            } else {
                let _ = writeln!(body, "<td class=\"c4\">{}</td>", row.stale_days);
            }
            body.push_str("</tr>\n");
        }

        body.push_str("</tbody>\n</table>\n");
    }

    body
}

/// One star per merged pull request, so a glance shows relative volume.
fn star_rating(count: usize) -> String {
    vec!["\u{2b50}"; count].join(" ")
}

/// Renders the recognition section, or nothing when the window was quiet.
fn render_recognitions(report: &CommunityReport) -> String {
    if report.recognition.members.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    let _ = writeln!(
        section,
        "<br /><div style='font-weight:bold'>Community PRs completed during last {} days</div>",
        report.recognition.window_days
    );
    section.push_str(
        "<table><tr><th>Member</th><th>Merged</th><th>Closed</th><th>Help wanted</th></tr>\n",
    );

    for member in &report.recognition.members {
        let _ = writeln!(
            section,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&member.member),
            star_rating(member.merged),
            member.closed_without_merge,
            member.help_wanted_conversions
        );
    }

    section.push_str("</table>\n");
    section
}

/// Renders the full report into `template`, replacing the placeholder markers.
pub fn render_report(report: &CommunityReport, template: &str) -> String {
    template
        .replace(TEMPLATE_BODY, &render_stale_body(report))
        .replace(TEMPLATE_RECOGNITIONS, &render_recognitions(report))
        .replace(
            TEMPLATE_DATE,
            &report.generated_at.format("%d %B %Y").to_string(),
        )
}

/// Loads a custom template file, falling back to the built-in page.
pub fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file: {}", path.display())),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        MemberRecognition, RecognitionReport, StaleGroup, StaleReport, StaleRow,
    };
    use chrono::{TimeZone, Utc};

    fn create_row(title: &str, stale_days: i64, overdue: bool) -> StaleRow {
        StaleRow {
            number: 1,
            title: title.to_string(),
            url: "https://github.com/o/r/pull/1".to_string(),
            assignee: Some("Alice Adams".to_string()),
            area: Some("infra".to_string()),
            last_activity: Utc::now(),
            stale_days,
            overdue,
        }
    }

    fn create_report(groups: Vec<StaleGroup>, members: Vec<MemberRecognition>) -> CommunityReport {
        CommunityReport {
            project: "owner/repo".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap(),
            stale: StaleReport {
                cutoff_days: 14,
                sla_days: 60,
                groups,
            },
            recognition: RecognitionReport {
                window_days: 7,
                members,
            },
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert(\"x & 'y'\")</script>"),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_render_replaces_all_placeholders() {
        let report = create_report(vec![], vec![]);
        let html = render_report(&report, DEFAULT_TEMPLATE);

        assert!(!html.contains("##BODY##"));
        assert!(!html.contains("##RECOGNITIONS##"));
        assert!(!html.contains("##DATE##"));
        assert!(html.contains("20 March 2024"));
    }

    #[test]
    fn test_stale_body_escapes_titles() {
        let group = StaleGroup {
            owner: "Alice <Lead>".to_string(),
            rows: vec![create_row("Fix <em> handling", 20, false)],
        };
        let report = create_report(vec![group], vec![]);
        let html = render_report(&report, "##BODY##");

        assert!(html.contains("<p>Alice &lt;Lead&gt;</p>"));
        assert!(html.contains("Fix &lt;em&gt; handling"));
        assert!(!html.contains("Fix <em> handling"));
    }

    #[test]
    fn test_stale_body_escapes_link_url() {
        let mut row = create_row("Quoted URL", 20, false);
        row.url = "https://github.com/o/r/pull/1?q=\"><script>".to_string();
        let group = StaleGroup {
            owner: "Alice".to_string(),
            rows: vec![row],
        };
        let report = create_report(vec![group], vec![]);
        let html = render_report(&report, "##BODY##");

        assert!(html.contains("href=\"https://github.com/o/r/pull/1?q=&quot;&gt;&lt;script&gt;\""));
        assert!(
            !html.contains("href=\"https://github.com/o/r/pull/1?q=\"><script>"),
            "a quote in the URL must not break out of the attribute"
        );
    }

    #[test]
    fn test_overdue_row_gets_sla_class_and_marker() {
        let group = StaleGroup {
            owner: "Alice".to_string(),
            rows: vec![create_row("Old PR", 75, true), create_row("Newer PR", 20, false)],
        };
        let report = create_report(vec![group], vec![]);
        let html = render_report(&report, "##BODY##");

        assert!(html.contains("<td class=\"c4 prDaysBeyondSLA\">75 \u{26a0}\u{fe0f}</td>"));
        assert!(html.contains("<td class=\"c4\">20</td>"));
    }

    #[test]
    fn test_recognition_stars_match_merged_count() {
        let member = MemberRecognition {
            member: "Bob Bishop".to_string(),
            merged: 3,
            closed_without_merge: 1,
            help_wanted_conversions: 2,
        };
        let report = create_report(vec![], vec![member]);
        let html = render_report(&report, "##RECOGNITIONS##");

        assert_eq!(html.matches('\u{2b50}').count(), 3);
        assert!(html.contains("Bob Bishop"));
        assert!(html.contains("last 7 days"));
    }

    #[test]
    fn test_empty_recognition_renders_nothing() {
        let report = create_report(vec![], vec![]);
        let html = render_report(&report, "##RECOGNITIONS##");
        assert!(html.is_empty(), "a quiet window produces no recognition section");
    }

    #[test]
    fn test_load_template_default() {
        let template = load_template(None).unwrap();
        assert!(template.contains("##BODY##"));
        assert!(template.contains("##RECOGNITIONS##"));
    }

    #[test]
    fn test_load_template_missing_file_is_error() {
        let result = load_template(Some(Path::new("no-such-template.html")));
        assert!(result.is_err());
    }
}
