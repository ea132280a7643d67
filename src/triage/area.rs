use log::warn;

use crate::github::types::PullRequest;

/// Derives the area/scope label of a pull request from its label set.
///
/// Prefixes are examined in priority order; the first prefix with a match
/// wins. Within a single prefix, the first matching label in label iteration
/// order is kept: picking a different one would silently change attribution,
/// so the first-match rule is deliberate and load-bearing. A conflict
/// (multiple labels under one prefix) or a complete miss is reported as a
/// diagnostic, never an error.
pub fn area_label(pr: &PullRequest, prefixes: &[String]) -> Option<String> {
    for prefix in prefixes {
        if let Some(label) = find_prefixed_label(pr, prefix) {
            return Some(label);
        }
    }

    warn!("PR {} is missing an area label", pr.html_url);
    None
}

/// Finds the first label starting with `{prefix}-`, case-insensitively.
fn find_prefixed_label(pr: &PullRequest, prefix: &str) -> Option<String> {
    let wanted = format!("{prefix}-");
    let mut found: Option<&str> = None;

    for label in &pr.labels {
        let matches = label
            .name
            .get(..wanted.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&wanted));
        if !matches {
            continue;
        }

        if found.is_some() {
            warn!("PR {} has multiple {} labels", pr.html_url, prefix);
            break;
        }

        found = Some(&label.name);
    }

    found.map(str::to_string)
}

/// Strips the prefix from an area label for display ("area-infra" -> "infra").
pub fn area_display(label: &str) -> &str {
    match label.find('-') {
        Some(idx) => &label[idx + 1..],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::Label;
    use chrono::Utc;

    fn create_pr(labels: &[&str]) -> PullRequest {
        PullRequest {
            number: 1,
            title: "test".to_string(),
            html_url: "https://github.com/o/r/pull/1".to_string(),
            state: "open".to_string(),
            draft: false,
            labels: labels
                .iter()
                .map(|name| Label {
                    name: (*name).to_string(),
                })
                .collect(),
            assignees: vec![],
            merged_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            merged_at: None,
            closed_at: None,
        }
    }

    fn prefixes(names: &[&str]) -> Vec<String> {
        names.iter().map(|p| (*p).to_string()).collect()
    }

    #[cfg(test)]
    mod area_label {
        use super::*;

        #[test]
        fn returns_single_matching_label() {
            let pr = create_pr(&["community-contribution", "area-infra"]);
            let result = area_label(&pr, &prefixes(&["area"]));
            assert_eq!(result, Some("area-infra".to_string()));
        }

        #[test]
        fn returns_none_when_no_label_matches() {
            let pr = create_pr(&["community-contribution", "bug"]);
            let result = area_label(&pr, &prefixes(&["area"]));
            assert!(result.is_none(), "PR without area label should yield none");
        }

        #[test]
        fn keeps_first_label_on_conflict() {
            let pr = create_pr(&["area-networking", "area-infra"]);
            let result = area_label(&pr, &prefixes(&["area"]));
            assert_eq!(
                result,
                Some("area-networking".to_string()),
                "first label in iteration order must win"
            );
        }

        #[test]
        fn higher_priority_prefix_wins() {
            let pr = create_pr(&["area-infra", "arch-arm64"]);
            let result = area_label(&pr, &prefixes(&["arch", "os", "area"]));
            assert_eq!(result, Some("arch-arm64".to_string()));
        }

        #[test]
        fn falls_through_to_lower_priority_prefix() {
            let pr = create_pr(&["area-infra"]);
            let result = area_label(&pr, &prefixes(&["arch", "os", "area"]));
            assert_eq!(result, Some("area-infra".to_string()));
        }

        #[test]
        fn prefix_match_is_case_insensitive() {
            let pr = create_pr(&["Area-Infra"]);
            let result = area_label(&pr, &prefixes(&["area"]));
            assert_eq!(result, Some("Area-Infra".to_string()));
        }

        #[test]
        fn prefix_without_dash_does_not_match() {
            let pr = create_pr(&["areas", "area"]);
            let result = area_label(&pr, &prefixes(&["area"]));
            assert!(result.is_none(), "only '{{prefix}}-' labels should match");
        }

        #[test]
        fn extraction_is_idempotent() {
            let pr = create_pr(&["area-networking", "area-infra"]);
            let first = area_label(&pr, &prefixes(&["area"]));
            let second = area_label(&pr, &prefixes(&["area"]));
            assert_eq!(first, second, "repeated extraction must yield the same label");
        }
    }

    #[cfg(test)]
    mod area_display {
        use super::*;

        #[test]
        fn strips_prefix_up_to_first_dash() {
            assert_eq!(area_display("area-infra"), "infra");
        }

        #[test]
        fn keeps_dashes_after_the_first() {
            assert_eq!(area_display("area-system-net"), "system-net");
        }

        #[test]
        fn returns_label_unchanged_without_dash() {
            assert_eq!(area_display("infra"), "infra");
        }
    }
}
