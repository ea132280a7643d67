use indexmap::IndexMap;
use log::warn;

/// Mapping from area label to the lead accountable for it.
///
/// Populated once from the area-owners document before classification begins
/// and read-only afterwards. Lookups are case-insensitive on the label name.
#[derive(Debug, Default)]
pub struct AreaLeadTable {
    leads: IndexMap<String, String>,
}

impl AreaLeadTable {
    /// Parses the pipe-delimited area-owners document.
    ///
    /// Rows look like `| area-infra | @alice | ... |`; only rows whose first
    /// cell starts with one of the configured prefixes are kept, which also
    /// skips header and divider rows. A duplicate entry for the same area is
    /// a data-integrity warning, not a fatal error: the first entry wins.
    pub fn parse(text: &str, prefixes: &[String]) -> Self {
        let mut leads = IndexMap::new();

        for line in text.lines() {
            let line = line.trim();
            if !line.starts_with('|') {
                continue;
            }

            let cells: Vec<&str> = line.split('|').map(str::trim).collect();
            // Leading '|' yields an empty first cell
            if cells.len() < 3 {
                continue;
            }

            let label = cells[1];
            let lead = cells[2].trim_start_matches('@');
            if lead.is_empty() {
                continue;
            }

            let is_area_row = prefixes.iter().any(|prefix| {
                let wanted = format!("{prefix}-");
                label
                    .get(..wanted.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(&wanted))
            });
            if !is_area_row {
                continue;
            }

            let key = label.to_lowercase();
            if leads.contains_key(&key) {
                warn!("Area owners document has duplicate entry for {label}; keeping the first");
                continue;
            }

            leads.insert(key, lead.to_string());
        }

        Self { leads }
    }

    /// Lead handle for an area label, if the table has one.
    pub fn lead_for(&self, area: &str) -> Option<&str> {
        self.leads.get(&area.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_prefixes() -> Vec<String> {
        vec!["area".to_string()]
    }

    #[test]
    fn test_parse_basic_table() {
        let doc = "\
| Area | Lead | Notes |
|------|------|-------|
| area-infra | @alice | build stuff |
| area-networking | @bob | |
";
        let table = AreaLeadTable::parse(doc, &area_prefixes());

        assert_eq!(table.len(), 2);
        assert_eq!(table.lead_for("area-infra"), Some("alice"));
        assert_eq!(table.lead_for("area-networking"), Some("bob"));
    }

    #[test]
    fn test_header_and_divider_rows_are_skipped() {
        let doc = "| Area | Lead |\n|---|---|\n| area-docs | carol |\n";
        let table = AreaLeadTable::parse(doc, &area_prefixes());

        assert_eq!(table.len(), 1);
        assert_eq!(table.lead_for("area-docs"), Some("carol"));
    }

    #[test]
    fn test_duplicate_entry_keeps_first() {
        let doc = "| area-infra | @alice |\n| area-infra | @bob |\n";
        let table = AreaLeadTable::parse(doc, &area_prefixes());

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lead_for("area-infra"),
            Some("alice"),
            "first entry must win on duplicates"
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let doc = "| Area-Infra | @alice |\n";
        let table = AreaLeadTable::parse(doc, &area_prefixes());

        assert_eq!(table.lead_for("area-infra"), Some("alice"));
        assert_eq!(table.lead_for("AREA-INFRA"), Some("alice"));
    }

    #[test]
    fn test_multiple_prefixes() {
        let doc = "\
| arch-arm64 | @dave |
| os-linux | @erin |
| area-infra | @alice |
";
        let prefixes = vec!["arch".to_string(), "os".to_string(), "area".to_string()];
        let table = AreaLeadTable::parse(doc, &prefixes);

        assert_eq!(table.len(), 3);
        assert_eq!(table.lead_for("arch-arm64"), Some("dave"));
        assert_eq!(table.lead_for("os-linux"), Some("erin"));
    }

    #[test]
    fn test_non_table_lines_are_ignored() {
        let doc = "# Area owners\n\nSome prose.\n\n| area-infra | @alice |\n";
        let table = AreaLeadTable::parse(doc, &area_prefixes());

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        let table = AreaLeadTable::parse("", &area_prefixes());
        assert!(table.is_empty());
    }

    #[test]
    fn test_row_with_empty_lead_is_skipped() {
        let doc = "| area-infra | |\n";
        let table = AreaLeadTable::parse(doc, &area_prefixes());
        assert!(table.is_empty(), "a row without a lead handle carries no mapping");
    }
}
