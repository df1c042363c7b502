//! One-shot query options shared by `query` and `export`.

use anyhow::{bail, Result};
use apcatalog_core::{Action, Browser, ColumnCatalog, Error};
use clap::Args;
use std::collections::{BTreeMap, BTreeSet};

/// Search, filter, sort and paging options.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Global search across every attribute
    #[arg(short, long)]
    pub search: Option<String>,

    /// Keep only the listed values of a column (repeatable)
    #[arg(long = "filter", value_name = "KEY=V1,V2")]
    pub filters: Vec<String>,

    /// Substring filter on a column (repeatable)
    #[arg(long = "contains", value_name = "KEY=TEXT")]
    pub contains: Vec<String>,

    /// Column to sort by (key or label)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number (1-indexed)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Splits `key=value`.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => bail!("Expected KEY=VALUE, got '{raw}'"),
    }
}

/// Splits a comma-separated value list.
///
/// Values are trimmed and blank entries dropped. A value in double quotes may
/// contain commas, and `""` on its own selects the empty value (blank or
/// missing fields). Inside quotes, `""` is a literal quote.
pub fn split_values(list: &str) -> BTreeSet<String> {
    let mut values = BTreeSet::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = list.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            ',' if !in_quotes => {
                push_value(&mut values, &current, quoted);
                current.clear();
                quoted = false;
            }
            _ => current.push(c),
        }
    }
    push_value(&mut values, &current, quoted);
    values
}

fn push_value(values: &mut BTreeSet<String>, raw: &str, quoted: bool) {
    let value = raw.trim();
    if quoted || !value.is_empty() {
        values.insert(value.to_string());
    }
}

/// Fails unless `page` exists among `total_pages` (page 1 always exists).
pub fn check_page(page: usize, total_pages: usize) -> Result<()> {
    if page == 0 || page > total_pages.max(1) {
        bail!("Page {page} is out of range (1-{})", total_pages.max(1));
    }
    Ok(())
}

/// Resolves a column name typed by the user to its key.
pub fn resolve_column(catalog: &ColumnCatalog, name: &str) -> Result<String> {
    catalog
        .resolve(name)
        .map(|c| c.key.clone())
        .ok_or_else(|| Error::UnknownColumn(name.trim().to_string()).into())
}

/// Applies the options to `browser` in the order a user would click them:
/// page size, search, filters, sort, then the page itself.
pub fn apply(browser: &mut Browser, args: &QueryArgs) -> Result<()> {
    if let Some(per_page) = args.per_page {
        browser.dispatch(Action::SetPerPage(per_page))?;
    }
    if let Some(search) = &args.search {
        browser.dispatch(Action::SetGlobalSearch(search.clone()))?;
    }

    let mut filters: BTreeMap<String, (String, BTreeSet<String>)> = BTreeMap::new();
    for raw in &args.filters {
        let (name, values) = parse_assignment(raw)?;
        let key = resolve_column(browser.catalog(), name)?;
        filters.entry(key).or_default().1.extend(split_values(values));
    }
    for raw in &args.contains {
        let (name, text) = parse_assignment(raw)?;
        let key = resolve_column(browser.catalog(), name)?;
        filters.entry(key).or_default().0 = text.to_string();
    }
    for (key, (search, selected)) in filters {
        browser.dispatch(Action::SetColumnFilter {
            key,
            search,
            selected,
        })?;
    }

    if let Some(sort) = &args.sort {
        let key = resolve_column(browser.catalog(), sort)?;
        browser.dispatch(Action::SortBy(key.clone()))?;
        if args.desc {
            browser.dispatch(Action::SortBy(key))?;
        }
    }

    check_page(args.page, browser.total_pages())?;
    browser.dispatch(Action::GotoPage(args.page))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apcatalog_core::{MemoryStore, RecordStore, SortDirection};

    fn browser() -> Browser {
        let store = RecordStore::from_json_str(
            r#"[
                {"id": "1", "vendor": "Cisco", "model": "CW9176I", "weight_kg": 1.2},
                {"id": "2", "vendor": "Aruba", "model": "AP-735", "weight_kg": 0.9},
                {"id": "3", "vendor": "Juniper", "model": "AP47", "weight_kg": 1.6},
                {"id": "4", "vendor": "Cisco", "model": "CW9166I", "weight_kg": null}
            ]"#,
        )
        .unwrap();
        Browser::new(
            store,
            ColumnCatalog::access_points(),
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("vendor=Cisco").unwrap(), ("vendor", "Cisco"));
        assert_eq!(parse_assignment(" poe_class =a=b").unwrap(), ("poe_class", "a=b"));
        assert!(parse_assignment("vendor").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_split_values() {
        let values = split_values("Cisco, Aruba,,  ");
        assert_eq!(values.len(), 2);
        assert!(values.contains("Cisco"));
        assert!(values.contains("Aruba"));
    }

    #[test]
    fn test_split_values_quoting() {
        let values = split_values(r#""Cisco, Inc.",Aruba"#);
        assert_eq!(
            values,
            BTreeSet::from(["Aruba".to_string(), "Cisco, Inc.".to_string()])
        );
        assert_eq!(split_values(r#""""#), BTreeSet::from([String::new()]));
        assert_eq!(
            split_values(r#""say ""hi""""#),
            BTreeSet::from(["say \"hi\"".to_string()])
        );
    }

    #[test]
    fn test_check_page() {
        assert!(check_page(1, 0).is_ok());
        assert!(check_page(3, 3).is_ok());
        assert!(check_page(4, 3).is_err());
        assert!(check_page(0, 3).is_err());
    }

    #[test]
    fn test_resolve_column_accepts_labels() {
        let catalog = ColumnCatalog::access_points();
        assert_eq!(resolve_column(&catalog, "Weight (kg)").unwrap(), "weight_kg");
        assert!(resolve_column(&catalog, "nope").is_err());
    }

    #[test]
    fn test_apply_filters_and_sort() {
        // Arrange
        let mut browser = browser();
        let args = QueryArgs {
            filters: vec!["vendor=Cisco,Juniper".into()],
            sort: Some("weight_kg".into()),
            desc: true,
            page: 1,
            ..QueryArgs::default()
        };

        // Act
        apply(&mut browser, &args).unwrap();

        // Assert
        let ids: Vec<&str> = browser.table_view().rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["3", "1", "4"]);
        assert_eq!(
            browser.state().sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Desc)
        );
    }

    #[test]
    fn test_apply_contains_filter() {
        // Arrange
        let mut browser = browser();
        let args = QueryArgs {
            contains: vec!["model=cw".into()],
            page: 1,
            ..QueryArgs::default()
        };

        // Act
        apply(&mut browser, &args).unwrap();

        // Assert
        assert_eq!(browser.table_view().window.total, 2);
    }

    #[test]
    fn test_apply_selects_empty_value() {
        // Arrange
        let mut browser = browser();
        let args = QueryArgs {
            filters: vec![r#"weight_kg="""#.into()],
            page: 1,
            ..QueryArgs::default()
        };

        // Act
        apply(&mut browser, &args).unwrap();

        // Assert
        let ids: Vec<&str> = browser.table_view().rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["4"]);
    }

    #[test]
    fn test_apply_rejects_page_past_the_end() {
        // Arrange
        let mut browser = browser();
        let args = QueryArgs {
            page: 99,
            ..QueryArgs::default()
        };

        // Act
        let result = apply(&mut browser, &args);

        // Assert
        assert!(result.unwrap_err().to_string().contains("out of range"));
        assert_eq!(browser.state().page, 1);
    }

    #[test]
    fn test_apply_rejects_unknown_column_and_page_size() {
        let mut browser = browser();
        let unknown = QueryArgs {
            filters: vec!["frequency=5".into()],
            ..QueryArgs::default()
        };
        let bad_size = QueryArgs {
            per_page: Some(7),
            ..QueryArgs::default()
        };

        assert!(apply(&mut browser, &unknown).is_err());
        assert!(apply(&mut browser, &bad_size).is_err());
    }
}
