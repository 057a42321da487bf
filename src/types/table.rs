//! Normalized in-memory tables

use serde::Serialize;

/// Normalize a header name: strip surrounding whitespace (and a UTF-8 BOM), lowercase
pub fn normalize_column(name: &str) -> String {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
}

/// A header row plus data rows, with normalized column names.
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, normalizing column names and squaring rows to the header width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| normalize_column(c)).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by its normalized name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Copy the given rows (in the given order) into a detached subset
    pub fn subset<I>(&self, indices: I) -> Subset
    where
        I: IntoIterator<Item = usize>,
    {
        Subset {
            columns: self.columns.clone(),
            rows: indices
                .into_iter()
                .filter_map(|i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// Provider table (one row per partner)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderTable(Table);

/// Services table (one row per listing)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceTable(Table);

impl ProviderTable {
    pub fn new(table: Table) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &Table {
        &self.0
    }
}

impl ServiceTable {
    pub fn new(table: Table) -> Self {
        Self(table)
    }

    pub fn table(&self) -> &Table {
        &self.0
    }
}

impl From<Table> for ProviderTable {
    fn from(table: Table) -> Self {
        Self(table)
    }
}

impl From<Table> for ServiceTable {
    fn from(table: Table) -> Self {
        Self(table)
    }
}

/// Literal rows matching a metric, for drill-down display
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Subset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Subset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by normalized column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_column() {
        assert_eq!(normalize_column("  Provider_ID "), "provider_id");
        assert_eq!(normalize_column("STATUS"), "status");
        assert_eq!(normalize_column("\u{feff}provider_id"), "provider_id");
        assert_eq!(normalize_column("\tIs_Remote\n"), "is_remote");
    }

    #[test]
    fn test_table_normalizes_headers() {
        let table = Table::new(strings(&[" Provider_ID", "Status "]), vec![]);
        assert_eq!(table.columns(), &["provider_id", "status"]);
        assert_eq!(table.column_index("status"), Some(1));
        assert!(!table.has_column("Status"));
    }

    #[test]
    fn test_table_squares_rows() {
        let table = Table::new(
            strings(&["a", "b", "c"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );
        assert_eq!(table.rows()[0], strings(&["1", "", ""]));
        assert_eq!(table.rows()[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_subset_preserves_order_and_skips_out_of_range() {
        let table = Table::new(
            strings(&["id"]),
            vec![strings(&["a"]), strings(&["b"]), strings(&["c"])],
        );
        let subset = table.subset([2, 0, 9]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.cell(0, "id"), Some("c"));
        assert_eq!(subset.cell(1, "id"), Some("a"));
        assert_eq!(subset.cell(0, "missing"), None);
    }

    #[test]
    fn test_empty_subset() {
        let table = Table::new(strings(&["id"]), vec![strings(&["a"])]);
        let subset = table.subset(std::iter::empty());
        assert!(subset.is_empty());
        assert_eq!(subset.columns, strings(&["id"]));
    }
}
