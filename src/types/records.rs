//! Typed provider and listing records
//!
//! Column positions are resolved once per pass; optional columns become
//! `Option` fields so metric code never looks up headers itself.

use super::error::{DashboardError, Result};
use super::table::{ProviderTable, ServiceTable, Table};

/// Status value that marks a provider or listing as live
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Whether a raw status cell means "active" (trimmed, case-insensitive)
pub fn is_active_status(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(ACTIVE_STATUS)
}

/// Parse a 0/1 flag cell. Blank or unrecognized cells are `None`,
/// which compares equal to neither 0 nor 1.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match raw.parse::<f64>() {
        Ok(v) if v == 1.0 => Some(true),
        Ok(v) if v == 0.0 => Some(false),
        _ => None,
    }
}

/// Canonical form of an identifier cell, so `7`, ` 7 ` and `7.0` match
pub fn normalize_id(raw: &str) -> String {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
            format!("{}", v as i64)
        }
        _ => raw.to_string(),
    }
}

/// Partner organization kind, from `company_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyType {
    Individual,
    Organization,
    Other,
}

impl CompanyType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "individual" => Self::Individual,
            "organization" => Self::Organization,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRecord {
    /// Row position in the source table
    pub row: usize,
    pub provider_id: String,
    pub active: bool,
    /// `None` when the column is absent
    pub company_type: Option<CompanyType>,
    /// Absent column and blank cells both read as `None`
    pub aadhaar_verified: Option<bool>,
}

impl ProviderRecord {
    pub fn is_aadhaar_verified(&self) -> bool {
        self.aadhaar_verified == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub row: usize,
    pub provider_id: String,
    pub active: bool,
    pub multi_city: Option<bool>,
    pub remote: Option<bool>,
    /// `None` when the column is absent or the cell is blank
    pub at_door_step: Option<bool>,
    pub at_store: Option<bool>,
}

/// Provider records plus which optional columns were present
#[derive(Debug, Clone)]
pub struct ProviderRecords {
    pub records: Vec<ProviderRecord>,
    pub has_company_type: bool,
    pub has_aadhaar: bool,
}

/// Listing records plus which optional columns were present
#[derive(Debug, Clone)]
pub struct ListingRecords {
    pub records: Vec<ListingRecord>,
    pub has_door_step: bool,
    pub has_store: bool,
}

fn required(table: &Table, name: &'static str, column: &'static str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or(DashboardError::Schema { table: name, column })
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

impl ProviderTable {
    /// Resolve typed records. Fails if `provider_id` or `status` is missing.
    pub fn records(&self) -> Result<ProviderRecords> {
        let table = self.table();
        let id_idx = required(table, "provider", "provider_id")?;
        let status_idx = required(table, "provider", "status")?;
        let company_idx = table.column_index("company_type");
        let aadhaar_idx = table.column_index("is_aadhaar_verified");

        let records = table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| ProviderRecord {
                row,
                provider_id: normalize_id(cell(cells, id_idx)),
                active: is_active_status(cell(cells, status_idx)),
                company_type: company_idx.map(|i| CompanyType::parse(cell(cells, i))),
                aadhaar_verified: aadhaar_idx.and_then(|i| parse_flag(cell(cells, i))),
            })
            .collect();

        Ok(ProviderRecords {
            records,
            has_company_type: company_idx.is_some(),
            has_aadhaar: aadhaar_idx.is_some(),
        })
    }
}

impl ServiceTable {
    /// Resolve typed records. Fails if `provider_id`, `status`,
    /// `is_multi_city` or `is_remote` is missing.
    pub fn records(&self) -> Result<ListingRecords> {
        let table = self.table();
        let id_idx = required(table, "services", "provider_id")?;
        let status_idx = required(table, "services", "status")?;
        let multi_idx = required(table, "services", "is_multi_city")?;
        let remote_idx = required(table, "services", "is_remote")?;
        let door_idx = table.column_index("is_at_door_step");
        let store_idx = table.column_index("is_at_store");

        let records = table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| ListingRecord {
                row,
                provider_id: normalize_id(cell(cells, id_idx)),
                active: is_active_status(cell(cells, status_idx)),
                multi_city: parse_flag(cell(cells, multi_idx)),
                remote: parse_flag(cell(cells, remote_idx)),
                at_door_step: door_idx.and_then(|i| parse_flag(cell(cells, i))),
                at_store: store_idx.and_then(|i| parse_flag(cell(cells, i))),
            })
            .collect();

        Ok(ListingRecords {
            records,
            has_door_step: door_idx.is_some(),
            has_store: store_idx.is_some(),
        })
    }
}
