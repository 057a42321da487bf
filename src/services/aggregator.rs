//! Aggregator service for computing dashboard metrics

use std::collections::HashSet;

use tracing::debug;

use crate::types::{
    CompanyType, ListingRecord, ListingRecords, Metric, MetricKey, MetricSet, ProviderRecord,
    ProviderRecords, ProviderTable, Result, ServiceTable, Table,
};

/// Aggregator for computing dashboard metrics.
///
/// Stateless: every call borrows both tables and returns a fresh `MetricSet`.
pub struct Aggregator;

impl Aggregator {
    /// Compute every metric card in canonical order
    pub fn aggregate(providers: &ProviderTable, services: &ServiceTable) -> Result<MetricSet> {
        let provider_records = providers.records()?;
        let listing_records = services.records()?;

        for (present, column) in [
            (provider_records.has_company_type, "company_type"),
            (provider_records.has_aadhaar, "is_aadhaar_verified"),
            (listing_records.has_door_step, "is_at_door_step"),
            (listing_records.has_store, "is_at_store"),
        ] {
            if !present {
                debug!(column, "optional column absent, dependent metrics degrade to zero");
            }
        }

        let mut set = MetricSet::new();
        for metric in Self::provider_metrics(providers.table(), &provider_records) {
            set.insert(metric);
        }
        set.insert(Self::providers_without_listings(
            providers.table(),
            &provider_records,
            &listing_records,
        ));
        for metric in Self::listing_metrics(services.table(), &listing_records) {
            set.insert(metric);
        }
        Ok(set)
    }

    /// Active providers, Aadhaar split and partner type
    pub fn provider_metrics(table: &Table, resolved: &ProviderRecords) -> Vec<Metric> {
        let active: Vec<&ProviderRecord> = resolved.records.iter().filter(|p| p.active).collect();
        let (verified, unverified): (Vec<&ProviderRecord>, Vec<&ProviderRecord>) =
            active.iter().copied().partition(|p| p.is_aadhaar_verified());

        let by_type = |kind: CompanyType, key: MetricKey| {
            if !resolved.has_company_type {
                return Metric::unavailable(key);
            }
            let rows = active
                .iter()
                .filter(|p| p.company_type == Some(kind))
                .map(|p| p.row);
            Metric::from_subset(key, table.subset(rows))
        };

        vec![
            Metric::from_subset(
                MetricKey::ActiveProviders,
                table.subset(active.iter().map(|p| p.row)),
            ),
            Metric::from_subset(
                MetricKey::AadhaarVerified,
                table.subset(verified.iter().map(|p| p.row)),
            ),
            Metric::from_subset(
                MetricKey::ProvidersWithoutAadhaar,
                table.subset(unverified.iter().map(|p| p.row)),
            ),
            by_type(CompanyType::Individual, MetricKey::IndividualPartners),
            by_type(CompanyType::Organization, MetricKey::OrganizationPartners),
        ]
    }

    /// All providers (any status) whose id never appears in the listing table
    pub fn providers_without_listings(
        table: &Table,
        providers: &ProviderRecords,
        listings: &ListingRecords,
    ) -> Metric {
        let listed: HashSet<&str> = listings
            .records
            .iter()
            .map(|l| l.provider_id.as_str())
            .collect();

        let rows = providers
            .records
            .iter()
            .filter(|p| !listed.contains(p.provider_id.as_str()))
            .map(|p| p.row);

        Metric::from_subset(MetricKey::ProvidersWithoutListings, table.subset(rows))
    }

    /// Listing breakdown: services vs products, online vs offline, on-site split.
    /// The online/offline split covers services only.
    pub fn listing_metrics(table: &Table, resolved: &ListingRecords) -> Vec<Metric> {
        let active: Vec<&ListingRecord> = resolved.records.iter().filter(|l| l.active).collect();
        let services: Vec<&ListingRecord> = active
            .iter()
            .copied()
            .filter(|l| l.multi_city == Some(false))
            .collect();
        let products = active.iter().filter(|l| l.multi_city == Some(true));
        let online = services.iter().filter(|l| l.remote == Some(true));
        let offline: Vec<&ListingRecord> = services
            .iter()
            .copied()
            .filter(|l| l.remote == Some(false))
            .collect();

        let on_site = |present: bool, flag: fn(&ListingRecord) -> Option<bool>, key| {
            if !present {
                return Metric::unavailable(key);
            }
            let rows = offline
                .iter()
                .filter(|l| flag(**l) == Some(true))
                .map(|l| l.row);
            Metric::from_subset(key, table.subset(rows))
        };

        vec![
            Metric::from_subset(
                MetricKey::TotalListings,
                table.subset(active.iter().map(|l| l.row)),
            ),
            Metric::from_subset(
                MetricKey::Services,
                table.subset(services.iter().map(|l| l.row)),
            ),
            Metric::from_subset(MetricKey::Products, table.subset(products.map(|l| l.row))),
            Metric::from_subset(
                MetricKey::OnlineServices,
                table.subset(online.map(|l| l.row)),
            ),
            Metric::from_subset(
                MetricKey::OfflineServices,
                table.subset(offline.iter().map(|l| l.row)),
            ),
            on_site(
                resolved.has_door_step,
                |l: &ListingRecord| l.at_door_step,
                MetricKey::CustomerPlace,
            ),
            on_site(
                resolved.has_store,
                |l: &ListingRecord| l.at_store,
                MetricKey::PartnerStore,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DashboardError;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn scenario_providers() -> ProviderTable {
        ProviderTable::new(table(
            &["provider_id", "status", "is_aadhaar_verified", "company_type"],
            &[
                &["1", "ACTIVE", "1", "Individual"],
                &["2", "active", "0", "Organization"],
            ],
        ))
    }

    fn scenario_services() -> ServiceTable {
        ServiceTable::new(table(
            &["provider_id", "status", "is_multi_city", "is_remote"],
            &[&["1", "ACTIVE", "0", "1"]],
        ))
    }

    fn mixed_services() -> ServiceTable {
        ServiceTable::new(table(
            &[
                "provider_id",
                "status",
                "is_multi_city",
                "is_remote",
                "is_at_door_step",
                "is_at_store",
            ],
            &[
                &["1", "ACTIVE", "0", "1", "0", "0"],
                &["1", "ACTIVE", "0", "0", "1", "1"],
                &["2", "ACTIVE", "0", "0", "1", "0"],
                &["2", "ACTIVE", "0", "0", "0", "0"],
                &["3", "ACTIVE", "1", "0", "1", "1"],
                &["3", "Active", "1", "1", "0", "0"],
                &["4", "INACTIVE", "0", "0", "1", "1"],
            ],
        ))
    }

    // ========== scenario tests ==========

    #[test]
    fn test_aggregate_two_provider_scenario() {
        let set = Aggregator::aggregate(&scenario_providers(), &scenario_services()).unwrap();

        assert_eq!(set.count(MetricKey::ActiveProviders), 2);
        assert_eq!(set.count(MetricKey::AadhaarVerified), 1);
        assert_eq!(set.count(MetricKey::ProvidersWithoutAadhaar), 1);
        assert_eq!(set.count(MetricKey::IndividualPartners), 1);
        assert_eq!(set.count(MetricKey::OrganizationPartners), 1);
        assert_eq!(set.count(MetricKey::ProvidersWithoutListings), 1);
        assert_eq!(set.count(MetricKey::TotalListings), 1);
        assert_eq!(set.count(MetricKey::Services), 1);
        assert_eq!(set.count(MetricKey::Products), 0);
        assert_eq!(set.count(MetricKey::OnlineServices), 1);
        assert_eq!(set.count(MetricKey::OfflineServices), 0);

        let missing = set.detail(MetricKey::ProvidersWithoutListings).unwrap();
        assert_eq!(missing.cell(0, "provider_id"), Some("2"));
    }

    #[test]
    fn test_aggregate_emits_all_metrics_in_order() {
        let set = Aggregator::aggregate(&scenario_providers(), &scenario_services()).unwrap();
        let keys: Vec<MetricKey> = set.iter().map(|m| m.key).collect();
        assert_eq!(keys, MetricKey::all().to_vec());
    }

    #[test]
    fn test_inactive_listing_excluded_everywhere() {
        let services = ServiceTable::new(table(
            &[
                "provider_id",
                "status",
                "is_multi_city",
                "is_remote",
                "is_at_door_step",
                "is_at_store",
            ],
            &[&["1", "INACTIVE", "0", "0", "1", "1"]],
        ));
        let set = Aggregator::aggregate(&scenario_providers(), &services).unwrap();

        for key in [
            MetricKey::TotalListings,
            MetricKey::Services,
            MetricKey::Products,
            MetricKey::OnlineServices,
            MetricKey::OfflineServices,
            MetricKey::CustomerPlace,
            MetricKey::PartnerStore,
        ] {
            assert_eq!(set.count(key), 0, "{} should be empty", key);
        }
        // An inactive listing still links its provider
        assert_eq!(set.count(MetricKey::ProvidersWithoutListings), 1);
    }

    #[test]
    fn test_listing_breakdown() {
        let set = Aggregator::aggregate(&scenario_providers(), &mixed_services()).unwrap();

        assert_eq!(set.count(MetricKey::TotalListings), 6);
        assert_eq!(set.count(MetricKey::Services), 4);
        assert_eq!(set.count(MetricKey::Products), 2);
        assert_eq!(set.count(MetricKey::OnlineServices), 1);
        assert_eq!(set.count(MetricKey::OfflineServices), 3);
        assert_eq!(set.count(MetricKey::CustomerPlace), 2);
        assert_eq!(set.count(MetricKey::PartnerStore), 1);
    }

    #[test]
    fn test_online_offline_ignores_products() {
        let services = ServiceTable::new(table(
            &["provider_id", "status", "is_multi_city", "is_remote"],
            &[&["1", "ACTIVE", "1", "1"], &["1", "ACTIVE", "1", "0"]],
        ));
        let set = Aggregator::aggregate(&scenario_providers(), &services).unwrap();
        assert_eq!(set.count(MetricKey::Products), 2);
        assert_eq!(set.count(MetricKey::OnlineServices), 0);
        assert_eq!(set.count(MetricKey::OfflineServices), 0);
    }

    // ========== partition properties ==========

    #[test]
    fn test_status_partition_is_exhaustive_and_exclusive() {
        let providers = ProviderTable::new(table(
            &["provider_id", "status"],
            &[
                &["1", "ACTIVE"],
                &["2", "INACTIVE"],
                &["3", "Active"],
                &["4", ""],
                &["5", "suspended"],
            ],
        ));
        let set = Aggregator::aggregate(&providers, &scenario_services()).unwrap();
        let active = set.detail(MetricKey::ActiveProviders).unwrap();
        let active_ids: HashSet<&str> = (0..active.len())
            .filter_map(|i| active.cell(i, "provider_id"))
            .collect();

        let inactive: Vec<&str> = providers
            .table()
            .rows()
            .iter()
            .filter(|r| !crate::types::is_active_status(&r[1]))
            .map(|r| r[0].as_str())
            .collect();

        assert_eq!(active_ids.len() + inactive.len(), providers.table().len());
        assert!(inactive.iter().all(|id| !active_ids.contains(id)));
    }

    #[test]
    fn test_aadhaar_partitions_active_providers() {
        let providers = ProviderTable::new(table(
            &["provider_id", "status", "is_aadhaar_verified"],
            &[
                &["1", "ACTIVE", "1"],
                &["2", "ACTIVE", "0"],
                &["3", "ACTIVE", ""],
                &["4", "INACTIVE", "1"],
                &["5", "ACTIVE", "1.0"],
            ],
        ));
        let set = Aggregator::aggregate(&providers, &scenario_services()).unwrap();
        assert_eq!(set.count(MetricKey::ActiveProviders), 4);
        assert_eq!(set.count(MetricKey::AadhaarVerified), 2);
        assert_eq!(set.count(MetricKey::ProvidersWithoutAadhaar), 2);
        assert_eq!(
            set.count(MetricKey::AadhaarVerified) + set.count(MetricKey::ProvidersWithoutAadhaar),
            set.count(MetricKey::ActiveProviders)
        );
    }

    #[test]
    fn test_services_products_and_online_offline_partition() {
        let set = Aggregator::aggregate(&scenario_providers(), &mixed_services()).unwrap();
        assert_eq!(
            set.count(MetricKey::Services) + set.count(MetricKey::Products),
            set.count(MetricKey::TotalListings)
        );
        assert_eq!(
            set.count(MetricKey::OnlineServices) + set.count(MetricKey::OfflineServices),
            set.count(MetricKey::Services)
        );
    }

    // ========== robustness ==========

    #[test]
    fn test_missing_aadhaar_column_counts_as_unverified() {
        let providers = ProviderTable::new(table(
            &["provider_id", "status"],
            &[&["1", "ACTIVE"], &["2", "ACTIVE"]],
        ));
        let set = Aggregator::aggregate(&providers, &scenario_services()).unwrap();
        assert_eq!(set.count(MetricKey::AadhaarVerified), 0);
        assert_eq!(set.count(MetricKey::ProvidersWithoutAadhaar), 2);
    }

    #[test]
    fn test_missing_company_type_yields_zero() {
        let providers = ProviderTable::new(table(
            &["provider_id", "status", "is_aadhaar_verified"],
            &[&["1", "ACTIVE", "1"]],
        ));
        let set = Aggregator::aggregate(&providers, &scenario_services()).unwrap();
        assert_eq!(set.count(MetricKey::IndividualPartners), 0);
        assert_eq!(set.count(MetricKey::OrganizationPartners), 0);
        assert!(set.detail(MetricKey::IndividualPartners).is_none());
    }

    #[test]
    fn test_missing_on_site_columns_yield_empty() {
        let services = ServiceTable::new(table(
            &["provider_id", "status", "is_multi_city", "is_remote"],
            &[&["1", "ACTIVE", "0", "0"]],
        ));
        let set = Aggregator::aggregate(&scenario_providers(), &services).unwrap();
        assert_eq!(set.count(MetricKey::OfflineServices), 1);
        assert_eq!(set.count(MetricKey::CustomerPlace), 0);
        assert_eq!(set.count(MetricKey::PartnerStore), 0);
        assert!(set.detail(MetricKey::PartnerStore).is_none());
    }

    #[test]
    fn test_missing_required_column_is_schema_error() {
        let providers = ProviderTable::new(table(&["provider_id"], &[&["1"]]));
        let err = Aggregator::aggregate(&providers, &scenario_services()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Schema {
                table: "provider",
                column: "status"
            }
        ));

        let services = ServiceTable::new(table(&["status"], &[&["ACTIVE"]]));
        let err = Aggregator::aggregate(&scenario_providers(), &services).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Schema {
                table: "services",
                column: "provider_id"
            }
        ));

        let services = ServiceTable::new(table(
            &["provider_id", "status", "is_remote"],
            &[&["1", "ACTIVE", "1"]],
        ));
        let err = Aggregator::aggregate(&scenario_providers(), &services).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Schema {
                table: "services",
                column: "is_multi_city"
            }
        ));

        let services = ServiceTable::new(table(
            &["provider_id", "status", "is_multi_city"],
            &[&["1", "ACTIVE", "0"]],
        ));
        let err = Aggregator::aggregate(&scenario_providers(), &services).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Schema {
                table: "services",
                column: "is_remote"
            }
        ));
    }

    #[test]
    fn test_normalized_headers_are_found() {
        let providers = ProviderTable::new(table(
            &[" Provider_ID ", "STATUS", " Company_Type"],
            &[&["1", "active", "INDIVIDUAL"]],
        ));
        let set = Aggregator::aggregate(&providers, &scenario_services()).unwrap();
        assert_eq!(set.count(MetricKey::ActiveProviders), 1);
        assert_eq!(set.count(MetricKey::IndividualPartners), 1);
    }

    #[test]
    fn test_provider_ids_match_across_numeric_forms() {
        let providers = ProviderTable::new(table(&["provider_id", "status"], &[&["7", "ACTIVE"]]));
        let services = ServiceTable::new(table(
            &["provider_id", "status", "is_multi_city", "is_remote"],
            &[&["7.0", "ACTIVE", "0", "1"]],
        ));
        let set = Aggregator::aggregate(&providers, &services).unwrap();
        assert_eq!(set.count(MetricKey::ProvidersWithoutListings), 0);
    }

    #[test]
    fn test_providers_without_listings_includes_inactive() {
        let providers = ProviderTable::new(table(
            &["provider_id", "status"],
            &[&["1", "ACTIVE"], &["9", "INACTIVE"]],
        ));
        let set = Aggregator::aggregate(&providers, &scenario_services()).unwrap();
        let detail = set.detail(MetricKey::ProvidersWithoutListings).unwrap();
        assert_eq!(detail.len(), 1);
        assert_eq!(detail.cell(0, "status"), Some("INACTIVE"));
    }

    #[test]
    fn test_empty_tables() {
        let providers = ProviderTable::new(table(&["provider_id", "status"], &[]));
        let services = ServiceTable::new(table(
            &["provider_id", "status", "is_multi_city", "is_remote"],
            &[],
        ));
        let set = Aggregator::aggregate(&providers, &services).unwrap();
        assert_eq!(set.len(), 13);
        assert!(set.iter().all(|m| m.count == 0));
    }

    // ========== purity ==========

    #[test]
    fn test_aggregate_is_idempotent() {
        let providers = scenario_providers();
        let services = mixed_services();
        let first = Aggregator::aggregate(&providers, &services).unwrap();
        let second = Aggregator::aggregate(&providers, &services).unwrap();
        assert_eq!(first, second);
        assert_eq!(providers, scenario_providers());
        assert_eq!(services, mixed_services());
    }

    #[test]
    fn test_detail_rows_are_full_rows() {
        let set = Aggregator::aggregate(&scenario_providers(), &mixed_services()).unwrap();
        let detail = set.detail(MetricKey::CustomerPlace).unwrap();
        assert_eq!(detail.columns.len(), 6);
        assert_eq!(detail.cell(0, "provider_id"), Some("1"));
        assert_eq!(detail.cell(1, "provider_id"), Some("2"));
    }
}
