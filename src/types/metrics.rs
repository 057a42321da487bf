//! Metric cards and the ordered metric set

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::error::{DashboardError, Result};
use super::table::Subset;

/// Dashboard section a metric card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ProvidersSummary,
    PartnerType,
    Actions,
    ServicesAndProducts,
    ServiceType,
    OnSiteSplit,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Self::ProvidersSummary => "Providers Summary",
            Self::PartnerType => "Partner Type",
            Self::Actions => "Actions",
            Self::ServicesAndProducts => "Services & Products",
            Self::ServiceType => "Service Type",
            Self::OnSiteSplit => "On-site Services Split",
        }
    }

    /// All sections in display order
    pub fn all() -> &'static [Section] {
        &[
            Section::ProvidersSummary,
            Section::PartnerType,
            Section::Actions,
            Section::ServicesAndProducts,
            Section::ServiceType,
            Section::OnSiteSplit,
        ]
    }

    /// Cards shown under this heading. Actions repeats the Aadhaar gap as a
    /// drill-down shortcut next to its home card in Providers Summary.
    pub fn cards(self) -> &'static [MetricKey] {
        match self {
            Self::ProvidersSummary => &[
                MetricKey::ActiveProviders,
                MetricKey::AadhaarVerified,
                MetricKey::ProvidersWithoutAadhaar,
            ],
            Self::PartnerType => &[
                MetricKey::IndividualPartners,
                MetricKey::OrganizationPartners,
            ],
            Self::Actions => &[
                MetricKey::ProvidersWithoutListings,
                MetricKey::ProvidersWithoutAadhaar,
            ],
            Self::ServicesAndProducts => &[
                MetricKey::TotalListings,
                MetricKey::Services,
                MetricKey::Products,
            ],
            Self::ServiceType => &[MetricKey::OnlineServices, MetricKey::OfflineServices],
            Self::OnSiteSplit => &[MetricKey::CustomerPlace, MetricKey::PartnerStore],
        }
    }
}

/// Named metric computed by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    ActiveProviders,
    AadhaarVerified,
    ProvidersWithoutAadhaar,
    IndividualPartners,
    OrganizationPartners,
    ProvidersWithoutListings,
    TotalListings,
    Services,
    Products,
    OnlineServices,
    OfflineServices,
    CustomerPlace,
    PartnerStore,
}

impl MetricKey {
    /// All metrics in canonical order
    pub fn all() -> &'static [MetricKey] {
        &[
            MetricKey::ActiveProviders,
            MetricKey::AadhaarVerified,
            MetricKey::ProvidersWithoutAadhaar,
            MetricKey::IndividualPartners,
            MetricKey::OrganizationPartners,
            MetricKey::ProvidersWithoutListings,
            MetricKey::TotalListings,
            MetricKey::Services,
            MetricKey::Products,
            MetricKey::OnlineServices,
            MetricKey::OfflineServices,
            MetricKey::CustomerPlace,
            MetricKey::PartnerStore,
        ]
    }

    /// Stable snake_case name
    pub fn name(self) -> &'static str {
        match self {
            Self::ActiveProviders => "active_providers",
            Self::AadhaarVerified => "aadhaar_verified",
            Self::ProvidersWithoutAadhaar => "providers_without_aadhaar",
            Self::IndividualPartners => "individual_partners",
            Self::OrganizationPartners => "organization_partners",
            Self::ProvidersWithoutListings => "providers_without_listings",
            Self::TotalListings => "total_listings",
            Self::Services => "services",
            Self::Products => "products",
            Self::OnlineServices => "online_services",
            Self::OfflineServices => "offline_services",
            Self::CustomerPlace => "customer_place",
            Self::PartnerStore => "partner_store",
        }
    }

    /// Card label
    pub fn label(self) -> &'static str {
        match self {
            Self::ActiveProviders => "Active Providers",
            Self::AadhaarVerified => "Aadhaar Verified",
            Self::ProvidersWithoutAadhaar => "Providers w/out Aadhaar",
            Self::IndividualPartners => "Individual",
            Self::OrganizationPartners => "Organization",
            Self::ProvidersWithoutListings => "Providers w/out Listings",
            Self::TotalListings => "Total Listings",
            Self::Services => "Services",
            Self::Products => "Products",
            Self::OnlineServices => "Online Services",
            Self::OfflineServices => "Offline Services",
            Self::CustomerPlace => "Customer-place",
            Self::PartnerStore => "Partner-store",
        }
    }

    pub fn section(self) -> Section {
        match self {
            Self::ActiveProviders | Self::AadhaarVerified | Self::ProvidersWithoutAadhaar => {
                Section::ProvidersSummary
            }
            Self::IndividualPartners | Self::OrganizationPartners => Section::PartnerType,
            Self::ProvidersWithoutListings => Section::Actions,
            Self::TotalListings | Self::Services | Self::Products => {
                Section::ServicesAndProducts
            }
            Self::OnlineServices | Self::OfflineServices => Section::ServiceType,
            Self::CustomerPlace | Self::PartnerStore => Section::OnSiteSplit,
        }
    }

    /// Look up a metric by name; accepts `-` in place of `_`
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| DashboardError::UnknownMetric(name.to_string()))
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One metric card: a count and the rows behind it.
/// `detail` is `None` only when an optional column the metric needs is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub key: MetricKey,
    pub count: usize,
    pub detail: Option<Subset>,
}

impl Metric {
    pub fn from_subset(key: MetricKey, subset: Subset) -> Self {
        Self {
            key,
            count: subset.len(),
            detail: Some(subset),
        }
    }

    /// Zero-count metric for a missing optional column
    pub fn unavailable(key: MetricKey) -> Self {
        Self {
            key,
            count: 0,
            detail: None,
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Metric", 3)?;
        s.serialize_field("label", self.key.label())?;
        s.serialize_field("count", &self.count)?;
        s.serialize_field("detail", &self.detail)?;
        s.end()
    }
}

/// Ordered mapping from metric name to metric card
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricSet {
    metrics: Vec<Metric>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping first-insertion order
    pub fn insert(&mut self, metric: Metric) {
        match self.metrics.iter_mut().find(|m| m.key == metric.key) {
            Some(existing) => *existing = metric,
            None => self.metrics.push(metric),
        }
    }

    pub fn get(&self, key: MetricKey) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    /// Count for a metric (0 if not present)
    pub fn count(&self, key: MetricKey) -> usize {
        self.get(key).map(|m| m.count).unwrap_or(0)
    }

    pub fn detail(&self, key: MetricKey) -> Option<&Subset> {
        self.get(key).and_then(|m| m.detail.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    /// Cards of one section, in layout order
    pub fn section(&self, section: Section) -> impl Iterator<Item = &Metric> {
        section.cards().iter().filter_map(move |key| self.get(*key))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for metric in &self.metrics {
            map.serialize_entry(metric.key.name(), metric)?;
        }
        map.end()
    }
}
