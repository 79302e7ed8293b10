use log::warn;

use crate::catalog::Catalog;
use crate::configuration::system_segment::SystemSegment;
use crate::error::{PlannerError, Result};
use crate::usage::{self, Severity};

/// Sums the size of the selected items in GB, in selection order.
///
/// Ids the catalog doesn't know contribute nothing; they usually mean the
/// selection is stale, so they are logged.
pub fn total_size(selection: &[String], catalog: &Catalog) -> f64 {
    selection.iter().fold(0.0, |total, id| match catalog.get(id) {
        Some(item) => total + item.size_gb(),
        None => {
            warn!("selected software '{}' is not in the catalog, counting 0", id);
            total
        }
    })
}

/// Like [`total_size`], but an unknown id is an error.
pub fn total_size_strict(selection: &[String], catalog: &Catalog) -> Result<f64> {
    let mut total = 0.0;
    for id in selection {
        match catalog.get(id) {
            Some(item) => total += item.size_gb(),
            None => return Err(PlannerError::DanglingReference(id.clone())),
        }
    }

    Ok(total)
}

pub fn system_reserved_total(system: &[SystemSegment]) -> f64 {
    system.iter().map(|segment| segment.size.to_canonical()).sum()
}

#[derive(Clone, Debug, PartialEq)]
pub struct StorageSummary {
    pub capacity_gb: f64,
    pub system_gb: f64,
    pub user_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    /// Set only when the used space is larger than the capacity.
    pub exceeded_by_gb: Option<f64>,
    pub usage_percent: f64,
    pub severity: Severity,
}

impl StorageSummary {
    pub fn compute(system_gb: f64, user_gb: f64, capacity_gb: f64) -> Result<StorageSummary> {
        let used_gb = system_gb + user_gb;
        let usage_percent = usage::usage_percentage(used_gb, capacity_gb)?;
        let severity = usage::classify(used_gb, capacity_gb)?;

        Ok(StorageSummary {
            capacity_gb,
            system_gb,
            user_gb,
            used_gb,
            available_gb: (capacity_gb - used_gb).max(0.0),
            exceeded_by_gb: if used_gb > capacity_gb {
                Some(used_gb - capacity_gb)
            } else {
                None
            },
            usage_percent,
            severity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{catalog_item::CatalogItem, category::Category};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Category::with_id("development", 1)],
            vec![
                CatalogItem::new("xcode", "Xcode", "35 GB".parse().unwrap(), "development"),
                CatalogItem::new("git", "Git", "512 MB".parse().unwrap(), "development"),
            ],
        )
        .unwrap()
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn empty_selection_is_zero() {
        assert_eq!(total_size(&[], &catalog()), 0.0);
        assert_eq!(total_size(&[], &Catalog::empty()), 0.0);
    }

    #[test]
    fn sums_selected_items() {
        assert_eq!(total_size(&ids(&["xcode", "git"]), &catalog()), 35.5);
    }

    #[test]
    fn skips_missing_items() {
        assert_eq!(total_size(&ids(&["missing-id"]), &Catalog::empty()), 0.0);
        assert_eq!(total_size(&ids(&["git", "missing-id"]), &catalog()), 0.5);
    }

    #[test]
    fn strict_total_reports_missing_items() {
        match total_size_strict(&ids(&["git", "missing-id"]), &catalog()) {
            Err(PlannerError::DanglingReference(id)) => assert_eq!(id, "missing-id"),
            other => panic!("expected DanglingReference, got {:?}", other),
        }
        assert_eq!(total_size_strict(&ids(&["xcode"]), &catalog()).unwrap(), 35.0);
    }

    #[test]
    fn sums_system_segments() {
        let system = vec![
            SystemSegment::new("os", "macOS", "15 GB".parse().unwrap()),
            SystemSegment::new("preinstalled", "Pre-installed Apps", "10 GB".parse().unwrap()),
            SystemSegment::new("upgrade_space", "Upgrade Space", "35.5 GB".parse().unwrap()),
        ];
        assert_eq!(system_reserved_total(&system), 60.5);
    }

    #[test]
    fn summarizes_usage() {
        let summary = StorageSummary::compute(60.5, 100.0, 256.0).unwrap();
        assert_eq!(summary.used_gb, 160.5);
        assert_eq!(summary.available_gb, 95.5);
        assert_eq!(summary.exceeded_by_gb, None);
        assert_eq!(summary.severity, Severity::Normal);
    }

    #[test]
    fn summarizes_over_capacity() {
        let summary = StorageSummary::compute(60.5, 100.0, 128.0).unwrap();
        assert_eq!(summary.available_gb, 0.0);
        assert_eq!(summary.exceeded_by_gb, Some(32.5));
        assert_eq!(summary.severity, Severity::Critical);
        assert!(summary.usage_percent > 100.0);
    }

    #[test]
    fn summary_needs_a_capacity() {
        assert!(matches!(
            StorageSummary::compute(0.0, 0.0, 0.0),
            Err(PlannerError::InvalidCapacity(_))
        ));
    }
}
