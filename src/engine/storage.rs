//! Storage accounting view-model.

use crate::models::DashboardData;

/// Renders a gigabyte quantity for display: values of 1000 GB and above in
/// terabytes with one decimal, everything else in gigabytes with one
/// decimal. Absent input is treated as zero.
pub fn format_gb(gb: Option<f64>) -> String {
    let gb = gb.unwrap_or(0.0);
    if gb >= 1000.0 {
        format!("{:.1} TB", gb / 1000.0)
    } else {
        format!("{gb:.1} GB")
    }
}

/// Display-ready storage figures derived from the dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccounting {
    pub main_used: String,
    pub main_available: String,
    pub main_total: String,
    pub archive_used: String,
    pub archive_available: String,
    pub archive_total: String,
    pub potential_savings: String,
    pub tv_size: String,
    pub movies_size: String,
    pub tv_count: u32,
    pub movie_count: u32,
    pub on_streaming: u32,
}

impl StorageAccounting {
    /// Pure derivation; every displayed quantity goes through [`format_gb`].
    pub fn from_dashboard(data: &DashboardData) -> Self {
        Self {
            main_used: format_gb(Some(data.storage_data.used)),
            main_available: format_gb(Some(data.storage_data.available)),
            main_total: format_gb(Some(data.storage_data.total)),
            archive_used: format_gb(Some(data.archive_data.used)),
            archive_available: format_gb(Some(data.archive_data.available)),
            archive_total: format_gb(Some(data.archive_data.total)),
            potential_savings: format_gb(Some(data.potential_savings)),
            tv_size: format_gb(Some(data.library_stats.tv_size)),
            movies_size: format_gb(Some(data.library_stats.movies_size)),
            tv_count: data.library_stats.tv,
            movie_count: data.library_stats.movies,
            on_streaming: data.library_stats.on_streaming,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{LibraryStats, StorageInfo};

    #[test]
    fn formats_gigabytes_below_the_terabyte_switch() {
        assert_eq!(format_gb(Some(0.0)), "0.0 GB");
        assert_eq!(format_gb(Some(42.25)), "42.2 GB");
        assert_eq!(format_gb(Some(999.9)), "999.9 GB");
    }

    #[test]
    fn terabyte_switch_is_exclusive_at_1000() {
        // 999.95 rounds up in display but stays below the switch.
        assert_eq!(format_gb(Some(999.95)), "1000.0 GB");
        assert_eq!(format_gb(Some(1000.0)), "1.0 TB");
        assert_eq!(format_gb(Some(2345.0)), "2.3 TB");
    }

    #[test]
    fn absent_input_is_zero() {
        assert_eq!(format_gb(None), "0.0 GB");
    }

    #[test]
    fn accounting_covers_both_pools_and_savings() {
        let data = DashboardData {
            storage_data: StorageInfo {
                total: 2000.0,
                used: 1500.0,
                available: 500.0,
            },
            archive_data: StorageInfo {
                total: 8000.0,
                used: 100.0,
                available: 7900.0,
            },
            potential_savings: 321.5,
            library_stats: LibraryStats {
                tv: 12,
                tv_size: 812.3,
                tv_episodes: 900,
                movies: 40,
                movies_size: 1100.0,
                on_streaming: 7,
            },
            ..Default::default()
        };
        let accounting = StorageAccounting::from_dashboard(&data);
        assert_eq!(accounting.main_total, "2.0 TB");
        assert_eq!(accounting.main_available, "500.0 GB");
        assert_eq!(accounting.archive_available, "7.9 TB");
        assert_eq!(accounting.potential_savings, "321.5 GB");
        assert_eq!(accounting.tv_size, "812.3 GB");
        assert_eq!(accounting.movies_size, "1.1 TB");
        assert_eq!(accounting.movie_count, 40);
    }
}
