//! Allow-list and request validation tests
//!
//! Crop, feature and source names only ever reach SQL as one of the fixed
//! table and column names below.

use proptest::prelude::*;
use shared::{
    parse_crop, parse_date_range, parse_feature, parse_source, resolve_window, Crop, DomainError,
    Feature, ObservationSource,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod crop_tests {
    use super::*;

    #[test]
    fn test_every_crop_has_both_tables() {
        for crop in Crop::ALL {
            let prefix = crop.name().to_lowercase();
            assert_eq!(crop.irrigation_table(), format!("{}_irrigation_need", prefix));
            assert_eq!(crop.detail_table(), format!("{}_data", prefix));
        }
    }

    #[test]
    fn test_crop_names_are_case_insensitive() {
        assert_eq!(parse_crop("wheat").unwrap(), Crop::Wheat);
        assert_eq!(parse_crop("SUGARCANE").unwrap(), Crop::Sugarcane);
        assert_eq!(parse_crop(" Potatoes ").unwrap(), Crop::Potatoes);
    }

    #[test]
    fn test_unknown_crop_rejected() {
        for name in ["Banana", "", "wheat; DROP TABLE wheat_data", "wheat_irrigation_need"] {
            assert!(matches!(parse_crop(name), Err(DomainError::UnknownCrop(_))));
        }
    }
}

#[cfg(test)]
mod feature_tests {
    use super::*;

    #[test]
    fn test_feature_accepts_slug_or_column() {
        assert_eq!(parse_feature("temperature").unwrap(), Feature::Temperature);
        assert_eq!(parse_feature("temperature_2m_c").unwrap(), Feature::Temperature);
        assert_eq!(parse_feature("et₀_mm").unwrap(), Feature::Evapotranspiration);
    }

    #[test]
    fn test_unknown_feature_rejected() {
        assert!(matches!(
            parse_feature("\"date\"; --"),
            Err(DomainError::UnknownFeature(_))
        ));
    }

    #[test]
    fn test_sources() {
        assert_eq!(parse_source("historical").unwrap().table(), "historical_data");
        assert_eq!(
            parse_source("forecast").unwrap(),
            ObservationSource::Forecast
        );
        assert!(matches!(parse_source("archive"), Err(DomainError::UnknownSource(_))));
    }
}

#[cfg(test)]
mod request_tests {
    use super::*;

    #[test]
    fn test_date_range_bounds() {
        assert!(parse_date_range(None, None).unwrap().is_none());

        let open_start = parse_date_range(None, Some("2024-06-30")).unwrap().unwrap();
        assert!(open_start.start_bound().is_none());
        assert!(open_start.end_bound().is_some());

        assert!(matches!(
            parse_date_range(Some("2024-07-01"), Some("2024-06-01")),
            Err(DomainError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            parse_date_range(Some("01/07/2024"), None),
            Err(DomainError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_lookahead_limits() {
        assert_eq!(resolve_window(None, 1, 14).unwrap().lookahead_days, 1);
        assert_eq!(resolve_window(Some(0), 1, 14).unwrap().lookahead_days, 0);
        assert!(matches!(
            resolve_window(Some(15), 1, 14),
            Err(DomainError::LookaheadTooLong { requested: 15, max: 14 })
        ));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Anything accepted maps to a fixed table name
        #[test]
        fn prop_accepted_crop_is_allow_listed(name in "[A-Za-z_ ;']{0,20}") {
            if let Ok(crop) = parse_crop(&name) {
                prop_assert!(Crop::ALL.contains(&crop));
                prop_assert!(name.trim().eq_ignore_ascii_case(crop.name()));
            }
        }

        /// Accepted features resolve to one of the nine columns
        #[test]
        fn prop_accepted_feature_is_allow_listed(name in "[a-z0-9_\"; ]{0,30}") {
            if let Ok(feature) = parse_feature(&name) {
                prop_assert!(Feature::ALL.contains(&feature));
            }
        }
    }
}
