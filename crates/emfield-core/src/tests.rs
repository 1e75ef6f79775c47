#[cfg(test)]
mod tests {
    use crate::config::SimulationConfig;
    use crate::constants::{DEFAULT_ANALYSIS_NAME, DEFAULT_Z_LEVEL};
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::types::{Orientation, Position};

    const MINIMAL_CONFIG: &str = r#"
grid:
  x_min: -10
  x_max: 10
  y_min: -5
  y_max: 5
  resolution: 1
compliance:
  standard: ICNIRP_2020
  category: general_public
antennas:
  - id: sector_a
    frequency_mhz: 1800
    power_eirp_watts: 500
    position: { x: 0, y: 0, z: 25 }
"#;

    // ---- Status classification ----

    #[test]
    fn test_status_thresholds() {
        assert_eq!(
            ComplianceStatus::from_percentage(0.0),
            ComplianceStatus::Compliant
        );
        assert_eq!(
            ComplianceStatus::from_percentage(79.999),
            ComplianceStatus::Compliant
        );
        assert_eq!(
            ComplianceStatus::from_percentage(80.0),
            ComplianceStatus::Marginal
        );
        assert_eq!(
            ComplianceStatus::from_percentage(100.0),
            ComplianceStatus::Marginal,
            "Exactly 100% is still within the limit"
        );
        assert_eq!(
            ComplianceStatus::from_percentage(100.0001),
            ComplianceStatus::NonCompliant
        );
    }

    #[test]
    fn test_status_json_names() {
        let json = serde_json::to_string(&ComplianceStatus::NonCompliant).unwrap();
        assert_eq!(json, "\"NON_COMPLIANT\"");
        assert_eq!(ComplianceStatus::Marginal.to_string(), "MARGINAL");
        let back: ComplianceStatus = serde_json::from_str("\"COMPLIANT\"").unwrap();
        assert_eq!(back, ComplianceStatus::Compliant);
    }

    // ---- Name parsing ----

    #[test]
    fn test_standard_parsing() {
        assert_eq!("ICNIRP_2020".parse::<StandardId>().unwrap(), StandardId::Icnirp2020);
        assert_eq!("icnirp".parse::<StandardId>().unwrap(), StandardId::Icnirp2020);
        assert_eq!("fcc".parse::<StandardId>().unwrap(), StandardId::Fcc);
        assert_eq!(" ICASA ".parse::<StandardId>().unwrap(), StandardId::Icasa);

        let err = "XYZ".parse::<StandardId>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStandard(ref s) if s == "XYZ"));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "general_public".parse::<ExposureCategory>().unwrap(),
            ExposureCategory::GeneralPublic
        );
        assert_eq!(
            "OCCUPATIONAL".parse::<ExposureCategory>().unwrap(),
            ExposureCategory::Occupational
        );
        assert!(matches!(
            "workers".parse::<ExposureCategory>(),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_standard_display_matches_serde() {
        for id in [StandardId::Icnirp2020, StandardId::Fcc, StandardId::Icasa] {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{id}\""));
        }
    }

    // ---- Config schema ----

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::from_yaml_str(MINIMAL_CONFIG).unwrap();
        assert_eq!(config.name, DEFAULT_ANALYSIS_NAME);
        assert_eq!(config.grid.z_level, DEFAULT_Z_LEVEL);
        assert_eq!(config.antennas.len(), 1);

        let ant = &config.antennas[0];
        assert!(ant.enabled, "Antennas are enabled unless stated otherwise");
        assert_eq!(ant.pattern_file, None);
        assert_eq!(ant.orientation, Orientation::default());
        assert_eq!(ant.position, Position::new(0.0, 0.0, 25.0));
    }

    #[test]
    fn test_config_full_antenna() {
        let yaml = r#"
name: Rooftop site
grid: { x_min: 0, x_max: 50, y_min: 0, y_max: 50, z_level: 2.0, resolution: 0.5 }
compliance: { standard: FCC, category: occupational }
antennas:
  - id: a1
    pattern_file: patterns/panel.msi
    frequency_mhz: 2600
    power_eirp_watts: 1200
    position: { x: 1, y: 2, z: 30 }
    orientation: { azimuth_deg: 120, tilt_deg: -6 }
    enabled: false
"#;
        let config = SimulationConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.name, "Rooftop site");
        assert_eq!(config.compliance.standard, "FCC");
        let ant = &config.antennas[0];
        assert_eq!(ant.pattern_file.as_deref(), Some("patterns/panel.msi"));
        assert_eq!(ant.orientation, Orientation::new(120.0, -6.0));
        assert!(!ant.enabled);
    }

    #[test]
    fn test_config_missing_field_is_malformed() {
        let yaml = MINIMAL_CONFIG.replace("  resolution: 1\n", "");
        let err = SimulationConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)), "got {err}");
    }

    #[test]
    fn test_config_unknown_field_rejected() {
        let yaml = MINIMAL_CONFIG.replace("resolution: 1", "resolution: 1\n  resolutoin: 2");
        assert!(SimulationConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn test_config_wrong_type_rejected() {
        let yaml = MINIMAL_CONFIG.replace("resolution: 1", "resolution: fine");
        assert!(matches!(
            SimulationConfig::from_yaml_str(&yaml),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = SimulationConfig::load(std::path::Path::new("/nonexistent/site.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    // ---- Errors ----

    #[test]
    fn test_error_root_unwraps_antenna() {
        let err = ConfigError::UnknownStandard("X".into()).for_antenna("a1");
        assert!(err.to_string().contains("a1"));
        assert!(matches!(err.root(), ConfigError::UnknownStandard(_)));
    }

    // ---- Geometry ----

    #[test]
    fn test_position_offset() {
        let origin = Position::new(1.0, 1.0, 1.0);
        let p = origin.offset(glam::DVec3::new(0.0, 3.0, 4.0), 10.0);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 7.0).abs() < 1e-12);
        assert!((p.z - 9.0).abs() < 1e-12);
        assert!(((p.to_dvec3() - origin.to_dvec3()).length() - 10.0).abs() < 1e-12);
        assert!(p.is_finite());
    }
}
