use fixmath::accuracy::{Function, KernelKind};
use fixmath::config::{config_or_default, load_sweep_config, read_sweep_config, SweepConfig, DEFAULT_CONFIG_PATH};
use fixmath::FixedError;

#[test]
fn test_shipped_config_parses() {
    let path = format!("{}/{}", env!("CARGO_MANIFEST_DIR"), DEFAULT_CONFIG_PATH);
    let contents = std::fs::read_to_string(&path).unwrap();
    let config = SweepConfig::from_ron(&contents).unwrap();
    assert_eq!(config.kernels, KernelKind::ALL.to_vec());
    assert_eq!(config.functions, Function::ALL.to_vec());
    assert!(config.samples > 0);

    assert_eq!(load_sweep_config(&path), config);
}

#[test]
fn test_partial_config() {
    let config = SweepConfig::from_ron(
        r#"(
            samples: 64,
            functions: [Sqrt, Atan2],
            log_filter: "fixmath=debug",
        )"#,
    )
    .unwrap();
    assert_eq!(config.samples, 64);
    assert_eq!(config.functions, vec![Function::Sqrt, Function::Atan2]);
    assert_eq!(config.log_filter, "fixmath=debug");
    assert_eq!(config.seed, SweepConfig::default().seed);
    assert_eq!(config.snapshot_path, None);
}

#[test]
fn test_invalid_values_are_rejected() {
    let err = SweepConfig::from_ron("(samples: 0)").unwrap_err();
    assert_eq!(err.to_string(), "invalid sweep config: samples must be > 0");

    let err = SweepConfig::from_ron("(kernels: [])").unwrap_err();
    let err = err.downcast::<FixedError>().unwrap();
    assert!(matches!(*err, FixedError::InvalidConfig { .. }));

    assert!(SweepConfig::from_ron("(functions: [Cosh])").is_err());
    assert!(SweepConfig::from_ron("not ron at all").is_err());
}

#[test]
fn test_malformed_file_falls_back_to_default() {
    let path = std::env::temp_dir().join(format!("fixmath_bad_config_{}.ron", std::process::id()));
    std::fs::write(&path, "(samples: \"many\")").unwrap();
    let config = load_sweep_config(&path.to_string_lossy());
    let _ = std::fs::remove_file(&path);
    assert_eq!(config, SweepConfig::default());
}

#[test]
fn test_single_read_reports_then_falls_back() {
    let path = format!("{}/{}", env!("CARGO_MANIFEST_DIR"), DEFAULT_CONFIG_PATH);
    let loaded = read_sweep_config(&path).unwrap();
    assert_eq!(config_or_default(&path, Ok(loaded.clone())), loaded);

    let missing = std::env::temp_dir().join(format!("fixmath_missing_{}.ron", std::process::id()));
    let missing = missing.to_string_lossy().to_string();
    let err = read_sweep_config(&missing);
    assert!(err.is_err());
    assert_eq!(config_or_default(&missing, err), SweepConfig::default());
}
