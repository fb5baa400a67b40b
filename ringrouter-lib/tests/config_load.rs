use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ringrouter_lib::config::{load_from_path, RingMode};

fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_nanos();
    std::env::temp_dir().join(format!("ringrouter-{nanos}-{name}.toml"))
}

#[test]
fn loads_minimal_config() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let path = tmp_path("minimal");
    let toml = r#"
nics = ["wan0", "lan0"]
default_interface = 1
"#;
    fs::write(&path, toml)?;

    let cfg = load_from_path(&path)?;
    assert_eq!(cfg.nics, vec!["wan0".to_string(), "lan0".to_string()]);
    assert_eq!(cfg.ring_indices, 1, "ring_indices should default to 1");
    assert_eq!(cfg.ring_mode, RingMode::OneRingPerWorker);
    assert_eq!(cfg.default_interface, 1);
    assert!(cfg.routes_file.is_none());
    Ok(())
}

#[test]
fn loads_full_config_with_routes_file_and_ring_mode() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dir = tempfile::tempdir()?;
    let routes_path = dir.path().join("routes.toml");
    fs::write(&routes_path, "[[route]]\nprefix = \"10.0.0.0/8\"\ninterface = 2\n")?;

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
nics = ["wan0", "lan0", "dmz0"]
ring_indices = 4
ring_mode = "all_rings_single_worker"
default_interface = 1
routes_file = "{}"

[logging]
level = "debug"
show_target = true
"#,
            routes_path.display()
        ),
    )?;

    let cfg = load_from_path(&config_path)?;
    assert_eq!(cfg.nics.len(), 3);
    assert_eq!(cfg.ring_indices, 4);
    assert_eq!(cfg.ring_mode, RingMode::AllRingsSingleWorker);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.show_target);
    assert_eq!(cfg.routes_file, Some(routes_path));
    Ok(())
}

#[test]
fn rejects_config_with_no_nics() {
    let path = tmp_path("no-nics");
    fs::write(&path, "nics = []\ndefault_interface = 1\n").expect("write config");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn rejects_config_with_zero_default_interface() {
    let path = tmp_path("zero-default");
    fs::write(&path, "nics = [\"wan0\"]\ndefault_interface = 0\n").expect("write config");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn rejects_config_referencing_missing_routes_file() {
    let path = tmp_path("missing-routes-file");
    fs::write(
        &path,
        "nics = [\"wan0\"]\ndefault_interface = 1\nroutes_file = \"/nonexistent/routes.toml\"\n",
    )
    .expect("write config");
    assert!(load_from_path(&path).is_err());
}
