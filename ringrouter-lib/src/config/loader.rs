use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{ForwarderError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p)
        .map_err(|e| ForwarderError::Config(format!("failed to read config file: {e}")))?;
    let cfg: Config = toml::from_str(&txt)
        .map_err(|e| ForwarderError::Config(format!("failed to parse config: {e}")))?;

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.nics.is_empty() {
        return Err(ForwarderError::Config("at least one nic is required".into()));
    }
    if cfg.nics.iter().any(|n| n.trim().is_empty()) {
        return Err(ForwarderError::Config("nic name cannot be empty".into()));
    }
    if cfg.ring_indices == 0 {
        return Err(ForwarderError::Config("ring_indices must be > 0".into()));
    }
    if cfg.default_interface == 0 {
        return Err(ForwarderError::Config(
            "default_interface cannot be 0, that value is reserved as the trie's unset sentinel".into(),
        ));
    }
    if cfg.default_interface as usize > cfg.nics.len() {
        return Err(ForwarderError::Config(format!(
            "default_interface {} has no matching nic (only {} configured)",
            cfg.default_interface,
            cfg.nics.len()
        )));
    }
    if let Some(routes_file) = &cfg.routes_file {
        if !routes_file.exists() {
            return Err(ForwarderError::Config(format!(
                "routes_file not found: {}",
                routes_file.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RingMode;

    fn base_config() -> Config {
        Config {
            nics: vec!["wan0".into(), "lan0".into()],
            ring_indices: 2,
            ring_mode: RingMode::OneRingPerWorker,
            default_interface: 1,
            routes_file: None,
            logging: Default::default(),
        }
    }

    #[test]
    fn accepts_a_well_formed_config() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn rejects_empty_nic_list() {
        let mut cfg = base_config();
        cfg.nics.clear();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_default_interface() {
        let mut cfg = base_config();
        cfg.default_interface = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_default_interface_outside_nic_range() {
        let mut cfg = base_config();
        cfg.default_interface = 5;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_ring_indices() {
        let mut cfg = base_config();
        cfg.ring_indices = 0;
        assert!(validate_config(&cfg).is_err());
    }
}
