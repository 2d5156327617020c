//! The configuration shipped inside the wasm module.

use aurora_core::EffectsConfig;

/// `config/effects.toml`, embedded at build time.
pub const EMBEDDED_CONFIG: &str = include_str!("../../../config/effects.toml");

/// Parses `source`, falling back to the defaults with a warning.
#[must_use]
pub fn load_config(source: &str) -> EffectsConfig {
    match EffectsConfig::from_toml_str(source) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("effects configuration rejected, using defaults: {err}");
            EffectsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_loads() {
        assert_eq!(load_config(EMBEDDED_CONFIG), EffectsConfig::default());
    }

    #[test]
    fn test_bad_config_falls_back() {
        let config = load_config("[particles]\ncount = 100000\n");
        assert_eq!(config.particles.count, 40);
        let config = load_config("not = [toml");
        assert_eq!(config, EffectsConfig::default());
    }
}
