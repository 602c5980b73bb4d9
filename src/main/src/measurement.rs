use anyhow::Result;

use control::Reading;

use crate::config::Config;
use crate::store::StateStore;

// Host states such as "unknown" or "unavailable" are not numbers
pub fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw?.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn safe_float(raw: Option<&str>, default: f64) -> f64 {
    parse_float(raw).unwrap_or(default)
}

// Everything a tick needs from the state store
#[derive(Clone, Debug, PartialEq)]
pub struct Inputs {
    pub reading: Reading,
    pub curve: String,
    // Previously published delta, `None` if never set
    pub current_delta: Option<f64>,
}

impl Inputs {
    pub fn read(store: &impl StateStore, config: &Config) -> Result<Inputs> {
        let entities = &config.entities;
        let defaults = &config.defaults;

        let at = safe_float(
            store.state(entities.outdoor_temperature)?.as_deref(),
            defaults.outdoor_temperature,
        );
        let x_min = safe_float(store.state(entities.x_min)?.as_deref(), defaults.x_min);
        let x_max = safe_float(store.state(entities.x_max)?.as_deref(), defaults.x_max);
        let curve = store.state(entities.curve)?.unwrap_or_default();
        let current_delta = parse_float(store.state(entities.delta)?.as_deref());

        Ok(Inputs {
            reading: Reading::new(at, x_min, x_max),
            curve,
            current_delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_safe_float() {
        assert_eq!(safe_float(Some("2.5"), 0.0), 2.5);
        assert_eq!(safe_float(Some(" -14 "), 0.0), -14.0);
        assert_eq!(safe_float(Some("unavailable"), 18.0), 18.0);
        assert_eq!(safe_float(Some("nan"), 1.0), 1.0);
        assert_eq!(safe_float(None, -14.0), -14.0);
    }

    #[test]
    fn test_read_uses_defaults() {
        let config = Config::default();
        let store = MemoryStore::default().with_state(config.entities.x_max, "unknown");

        let inputs = Inputs::read(&store, &config).unwrap();
        assert_eq!(inputs.reading, Reading::new(0.0, -14.0, 18.0));
        assert_eq!(inputs.curve, "");
        assert_eq!(inputs.current_delta, None);
    }

    #[test]
    fn test_read_states() {
        let config = Config::default();
        let entities = config.entities;
        let store = MemoryStore::default()
            .with_state(entities.outdoor_temperature, "4.2")
            .with_state(entities.x_min, "-10")
            .with_state(entities.x_max, "20")
            .with_state(entities.curve, r#"{"points":[]}"#)
            .with_state(entities.delta, "1.5");

        let inputs = Inputs::read(&store, &config).unwrap();
        assert_eq!(inputs.reading, Reading::new(4.2, -10.0, 20.0));
        assert_eq!(inputs.curve, r#"{"points":[]}"#);
        assert_eq!(inputs.current_delta, Some(1.5));
    }
}
