use std::path::PathBuf;
use std::time::Duration;

#[toml_cfg::toml_config]
pub struct TomlConfig {
    #[default("heating-curve-state.json")]
    state_file: &'static str,
    #[default("sensor.samsung_ehssentinel_outdoorouttemp")]
    outdoor_temperature_entity: &'static str,
    #[default("number.samsung_ehssentinel_infsv2011")]
    x_min_entity: &'static str,
    #[default("number.samsung_ehssentinel_infsv2012")]
    x_max_entity: &'static str,
    #[default("input_text.heizkurve_segments")]
    curve_entity: &'static str,
    #[default("input_number.heizkurve_delta")]
    delta_entity: &'static str,
    #[default(60)]
    tick_interval_minutes: u64,
    #[default(true)]
    debug: bool,
    #[default(true)]
    debug_to_notification: bool,
    #[default(false)]
    watch_outdoor_temperature: bool,
    #[default(60)]
    watch_interval_seconds: u64,
}

// Entity ids in the state store
#[derive(Clone, Copy, Debug)]
pub struct Entities {
    pub outdoor_temperature: &'static str,
    pub x_min: &'static str,
    pub x_max: &'static str,
    pub curve: &'static str,
    pub delta: &'static str,
}

// Used when the corresponding entity is missing or not a number
#[derive(Clone, Copy, Debug)]
pub struct ReadingDefaults {
    pub outdoor_temperature: f64,
    pub x_min: f64,
    pub x_max: f64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub state_file: PathBuf,
    pub entities: Entities,
    pub defaults: ReadingDefaults,
    pub tick_interval: Duration,
    // Poll the outdoor temperature and recompute when it changes
    pub watch_interval: Option<Duration>,
    pub debug: bool,
    pub debug_to_notification: bool,
}

impl Config {
    pub fn read() -> Self {
        Config::from(TOML_CONFIG)
    }

    pub fn with_state_file(self, state_file: Option<PathBuf>) -> Self {
        match state_file {
            Some(state_file) => Config { state_file, ..self },
            None => self,
        }
    }
}

impl From<TomlConfig> for Config {
    fn from(config: TomlConfig) -> Self {
        Config {
            state_file: PathBuf::from(config.state_file),
            entities: Entities {
                outdoor_temperature: config.outdoor_temperature_entity,
                x_min: config.x_min_entity,
                x_max: config.x_max_entity,
                curve: config.curve_entity,
                delta: config.delta_entity,
            },
            tick_interval: Duration::from_secs(config.tick_interval_minutes.max(1) * 60),
            watch_interval: config
                .watch_outdoor_temperature
                .then(|| Duration::from_secs(config.watch_interval_seconds.max(1))),
            debug: config.debug,
            debug_to_notification: config.debug_to_notification,
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            state_file: PathBuf::from("heating-curve-state.json"),
            entities: Entities {
                outdoor_temperature: "sensor.samsung_ehssentinel_outdoorouttemp",
                x_min: "number.samsung_ehssentinel_infsv2011",
                x_max: "number.samsung_ehssentinel_infsv2012",
                curve: "input_text.heizkurve_segments",
                delta: "input_number.heizkurve_delta",
            },
            defaults: ReadingDefaults {
                outdoor_temperature: 0.0,
                x_min: -14.0,
                x_max: 18.0,
            },
            tick_interval: Duration::from_secs(60 * 60),
            watch_interval: None,
            debug: true,
            debug_to_notification: true,
        }
    }
}
