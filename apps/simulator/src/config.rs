use std::{collections::HashMap, fs};

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub watchdog_ms: u64,
    pub hook_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watchdog_ms: 10,
            hook_delay_ms: 2,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("simulator.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Some(v) = env_ms("SIMULATOR_WATCHDOG_MS") {
        settings.watchdog_ms = v;
    }
    if let Some(v) = env_ms("APP__WATCHDOG_MS") {
        settings.watchdog_ms = v;
    }

    if let Some(v) = env_ms("SIMULATOR_HOOK_DELAY_MS") {
        settings.hook_delay_ms = v;
    }
    if let Some(v) = env_ms("APP__HOOK_DELAY_MS") {
        settings.hook_delay_ms = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("watchdog_ms").and_then(|v| parse_ms(v)) {
        settings.watchdog_ms = v;
    }
    if let Some(v) = file_cfg.get("hook_delay_ms").and_then(|v| parse_ms(v)) {
        settings.hook_delay_ms = v;
    }
}

fn env_ms(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| parse_ms(&v))
}

fn parse_ms(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
