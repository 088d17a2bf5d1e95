use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SLUICE_ROUTER_RULES") {
            let rules: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if rules.is_empty() {
                tracing::warn!("ignoring empty SLUICE_ROUTER_RULES");
            } else {
                self.router.rules = rules;
            }
        }
        if let Ok(v) = std::env::var("SLUICE_CONVERTER_ENCODING") {
            self.converter.encoding = v;
        }
        if let Ok(v) = std::env::var("SLUICE_CONVERTER_STORE_FULL_PATH") {
            if let Ok(enabled) = v.parse::<bool>() {
                self.converter.store_full_path = enabled;
            } else {
                tracing::warn!("ignoring invalid SLUICE_CONVERTER_STORE_FULL_PATH value: {v}");
            }
        }
    }
}
