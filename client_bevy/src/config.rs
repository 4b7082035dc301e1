//! Startup overrides: environment variables on native, URL query on wasm.

use marble_race_core::config::DEFAULT_MAP_ID;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_STORAGE_PATH: &str = "marble-race.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub map_id: String,
    pub seed: Option<u64>,
    /// Roster file on native targets.
    #[cfg(not(target_arch = "wasm32"))]
    pub storage_path: std::path::PathBuf,
}

impl ClientConfig {
    /// `MARBLE_RACE_MAP`, `MARBLE_RACE_SEED`, `MARBLE_RACE_STORAGE`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env_or_location() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            map_id: map_or_default(var("MARBLE_RACE_MAP").as_deref()),
            seed: parse_seed(var("MARBLE_RACE_SEED").as_deref()),
            storage_path: var("MARBLE_RACE_STORAGE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string())
                .into(),
        }
    }

    /// `?map=<id>&seed=<n>` on the page URL.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env_or_location() -> Self {
        let href = web_sys::window().and_then(|w| w.location().href().ok());
        let mut map = None;
        let mut seed = None;
        if let Some(url) = href.and_then(|h| url::Url::parse(&h).ok()) {
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "map" => map = Some(value.into_owned()),
                    "seed" => seed = Some(value.into_owned()),
                    _ => {}
                }
            }
        }
        Self {
            map_id: map_or_default(map.as_deref()),
            seed: parse_seed(seed.as_deref()),
        }
    }
}

fn map_or_default(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_MAP_ID)
        .to_string()
}

fn parse_seed(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}
