//! Query-string switches, e.g. `index.html?muted=1&safety_ms=5000`.

pub const DEFAULT_SAFETY_MS: u32 = 3000;
const MAX_SAFETY_MS: u32 = 60_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Skip the background track entirely.
    pub muted: bool,
    /// How long to wait for assets before starting anyway.
    pub safety_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            muted: false,
            safety_ms: DEFAULT_SAFETY_MS,
        }
    }
}

impl Config {
    /// Parses `location.search`. Unknown keys and malformed values are
    /// ignored.
    pub fn from_query(search: &str) -> Self {
        let mut config = Self::default();

        let query = search.strip_prefix('?').unwrap_or(search);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "muted" => config.muted = matches!(value, "" | "1" | "true"),
                "safety_ms" => {
                    if let Ok(ms) = value.parse::<u32>() {
                        config.safety_ms = ms.min(MAX_SAFETY_MS);
                    }
                }
                _ => {}
            }
        }

        config
    }
}
