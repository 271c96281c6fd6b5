use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the JSON catalog produced by the training pipeline
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seed for the per-catalog tie-break generator
    #[serde(default = "default_noise_seed")]
    pub noise_seed: u64,

    /// Result size when a request does not ask for one
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Largest result size a request may ask for
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_noise_seed() -> u64 {
    42
}

fn default_top_k() -> usize {
    20
}

fn default_max_top_k() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            host: default_host(),
            port: default_port(),
            noise_seed: default_noise_seed(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_top_k == 0 {
            anyhow::bail!("MAX_TOP_K must be at least 1");
        }
        if self.default_top_k == 0 || self.default_top_k > self.max_top_k {
            anyhow::bail!(
                "DEFAULT_TOP_K must be between 1 and MAX_TOP_K ({})",
                self.max_top_k
            );
        }
        Ok(())
    }
}
