use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Root of the remote task service, e.g. `http://localhost:8000`.
    pub base_url: String,
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("taskboard/config"))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}
