pub mod earth_engine;
pub mod toml_config;

use crate::config::earth_engine::EarthEngineConfig;
use crate::config::toml_config::TomlConfig;
use crate::utils::error::{NdviError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(name = "amazon-ndvi")]
#[command(about = "Amazon NDVI dashboard API backed by Google Earth Engine")]
pub struct ServerConfig {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// TOML file with an [earth_engine] table; environment variables are used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| NdviError::InvalidConfigValueError {
                field: "host".to_string(),
                value: self.host.clone(),
                reason: format!("Invalid listen address: {}", e),
            })
    }

    /// 載入 Earth Engine 設定：有指定檔案時讀 TOML，否則讀環境變數
    pub fn earth_engine_config(&self) -> Result<EarthEngineConfig> {
        let config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.earth_engine
            }
            None => EarthEngineConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        self.socket_addr()?;
        Ok(())
    }
}
