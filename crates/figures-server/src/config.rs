use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;
use figures_app::state::AppConfig;
use figures_types::config::{CenturyBands, UploadConfig};

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "FIGURES_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "FIGURES_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "FIGURES_SEED_FILE",
        help = "JSON file with initial characters, built in demo records are used if not given"
    )]
    pub seed_file: Option<PathBuf>,

    #[arg(
        long,
        env = "FIGURES_DEFAULT_PAGE_SIZE",
        default_value = "10",
        help = "Default page size of the characters table"
    )]
    pub default_page_size: u32,

    #[arg(
        long,
        env = "FIGURES_CENTURY_BANDS",
        default_value = "900-1399",
        help = "Birth year ranges of dashboard century buckets, whole centuries, e.g. 900-1399 or 900-1099,1300-1399"
    )]
    pub century_bands: CenturyBands,

    #[command(flatten)]
    pub upload: UploadConfig,

    #[arg(long, env = "FIGURES_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            default_page_size: config.default_page_size,
            century_bands: config.century_bands.clone(),
            upload: config.upload.clone(),
        }
    }
}
