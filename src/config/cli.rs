use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::config::DEFAULT_BASE_URL;
use crate::domain::model::ServiceType;
use crate::domain::ports::SessionStorage;
use crate::utils::error::Result;

#[derive(Debug, Parser)]
#[command(name = "chargehive-provider")]
#[command(about = "Client for the ChargeHive service-provider portal")]
pub struct Cli {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = ".chargehive", help = "Directory for the persisted session")]
    pub data_dir: String,

    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with provider credentials
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a provider account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        business_name: String,
        #[arg(long)]
        phone: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the current authentication state
    Status,
    /// Fetch the provider profile
    Profile,
    /// List service locations
    Services {
        #[arg(long, help = "Only this provider's services")]
        mine: bool,
    },
    /// Add a charger or parking service at a map coordinate
    AddService {
        #[arg(long)]
        latitude: f64,
        #[arg(long)]
        longitude: f64,
        #[arg(long, default_value = "charger")]
        service_type: ServiceType,
        #[arg(long)]
        hourly_rate: String,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        street_number: Option<String>,
        #[arg(long, help = "Place name fallback when no street is known")]
        place_name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        subregion: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        postal_code: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    /// Fetch wallet details
    Wallet,
    /// Fetch recent wallet transactions
    Transactions {
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Fetch the CHT token balance
    Balance,
}

/// Session storage backed by one file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl SessionStorage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.base_path.join(key);
        match fs::read_to_string(full_path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(self.base_path.join(key), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.base_path.join(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
