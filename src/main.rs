use clap::Parser;

use chargehive_provider::config::cli::{Cli, Command};
use chargehive_provider::config::file::AppConfig;
use chargehive_provider::utils::{logger, validation::Validate};
use chargehive_provider::{
    ApiConfig, FileStorage, GeocodedAddress, ListingDraft, SessionState, SessionStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting chargehive-provider CLI");

    let (api_config, data_dir) = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(app) => {
                let data_dir = app
                    .data_dir()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| cli.data_dir.clone());
                (app.api_config(), data_dir)
            }
            Err(e) => {
                tracing::error!("❌ Failed to load config file {}: {}", path, e);
                eprintln!("❌ {}", e.user_message());
                std::process::exit(1);
            }
        },
        None => (ApiConfig::new(cli.base_url.clone()), cli.data_dir.clone()),
    };

    if let Err(e) = api_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }

    let storage = FileStorage::new(data_dir);
    let store = SessionStore::new(storage, api_config)?;
    store.restore().await;

    if let Err(e) = run(&cli.command, &store).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    command: &Command,
    store: &SessionStore<FileStorage>,
) -> chargehive_provider::Result<()> {
    match command {
        Command::Login { email, password } => {
            let profile = store.login(email, password).await?;
            println!("✅ Logged in as {} ({})", profile.name, profile.email);
        }
        Command::Signup {
            email,
            password,
            business_name,
            phone,
        } => {
            let profile = store.register(email, password, business_name, phone).await?;
            println!("✅ Account created for {} ({})", profile.name, profile.email);
        }
        Command::Logout => {
            store.logout().await;
            println!("✅ Logged out");
        }
        Command::Status => match store.state() {
            SessionState::Authenticated { profile, .. } => {
                println!("Authenticated as {} ({})", profile.name, profile.email);
            }
            _ => println!("Not authenticated"),
        },
        Command::Profile => {
            let profile = store.gateway().get_profile().await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Services { mine } => {
            let services = if *mine {
                store.gateway().get_provider_services().await?
            } else {
                store.gateway().get_all_services().await?
            };

            if services.is_empty() {
                println!("No services found");
            }
            for service in services {
                println!(
                    "{} {} at {} ({}, {}) — ${}/h [{}]",
                    service.service_id,
                    service.service_type,
                    service.address,
                    service.latitude,
                    service.longitude,
                    service.hourly_rate,
                    service.status
                );
            }
        }
        Command::AddService {
            latitude,
            longitude,
            service_type,
            hourly_rate,
            street,
            street_number,
            place_name,
            city,
            subregion,
            region,
            postal_code,
            country,
        } => {
            let address = GeocodedAddress {
                street: street.clone(),
                street_number: street_number.clone(),
                name: place_name.clone(),
                city: city.clone(),
                subregion: subregion.clone(),
                region: region.clone(),
                postal_code: postal_code.clone(),
                country: country.clone(),
            };

            // Validation happens here, before any network call.
            let payload = ListingDraft::new(*service_type)
                .with_location(*latitude, *longitude, address)
                .with_hourly_rate(hourly_rate.clone())
                .build()?;

            let listing = store.gateway().add_service(&payload).await?;
            println!(
                "✅ Service {} added at {}, {}",
                listing.service_id, listing.latitude, listing.longitude
            );
        }
        Command::Wallet => {
            let details = store.gateway().get_wallet_details().await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::Transactions { limit } => {
            let transactions = store
                .gateway()
                .get_wallet_transactions(Some(*limit))
                .await?;

            if transactions.is_empty() {
                println!("No transactions found");
            }
            for tx in transactions {
                println!(
                    "{} {} {} [{}]",
                    tx.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                    tx.amount.as_deref().unwrap_or("-"),
                    tx.tx_hash.as_deref().unwrap_or("-"),
                    tx.status.as_deref().unwrap_or("unknown")
                );
            }
        }
        Command::Balance => {
            let balance = store.gateway().get_cht_balance().await?;
            println!("CHT balance: {}", balance.balance);
        }
    }

    Ok(())
}
