//! Customer Service - command line access to the customer directory.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use customer_service_lib::config::{CustomerServiceConfig, StorageBackend};
use customer_service_lib::CustomerCommand;
use domain::{CustomerRegistrationRequest, CustomerUpdateRequest, Gender};

#[derive(Parser)]
#[command(name = "customer-service")]
#[command(about = "Customer directory management")]
struct Cli {
    /// Storage backend (overrides CUSTOMER_SERVICE_BACKEND)
    #[arg(long, value_enum)]
    backend: Option<StorageBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all customers
    List,
    /// Show a single customer
    Get { id: i32 },
    /// Register a new customer
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CUSTOMER_PASSWORD")]
        password: String,
        #[arg(long)]
        age: i32,
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,
    },
    /// Change one or more fields of a customer
    Update {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
    },
    /// Delete a customer
    Delete { id: i32 },
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    value.parse().map_err(|e: domain::DomainError| e.to_string())
}

impl From<Commands> for CustomerCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::List => CustomerCommand::List,
            Commands::Get { id } => CustomerCommand::Get(id),
            Commands::Add {
                name,
                email,
                password,
                age,
                gender,
            } => CustomerCommand::Add(CustomerRegistrationRequest {
                name,
                email,
                password,
                age,
                gender,
            }),
            Commands::Update {
                id,
                name,
                email,
                age,
                gender,
            } => CustomerCommand::Update(
                id,
                CustomerUpdateRequest {
                    name,
                    email,
                    age,
                    gender,
                },
            ),
            Commands::Delete { id } => CustomerCommand::Delete(id),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = CustomerServiceConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.service.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let service = customer_service_lib::build_service(&config).await?;

    match customer_service_lib::execute(service.as_ref(), cli.command.into()).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(code = e.code(), "{}", e.user_message());
            std::process::exit(1);
        }
    }
}
