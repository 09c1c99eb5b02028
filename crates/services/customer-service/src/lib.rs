//! Customer Service Library
//!
//! This crate provides customer directory management: registration, lookup,
//! partial update and deletion over a pluggable storage backend. The
//! backend is chosen by the caller and injected into the service; the
//! service never knows which one it talks to.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use common::{AppError, AppResult};
use domain::{
    Argon2PasswordEncoder, CustomerRegistrationRequest, CustomerUpdateRequest, PasswordEncoder,
};

use crate::config::{CustomerServiceConfig, StorageBackend};
use crate::infra::Database;
use crate::repository::{CustomerRepository, CustomerStore, InMemoryCustomerStore};
use crate::service::{CustomerManager, CustomerService};

/// Build the repository for the configured backend.
///
/// `encoder` hashes the credentials of the in-memory sample customers.
pub async fn build_repository(
    config: &CustomerServiceConfig,
    encoder: &dyn PasswordEncoder,
) -> AppResult<Arc<dyn CustomerRepository>> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory customer store");
            Ok(Arc::new(InMemoryCustomerStore::with_sample_data(encoder)?))
        }
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            info!("Using database customer store");
            Ok(Arc::new(CustomerStore::new(db.get_connection())))
        }
    }
}

/// Wire the customer service with the configured backend and Argon2 hashing.
pub async fn build_service(config: &CustomerServiceConfig) -> AppResult<Arc<dyn CustomerService>> {
    let encoder = Arc::new(Argon2PasswordEncoder::new());
    let repo = build_repository(config, &*encoder).await?;
    Ok(Arc::new(CustomerManager::new(repo, encoder)))
}

/// A single customer operation requested from the command line.
#[derive(Debug, Clone)]
pub enum CustomerCommand {
    List,
    Get(i32),
    Add(CustomerRegistrationRequest),
    Update(i32, CustomerUpdateRequest),
    Delete(i32),
}

/// Run one command against the service, returning the JSON to print.
pub async fn execute(service: &dyn CustomerService, command: CustomerCommand) -> AppResult<Value> {
    let value = match command {
        CustomerCommand::List => to_json(&service.get_all_customers().await?)?,
        CustomerCommand::Get(id) => to_json(&service.get_customer(id).await?)?,
        CustomerCommand::Add(request) => {
            let email = request.email.clone();
            service.add_customer(request).await?;
            let customer = service.get_customer_by_login(&email).await?;
            to_json(&domain::CustomerDto::from(customer))?
        }
        CustomerCommand::Update(id, request) => {
            service.update_customer(id, request).await?;
            to_json(&service.get_customer(id).await?)?
        }
        CustomerCommand::Delete(id) => {
            service.delete_customer_by_id(id).await?;
            serde_json::json!({ "deleted": id })
        }
    };

    Ok(value)
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::internal(e.to_string()))
}
