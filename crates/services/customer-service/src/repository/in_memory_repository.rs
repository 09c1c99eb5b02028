//! In-memory implementation of CustomerRepository.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::CustomerRepository;
use common::{AppError, AppResult};
use domain::{Customer, Gender, PasswordEncoder};

/// Plain text credential of the sample customers.
pub const SAMPLE_PASSWORD: &str = "password";

struct Inner {
    customers: Vec<Customer>,
    /// Highest id handed out so far
    last_id: i32,
}

impl Inner {
    fn allocate_id(&mut self) -> AppResult<i32> {
        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::internal("customer id space exhausted"))?;
        self.last_id = id;
        Ok(id)
    }
}

/// Customer store backed by a mutex-guarded list.
///
/// Each repository call takes the lock exactly once, so every primitive
/// operation is atomic with respect to other callers. List order is
/// insertion order.
pub struct InMemoryCustomerStore {
    inner: Mutex<Inner>,
}

impl InMemoryCustomerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                customers: Vec::new(),
                last_id: 0,
            }),
        }
    }

    /// Create a store holding the given customers.
    ///
    /// Customers without an id are numbered after the highest existing id.
    pub fn with_customers(customers: Vec<Customer>) -> AppResult<Self> {
        let mut inner = Inner {
            customers: Vec::with_capacity(customers.len()),
            last_id: customers.iter().filter_map(|c| c.id).max().unwrap_or(0),
        };

        for mut customer in customers {
            if customer.id.is_none() {
                customer.id = Some(inner.allocate_id()?);
            }
            inner.customers.push(customer);
        }

        Ok(Self {
            inner: Mutex::new(inner),
        })
    }

    /// Create a store seeded with two sample customers (ids 1 and 2).
    ///
    /// Both share `SAMPLE_PASSWORD`, stored hashed with `encoder`.
    pub fn with_sample_data(encoder: &dyn PasswordEncoder) -> AppResult<Self> {
        Self::with_customers(vec![
            Customer::with_id(
                1,
                "German".to_string(),
                "german@gmail.com".to_string(),
                encoder.encode(SAMPLE_PASSWORD)?,
                28,
                Gender::Male,
            ),
            Customer::with_id(
                2,
                "Mateo".to_string(),
                "mateo@gmail.com".to_string(),
                encoder.encode(SAMPLE_PASSWORD)?,
                12,
                Gender::Male,
            ),
        ])
    }
}

impl Default for InMemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerStore {
    async fn list_all(&self) -> AppResult<Vec<Customer>> {
        Ok(self.inner.lock().await.customers.clone())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>> {
        let inner = self.inner.lock().await;
        Ok(inner.customers.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn find_by_email_login(&self, email: &str) -> AppResult<Option<Customer>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .customers
            .iter()
            .find(|c| c.username() == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.customers.iter().any(|c| c.email == email))
    }

    async fn exists_by_id(&self, id: i32) -> AppResult<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.customers.iter().any(|c| c.id == Some(id)))
    }

    async fn insert(&self, mut customer: Customer) -> AppResult<i32> {
        let mut inner = self.inner.lock().await;

        if inner.customers.iter().any(|c| c.email == customer.email) {
            return Err(AppError::duplicate("email already taken"));
        }

        let id = inner.allocate_id()?;
        customer.id = Some(id);
        inner.customers.push(customer);

        Ok(id)
    }

    async fn update(&self, customer: Customer) -> AppResult<()> {
        let id = customer
            .id
            .ok_or_else(|| AppError::internal("cannot update a customer without id"))?;

        let mut inner = self.inner.lock().await;

        if inner
            .customers
            .iter()
            .any(|c| c.id != Some(id) && c.email == customer.email)
        {
            return Err(AppError::duplicate("email already taken"));
        }

        match inner.customers.iter_mut().find(|c| c.id == Some(id)) {
            Some(existing) => {
                existing.name = customer.name;
                existing.email = customer.email;
                existing.age = customer.age;
                existing.gender = customer.gender;
            }
            None => debug!(customer_id = id, "Update matched no customer"),
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        let before = inner.customers.len();
        inner.customers.retain(|c| c.id != Some(id));

        if inner.customers.len() == before {
            debug!(customer_id = id, "Delete matched no customer");
        }

        Ok(())
    }
}
