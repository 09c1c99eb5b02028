//! Customer repository trait and its relational implementation.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::debug;

use super::entities::customer::{self, ActiveModel, Entity as CustomerEntity};
use common::{AppError, AppResult};
use domain::Customer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Customer repository trait for dependency injection.
///
/// This is the only storage type the customer service depends on. Every
/// method is a single primitive operation; any backend failure propagates.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// List all customers in backend-defined order
    async fn list_all(&self) -> AppResult<Vec<Customer>>;

    /// Find customer by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>>;

    /// Find customer by login identifier (exact match on email)
    async fn find_by_email_login(&self, email: &str) -> AppResult<Option<Customer>>;

    /// Check whether a customer with this email exists
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Check whether a customer with this ID exists
    async fn exists_by_id(&self, id: i32) -> AppResult<bool>;

    /// Insert a new customer, returning the identifier assigned by the backend
    async fn insert(&self, customer: Customer) -> AppResult<i32>;

    /// Write name, email, age and gender for the customer keyed by `customer.id`.
    ///
    /// Updating an ID that does not exist is a no-op.
    async fn update(&self, customer: Customer) -> AppResult<()>;

    /// Delete customer by ID (no-op if absent)
    async fn delete_by_id(&self, id: i32) -> AppResult<()>;
}

/// Relational implementation of CustomerRepository
pub struct CustomerStore {
    db: DatabaseConnection,
}

impl CustomerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unique violations on `email` surface as duplicates, everything else as-is.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::duplicate("email already taken"),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn list_all(&self) -> AppResult<Vec<Customer>> {
        let models = CustomerEntity::find()
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(Customer::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(Customer::try_from).transpose()
    }

    async fn find_by_email_login(&self, email: &str) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(Customer::try_from).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn exists_by_id(&self, id: i32) -> AppResult<bool> {
        let count = CustomerEntity::find()
            .filter(customer::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn insert(&self, customer: Customer) -> AppResult<i32> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(customer.name),
            email: Set(customer.email),
            password: Set(customer.password),
            age: Set(customer.age),
            gender: Set(customer.gender.to_string()),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        Ok(model.id)
    }

    async fn update(&self, customer: Customer) -> AppResult<()> {
        let id = customer
            .id
            .ok_or_else(|| AppError::internal("cannot update a customer without id"))?;

        let result = CustomerEntity::update_many()
            .col_expr(customer::Column::Name, Expr::value(customer.name))
            .col_expr(customer::Column::Email, Expr::value(customer.email))
            .col_expr(customer::Column::Age, Expr::value(customer.age))
            .col_expr(
                customer::Column::Gender,
                Expr::value(customer.gender.to_string()),
            )
            .filter(customer::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_write_err)?;

        if result.rows_affected == 0 {
            debug!(customer_id = id, "Update matched no customer");
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<()> {
        let result = CustomerEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            debug!(customer_id = id, "Delete matched no customer");
        }

        Ok(())
    }
}
