//! Customer service - Handles customer-related business logic.
//!
//! Enforces email uniqueness, computes partial-update diffs and maps
//! stored customers to their external view.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use common::{AppError, AppResult, OptionExt};
use domain::{
    Customer, CustomerDto, CustomerRegistrationRequest, CustomerUpdateRequest, PasswordEncoder,
};

use crate::repository::CustomerRepository;

/// Customer service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// List all customers
    async fn get_all_customers(&self) -> AppResult<Vec<CustomerDto>>;

    /// Get customer by ID
    async fn get_customer(&self, id: i32) -> AppResult<CustomerDto>;

    /// Get the full customer record by login identifier (for authentication)
    async fn get_customer_by_login(&self, email: &str) -> AppResult<Customer>;

    /// Register a new customer
    async fn add_customer(&self, request: CustomerRegistrationRequest) -> AppResult<()>;

    /// Delete customer by ID
    async fn delete_customer_by_id(&self, id: i32) -> AppResult<()>;

    /// Apply the present fields of `request` to the customer
    async fn update_customer(&self, id: i32, request: CustomerUpdateRequest) -> AppResult<()>;
}

/// Concrete implementation of CustomerService using repository.
pub struct CustomerManager {
    repo: Arc<dyn CustomerRepository>,
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl CustomerManager {
    /// Create new customer service instance with its collaborators
    pub fn new(
        repo: Arc<dyn CustomerRepository>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            repo,
            password_encoder,
        }
    }
}

fn customer_not_found(id: i32) -> String {
    format!("customer with id [{}] not found", id)
}

/// Message of the first failing field, ordered by field name.
fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .first()
        .and_then(|(_, errors)| errors.first())
        .and_then(|error| error.message.as_ref())
        .map(|msg| msg.to_string())
        .unwrap_or_else(|| "Validation failed".to_string());
    AppError::validation(message)
}

#[async_trait]
impl CustomerService for CustomerManager {
    async fn get_all_customers(&self) -> AppResult<Vec<CustomerDto>> {
        let customers = self.repo.list_all().await?;
        Ok(customers.iter().map(CustomerDto::from).collect())
    }

    async fn get_customer(&self, id: i32) -> AppResult<CustomerDto> {
        self.repo
            .find_by_id(id)
            .await?
            .map(CustomerDto::from)
            .ok_or_not_found(customer_not_found(id))
    }

    async fn get_customer_by_login(&self, email: &str) -> AppResult<Customer> {
        self.repo
            .find_by_email_login(email)
            .await?
            .ok_or_not_found(format!("username {} not found", email))
    }

    async fn add_customer(&self, request: CustomerRegistrationRequest) -> AppResult<()> {
        request.validate().map_err(validation_error)?;

        if self.repo.exists_by_email(&request.email).await? {
            warn!(email = %request.email, "Registration rejected, email already taken");
            return Err(AppError::duplicate("email already taken"));
        }

        let password = self.password_encoder.encode(&request.password)?;
        let customer = Customer::new(
            request.name,
            request.email,
            password,
            request.age,
            request.gender,
        );

        let id = self.repo.insert(customer).await?;
        info!(customer_id = id, "Customer registered");
        Ok(())
    }

    async fn delete_customer_by_id(&self, id: i32) -> AppResult<()> {
        if !self.repo.exists_by_id(id).await? {
            return Err(AppError::not_found(customer_not_found(id)));
        }

        self.repo.delete_by_id(id).await?;
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    async fn update_customer(&self, id: i32, request: CustomerUpdateRequest) -> AppResult<()> {
        let mut customer = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_not_found(customer_not_found(id))?;

        request.validate().map_err(validation_error)?;

        let mut changed = false;

        if let Some(name) = request.name.filter(|name| *name != customer.name) {
            customer.name = name;
            changed = true;
        }

        if let Some(age) = request.age.filter(|age| *age != customer.age) {
            customer.age = age;
            changed = true;
        }

        if let Some(gender) = request.gender.filter(|gender| *gender != customer.gender) {
            customer.gender = gender;
            changed = true;
        }

        if let Some(email) = request.email.filter(|email| *email != customer.email) {
            if self.repo.exists_by_email(&email).await? {
                warn!(customer_id = id, email = %email, "Update rejected, email already taken");
                return Err(AppError::duplicate("email already taken"));
            }
            customer.email = email;
            changed = true;
        }

        if !changed {
            debug!(customer_id = id, "Update carried no changes");
            return Err(AppError::validation("no data changes found"));
        }

        self.repo.update(customer).await?;
        info!(customer_id = id, "Customer updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    use domain::{DomainResult, Gender, ROLE_USER};

    use crate::repository::MockCustomerRepository;

    /// Deterministic stand-in for the hashing capability.
    struct PrefixEncoder;

    impl PasswordEncoder for PrefixEncoder {
        fn encode(&self, plain_text: &str) -> DomainResult<String> {
            Ok(format!("encoded:{}", plain_text))
        }

        fn matches(&self, plain_text: &str, hash: &str) -> bool {
            hash == format!("encoded:{}", plain_text)
        }
    }

    fn german() -> Customer {
        Customer::with_id(
            1,
            "German".to_string(),
            "german@gmail.com".to_string(),
            "encoded:password".to_string(),
            28,
            Gender::Male,
        )
    }

    fn service(repo: MockCustomerRepository) -> CustomerManager {
        CustomerManager::new(Arc::new(repo), Arc::new(PrefixEncoder))
    }

    fn registration(email: &str) -> CustomerRegistrationRequest {
        CustomerRegistrationRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "password".to_string(),
            age: 19,
            gender: Gender::Female,
        }
    }

    #[tokio::test]
    async fn test_get_all_customers_maps_to_view() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_list_all().returning(|| Ok(vec![german()]));

        let customers = service(repo).get_all_customers().await.unwrap();

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].authorities, vec![ROLE_USER.to_string()]);
        assert_eq!(customers[0].username, "german@gmail.com");
    }

    #[tokio::test]
    async fn test_get_customer_success() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(german())));

        let customer = service(repo).get_customer(1).await.unwrap();

        assert_eq!(customer.id, Some(1));
        assert_eq!(customer.name, "German");
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo).get_customer(10).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "customer with id [10] not found");
    }

    #[tokio::test]
    async fn test_get_customer_by_login_not_found() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_email_login().returning(|_| Ok(None));

        let err = service(repo)
            .get_customer_by_login("nobody@gmail.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_customer_hashes_password_and_inserts() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_exists_by_email()
            .withf(|email| email == "ana@gmail.com")
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|customer| {
                customer.id.is_none()
                    && customer.name == "Ana"
                    && customer.email == "ana@gmail.com"
                    && customer.age == 19
                    && customer.gender == Gender::Female
                    && customer.password == "encoded:password"
            })
            .times(1)
            .returning(|_| Ok(3));

        assert_ok!(service(repo).add_customer(registration("ana@gmail.com")).await);
    }

    #[tokio::test]
    async fn test_add_customer_duplicate_email() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(true));
        repo.expect_insert().never();

        let err = service(repo)
            .add_customer(registration("german@gmail.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateResource(_)));
    }

    #[tokio::test]
    async fn test_add_customer_rejects_invalid_request() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_exists_by_email().never();
        repo.expect_insert().never();

        let mut request = registration("ana@gmail.com");
        request.name = String::new();

        let err = service(repo).add_customer(request).await.unwrap_err();

        assert!(matches!(err, AppError::RequestValidation(_)));
        assert_eq!(err.to_string(), "Name cannot be empty");
    }

    #[tokio::test]
    async fn test_add_customer_reports_first_invalid_field_by_name() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_insert().never();

        let mut request = registration("not-an-email");
        request.name = String::new();
        request.password = String::new();

        // email < name < password
        let err = service(repo).add_customer(request).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[tokio::test]
    async fn test_add_customer_accepts_any_age() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|customer| customer.age == -1)
            .times(1)
            .returning(|_| Ok(3));

        let mut request = registration("ana@gmail.com");
        request.age = -1;

        assert_ok!(service(repo).add_customer(request).await);
    }

    #[tokio::test]
    async fn test_delete_customer_success() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_exists_by_id().with(eq(1)).returning(|_| Ok(true));
        repo.expect_delete_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        assert_ok!(service(repo).delete_customer_by_id(1).await);
    }

    #[tokio::test]
    async fn test_delete_customer_not_found() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_exists_by_id().returning(|_| Ok(false));
        repo.expect_delete_by_id().never();

        let err = service(repo).delete_customer_by_id(10).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_customer_not_found() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let request = CustomerUpdateRequest {
            name: Some("foo".to_string()),
            ..Default::default()
        };
        let err = service(repo).update_customer(10, request).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_customer_all_fields() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_exists_by_email()
            .withf(|email| email == "foo@gmail.com")
            .returning(|_| Ok(false));
        repo.expect_update()
            .withf(|customer| {
                customer.id == Some(1)
                    && customer.name == "foo"
                    && customer.email == "foo@gmail.com"
                    && customer.age == 30
                    && customer.gender == Gender::Female
                    && customer.password == "encoded:password"
            })
            .times(1)
            .returning(|_| Ok(()));

        let request = CustomerUpdateRequest {
            name: Some("foo".to_string()),
            email: Some("foo@gmail.com".to_string()),
            age: Some(30),
            gender: Some(Gender::Female),
        };

        assert_ok!(service(repo).update_customer(1, request).await);
    }

    #[tokio::test]
    async fn test_update_customer_only_name_keeps_other_fields() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_exists_by_email().never();
        repo.expect_update()
            .withf(|customer| {
                customer.name == "foo"
                    && customer.email == "german@gmail.com"
                    && customer.age == 28
                    && customer.gender == Gender::Male
            })
            .times(1)
            .returning(|_| Ok(()));

        let request = CustomerUpdateRequest {
            name: Some("foo".to_string()),
            ..Default::default()
        };

        assert_ok!(service(repo).update_customer(1, request).await);
    }

    #[tokio::test]
    async fn test_update_customer_duplicate_email() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_exists_by_email()
            .withf(|email| email == "mateo@gmail.com")
            .returning(|_| Ok(true));
        repo.expect_update().never();

        // The name change does not bypass the email check
        let request = CustomerUpdateRequest {
            name: Some("foo".to_string()),
            email: Some("mateo@gmail.com".to_string()),
            ..Default::default()
        };
        let err = service(repo).update_customer(1, request).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateResource(_)));
    }

    #[tokio::test]
    async fn test_update_customer_same_email_skips_uniqueness_check() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_exists_by_email().never();
        repo.expect_update().times(1).returning(|_| Ok(()));

        let request = CustomerUpdateRequest {
            email: Some("german@gmail.com".to_string()),
            age: Some(29),
            ..Default::default()
        };

        assert_ok!(service(repo).update_customer(1, request).await);
    }

    #[tokio::test]
    async fn test_update_customer_rejects_empty_name() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_exists_by_email().never();
        repo.expect_update().never();

        let request = CustomerUpdateRequest {
            name: Some(String::new()),
            email: Some("not-an-email".to_string()),
            age: Some(-5),
            ..Default::default()
        };
        let err = service(repo).update_customer(1, request).await.unwrap_err();

        assert!(matches!(err, AppError::RequestValidation(_)));
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[tokio::test]
    async fn test_update_customer_validates_after_lookup() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let request = CustomerUpdateRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        let err = service(repo).update_customer(10, request).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_customer_no_changes() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_exists_by_email().never();
        repo.expect_update().never();

        let request = CustomerUpdateRequest {
            name: Some("German".to_string()),
            email: Some("german@gmail.com".to_string()),
            age: Some(28),
            gender: Some(Gender::Male),
        };
        let err = service(repo).update_customer(1, request).await.unwrap_err();

        assert!(matches!(err, AppError::RequestValidation(_)));
        assert_eq!(err.to_string(), "no data changes found");
    }

    #[tokio::test]
    async fn test_update_customer_empty_request() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(german())));
        repo.expect_update().never();

        let result = service(repo)
            .update_customer(1, CustomerUpdateRequest::default())
            .await;

        assert_err!(result);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_list_all()
            .returning(|| Err(AppError::internal("store unavailable")));

        let err = service(repo).get_all_customers().await.unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}
