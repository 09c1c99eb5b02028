//! Customer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{Customer, Gender};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Customer {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let gender: Gender = model.gender.parse().map_err(|_| {
            AppError::internal(format!(
                "customer [{}] has unknown gender [{}]",
                model.id, model.gender
            ))
        })?;

        Ok(Customer::with_id(
            model.id,
            model.name,
            model.email,
            model.password,
            model.age,
            gender,
        ))
    }
}
