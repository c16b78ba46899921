use crate::domain::entities::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::error::DomainError;

pub trait CategoryRepository: Send + Sync {
    fn create(&self, category: &NewCategory) -> Result<Category, DomainError>;
    fn get(&self, id: i64) -> Result<Option<Category>, DomainError>;
    fn get_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;
    fn list(&self) -> Result<Vec<Category>, DomainError>;
    /// Returns `None` when no category has this id.
    fn update(&self, id: i64, update: &CategoryUpdate) -> Result<Option<Category>, DomainError>;
    /// Deletes the category with its posts and their analyses.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
