use crate::domain::entities::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::error::DomainError;
use crate::domain::ports::category_repository::CategoryRepository;
use std::sync::Arc;

pub struct CategoryUseCase {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryUseCase {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        if category.name.trim().is_empty() {
            return Err("Category name must not be empty".into());
        }
        self.ensure_name_free(&category.name)?;
        let created = self.repo.create(&category)?;
        tracing::info!(category_id = created.id, name = %created.name, "category created");
        Ok(created)
    }

    pub fn get(&self, id: i64) -> Result<Category, DomainError> {
        self.repo.get(id)?.ok_or_else(|| not_found(id))
    }

    pub fn list(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list()
    }

    pub fn update(&self, id: i64, update: CategoryUpdate) -> Result<Category, DomainError> {
        let current = self.get(id)?;
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err("Category name must not be empty".into());
            }
            if *name != current.name {
                self.ensure_name_free(name)?;
            }
        }
        self.repo.update(id, &update)?.ok_or_else(|| not_found(id))
    }

    /// Deletes the category along with its posts and their analyses.
    pub fn delete(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(not_found(id));
        }
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }

    fn ensure_name_free(&self, name: &str) -> Result<(), DomainError> {
        if self.repo.get_by_name(name)?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Category with name '{name}' already exists"
            )));
        }
        Ok(())
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::NotFound(format!("Category with id {id} not found"))
}
