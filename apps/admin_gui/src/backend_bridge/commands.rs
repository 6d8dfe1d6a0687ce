//! Backend commands queued from UI to backend worker.

use client_core::FetchTicket;
use shared::{domain::CategoryId, protocol::CreateCategoryRequest};

pub enum BackendCommand {
    FetchCategories(FetchTicket),
    DeleteCategory { category_id: CategoryId },
    CreateCategory(CreateCategoryRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchCategories(_) => "fetch_categories",
            BackendCommand::DeleteCategory { .. } => "delete_category",
            BackendCommand::CreateCategory(_) => "create_category",
        }
    }
}
