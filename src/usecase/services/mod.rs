pub mod edit_service;
pub mod grid_edit_controller;
pub mod import_service;
pub mod query_service;
