// The persisted user profile: model, store, validation and routes.

pub mod handlers;
pub mod models;
pub mod store;
pub mod validation;
