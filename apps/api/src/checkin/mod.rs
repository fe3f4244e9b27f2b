// Daily check-in: symptom catalog, wizard, the shared session and its routes.

pub mod handlers;
pub mod session;
pub mod symptoms;
pub mod wizard;
