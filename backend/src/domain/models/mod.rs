//! Domain models. These are the shapes the services and storage layer agree
//! on; the REST layer maps them to the DTOs in the `shared` crate.

pub mod aspect;
pub mod record;
pub mod school_class;
pub mod settings;
pub mod staff;
pub mod student;
