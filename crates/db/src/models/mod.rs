//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod ai_agent;
pub mod creator;
pub mod creator_project;
pub mod draw_request;
pub mod esign;
pub mod session;
pub mod subscription;
pub mod tax_form;
pub mod tenant;
pub mod user;
pub mod welcome_call;
