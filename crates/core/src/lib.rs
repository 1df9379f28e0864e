//! Domain logic for the CGK platform backend.
//!
//! This crate has no internal dependencies and no database access. Every
//! rule that decides whether a mutation is legal, and every piece of
//! billing, scheduling or scoring arithmetic, lives here so the API and
//! repository layers can share it.

pub mod backoff;
pub mod creator;
pub mod creator_project;
pub mod delivery_customization;
pub mod draw_request;
pub mod error;
pub mod esign;
pub mod familiarity;
pub mod hashing;
pub mod pagination;
pub mod roles;
pub mod state_machine;
pub mod subscription;
pub mod tax_form;
pub mod tenant;
pub mod types;
pub mod welcome_call;
