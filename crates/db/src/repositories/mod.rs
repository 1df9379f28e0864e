//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Tenant-owned tables take
//! the tenant slug as the second argument and filter every statement on it.

pub mod ai_agent_repo;
pub mod creator_project_repo;
pub mod creator_repo;
pub mod draw_request_repo;
pub mod esign_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod tax_form_repo;
pub mod tenant_repo;
pub mod user_repo;
pub mod welcome_call_repo;

pub use ai_agent_repo::{AgentRelationshipRepo, AiAgentRepo};
pub use creator_project_repo::CreatorProjectRepo;
pub use creator_repo::CreatorRepo;
pub use draw_request_repo::DrawRequestRepo;
pub use esign_repo::EsignRepo;
pub use session_repo::SessionRepo;
pub use subscription_repo::SubscriptionRepo;
pub use tax_form_repo::TaxFormRepo;
pub use tenant_repo::TenantRepo;
pub use user_repo::UserRepo;
pub use welcome_call_repo::{AvailabilityRepo, BookingRepo};
