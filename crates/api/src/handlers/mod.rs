pub mod ai_agents;
pub mod auth;
pub mod creator_projects;
pub mod creators;
pub mod draw_requests;
pub mod esign;
pub mod shipping;
pub mod subscriptions;
pub mod tax_forms;
pub mod tenants;
pub mod users;
pub mod welcome_calls;
