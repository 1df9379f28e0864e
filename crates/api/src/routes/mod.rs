pub mod ai_agents;
pub mod auth;
pub mod creator_projects;
pub mod creators;
pub mod draw_requests;
pub mod esign;
pub mod health;
pub mod platform;
pub mod shipping;
pub mod subscriptions;
pub mod tax_forms;
pub mod users;
pub mod welcome_calls;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /platform/tenants                                list, create (super_admin)
/// /platform/tenants/{slug}                         get, update (super_admin)
///
/// /users                                           list, create (tenant admin)
///
/// /creators                                        list, create
/// /creators/{id}                                   get, update, delete
///
/// /creator-projects                                list, create
/// /creator-projects/{id}                           get, update
/// /creator-projects/{id}/{transition}              submit, approve, request-revision,
///                                                  complete, cancel
///
/// /draw-requests                                   list, create
/// /draw-requests/{id}                              get
/// /draw-requests/{id}/{transition}                 approve, reject, mark-paid, cancel
///
/// /subscriptions                                   list, create
/// /subscriptions/due                               due on a date
/// /subscriptions/{id}                              get
/// /subscriptions/{id}/{action}                     skip, pause, resume, reschedule,
///                                                  frequency, cancel
///
/// /tax-forms                                       list, create
/// /tax-forms/{id}                                  get
/// /tax-forms/{id}/{transition}                     approve, reject, resubmit
///
/// /esign/documents                                 list, create (tenant admin)
/// /esign/documents/{id}                            get
/// /esign/documents/{id}/audit                      audit log
/// /esign/documents/{id}/void                       void
/// /esign/sign/{token}                              open (public)
/// /esign/sign/{token}/sign                         sign (public)
/// /esign/sign/{token}/decline                      decline (public)
///
/// /welcome-calls/availability                      list, create (tenant admin)
/// /welcome-calls/availability/{id}                 delete
/// /welcome-calls/slots                             open slots
/// /welcome-calls/bookings                          list, create
/// /welcome-calls/bookings/{id}                     get
/// /welcome-calls/bookings/{id}/{transition}        cancel, complete
///
/// /ai-agents                                       list, create
/// /ai-agents/{id}                                  get, update
/// /ai-agents/{id}/interactions                     record interaction
/// /ai-agents/{id}/relationships                    list
/// /ai-agents/{id}/relationships/{relationship_id}  get
///
/// /shipping/delivery-customization                 checkout hook (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Platform operator routes.
        .nest("/platform", platform::router())
        // Tenant-scoped resources.
        .nest("/users", users::router())
        .nest("/creators", creators::router())
        .nest("/creator-projects", creator_projects::router())
        .nest("/draw-requests", draw_requests::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/tax-forms", tax_forms::router())
        .nest("/esign", esign::router())
        .nest("/welcome-calls", welcome_calls::router())
        .nest("/ai-agents", ai_agents::router())
        // Storefront checkout hook.
        .nest("/shipping", shipping::router())
}
