// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: Bearer token verified by the backing service
// Route Prefix: /api/admin/*, /api/auth/whoami
// Middleware: require_auth (injects AuthUser)

pub mod about;   // PUT /api/admin/about - singleton update
pub mod auth;    // Identity of the caller
pub mod records; // Generic per-table CRUD

pub use auth::*;
