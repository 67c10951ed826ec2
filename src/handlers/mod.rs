// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token verified by the backing service)
pub mod public;    // /api/* reads, contact form, login, health
pub mod protected; // /api/admin/* CRUD and /api/auth/whoami
