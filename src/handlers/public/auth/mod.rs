// handlers/public/auth/mod.rs - Public authentication handlers
//
// Password verification and token issuance are delegated to the backing
// service; the gateway only relays credentials and the resulting session.

pub mod login; // POST /api/auth/login - authenticate and get access token

pub use login::login_post;
