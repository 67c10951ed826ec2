// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None (completely public access)
// Route Prefix: /api/* outside /api/admin, plus / and /health
// Middleware: None

pub mod auth;     // POST /api/auth/login - token acquisition
pub mod contact;  // POST /api/contact - visitor messages
pub mod content;  // GET /api/about, GET /api/<table>
pub mod system;   // GET /, GET /health

pub use auth::*;
