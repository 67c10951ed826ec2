//! Declarative catalog of the content tables exposed by the gateway.
//!
//! Routes for every entry are generated from this list, so adding a table here
//! is enough to expose it on both routers.

use crate::types::Order;

/// Singleton table holding the site owner's profile
pub const ABOUT_TABLE: &str = "about";

/// Primary key of the only `about` row
pub const ABOUT_ID: &str = "1";

/// Table receiving visitor contact messages
pub const MESSAGES_TABLE: &str = "messages";

/// Admin operations registered for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOps {
    /// list, create, update, delete
    Full,
    /// list and delete only
    ListDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    /// Ordering of the admin listing (newest first)
    pub admin_order: Order,
    /// Exposed read-only at `/api/<name>`
    pub public: bool,
    pub ops: AdminOps,
}

impl TableSpec {
    const fn content(name: &'static str) -> Self {
        Self {
            name,
            admin_order: Order::desc("id"),
            public: true,
            ops: AdminOps::Full,
        }
    }

    /// Ordering of the public listing
    pub fn public_order(&self) -> Order {
        Order::asc("id")
    }

    pub fn collection_path(&self) -> String {
        format!("/api/{}", self.name)
    }

    pub fn admin_collection_path(&self) -> String {
        format!("/api/admin/{}", self.name)
    }

    pub fn admin_record_path(&self) -> String {
        format!("/api/admin/{}/:id", self.name)
    }
}

pub static TABLES: &[TableSpec] = &[
    TableSpec::content("skills"),
    TableSpec::content("projects"),
    TableSpec::content("blogs"),
    TableSpec::content("experience"),
    TableSpec::content("testimonials"),
    TableSpec::content("services"),
    TableSpec {
        name: MESSAGES_TABLE,
        admin_order: Order::desc("created_at"),
        public: false,
        ops: AdminOps::ListDelete,
    },
];
