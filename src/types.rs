//! Shared types used across the codebase

/// Sort direction for table listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Ordering applied to a table listing, e.g. `id` descending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub direction: Direction,
}

impl Order {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, direction: Direction::Asc }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, direction: Direction::Desc }
    }
}

/// Equality filter targeting rows where `column = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<String>) -> Self {
        Self { column, value: value.into() }
    }

    /// Filter by the `id` column
    pub fn id(value: impl Into<String>) -> Self {
        Self::eq("id", value)
    }
}
