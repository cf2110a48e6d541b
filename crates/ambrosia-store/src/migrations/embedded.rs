//! Embedded SQL migrations, compiled in with `include_str!`

/// Migration metadata
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in apply order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_initial_schema",
            sql: include_str!("../../migrations/001_initial_schema.sql"),
        },
        Migration {
            id: "002_seed_imports",
            sql: include_str!("../../migrations/002_seed_imports.sql"),
        },
    ]
}
