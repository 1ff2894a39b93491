//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;

/// Connection string for the site database.
///
/// Reads `SITE_DATABASE_URL`, falling back to `DATABASE_URL` like the server.
fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();

    std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}
