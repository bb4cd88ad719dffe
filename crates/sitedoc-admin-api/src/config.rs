use clap::Parser;

/// Configuration for the sitedoc admin API server.
#[derive(Parser, Debug, Clone)]
#[command(name = "sitedoc-admin-api")]
#[command(about = "Data-plane API for the sitedoc admin console")]
pub struct Config {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "ADMIN_API_HOST")]
    pub host: String,

    /// Port to bind to
    #[arg(long, default_value = "8787", env = "ADMIN_API_PORT")]
    pub port: u16,

    /// Store backend: "memory" (dev mode) or "postgrest"
    #[arg(long, default_value = "memory", env = "SITEDOC_STORE")]
    pub store: String,

    /// PostgREST/Supabase project base URL
    #[arg(long, env = "SUPABASE_URL")]
    pub postgrest_url: Option<String>,

    /// PostgREST/Supabase API key
    #[arg(long, env = "SUPABASE_KEY")]
    pub postgrest_key: Option<String>,

    /// Table holding the content row
    #[arg(long, default_value = "website_content", env = "SITEDOC_TABLE")]
    pub table: String,

    /// Atomic swap function name
    #[arg(
        long,
        default_value = "update_website_content",
        env = "SITEDOC_SWAP_FUNCTION"
    )]
    pub swap_function: String,

    /// Content row id
    #[arg(long, default_value = "1", env = "SITEDOC_ROW_ID")]
    pub row_id: i64,
}
