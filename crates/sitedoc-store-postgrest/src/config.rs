/// Connection settings for a PostgREST-compatible store. Supabase projects
/// work as-is: the REST surface lives under `{base_url}/rest/v1`.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project base URL, e.g. `https://abcdefgh.supabase.co`.
    pub base_url: String,
    /// API key, sent as both the `apikey` header and the bearer token.
    pub api_key: String,
    /// Table holding the single content row.
    pub table: String,
    /// Primary key of that row.
    pub row_id: i64,
    /// Name of the atomic swap function.
    pub swap_function: String,
}

impl PostgrestConfig {
    /// Settings matching the shipped `schema.sql`: table `website_content`,
    /// row id 1, function `update_website_content`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "website_content".to_string(),
            row_id: 1,
            swap_function: "update_website_content".to_string(),
        }
    }
}
