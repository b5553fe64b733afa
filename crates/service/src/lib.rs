//! Service layer: Supabase access and exam explanation helpers.
//! - Supabase persistence and auth stay behind [`supabase::SupabaseClient`].
//! - Explanation prompts and replies are handled in [`explanation`].

pub mod errors;
pub mod explanation;
pub mod supabase;
