//! Supabase implementation of `FinanceStore`.

pub mod supabase;

pub use supabase::SupabaseStore;
