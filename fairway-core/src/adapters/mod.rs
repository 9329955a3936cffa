//! Adapter implementations
//!
//! Adapters implement the port traits with concrete backends:
//! - Supabase REST client for the hosted identity/data service
//! - In-memory backend for demo mode and tests

pub mod memory;
pub mod supabase;
