pub mod commands;

// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    RunSummary, SearchMode, build_config, build_config_with, fetch_candidates, load_queries,
    run_search,
};
