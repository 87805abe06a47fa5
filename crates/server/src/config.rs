use serde::{Deserialize, Serialize};

use domain::DEFAULT_HOOK_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Capacity of the fire-and-forget side-effect queue.
    pub hook_capacity: usize,
}

impl Config {
    pub fn new(database_url: String) -> Self {
        Self {
            database_url,
            max_connections: 5,
            hook_capacity: DEFAULT_HOOK_CAPACITY,
        }
    }
}
