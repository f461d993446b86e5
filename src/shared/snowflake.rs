//! Snowflake ID Generator
//!
//! Time-ordered 64-bit ids for accounts, videos, comments and messages.
//!
//! ```text
//! 63                         22          17          12          0
//! +---------------------------+-----------+-----------+-----------+
//! |  ms since custom epoch    |  machine  |   node    | sequence  |
//! +---------------------------+-----------+-----------+-----------+
//! ```

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch (2023-01-01T00:00:00.000Z)
pub const DEFAULT_EPOCH: u64 = 1672531200000;

const SEQUENCE_MASK: u64 = 0xFFF;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    machine_id: u64,
    node_id: u64,
    epoch: u64,
    // (last timestamp, sequence within that millisecond)
    state: Mutex<(u64, u64)>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator using the default epoch
    pub fn new(machine_id: u64, node_id: u64) -> Self {
        Self::with_epoch(machine_id, node_id, DEFAULT_EPOCH)
    }

    /// Create a generator with a custom epoch in milliseconds
    pub fn with_epoch(machine_id: u64, node_id: u64, epoch: u64) -> Self {
        Self {
            machine_id: machine_id & 0x1F, // 5 bits
            node_id: node_id & 0x1F,       // 5 bits
            epoch,
            state: Mutex::new((0, 0)),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        let mut timestamp = current_timestamp().max(state.0);

        let sequence = if timestamp == state.0 {
            let next = (state.1 + 1) & SEQUENCE_MASK;
            if next == 0 {
                // sequence exhausted for this millisecond, borrow the next one
                timestamp += 1;
            }
            next
        } else {
            0
        };
        *state = (timestamp, sequence);

        let id = ((timestamp.saturating_sub(self.epoch)) << 22)
            | (self.machine_id << 17)
            | (self.node_id << 12)
            | sequence;

        id as i64
    }

    /// Extract the unix timestamp in milliseconds from an id
    pub fn extract_timestamp(&self, snowflake: i64) -> u64 {
        ((snowflake as u64) >> 22) + self.epoch
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
