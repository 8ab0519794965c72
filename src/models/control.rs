//! Remote control message wire format
//!
//! The foreground application drives lifecycle transitions and manual purges
//! with two fire-and-forget JSON messages: `{"type": "activate-now"}` and
//! `{"type": "purge-all"}`.

use serde::{Deserialize, Serialize};

/// Out-of-band command from the foreground application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ControlMessage {
    /// Force the waiting instance to skip the hand-off delay and activate.
    ActivateNow,
    /// Delete every namespace regardless of version.
    PurgeAll,
}
