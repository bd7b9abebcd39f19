pub mod config;
pub mod session;
pub mod stats;
pub mod timer;
pub mod workout;

use repflow_core::{Database, FixedIdentity};
use uuid::Uuid;

const ACTOR_KEY: &str = "actor_id";

/// Load the local actor identity, creating one on first use.
///
/// The CLI is single-user; one actor id is generated and kept in the
/// key-value store so XP, set logs, and badges attach to a stable owner.
pub fn local_identity(db: &Database) -> Result<FixedIdentity, Box<dyn std::error::Error>> {
    if let Some(raw) = db.kv_get(ACTOR_KEY)? {
        if let Ok(id) = raw.parse::<Uuid>() {
            return Ok(FixedIdentity(id));
        }
    }
    let id = Uuid::new_v4();
    db.kv_set(ACTOR_KEY, &id.to_string())?;
    Ok(FixedIdentity(id))
}
