mod bug;
mod developer;
mod role;
mod severity;
mod status;

pub use bug::{BugReport, NewBug, Stats};
pub use developer::Developer;
pub use role::{Capability, Role};
pub use severity::Severity;
pub use status::BugStatus;

use serde::{Deserialize, Deserializer};

/// Server ids may arrive as JSON numbers or strings; both are kept as text.
pub(crate) fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
