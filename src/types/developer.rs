use serde::{Deserialize, Serialize};

use super::opaque_id;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub username: String,
}
