use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Status {
    pub id: String,
    pub description: String,
}

impl Status {
    pub fn unknown(id: &str) -> Status {
        Status {
            id: id.to_string(),
            description: "Unknown".to_string(),
        }
    }
}
