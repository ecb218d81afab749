use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Constructor {
    pub id: String,
    pub constructor_ref: String,
    pub name: String,
    pub nationality: String,
    pub url: String,
}

impl Constructor {
    pub fn unknown(id: &str) -> Constructor {
        Constructor {
            id: id.to_string(),
            constructor_ref: String::new(),
            name: "Unknown Team".to_string(),
            nationality: String::new(),
            url: String::new(),
        }
    }
}
