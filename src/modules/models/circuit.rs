use serde::{Deserialize, Serialize};

/// A circuit as listed in the source dataset. Coordinates stay text, the
/// dataset mixes precision and the catalog never does arithmetic on them.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Circuit {
    pub id: String,
    pub circuit_ref: String,
    pub name: String,
    pub location: String,
    pub country: String,
    pub lat: String,
    pub lng: String,
    pub alt: Option<String>,
    pub url: String,
}

impl Circuit {
    /// Placeholder substituted when a race points at a circuit id that is not
    /// in the store.
    pub fn unknown(id: &str) -> Circuit {
        Circuit {
            id: id.to_string(),
            circuit_ref: String::new(),
            name: "Unknown Circuit".to_string(),
            location: String::new(),
            country: String::new(),
            lat: String::new(),
            lng: String::new(),
            alt: None,
            url: String::new(),
        }
    }
}
