use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Season {
    pub year: i32,
    pub url: String,
}

impl Season {
    /// The Wikipedia season page used when the store has no URL for a year.
    pub fn fallback_url(year: i32) -> String {
        format!("https://en.wikipedia.org/wiki/{year}_Formula_One_World_Championship")
    }
}
