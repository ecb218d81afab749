pub mod catalog;
pub mod ergast_api;
pub mod importer;

pub mod models {
    pub mod circuit;
    pub mod constructor;
    pub mod driver;
    pub mod race;
    pub mod race_result;
    pub mod season;
    pub mod status;
}

pub mod sources {
    pub mod csv_file;
    pub mod database;
    pub mod web_api;
}

pub mod helpers {
    pub mod fields;
    pub mod logging;
    pub mod settings;
    pub mod sort;
}
