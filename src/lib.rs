// Library for tests to access modules

pub mod badge;
pub mod catalogue_repo;
pub mod config;
pub mod downloads_repo;
pub mod models;
pub mod routes;
pub mod sparkline;
pub mod throttle;
pub mod update_service;
pub mod version;
