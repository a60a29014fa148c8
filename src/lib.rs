pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod router;
pub mod views;

pub use error::AtelierError;
pub use router::{AtelierState, ResetSettings, atelier_router};
