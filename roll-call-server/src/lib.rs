//! Jailhouse Roll Call: a small dashboard that lists the jails on a TrueNAS
//! host as an HTML table.

pub mod config;
pub mod error;
pub mod jail;
pub mod logging;
pub mod truenas;
pub mod web;

pub use config::Config;
pub use error::{Result, RollCallError};
pub use jail::{decode_jails, strip_interface_prefix, Jail, INTERFACE_PREFIX};
pub use truenas::TrueNasClient;
pub use web::{create_router, render_jails, AppState};
