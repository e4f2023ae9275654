//! Pieces shared by the auth and submission services: roles, bearer tokens,
//! the HTTP error type, the SQLite handle and tracing setup.

pub mod db;
pub mod error;
pub mod role;
pub mod telemetry;
pub mod token;

pub use error::{AppError, Result};
pub use role::Role;
pub use token::{Claims, TokenError, TokenService};
