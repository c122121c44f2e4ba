pub mod client;
mod response;

pub use client::{OsrmClient, OsrmError};
