//! Shared HTTP client.
//!
//! One `reqwest::Client` per process so connection pools are reused across
//! every remote call.

use once_cell::sync::Lazy;
use reqwest::Client;

static SHARED_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Get the process-wide HTTP client.
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}
