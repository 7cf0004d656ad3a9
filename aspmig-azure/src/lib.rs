//! Azure Resource Manager adapter for aspmig.
//!
//! [`ArmClient`] implements the domain's `AzureResources` port with blocking HTTP calls.
//! Tokens come from a [`TokenProvider`]: either a caller-supplied string or the Azure CLI.

mod arm;
mod token;

pub use arm::{ArmClient, ArmConfig, DEFAULT_MANAGEMENT_ENDPOINT, DEFAULT_TIMEOUT};
pub use token::{AzCliTokenProvider, StaticTokenProvider, TokenProvider};
