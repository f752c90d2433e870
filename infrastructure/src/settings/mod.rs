//! Connection settings sourced from the process environment.

mod env_provider;

pub use env_provider::{CONNECTION_ENV_KEYS, EnvSettingsProvider, load_dotenv};
