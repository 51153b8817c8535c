//! Credentials read from the environment.
//!
//! Secrets never come from `config.toml`. Each one is looked up under its
//! server-side name first and the frontend `VITE_`-prefixed name second,
//! and is wrapped in a `SecretString` as soon as it is read.

use secrecy::SecretString;

pub const AGENT_API_KEY: &str = "AGENT_API_KEY";
pub const VITE_AGENT_API_KEY: &str = "VITE_AGENT_API_KEY";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const VITE_SUPABASE_ANON_KEY: &str = "VITE_SUPABASE_ANON_KEY";

/// Secrets the server needs at runtime.
#[derive(Default)]
pub struct EnvCredentials {
    /// IAM API key traded for bearer tokens.
    pub agent_api_key: Option<SecretString>,
    /// Public key sent as `apikey` to the hosted store.
    pub supabase_anon_key: Option<SecretString>,
}

impl EnvCredentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .find(|value| !value.trim().is_empty())
                .map(SecretString::from)
        };
        Self {
            agent_api_key: read(&[AGENT_API_KEY, VITE_AGENT_API_KEY]),
            supabase_anon_key: read(&[SUPABASE_ANON_KEY, VITE_SUPABASE_ANON_KEY]),
        }
    }
}

impl std::fmt::Debug for EnvCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |s: &Option<SecretString>| if s.is_some() { "[SET]" } else { "[UNSET]" };
        f.debug_struct("EnvCredentials")
            .field("agent_api_key", &state(&self.agent_api_key))
            .field("supabase_anon_key", &state(&self.supabase_anon_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn prefers_server_side_names() {
        let creds = EnvCredentials::from_lookup(|key| match key {
            AGENT_API_KEY => Some("server-key".to_string()),
            VITE_AGENT_API_KEY => Some("vite-key".to_string()),
            VITE_SUPABASE_ANON_KEY => Some("anon".to_string()),
            _ => None,
        });
        assert_eq!(creds.agent_api_key.unwrap().expose_secret(), "server-key");
        assert_eq!(creds.supabase_anon_key.unwrap().expose_secret(), "anon");
    }

    #[test]
    fn blank_values_are_unset() {
        let creds = EnvCredentials::from_lookup(|key| match key {
            AGENT_API_KEY => Some("   ".to_string()),
            _ => None,
        });
        assert!(creds.agent_api_key.is_none());
        assert!(creds.supabase_anon_key.is_none());
    }

    #[test]
    fn debug_never_prints_values() {
        let creds = EnvCredentials::from_lookup(|key| match key {
            AGENT_API_KEY => Some("hunter2".to_string()),
            _ => None,
        });
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[SET]"));
    }
}
