use serde::Deserialize;
use std::collections::HashMap;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse `CURATOR_API_TOKENS` env var.
/// Format: comma-separated `token:user_id` pairs, e.g. `s3cret:user_1,0ps:ops_team`
fn parse_api_tokens() -> HashMap<String, String> {
    match env::var("CURATOR_API_TOKENS") {
        Ok(val) if !val.is_empty() => val
            .split(',')
            .filter_map(|pair| {
                let mut parts = pair.splitn(2, ':');
                let token = parts.next()?.trim();
                let user_id = parts.next()?.trim();
                if token.is_empty() || user_id.is_empty() {
                    tracing::warn!(
                        "Invalid token pair '{}' in CURATOR_API_TOKENS, skipping",
                        pair
                    );
                    None
                } else {
                    Some((token.to_string(), user_id.to_string()))
                }
            })
            .collect(),
        _ => HashMap::new(),
    }
}

/// Parse `CURATOR_KB_MODELS` env var.
/// Format: comma-separated `model:max_token` pairs, e.g. `bge-m3:512,text-embedding-3-large:8000`
fn parse_kb_models() -> HashMap<String, usize> {
    match env::var("CURATOR_KB_MODELS") {
        Ok(val) if !val.is_empty() => val
            .split(',')
            .filter_map(|pair| {
                let mut parts = pair.splitn(2, ':');
                let model = parts.next()?.trim();
                let max_token = parts.next()?.trim();
                match max_token.parse::<usize>() {
                    Ok(max_token) if !model.is_empty() && max_token > 0 => {
                        Some((model.to_string(), max_token))
                    }
                    _ => {
                        tracing::warn!(
                            "Invalid model pair '{}' in CURATOR_KB_MODELS, skipping",
                            pair
                        );
                        None
                    }
                }
            })
            .collect(),
        _ => HashMap::new(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token -> caller user id. Empty map locks all protected routes.
    pub api_tokens: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// Knowledge-base settings: the matching-model table that bounds the
/// searchable `q` field, and the fixed bound on the supplementary `a` field.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeConfig {
    pub default_model: String,
    pub default_max_token: usize,
    pub answer_max_len: usize,
    pub models: HashMap<String, usize>,
}

impl KnowledgeConfig {
    /// Max length of the searchable field for a matching model. Unknown
    /// models fall back to the configured default.
    pub fn max_token_for(&self, model: &str) -> usize {
        self.models
            .get(model)
            .copied()
            .unwrap_or(self.default_max_token)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("CURATOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("CURATOR_PORT", 3000),
                api_tokens: parse_api_tokens(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:curator.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            knowledge: KnowledgeConfig {
                default_model: env::var("KB_DEFAULT_MODEL")
                    .unwrap_or_else(|_| "bge-m3".to_string()),
                default_max_token: parse_env_or("KB_DEFAULT_MAX_TOKEN", 512),
                answer_max_len: parse_env_or("KB_ANSWER_MAX_LEN", 3000),
                models: parse_kb_models(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_api_tokens_from_env() {
        env::set_var("CURATOR_API_TOKENS", "tok1:alice, tok2:bob");
        let config = Config::from_env();
        assert_eq!(
            config.server.api_tokens.get("tok1"),
            Some(&"alice".to_string())
        );
        assert_eq!(
            config.server.api_tokens.get("tok2"),
            Some(&"bob".to_string())
        );
        env::remove_var("CURATOR_API_TOKENS");
    }

    #[test]
    #[serial]
    fn test_api_tokens_skips_malformed_pairs() {
        env::set_var("CURATOR_API_TOKENS", "tok1:alice,broken,:nouser,notoken:");
        let config = Config::from_env();
        assert_eq!(config.server.api_tokens.len(), 1);
        env::remove_var("CURATOR_API_TOKENS");
    }

    #[test]
    #[serial]
    fn test_api_tokens_empty_by_default() {
        env::remove_var("CURATOR_API_TOKENS");
        let config = Config::from_env();
        assert!(config.server.api_tokens.is_empty());
    }

    #[test]
    #[serial]
    fn test_kb_models_from_env() {
        env::set_var("CURATOR_KB_MODELS", "bge-m3:512,text-embedding-3-large:8000");
        let config = Config::from_env();
        assert_eq!(config.knowledge.max_token_for("bge-m3"), 512);
        assert_eq!(config.knowledge.max_token_for("text-embedding-3-large"), 8000);
        env::remove_var("CURATOR_KB_MODELS");
    }

    #[test]
    #[serial]
    fn test_unknown_model_falls_back_to_default() {
        env::remove_var("CURATOR_KB_MODELS");
        env::remove_var("KB_DEFAULT_MAX_TOKEN");
        let config = Config::from_env();
        assert_eq!(config.knowledge.max_token_for("no-such-model"), 512);
    }

    #[test]
    #[serial]
    fn test_kb_models_rejects_zero_max_token() {
        env::set_var("CURATOR_KB_MODELS", "bad:0,good:256");
        let config = Config::from_env();
        assert!(!config.knowledge.models.contains_key("bad"));
        assert_eq!(config.knowledge.max_token_for("good"), 256);
        env::remove_var("CURATOR_KB_MODELS");
    }

    #[test]
    #[serial]
    fn test_answer_max_len_default() {
        env::remove_var("KB_ANSWER_MAX_LEN");
        let config = Config::from_env();
        assert_eq!(config.knowledge.answer_max_len, 3000);
    }
}
