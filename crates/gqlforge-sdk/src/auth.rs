use crate::error::ClientError;
use std::path::PathBuf;

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "GQLFORGE_TOKEN";

const TOKEN_FILE: &str = ".gqlforge_token";

/// Resolve an API token from `~/.gqlforge_token`.
pub fn token_from_file() -> Result<String, ClientError> {
    let path = token_file_path()?;
    std::fs::read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            ClientError::AuthConfig(format!(
                "Could not read token file {}: {}",
                path.display(),
                e
            ))
        })
}

/// Resolve an API token from the `GQLFORGE_TOKEN` environment variable.
pub fn token_from_env() -> Result<String, ClientError> {
    std::env::var(TOKEN_ENV_VAR).map_err(|_| {
        ClientError::AuthConfig(format!("{} environment variable not set", TOKEN_ENV_VAR))
    })
}

/// Resolve an API token with precedence: env var -> file.
pub fn auto_token() -> Result<String, ClientError> {
    token_from_env().or_else(|_| token_from_file())
}

fn token_file_path() -> Result<PathBuf, ClientError> {
    home::home_dir()
        .map(|home| home.join(TOKEN_FILE))
        .ok_or_else(|| ClientError::AuthConfig("Could not determine home directory".to_string()))
}
