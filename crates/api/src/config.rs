use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Minimum accepted password length at registration (default: `6`).
    pub password_min_length: usize,
    /// Mark the session cookie `Secure`. True when `APP_ENV=production`.
    pub secure_cookies: bool,
    /// Upper bound on pooled database connections (default: `20`).
    pub database_max_connections: u32,
    /// Requests each client may make per window; `0` disables limiting
    /// (default: `100`).
    pub rate_limit_max: u32,
    /// Rate limit window in seconds (default: `600`).
    pub rate_limit_window_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `5000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `PASSWORD_MIN_LENGTH`      | `6`                        |
    /// | `APP_ENV`                  | `development`              |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                       |
    /// | `RATE_LIMIT_MAX`           | `100`                      |
    /// | `RATE_LIMIT_WINDOW_SECS`   | `600`                      |
    ///
    /// See [`JwtConfig::from_env`] for the token variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let password_min_length: usize = std::env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "6".into())
            .parse()
            .expect("PASSWORD_MIN_LENGTH must be a valid usize");

        let secure_cookies = std::env::var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let rate_limit_max: u32 = std::env::var("RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("RATE_LIMIT_MAX must be a valid u32");

        let rate_limit_window_secs: u64 = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            password_min_length,
            secure_cookies,
            database_max_connections,
            rate_limit_max,
            rate_limit_window_secs,
            jwt,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
