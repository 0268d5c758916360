/// OTP service configuration loaded from environment variables.
#[derive(Debug)]
pub struct OtpConfig {
    /// Database URL (default `sqlite://otp.db?mode=rwc`). Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port to listen on (default 62226). Env var: `OTP_PORT`.
    pub otp_port: u16,
    /// Host (and optional port) embedded in magic links. Env var: `MAGIC_LINK_HOST`.
    pub magic_link_host: String,
    /// Apply pending migrations at startup (default true). Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

impl OtpConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://otp.db?mode=rwc".to_owned()),
            otp_port: std::env::var("OTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(62226),
            magic_link_host: std::env::var("MAGIC_LINK_HOST")
                .unwrap_or_else(|_| "localhost:62226".to_owned()),
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}
