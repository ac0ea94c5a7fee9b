use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use hrms_core::AppError;
use ipnet::IpNet;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct SmtpRuntimeConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    Console,
    Smtp(SmtpRuntimeConfig),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub _session_secret: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub trusted_proxies: Vec<IpNet>,
    pub email_provider: EmailProviderConfig,
    pub media_root: PathBuf,
    pub media_url: String,
    pub throttle_key_prefix: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_owned());
        let frontend_url = normalize_origin(
            &env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned()),
        )?;
        let bootstrap_token = required_env("AUTH_BOOTSTRAP_TOKEN")?;
        let session_secret = required_env("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            return Err(AppError::Validation(
                "SESSION_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let trusted_proxies =
            parse_trusted_proxies(&env::var("TRUSTED_PROXY_CIDRS").unwrap_or_default())?;

        let email_provider = match env::var("EMAIL_PROVIDER")
            .unwrap_or_else(|_| "console".to_owned())
            .as_str()
        {
            "console" => EmailProviderConfig::Console,
            "smtp" => {
                let port = required_non_empty_env("SMTP_PORT")?
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;
                EmailProviderConfig::Smtp(SmtpRuntimeConfig {
                    host: required_non_empty_env("SMTP_HOST")?,
                    port,
                    username: required_non_empty_env("SMTP_USERNAME")?,
                    password: required_non_empty_env("SMTP_PASSWORD")?,
                    from_address: required_non_empty_env("SMTP_FROM_ADDRESS")?,
                })
            }
            other => {
                return Err(AppError::Validation(format!(
                    "EMAIL_PROVIDER must be either 'console' or 'smtp', got '{other}'"
                )));
            }
        };

        let media_root =
            PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_owned()));
        let media_url = env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_owned());
        let throttle_key_prefix =
            env::var("THROTTLE_KEY_PREFIX").unwrap_or_else(|_| "hrms".to_owned());

        Ok(Self {
            migrate_only,
            database_url,
            redis_url,
            frontend_url,
            bootstrap_token,
            _session_secret: session_secret,
            api_host,
            api_port,
            cookie_secure,
            trusted_proxies,
            email_provider,
            media_root,
            media_url,
            throttle_key_prefix,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Parses a comma separated list of CIDRs or bare addresses.
pub fn parse_trusted_proxies(value: &str) -> Result<Vec<IpNet>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<IpNet>()
                .or_else(|_| entry.parse::<IpAddr>().map(IpNet::from))
                .map_err(|error| {
                    AppError::Validation(format!("invalid TRUSTED_PROXY_CIDRS entry '{entry}': {error}"))
                })
        })
        .collect()
}

/// Reduces a configured frontend URL to its origin, as browsers send it.
pub fn normalize_origin(value: &str) -> Result<String, AppError> {
    let url = Url::parse(value)
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL '{value}': {error}")))?;
    if !url.origin().is_tuple() {
        return Err(AppError::Validation(format!(
            "FRONTEND_URL '{value}' has no origin"
        )));
    }

    Ok(url.origin().ascii_serialization())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{normalize_origin, parse_trusted_proxies};

    #[test]
    fn trusted_proxies_accept_cidrs_and_bare_addresses() {
        let proxies = parse_trusted_proxies("10.0.0.0/8, 192.168.1.7,,::1").unwrap_or_default();
        let rendered: Vec<String> = proxies.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["10.0.0.0/8", "192.168.1.7/32", "::1/128"]);
    }

    #[test]
    fn empty_trusted_proxy_list_trusts_nobody() {
        assert!(parse_trusted_proxies("").unwrap_or_default().is_empty());
    }

    #[test]
    fn malformed_proxy_entry_is_rejected() {
        assert!(parse_trusted_proxies("10.0.0.0/8,not-an-ip").is_err());
    }

    #[test]
    fn frontend_url_is_reduced_to_origin() {
        assert_eq!(
            normalize_origin("https://hr.example.com/app/").ok().as_deref(),
            Some("https://hr.example.com")
        );
        assert_eq!(
            normalize_origin("http://localhost:3000").ok().as_deref(),
            Some("http://localhost:3000")
        );
    }
}
