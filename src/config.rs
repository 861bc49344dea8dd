use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::optimizer::PackingConfig;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub optimizer: OptimizerConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            logging: LoggingConfig::from_env(),
            optimizer: OptimizerConfig::from_env(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported log format `{0}` (expected compact|pretty|json)")]
    UnknownLogFormat(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnknownLogFormat(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level or filter directive, e.g. `info` or `stowage=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    const DEFAULT_LEVEL: &'static str = "info";
    const LEVEL_VAR: &'static str = "STOWAGE_LOG_LEVEL";
    const FORMAT_VAR: &'static str = "STOWAGE_LOG_FORMAT";

    /// Reads the logging settings. Warnings are only visible once a subscriber is installed.
    pub fn from_env() -> Self {
        let level = env_string(Self::LEVEL_VAR).unwrap_or_else(|| Self::DEFAULT_LEVEL.to_string());
        let format = match env_string(Self::FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().unwrap_or_else(|err| {
                warn!(var = Self::FORMAT_VAR, %err, "using compact log format");
                LogFormat::Compact
            }),
            None => LogFormat::Compact,
        };
        Self { level, format }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            display_host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "STOWAGE_API_HOST";
    const PORT_VAR: &'static str = "STOWAGE_API_PORT";

    fn from_env() -> Self {
        let defaults = Self::default();

        let (bind_ip, display_host) = match env_string(Self::HOST_VAR) {
            Some(raw) => match raw.parse::<IpAddr>() {
                Ok(ip) => (ip, raw),
                Err(err) => {
                    warn!(
                        var = Self::HOST_VAR,
                        value = %raw,
                        %err,
                        "could not parse host, using {}",
                        Self::DEFAULT_HOST
                    );
                    (defaults.bind_ip, defaults.display_host)
                }
            },
            None => (defaults.bind_ip, defaults.display_host),
        };

        let port = match env_string(Self::PORT_VAR) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    warn!(var = Self::PORT_VAR, "port must not be 0, using {}", Self::DEFAULT_PORT);
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    warn!(
                        var = Self::PORT_VAR,
                        value = %raw,
                        %err,
                        "could not parse port, using {}",
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Configuration for the placement heuristics.
#[derive(Clone, Debug, Default)]
pub struct OptimizerConfig {
    packing: PackingConfig,
}

impl OptimizerConfig {
    const GRID_STEP_VAR: &'static str = "STOWAGE_PACKING_GRID_STEP";
    const SUPPORT_RATIO_VAR: &'static str = "STOWAGE_PACKING_SUPPORT_RATIO";
    const FRONT_ZONE_VAR: &'static str = "STOWAGE_PACKING_FRONT_ZONE_RATIO";
    const GENERAL_EPSILON_VAR: &'static str = "STOWAGE_PACKING_GENERAL_EPSILON";
    const WEIGHT_LIMIT_VAR: &'static str = "STOWAGE_PACKING_ENFORCE_WEIGHT_LIMIT";

    pub fn new(packing: PackingConfig) -> Self {
        Self { packing }
    }

    fn from_env() -> Self {
        let grid_step = load_f64_with_warning(
            Self::GRID_STEP_VAR,
            PackingConfig::DEFAULT_GRID_STEP,
            |value| value > 0.0,
            "must be greater than 0",
            "adjusted grid step changes which positions are tried",
        );

        let support_ratio = load_f64_with_warning(
            Self::SUPPORT_RATIO_VAR,
            PackingConfig::DEFAULT_SUPPORT_RATIO,
            |value| (0.0..=1.0).contains(&value),
            "must be between 0 and 1",
            "adjusted minimum support may lead to unstable stacks",
        );

        let front_zone_ratio = load_f64_with_warning(
            Self::FRONT_ZONE_VAR,
            PackingConfig::DEFAULT_FRONT_ZONE_RATIO,
            |value| (0.0..=1.0).contains(&value),
            "must be between 0 and 1",
            "adjusted door zone moves where fragile items are preferred",
        );

        let general_epsilon = load_f64_with_warning(
            Self::GENERAL_EPSILON_VAR,
            PackingConfig::DEFAULT_GENERAL_EPSILON,
            |value| value > 0.0,
            "must be greater than 0",
            "adjusted tolerances may cause numerical instabilities",
        );

        let enforce_weight_limit = env_string(Self::WEIGHT_LIMIT_VAR)
            .and_then(|raw| parse_bool(&raw, Self::WEIGHT_LIMIT_VAR))
            .unwrap_or(PackingConfig::DEFAULT_ENFORCE_WEIGHT_LIMIT);

        let packing = PackingConfig::builder()
            .grid_step(grid_step)
            .support_ratio(support_ratio)
            .front_zone_ratio(front_zone_ratio)
            .general_epsilon(general_epsilon)
            .enforce_weight_limit(enforce_weight_limit)
            .build();

        Self { packing }
    }

    /// Returns the configured PackingConfig.
    pub fn packing_config(&self) -> PackingConfig {
        self.packing
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(var = name, %err, "could not read variable, using default value");
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            warn!(var = var_name, value = other, "not a boolean, using default value");
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    notice: &str,
) -> f64 {
    let Some(raw) = env_string(var_name) else {
        return default;
    };
    match raw.parse::<f64>() {
        Ok(value) if validator(value) => {
            let tolerance = default.abs().max(1.0) * 1e-9;
            if (value - default).abs() > tolerance {
                info!(var = var_name, value, "{}", notice);
            }
            value
        }
        Ok(_) => {
            warn!(var = var_name, value = %raw, "{}, using {}", invalid_hint, default);
            default
        }
        Err(err) => {
            warn!(var = var_name, value = %raw, %err, "not a number, using {}", default);
            default
        }
    }
}
