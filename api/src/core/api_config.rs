use std::net::SocketAddr;

use crate::error_handler::AppError;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:5000";

/// Listener settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub address: SocketAddr,
}

impl ApiConfig {
    /// Reads `API_ADDRESS` (default `0.0.0.0:5000`).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("API_ADDRESS")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let address = raw
            .parse::<SocketAddr>()
            .map_err(|_| AppError::InvalidAddress(raw.clone()))?;
        Ok(Self { address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_5000() {
        let cfg = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.address.port(), 5000);
    }

    #[test]
    fn rejects_garbage_address() {
        let err = ApiConfig::from_lookup(|_| Some("localhost".into())).unwrap_err();
        assert!(matches!(err, AppError::InvalidAddress(a) if a == "localhost"));
    }
}
