use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ai_client::ChatClientConfig;
use anyhow::Context;
use axum::http::HeaderValue;
pub use protocol::config::{AuditConfig, GatewayConfig};

/// Config with secrets pulled from the environment. Nothing reads the
/// environment after this is built.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub listen_addr: SocketAddr,
    pub chat: ChatClientConfig,
    pub audit: AuditSettings,
    pub allow_origin: HeaderValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuditSettings {
    Disabled,
    Jsonl(PathBuf),
    Rest {
        base_url: String,
        table: String,
        api_key: String,
        timeout: Duration,
    },
}

pub fn load_gateway_config(path: &Path) -> anyhow::Result<GatewayConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: GatewayConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_gateway_config(&config)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn validate_gateway_config(config: &GatewayConfig) -> anyhow::Result<()> {
    if config.upstream.base_url.trim().is_empty() {
        anyhow::bail!("upstream.base_url must be set");
    }
    if config.upstream.model.trim().is_empty() {
        anyhow::bail!("upstream.model must be set");
    }
    if let Some(temperature) = config.upstream.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            anyhow::bail!("upstream.temperature must be within 0.0..=2.0");
        }
    }
    config
        .listen_addr
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid listen_addr {}", config.listen_addr))?;
    HeaderValue::from_str(&config.cors.allow_origin)
        .with_context(|| format!("invalid cors.allow_origin {}", config.cors.allow_origin))?;
    match &config.audit {
        AuditConfig::Disabled => {}
        AuditConfig::Jsonl { path } => {
            if path.as_os_str().is_empty() {
                anyhow::bail!("audit.path must be set for kind = \"jsonl\"");
            }
        }
        AuditConfig::Rest {
            base_url,
            table,
            timeout_ms,
            ..
        } => {
            if base_url.trim().is_empty() {
                anyhow::bail!("audit.base_url must be set for kind = \"rest\"");
            }
            if table.trim().is_empty() {
                anyhow::bail!("audit.table must not be empty");
            }
            if *timeout_ms == 0 {
                anyhow::bail!("audit.timeout_ms must be greater than zero");
            }
        }
    }
    Ok(())
}

impl GatewaySettings {
    /// `lookup_env` is `std::env::var` in production and a map in tests.
    pub fn resolve<F>(config: GatewayConfig, lookup_env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        validate_gateway_config(&config)?;
        let listen_addr = config.listen_addr.parse::<SocketAddr>()?;
        let allow_origin = HeaderValue::from_str(&config.cors.allow_origin)?;

        let upstream = config.upstream;
        let api_key = match upstream.api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None => non_blank_env(&lookup_env, &upstream.api_key_env)
                .with_context(|| format!("{} is not set", upstream.api_key_env))?,
        };
        let chat = ChatClientConfig {
            base_url: upstream.base_url,
            chat_path: upstream.chat_path,
            model: upstream.model,
            api_key,
            temperature: upstream.temperature,
            timeout: upstream.timeout_ms.map(Duration::from_millis),
        };

        let audit = match config.audit {
            AuditConfig::Disabled => AuditSettings::Disabled,
            AuditConfig::Jsonl { path } => AuditSettings::Jsonl(path),
            AuditConfig::Rest {
                base_url,
                table,
                api_key_env,
                timeout_ms,
            } => {
                let api_key = non_blank_env(&lookup_env, &api_key_env)
                    .with_context(|| format!("{api_key_env} is not set"))?;
                AuditSettings::Rest {
                    base_url,
                    table,
                    api_key,
                    timeout: Duration::from_millis(timeout_ms),
                }
            }
        };

        Ok(Self {
            listen_addr,
            chat,
            audit,
            allow_origin,
        })
    }
}

fn non_blank_env<F>(lookup_env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup_env(key).filter(|value| !value.trim().is_empty())
}
