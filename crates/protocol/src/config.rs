use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:19410";
const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";
const DEFAULT_API_KEY_ENV: &str = "AI_API_KEY";
const DEFAULT_AUDIT_TABLE: &str = "scam_detection_logs";
const DEFAULT_AUDIT_KEY_ENV: &str = "AUDIT_API_KEY";
const DEFAULT_AUDIT_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditConfig {
    #[default]
    Disabled,
    Jsonl {
        path: PathBuf,
    },
    Rest {
        base_url: String,
        #[serde(default = "default_audit_table")]
        table: String,
        #[serde(default = "default_audit_key_env")]
        api_key_env: String,
        #[serde(default = "default_audit_timeout_ms")]
        timeout_ms: u64,
    },
}

#[derive(Debug, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: default_allow_origin(),
        }
    }
}

pub fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_chat_path() -> String {
    DEFAULT_CHAT_PATH.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_audit_table() -> String {
    DEFAULT_AUDIT_TABLE.to_string()
}

fn default_audit_key_env() -> String {
    DEFAULT_AUDIT_KEY_ENV.to_string()
}

fn default_audit_timeout_ms() -> u64 {
    DEFAULT_AUDIT_TIMEOUT_MS
}

fn default_allow_origin() -> String {
    "*".to_string()
}
