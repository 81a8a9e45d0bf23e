use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_table_name,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PLANS_TABLE: &str = "savings_plans";
pub const DEFAULT_LOGS_TABLE: &str = "savings_logs";
pub const DEFAULT_STORE_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_LOOKUP_ENDPOINT: &str = "https://zipcloud.ibsnet.co.jp/api/search";
pub const DEFAULT_LOOKUP_TIMEOUT_SECONDS: u64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub lookup: Option<LookupConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub plans_table: Option<String>,
    pub logs_table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 從環境變數載入配置（PLANNER_STORE_URL 必填）
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let timeout = |name: &str| -> Result<Option<u64>> {
            var(name)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| PlannerError::InvalidConfigValueError {
                            field: name.to_string(),
                            value: raw.clone(),
                            reason: "Expected a whole number of seconds".to_string(),
                        })
                })
                .transpose()
        };

        let endpoint = var("PLANNER_STORE_URL");
        let endpoint = validate_required_field("PLANNER_STORE_URL", &endpoint)?.clone();

        Ok(Self {
            store: StoreConfig {
                endpoint,
                api_key: var("PLANNER_STORE_KEY"),
                plans_table: var("PLANNER_PLANS_TABLE"),
                logs_table: var("PLANNER_LOGS_TABLE"),
                timeout_seconds: timeout("PLANNER_STORE_TIMEOUT")?,
            },
            lookup: Some(LookupConfig {
                endpoint: var("PLANNER_LOOKUP_URL"),
                timeout_seconds: timeout("PLANNER_LOOKUP_TIMEOUT")?,
            }),
        })
    }

    /// 替換環境變數 (例如 ${PLANNER_STORE_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlannerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn store_timeout_seconds(&self) -> u64 {
        self.store
            .timeout_seconds
            .unwrap_or(DEFAULT_STORE_TIMEOUT_SECONDS)
    }

    pub fn lookup_timeout_seconds(&self) -> u64 {
        self.lookup
            .as_ref()
            .and_then(|l| l.timeout_seconds)
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECONDS)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("store.endpoint", &self.store.endpoint)?;

        let api_key = validate_required_field("store.api_key", &self.store.api_key)?;
        validate_non_empty_string("store.api_key", api_key)?;
        if api_key.contains("${") {
            return Err(PlannerError::InvalidConfigValueError {
                field: "store.api_key".to_string(),
                value: api_key.clone(),
                reason: "Environment variable is not set".to_string(),
            });
        }

        validate_table_name("store.plans_table", self.plans_table())?;
        validate_table_name("store.logs_table", self.logs_table())?;
        if self.plans_table() == self.logs_table() {
            return Err(PlannerError::ConfigValidationError {
                field: "store.logs_table".to_string(),
                message: "Plans and logs must be stored in different tables".to_string(),
            });
        }

        validate_range("store.timeout_seconds", self.store_timeout_seconds(), 1, 120)?;
        validate_url("lookup.endpoint", self.lookup_endpoint())?;
        validate_range("lookup.timeout_seconds", self.lookup_timeout_seconds(), 1, 30)?;

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn store_endpoint(&self) -> &str {
        &self.store.endpoint
    }

    fn store_api_key(&self) -> &str {
        self.store.api_key.as_deref().unwrap_or_default()
    }

    fn plans_table(&self) -> &str {
        self.store
            .plans_table
            .as_deref()
            .unwrap_or(DEFAULT_PLANS_TABLE)
    }

    fn logs_table(&self) -> &str {
        self.store.logs_table.as_deref().unwrap_or(DEFAULT_LOGS_TABLE)
    }

    fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds())
    }

    fn lookup_endpoint(&self) -> &str {
        self.lookup
            .as_ref()
            .and_then(|l| l.endpoint.as_deref())
            .unwrap_or(DEFAULT_LOOKUP_ENDPOINT)
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
