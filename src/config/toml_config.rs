use crate::config::{DATA_EXTENSIONS, DEFAULT_DATA_PATH};
use crate::core::ConfigProvider;
use crate::domain::model::{AppVariant, LoadPolicy, ZeroTotalPolicy, DEFAULT_STAFF_THRESHOLD};
use crate::utils::error::{AnalyticsError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: String,
    pub load_policy: Option<LoadPolicy>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            load_policy: None,
        }
    }
}

fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebalanceConfig {
    pub threshold: Option<i64>,
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    pub zero_total: Option<ZeroTotalPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub variant: Option<AppVariant>,
    pub search: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyticsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyticsError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| AnalyticsError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn variant(&self) -> AppVariant {
        self.features.variant.unwrap_or_default()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("data.path", &self.data.path)?;
        validation::validate_file_extension("data.path", &self.data.path, DATA_EXTENSIONS)?;
        validation::validate_positive_number("rebalance.interval_ms", self.interval_ms(), 1)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_path(&self) -> &str {
        &self.data.path
    }

    fn threshold(&self) -> i64 {
        self.rebalance.threshold.unwrap_or(DEFAULT_STAFF_THRESHOLD)
    }

    fn interval_ms(&self) -> u64 {
        self.rebalance
            .interval_ms
            .unwrap_or_else(|| self.variant().default_interval_ms())
    }

    fn search_enabled(&self) -> bool {
        self.features
            .search
            .unwrap_or_else(|| self.variant().search_enabled())
    }

    fn load_policy(&self) -> LoadPolicy {
        self.data.load_policy.unwrap_or_default()
    }

    fn zero_total_policy(&self) -> ZeroTotalPolicy {
        self.chart.zero_total.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
