use crate::app::commands::Action;
use crate::config::toml_config::TomlConfig;
use crate::config::{DATA_EXTENSIONS, DEFAULT_DATA_PATH};
use crate::core::ConfigProvider;
use crate::domain::model::{AppVariant, LoadPolicy, ZeroTotalPolicy, DEFAULT_STAFF_THRESHOLD};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "careconnect")]
#[command(about = "Hospital resource analytics: rebalance, transfer and chart hospital resources")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_DATA_PATH, help = "CSV file with hospital resources")]
    pub data_path: String,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, value_enum, help = "Feature preset [default: search]")]
    pub variant: Option<AppVariant>,

    #[arg(long, help = "Minimum staff count [default: 10]")]
    pub threshold: Option<i64>,

    #[arg(long, help = "Rebalance period in milliseconds (overrides the variant)")]
    pub interval_ms: Option<u64>,

    #[arg(long, help = "Skip CSV rows with non-numeric cells instead of failing")]
    pub skip_invalid_rows: bool,

    #[arg(long, help = "Chart hospitals without resources as 0% instead of failing")]
    pub zero_total_as_zero: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the hospital table
    Show,
    /// Run the staff rebalancer
    Rebalance {
        #[arg(long, default_value_t = 1)]
        passes: u32,
    },
    /// Move a buffer of every resource from one row to another
    Transfer {
        source: usize,
        destination: usize,
        #[arg(short, long, default_value = "")]
        buffer: String,
    },
    /// Edit one cell and print the result
    Set {
        row: usize,
        field: String,
        value: String,
    },
    /// Print the staff percentage chart
    Chart {
        #[arg(long)]
        json: bool,
    },
    /// Show hospitals whose name contains the query
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Rebalance on a timer and print the chart after every tick
    Watch {
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Read commands from stdin while the timer keeps rebalancing
    Interactive,
}

impl Command {
    /// Actions for one-shot subcommands; `Watch` and `Interactive` have none.
    pub fn actions(&self) -> Result<Vec<Action>> {
        let actions = match self {
            Command::Show => vec![Action::Show],
            Command::Rebalance { passes } => vec![Action::Rebalance; (*passes).max(1) as usize],
            Command::Transfer {
                source,
                destination,
                buffer,
            } => vec![Action::Transfer {
                selection: vec![*source, *destination],
                buffer: buffer.clone(),
            }],
            Command::Set { row, field, value } => vec![Action::Set {
                row: *row,
                field: field.parse()?,
                value: value.clone(),
            }],
            Command::Chart { json } => vec![Action::Chart { json: *json }],
            Command::Search { query } => vec![Action::Search(query.clone())],
            Command::Watch { .. } | Command::Interactive => Vec::new(),
        };
        Ok(actions)
    }

    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Rebalance { .. } | Command::Transfer { .. } | Command::Set { .. }
        )
    }
}

impl CliConfig {
    pub fn variant(&self) -> AppVariant {
        self.variant.unwrap_or_default()
    }

    /// Flags given explicitly on the command line win over the file.
    /// `--data-path` only wins when it differs from its default.
    pub fn override_toml(&self, config: &mut TomlConfig) {
        if self.data_path != DEFAULT_DATA_PATH {
            config.data.path = self.data_path.clone();
        }
        if self.skip_invalid_rows {
            config.data.load_policy = Some(LoadPolicy::SkipInvalid);
        }
        if let Some(threshold) = self.threshold {
            config.rebalance.threshold = Some(threshold);
        }
        if let Some(interval_ms) = self.interval_ms {
            config.rebalance.interval_ms = Some(interval_ms);
        }
        if self.zero_total_as_zero {
            config.chart.zero_total = Some(ZeroTotalPolicy::TreatAsZero);
        }
        if let Some(variant) = self.variant {
            config.features.variant = Some(variant);
            // 明確指定的變體覆蓋檔案中的 search 設定
            config.features.search = None;
        }
        tracing::debug!("Configuration after CLI overrides: {:?}", config);
    }
}

impl ConfigProvider for CliConfig {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn threshold(&self) -> i64 {
        self.threshold.unwrap_or(DEFAULT_STAFF_THRESHOLD)
    }

    fn interval_ms(&self) -> u64 {
        self.interval_ms
            .unwrap_or_else(|| self.variant().default_interval_ms())
    }

    fn search_enabled(&self) -> bool {
        self.variant().search_enabled()
    }

    fn load_policy(&self) -> LoadPolicy {
        if self.skip_invalid_rows {
            LoadPolicy::SkipInvalid
        } else {
            LoadPolicy::FailFast
        }
    }

    fn zero_total_policy(&self) -> ZeroTotalPolicy {
        if self.zero_total_as_zero {
            ZeroTotalPolicy::TreatAsZero
        } else {
            ZeroTotalPolicy::Fail
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_path", &self.data_path)?;
        validation::validate_file_extension("data_path", &self.data_path, DATA_EXTENSIONS)?;
        validation::validate_positive_number("interval_ms", self.interval_ms(), 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_search_variant() {
        let config = CliConfig::parse_from(["careconnect", "show"]);

        assert_eq!(config.data_path(), "demo_data.csv");
        assert_eq!(config.threshold(), 10);
        assert_eq!(config.interval_ms(), 3_000);
        assert!(config.search_enabled());
        assert_eq!(config.load_policy(), LoadPolicy::FailFast);
        assert_eq!(config.zero_total_policy(), ZeroTotalPolicy::Fail);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classic_variant_and_overrides() {
        let config = CliConfig::parse_from([
            "careconnect",
            "--variant",
            "classic",
            "--threshold",
            "12",
            "--skip-invalid-rows",
            "--zero-total-as-zero",
            "chart",
            "--json",
        ]);

        assert_eq!(config.interval_ms(), 300_000);
        assert!(!config.search_enabled());
        assert_eq!(config.threshold(), 12);
        assert_eq!(config.load_policy(), LoadPolicy::SkipInvalid);
        assert_eq!(config.zero_total_policy(), ZeroTotalPolicy::TreatAsZero);
        assert_eq!(config.command.actions().unwrap(), vec![Action::Chart { json: true }]);
    }

    #[test]
    fn test_transfer_subcommand_maps_to_selection() {
        let config = CliConfig::parse_from(["careconnect", "transfer", "2", "0", "--buffer", "5"]);
        assert_eq!(
            config.command.actions().unwrap(),
            vec![Action::Transfer {
                selection: vec![2, 0],
                buffer: "5".to_string()
            }]
        );
    }

    #[test]
    fn test_rebalance_passes() {
        let config = CliConfig::parse_from(["careconnect", "rebalance", "--passes", "3"]);
        assert_eq!(config.command.actions().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_cli_values() {
        let config = CliConfig::parse_from(["careconnect", "--interval-ms", "0", "show"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["careconnect", "--data-path", "data.xlsx", "show"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["careconnect", "set", "0", "nurses", "3"]);
        assert!(config.command.actions().is_err());
    }

    #[test]
    fn test_explicit_flags_override_toml() {
        let mut config = TomlConfig::from_toml_str(
            "[data]\npath = \"file.csv\"\n[rebalance]\nthreshold = 20\ninterval_ms = 500\n[features]\nsearch = false\n",
        )
        .unwrap();
        let cli = CliConfig::parse_from(["careconnect", "--threshold", "7", "--variant", "search", "show"]);

        cli.override_toml(&mut config);

        assert_eq!(config.data_path(), "file.csv");
        assert_eq!(config.threshold(), 7);
        assert_eq!(config.interval_ms(), 500);
        assert!(config.search_enabled());
    }
}
