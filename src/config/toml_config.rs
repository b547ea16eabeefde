use crate::domain::model::{OutputFormat, Price, SELF_SERVICE_LABEL};
use crate::domain::tables::{ColumnTextVocabulary, Location, LocationRegistry, MenuTables, PriceTable};
use crate::utils::error::{MenuError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Optional overrides for the built-in tables. Every section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuConfig {
    pub prices: Option<HashMap<String, PriceEntry>>,
    pub locations: Option<BTreeMap<String, Location>>,
    pub column_text: Option<ColumnTextConfig>,
    pub output: Option<OutputConfig>,
}

/// A price table value: an amount, or the "Self-Service" label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceEntry {
    Amount(f64),
    Label(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnTextConfig {
    pub allergens: Option<Vec<String>>,
    pub closed_marker: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub formats: Option<Vec<OutputFormat>>,
}

impl PriceEntry {
    fn to_price(&self, label: &str) -> Result<Price> {
        match self {
            PriceEntry::Amount(amount) => {
                validation::validate_range(&format!("prices.{label}"), *amount, 0.0, f64::MAX)?;
                Ok(Price::Fixed(*amount))
            }
            PriceEntry::Label(text) if text == SELF_SERVICE_LABEL => Ok(Price::SelfService),
            PriceEntry::Label(text) => Err(MenuError::InvalidConfigValueError {
                field: format!("prices.{label}"),
                value: text.clone(),
                reason: format!("Expected a number or \"{}\"", SELF_SERVICE_LABEL),
            }),
        }
    }
}

impl MenuConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MenuError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MenuError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MENSA_BASE_URL})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 預設價目表加上設定檔中的覆寫
    pub fn price_table(&self) -> Result<PriceTable> {
        let mut entries: HashMap<String, Price> = PriceTable::default()
            .iter()
            .map(|(label, price)| (label.to_string(), *price))
            .collect();

        if let Some(prices) = &self.prices {
            for (label, entry) in prices {
                entries.insert(label.clone(), entry.to_price(label)?);
            }
        }

        Ok(PriceTable::new(entries))
    }

    pub fn location_registry(&self) -> LocationRegistry {
        let mut registry = LocationRegistry::default();
        if let Some(locations) = &self.locations {
            registry.merge(locations.clone());
        }
        registry
    }

    pub fn vocabulary(&self) -> ColumnTextVocabulary {
        let mut vocabulary = ColumnTextVocabulary::default();
        if let Some(column_text) = &self.column_text {
            if let Some(allergens) = &column_text.allergens {
                vocabulary.allergens = allergens.clone();
            }
            if let Some(marker) = &column_text.closed_marker {
                vocabulary.closed_marker = marker.clone();
            }
        }
        vocabulary
    }

    /// 建立所有查詢表
    pub fn tables(&self) -> Result<MenuTables> {
        Ok(MenuTables {
            prices: self.price_table()?,
            locations: self.location_registry(),
            vocabulary: self.vocabulary(),
        })
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.path.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    /// 取得輸出格式
    pub fn output_formats(&self) -> Vec<OutputFormat> {
        self.output
            .as_ref()
            .and_then(|o| o.formats.clone())
            .unwrap_or_else(|| vec![OutputFormat::Json])
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(locations) = &self.locations {
            for (id, location) in locations {
                validation::validate_non_empty_string("locations", id)?;
                if let Some(url) = &location.url {
                    validation::validate_url(&format!("locations.{id}.url"), url)?;
                }
            }
        }

        // 價格必須是非負數或 Self-Service
        self.price_table()?;

        if let Some(marker) = self.column_text.as_ref().and_then(|c| c.closed_marker.as_ref()) {
            validation::validate_non_empty_string("column_text.closed_marker", marker)?;
        }

        validation::validate_path("output.path", self.output_path())?;

        Ok(())
    }
}

impl Validate for MenuConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
