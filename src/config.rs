use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub columns: ColumnNames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// 上传限制
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// 单次请求体上限 (字节)
    pub max_bytes: usize,
}

impl UploadConfig {
    /// 以 MB 表示的上限, 用于提示信息
    pub fn max_megabytes(&self) -> usize {
        self.max_bytes / (1024 * 1024)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

/// 核心逻辑读取的列名
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// 商品目录中的多值条码列
    pub barcodes: String,
    /// 找不到条码列时按位置回退 (0-based)
    pub barcode_fallback_position: usize,
    pub group_id: String,
    pub group_name: String,
    pub brand: String,
    pub category: String,
    /// 商品目录中的库存列
    pub in_stock: String,
    /// 销售表中的匹配键
    pub transaction_key: String,
    pub quantity: String,
    /// 库存表中的匹配键与库存列
    pub stock_key: String,
    pub stock_quantity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            barcodes: "Barcodes".to_string(),
            barcode_fallback_position: 10,
            group_id: "Category Group ID".to_string(),
            group_name: "Category Group Name".to_string(),
            brand: "Brand".to_string(),
            category: "Category".to_string(),
            in_stock: "In Stock Qty".to_string(),
            transaction_key: "SKU".to_string(),
            quantity: "Qty".to_string(),
            stock_key: "SKU".to_string(),
            stock_quantity: "In Stock Qty".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> matcher.{toml,yaml,json} -> MATCHER__* 环境变量 -> PORT
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("matcher").required(false))
            .add_source(
                Environment::with_prefix("MATCHER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }
}
