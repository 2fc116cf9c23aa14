// ==========================================
// 挤压机生产日报分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、快照
// 存储: JSON 文件
// 加载顺序: 显式路径 → 用户配置目录 → 内置默认值
// ==========================================

use crate::config::threshold_config::ThresholdTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 用户配置目录下的子目录名
pub const CONFIG_DIR_NAME: &str = "press-prod-analyzer";

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值非法: {0}")]
    InvalidValue(String),

    #[error("配置文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AnalyzerConfig - 分析配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// 阈值表
    pub thresholds: ThresholdTable,

    /// 映射表部门编号 → 部门名称
    pub department_codes: BTreeMap<i64, String>,

    /// 生产日报工作表可接受名称（忽略大小写/空格）
    pub production_sheet_names: Vec<String>,

    /// 映射工作表可接受名称（按优先级）
    pub mapping_sheet_names: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let department_codes = [
            (0, "No Department"),
            (1, "Tool Room"),
            (2, "Production Department"),
            (3, "Tool Room and Production Department"),
            (4, "Foundry"),
            (5, "Maintainance"),
        ]
        .into_iter()
        .map(|(code, name)| (code, name.to_string()))
        .collect();

        Self {
            thresholds: ThresholdTable::default(),
            department_codes,
            production_sheet_names: vec![
                "PRESS PROD SHEET".to_string(),
                "PRESS PROD".to_string(),
            ],
            mapping_sheet_names: vec!["Mapping".to_string(), "Sheet1".to_string()],
        }
    }
}

impl AnalyzerConfig {
    /// 校验配置完整性
    pub fn validate(&self) -> ConfigResult<()> {
        self.thresholds
            .validate()
            .map_err(ConfigError::InvalidValue)?;
        if self.production_sheet_names.is_empty() {
            return Err(ConfigError::InvalidValue(
                "production_sheet_names 不能为空".to_string(),
            ));
        }
        if self.mapping_sheet_names.is_empty() {
            return Err(ConfigError::InvalidValue(
                "mapping_sheet_names 不能为空".to_string(),
            ));
        }
        Ok(())
    }
}

// ==========================================
// ConfigSource - 配置来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    UserDir(PathBuf),
    BuiltIn,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AnalyzerConfig,
    source: ConfigSource,
}

impl ConfigManager {
    /// 使用内置默认值
    pub fn with_defaults() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            source: ConfigSource::BuiltIn,
        }
    }

    /// 按加载顺序解析配置
    ///
    /// # 参数
    /// - explicit_path: 命令行指定的配置文件（存在则必须可读可解析）
    ///
    /// # 返回
    /// - Ok(ConfigManager): 加载成功
    /// - Err: 显式文件/用户目录文件读取或解析失败
    pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit_path {
            let config = Self::read_file(path)?;
            info!(path = %path.display(), "已加载指定配置文件");
            return Ok(Self {
                config,
                source: ConfigSource::Explicit(path.to_path_buf()),
            });
        }

        if let Some(path) = default_config_path().filter(|p| p.exists()) {
            let config = Self::read_file(&path)?;
            info!(path = %path.display(), "已加载用户目录配置文件");
            return Ok(Self {
                config,
                source: ConfigSource::UserDir(path),
            });
        }

        debug!("未找到配置文件，使用内置默认配置");
        Ok(Self::with_defaults())
    }

    /// 读取并校验 JSON 配置文件
    fn read_file(path: &Path) -> ConfigResult<AnalyzerConfig> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: AnalyzerConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// 获取配置快照（格式化 JSON）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.config)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// 写出当前配置到文件（自动创建父目录）
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.get_config_snapshot()?).map_err(write_err)?;
        info!(path = %path.display(), "配置文件已写出");
        Ok(())
    }
}

/// 用户配置目录下的默认配置路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
