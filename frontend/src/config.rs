//! 运行时配置
//!
//! 构建时通过环境变量注入（Trunk 构建时 `option_env!`），缺省值用于本地开发。

use std::str::FromStr;

const DEFAULT_API_BASE: &str = "http://localhost:5000";
const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

const VAR_API_BASE: &str = "COURSEMART_API_BASE";
const VAR_LOG: &str = "COURSEMART_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端地址，不含 `/api`
    pub api_base: String,
    pub log_level: log::Level,
}

impl AppConfig {
    /// 从构建时环境变量加载
    pub fn load() -> Self {
        Self::new(compiled_var)
    }

    /// 通过 `var` 查询配置项，缺失或无法解析时回退到默认值
    pub fn new(var: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = var(VAR_API_BASE)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let log_level = var(VAR_LOG)
            .and_then(|v| log::Level::from_str(v.trim()).ok())
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            api_base,
            log_level,
        }
    }

    /// REST 根路径，例如 `http://localhost:5000/api`
    pub fn api_root(&self) -> String {
        format!("{}/api", self.api_base)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(|_| None)
    }
}

fn compiled_var(name: &str) -> Option<String> {
    let value = match name {
        VAR_API_BASE => option_env!("COURSEMART_API_BASE"),
        VAR_LOG => option_env!("COURSEMART_LOG"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::new(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_overrides() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "http://localhost:5000");
        assert_eq!(config.api_root(), "http://localhost:5000/api");
        assert_eq!(config.log_level, log::Level::Info);
    }

    #[test]
    fn overrides_are_normalised() {
        let config = config_from(&[
            ("COURSEMART_API_BASE", " https://api.coursemart.dev/ "),
            ("COURSEMART_LOG", "debug"),
        ]);
        assert_eq!(config.api_root(), "https://api.coursemart.dev/api");
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[("COURSEMART_API_BASE", "   "), ("COURSEMART_LOG", "loud")]);
        assert_eq!(config.api_base, "http://localhost:5000");
        assert_eq!(config.log_level, log::Level::Info);
    }
}
