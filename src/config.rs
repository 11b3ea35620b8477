//! 客户端配置
//!
//! 编译期可通过 `FOLDERVAULT_API_BASE` 覆盖后端地址，未设置时使用默认值。

/// 默认后端 API 根地址
pub const DEFAULT_API_BASE_URL: &str = "https://design-shark-backend-4-6.onrender.com/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 覆盖值为空或全是空白时回退到默认地址
    pub fn from_override(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_API_BASE_URL),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_and_fallback() {
        assert_eq!(
            ClientConfig::from_override(Some("http://localhost:5000/api/")).api_base_url(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            ClientConfig::from_override(Some("  ")).api_base_url(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(ClientConfig::from_override(None), ClientConfig::default());
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::new("http://h/api");
        assert_eq!(config.url("/files/x"), "http://h/api/files/x");
        assert_eq!(config.url("auth/login"), "http://h/api/auth/login");
    }
}
