use secrecy::SecretBox;
use serde::Deserialize;

/// 実行プロファイル
///
/// `test` の場合は DB に接続せずインメモリストアを使用する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Default,
    Test,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app_profile: Profile,
    /// default プロファイルでは必須
    pub database_url: Option<SecretBox<String>>,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // ハイパーメディアリンク設定
    /// `_links` の href に付与するプレフィックス（空ならルート相対パス）
    #[serde(default)]
    pub public_base_url: String,

    // CORS 設定（カンマ区切り、空なら無効）
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_max_connections() -> u32 {
    DEFAULT_DATABASE_MAX_CONNECTIONS
}

fn default_run_migrations() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// テストプロファイルの設定（環境変数を参照しない）
    pub fn test_profile() -> Self {
        Self {
            app_profile: Profile::Test,
            database_url: None,
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            run_migrations: false,
            host: default_host(),
            port: DEFAULT_PORT,
            public_base_url: String::new(),
            cors_allowed_origins: Vec::new(),
        }
    }

    pub fn is_test_profile(&self) -> bool {
        self.app_profile == Profile::Test
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config =
            envy::from_iter(vars(&[("DATABASE_URL", "postgres://localhost/users")])).unwrap();

        assert_eq!(config.app_profile, Profile::Default);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.run_migrations);
        assert!(config.public_base_url.is_empty());
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://localhost/users"
        );
    }

    #[test]
    fn test_test_profile_from_env() {
        let config: Config = envy::from_iter(vars(&[
            ("APP_PROFILE", "test"),
            ("PORT", "9090"),
            ("CORS_ALLOWED_ORIGINS", "http://a.example,http://b.example"),
        ]))
        .unwrap();

        assert!(config.is_test_profile());
        assert!(config.database_url.is_none());
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.example", "http://b.example"]
        );
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let result: Result<Config, _> = envy::from_iter(vars(&[("APP_PROFILE", "staging")]));
        assert!(result.is_err());
    }
}
