use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub limits: LimitSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    // 盐可轮换;旧指纹挂着的投票/举报历史随之作废
    pub identity_salt: String,
}

/// 每个动作类的预算:窗口内最多 budget 次
#[derive(Deserialize, Clone, Copy)]
pub struct ActionBudget {
    pub budget: u32,
    pub window_secs: u64,
}

#[derive(Deserialize, Clone, Copy)]
pub struct LimitSettings {
    pub vote: ActionBudget,
    pub comment: ActionBudget,
    pub post: ActionBudget,
    pub flag: ActionBudget,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("database.url", "sqlite://data/veil.db")?
            .set_default("security.identity_salt", "change_me_please")?
            .set_default("limits.vote.budget", 30)?
            .set_default("limits.vote.window_secs", 120)?
            .set_default("limits.comment.budget", 10)?
            .set_default("limits.comment.window_secs", 300)?
            .set_default("limits.post.budget", 5)?
            .set_default("limits.post.window_secs", 600)?
            .set_default("limits.flag.budget", 10)?
            .set_default("limits.flag.window_secs", 600)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .expect("Environment variables should serialize to JSON"),
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("VEIL_"))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches("VEIL_")
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
