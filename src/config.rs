//! Runtime configuration, assembled once at startup and injected into the
//! components that need it.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// User ids allowed to use admin actions. These bypass the membership
    /// gate entirely.
    pub admin_ids: Vec<i64>,
    /// Username of the channel users must join, including the leading `@`.
    pub channel: String,
    /// Support contact shown in help and purchase texts.
    pub support_handle: String,
    /// Base URL of the external number record API.
    pub lookup_api_url: String,
}

impl Config {
    /// Reads the non-secret configuration from the environment. `BOT_TOKEN`
    /// and `DATABASE_URL` are read separately in `main` because missing
    /// credentials are fatal; everything here has a usable default.
    pub fn from_env() -> Self {
        let admin_ids = env::var("ADMIN_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect();
        Self {
            admin_ids,
            channel: env::var("CHANNEL_USERNAME").unwrap_or_else(|_| "@ToxicBack2025".to_string()),
            support_handle: env::var("SUPPORT_ADMIN").unwrap_or_else(|_| "@CDMAXX".to_string()),
            lookup_api_url: env::var("LOOKUP_API_URL")
                .unwrap_or_else(|_| "https://numinfoapi.vercel.app/api/num".to_string()),
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}
