use calltime_core::share::{self, SharePayload};
use calltime_store::Config;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareInfo {
    #[serde(flatten)]
    payload: SharePayload,
    hashtag: String,
    compose_url: String,
}

fn share_info(config: &Config) -> ShareInfo {
    let url = share::recap_url(&config.share_base_url, &config.user_id, config.year);
    ShareInfo {
        payload: share::share_payload(config.year, &url),
        hashtag: share::hashtag(config.year),
        compose_url: share::compose_url(config.year),
    }
}

/// `calltime share [--json]`
pub fn execute(config: &Config, json: bool) -> anyhow::Result<()> {
    let info = share_info(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.payload.title);
        println!("{}", info.payload.text);
        println!("Link:    {}", info.payload.url);
        println!("Tweet:   {}", info.compose_url);
    }
    Ok(())
}
