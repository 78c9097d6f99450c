use crate::model::Country;
use anyhow::Result;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Directory endpoint, restcountries v3 shape.
pub const DEFAULT_URL: &str = "https://restcountries.com/v3.1/all?fields=name,flags,idd";

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Built-in directory used whenever the lookup is unavailable or returns
/// nothing usable.
pub static FALLBACK: Lazy<Vec<Country>> = Lazy::new(|| {
    [
        ("United States", "+1", "\u{1F1FA}\u{1F1F8}"),
        ("Canada", "+1", "\u{1F1E8}\u{1F1E6}"),
        ("India", "+91", "\u{1F1EE}\u{1F1F3}"),
        ("United Kingdom", "+44", "\u{1F1EC}\u{1F1E7}"),
        ("Australia", "+61", "\u{1F1E6}\u{1F1FA}"),
        ("Germany", "+49", "\u{1F1E9}\u{1F1EA}"),
        ("France", "+33", "\u{1F1EB}\u{1F1F7}"),
        ("Japan", "+81", "\u{1F1EF}\u{1F1F5}"),
        ("Brazil", "+55", "\u{1F1E7}\u{1F1F7}"),
        ("South Africa", "+27", "\u{1F1FF}\u{1F1E6}"),
    ]
    .into_iter()
    .map(|(name, dial_code, flag)| Country {
        name: name.to_string(),
        dial_code: dial_code.to_string(),
        flag: flag.to_string(),
    })
    .collect()
});

#[derive(Deserialize)]
struct ApiCountry {
    name: ApiName,
    #[serde(default)]
    idd: ApiIdd,
    #[serde(default)]
    flags: ApiFlags,
}

#[derive(Deserialize)]
struct ApiName {
    common: String,
}

#[derive(Deserialize, Default)]
struct ApiIdd {
    root: Option<String>,
    #[serde(default)]
    suffixes: Vec<String>,
}

#[derive(Deserialize, Default)]
struct ApiFlags {
    png: Option<String>,
}

/// Load the country directory, degrading silently to the fallback. Failures
/// are logged, never surfaced.
pub async fn load(url: &str) -> Vec<Country> {
    match fetch(url).await {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => {
            warn!("country directory returned nothing usable, using fallback");
            FALLBACK.clone()
        }
        Err(err) => {
            warn!("country lookup failed, using fallback: {err}");
            FALLBACK.clone()
        }
    }
}

async fn fetch(url: &str) -> Result<Vec<Country>> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let raw: Vec<ApiCountry> = client.get(url).send().await?.json().await?;
    let mut list: Vec<Country> = raw
        .into_iter()
        .filter_map(|country| {
            // only countries with a dialing code are usable in the phone form
            let root = country.idd.root?;
            let suffix = country.idd.suffixes.first().map(String::as_str).unwrap_or("");
            Some(Country {
                name: country.name.common,
                dial_code: format!("{root}{suffix}"),
                flag: country
                    .flags
                    .png
                    .unwrap_or_else(|| "\u{1F3F3}\u{FE0F}".to_string()),
            })
        })
        .collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_ten_entries_with_dial_codes() {
        assert_eq!(FALLBACK.len(), 10);
        assert!(FALLBACK.iter().all(|c| c.dial_code.starts_with('+')));
        assert_eq!(FALLBACK[2].name, "India");
        assert_eq!(FALLBACK[2].dial_code, "+91");
    }

    #[tokio::test]
    async fn unreachable_directory_degrades_to_fallback() {
        let list = load("http://127.0.0.1:9/countries").await;
        assert_eq!(list, *FALLBACK);
    }
}
