//! Channel configuration and the character-replacement table.
//!
//! The built-in channel table mirrors what the operators feed the pipeline
//! in production; a YAML file passed via `--config` can override or extend
//! it entry by entry. Configs are validated before a run so a malformed
//! entry skips its own channel without touching the rest of a batch.

use std::collections::BTreeMap;
use std::error::Error;

use serde::Deserialize;
use url::Url;

use crate::core::dedup::DedupPolicy;

/// One logical output stream of a fan-out source.
#[derive(Debug, Clone, Deserialize)]
pub struct SubChannel {
    /// Identifier appended to each generated request URL.
    pub id: String,
    /// Output file name (without extension) for this sub-channel.
    pub file_name: String,
    /// Fallback synopsis for this sub-channel's records.
    pub default_description: String,
}

/// Static description of one output channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Output file name (without extension). Absent for fan-out configs,
    /// which name their files per sub-channel.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Source base URL the per-source formatter builds on.
    pub url: String,
    /// Directory the listing file(s) are written into.
    pub output_path: String,
    /// Fallback synopsis when the source has none. Absent for fan-out
    /// configs.
    #[serde(default)]
    pub default_description: Option<String>,
    /// Sub-channels of a fan-out source, in request order.
    #[serde(default)]
    pub sub_channels: Vec<SubChannel>,
    /// Static HTTP headers sent with every request for this channel.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Which fields identify a duplicate slot for this channel.
    #[serde(default)]
    pub dedup_policy: DedupPolicy,
}

impl ChannelConfig {
    /// Check that this config can actually drive a run: a parseable base
    /// URL, and either a plain output identity or at least one sub-channel.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        Url::parse(&self.url).map_err(|e| format!("invalid base url {:?}: {e}", self.url))?;
        if self.output_path.is_empty() {
            return Err("output_path must not be empty".into());
        }
        if self.sub_channels.is_empty() {
            if self.file_name.as_deref().is_none_or(str::is_empty) {
                return Err("channel without sub_channels needs a file_name".into());
            }
            if self.default_description.is_none() {
                return Err("channel without sub_channels needs a default_description".into());
            }
        }
        Ok(())
    }
}

/// The channels the pipeline knows how to harvest out of the box.
pub fn builtin_channels() -> BTreeMap<String, ChannelConfig> {
    let mut channels = BTreeMap::new();

    channels.insert(
        "gameshownetwork".to_string(),
        ChannelConfig {
            file_name: Some("Game Show Network - US".to_string()),
            url: "https://www.gameshownetwork.com/schedule".to_string(),
            output_path: "./data/gameshow".to_string(),
            default_description: Some("Program Game Show Network".to_string()),
            sub_channels: Vec::new(),
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );
    channels.insert(
        "my9".to_string(),
        ChannelConfig {
            file_name: Some("MY9 TV - US".to_string()),
            url: "https://www.titantvguide.com/data/eventspage/52676/cb5977cf-30e2-4fe0-8052-023ba0063beb/"
                .to_string(),
            output_path: "./data/my9".to_string(),
            default_description: Some("Programma My9".to_string()),
            sub_channels: Vec::new(),
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );
    channels.insert(
        "bet".to_string(),
        ChannelConfig {
            file_name: Some("BET - US".to_string()),
            url: "https://www.bet.com/api/more/tvschedule/".to_string(),
            output_path: "./data/bet".to_string(),
            default_description: Some("Programma Bet".to_string()),
            sub_channels: Vec::new(),
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );
    channels.insert(
        "bvntv".to_string(),
        ChannelConfig {
            file_name: Some("BVN TV - NL".to_string()),
            url: "https://www.bvn.tv/json/guide/".to_string(),
            output_path: "./data/bvn".to_string(),
            default_description: Some("Programma BVN".to_string()),
            sub_channels: Vec::new(),
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );
    channels.insert(
        "metvtoons".to_string(),
        ChannelConfig {
            file_name: Some("METV TOONS - US".to_string()),
            url: "https://metvtoons.com/schedule/".to_string(),
            output_path: "./data/metvtoons".to_string(),
            default_description: Some("Program MeTvToons".to_string()),
            sub_channels: Vec::new(),
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );
    channels.insert(
        "hopetv".to_string(),
        ChannelConfig {
            file_name: Some("HOPE TV - US".to_string()),
            url: "https://www.hopetv.org/api/schedule/?day=".to_string(),
            output_path: "./data/hopetv".to_string(),
            default_description: Some("Program Hope TV".to_string()),
            sub_channels: Vec::new(),
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );
    channels.insert(
        "npo".to_string(),
        ChannelConfig {
            file_name: None,
            url: "https://npo.nl/start/api/domain/guide-channel?date=".to_string(),
            output_path: "./data/npo".to_string(),
            default_description: None,
            sub_channels: vec![
                SubChannel {
                    id: "2042e1ee-0e79-4766-aea2-5b300d6839b2".to_string(),
                    file_name: "NPO3 - NL".to_string(),
                    default_description: "Programma NPO3".to_string(),
                },
                SubChannel {
                    id: "316951f5-ce06-41d2-ae24-44eb25368a61".to_string(),
                    file_name: "NPO2 - NL".to_string(),
                    default_description: "Programma NPO2".to_string(),
                },
                SubChannel {
                    id: "83dc1f25-a065-496c-9418-bd5c60dfb36d".to_string(),
                    file_name: "NPO1 - NL".to_string(),
                    default_description: "Programma NPO1".to_string(),
                },
            ],
            headers: Vec::new(),
            dedup_policy: DedupPolicy::default(),
        },
    );

    channels
}

/// The built-in channel table, with entries overridden or extended from an
/// optional YAML file.
pub fn load_channels(
    config_path: Option<&str>,
) -> Result<BTreeMap<String, ChannelConfig>, Box<dyn Error>> {
    let mut channels = builtin_channels();
    if let Some(path) = config_path {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read channel config {path:?}: {e}"))?;
        let overrides: BTreeMap<String, ChannelConfig> = serde_yaml::from_str(&raw)?;
        channels.extend(overrides);
    }
    Ok(channels)
}

/// Literal substring replacements applied to titles and synopses before
/// serialization: delimiter collisions, smart quotes, and the Windows-1252
/// control artifacts some feeds leak.
pub fn default_replacements() -> Vec<(String, String)> {
    vec![
        ("&".to_string(), "en".to_string()),
        ("'".to_string(), "\u{2019}".to_string()),
        ("\u{201c}".to_string(), "\"".to_string()),
        ("\u{201d}".to_string(), "\"".to_string()),
        (" \r\n".to_string(), " ".to_string()),
        ("---".to_string(), "-".to_string()),
        ("\n".to_string(), " ".to_string()),
        ("|".to_string(), "-".to_string()),
        ("\u{0092}".to_string(), "\u{2019}".to_string()),
        ("\u{0096}".to_string(), "-".to_string()),
        ("\u{0093}".to_string(), "\"".to_string()),
        ("\u{0094}".to_string(), "\"".to_string()),
    ]
}
