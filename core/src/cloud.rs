//! EC2 instance metadata lookup.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::task::JoinSet;
use tracing::debug;

pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254/latest/meta-data/";
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(2);

pub const AWS_PROVIDER: &str = "AWS";
pub const UNKNOWN_PROVIDER: &str = "Unknown/On-Premise";

/// Report key and metadata path for every field looked up.
pub const AWS_FIELDS: [(&str, &str); 5] = [
    ("instance_id", "instance-id"),
    ("instance_type", "instance-type"),
    ("public_ip", "public-ipv4"),
    ("availability_zone", "placement/availability-zone"),
    ("security_groups", "security-groups"),
];

/// Metadata fields that could be read. Unreadable fields are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudInfo {
    pub fields: BTreeMap<String, String>,
}

impl CloudInfo {
    pub fn cloud_provider(&self) -> &'static str {
        if self.fields.is_empty() {
            UNKNOWN_PROVIDER
        } else {
            AWS_PROVIDER
        }
    }
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> CloudInfo;
}

pub struct AwsMetadataClient {
    client: Client,
    base_url: String,
}

impl AwsMetadataClient {
    /// An empty `base_url` disables the lookup.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MetadataSource for AwsMetadataClient {
    async fn fetch(&self) -> CloudInfo {
        if self.base_url.is_empty() {
            return CloudInfo::default();
        }

        let mut lookups = JoinSet::new();
        for (key, endpoint) in AWS_FIELDS {
            let client = self.client.clone();
            let url = self.url_for(endpoint);
            lookups.spawn(async move { (key, fetch_field(&client, &url).await) });
        }

        let mut info = CloudInfo::default();
        while let Some(joined) = lookups.join_next().await {
            if let Ok((key, Some(value))) = joined {
                info.fields.insert(key.to_string(), value);
            }
        }
        info
    }
}

async fn fetch_field(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(url, error = %e, "metadata request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(url, status = %response.status(), "metadata field not available");
        return None;
    }

    let body: String = response.text().await.ok()?;
    (!body.is_empty()).then_some(body)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
