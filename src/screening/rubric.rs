use crate::adapters::listing::list_all;
use crate::domain::ports::BlobStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCREENING_CONFIG_PATH: &str = "config/screening-config.json";

/// Inclusion/exclusion rubric shared by reviewers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningConfig {
    #[serde(default)]
    pub inclusion_criteria: Vec<String>,
    #[serde(default)]
    pub exclusion_criteria: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn clean(criteria: Vec<String>) -> Vec<String> {
    criteria
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

impl ScreeningConfig {
    pub fn new(inclusion_criteria: Vec<String>, exclusion_criteria: Vec<String>) -> Self {
        Self {
            inclusion_criteria: clean(inclusion_criteria),
            exclusion_criteria: clean(exclusion_criteria),
            updated_at: None,
        }
    }
}

/// Reads and replaces the rubric JSON blob.
pub struct ScreeningConfigStore<B: BlobStore> {
    store: B,
}

impl<B: BlobStore> ScreeningConfigStore<B> {
    pub fn new(store: B) -> Self {
        Self { store }
    }

    async fn existing_urls(&self) -> Result<Vec<String>> {
        Ok(list_all(&self.store, SCREENING_CONFIG_PATH)
            .await?
            .into_iter()
            .filter(|blob| blob.pathname == SCREENING_CONFIG_PATH)
            .map(|blob| blob.url)
            .collect())
    }

    /// 尚未儲存過時回傳空的設定
    pub async fn load(&self) -> Result<ScreeningConfig> {
        let urls = self.existing_urls().await?;
        let Some(url) = urls.last() else {
            tracing::info!("No screening config stored yet, using defaults");
            return Ok(ScreeningConfig::default());
        };

        let data = self.store.get(url).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// 先寫入新的 blob，再移除舊版本
    pub async fn save(&self, config: ScreeningConfig) -> Result<ScreeningConfig> {
        let mut config = ScreeningConfig::new(config.inclusion_criteria, config.exclusion_criteria);
        config.updated_at = Some(Utc::now());

        let previous = self.existing_urls().await?;
        let data = serde_json::to_vec_pretty(&config)?;
        let stored = self
            .store
            .put(SCREENING_CONFIG_PATH, data, "application/json")
            .await?;

        let stale: Vec<String> = previous
            .into_iter()
            .filter(|url| *url != stored.url)
            .collect();
        self.store.delete(&stale).await?;

        tracing::info!(
            "✅ Saved screening config ({} inclusion, {} exclusion criteria)",
            config.inclusion_criteria.len(),
            config.exclusion_criteria.len()
        );
        Ok(config)
    }
}
