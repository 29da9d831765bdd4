// src/loader.rs
use crate::client::PodcastClient;
use crate::errors::LoaderError;
use crate::podcast::{Podcast, PodcastId};
use crate::routes::Params;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

/// Data handed to a page as its initial data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderData {
    Podcast(Podcast),
}

impl LoaderData {
    pub fn as_podcast(&self) -> Option<&Podcast> {
        match self {
            LoaderData::Podcast(podcast) => Some(podcast),
        }
    }
}

// ===== loader seam
#[async_trait]
pub trait Loader: Send + Sync {
    /// Runs once per navigation to the owning route, before its page renders.
    async fn load(&self, params: &Params) -> Result<LoaderData, LoaderError>;
}

// ===== podcast detail loader
pub struct PodcastLoader {
    client: Arc<dyn PodcastClient>,
}

impl PodcastLoader {
    pub const PARAM: &'static str = "podcastId";

    pub fn new(client: Arc<dyn PodcastClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Loader for PodcastLoader {
    async fn load(&self, params: &Params) -> Result<LoaderData, LoaderError> {
        let raw = params.get(Self::PARAM).ok_or(LoaderError::MissingParam(Self::PARAM))?;

        // A malformed id can never match a record; fail before hitting the backend.
        let id: PodcastId = raw.parse().map_err(|_| {
            warn!("PodcastLoader: '{}' is not a podcast id", raw);
            LoaderError::InvalidPodcastId(raw.to_string())
        })?;

        info!("PodcastLoader: loading podcast {}", id);
        let podcasts = self.client.list_all().await?;
        debug!("PodcastLoader: scanning {} podcasts for {}", podcasts.len(), id);

        podcasts
            .into_iter()
            .find(|podcast| podcast.id() == id)
            .map(LoaderData::Podcast)
            .ok_or(LoaderError::PodcastNotFound(id))
    }
}
