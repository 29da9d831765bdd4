// src/shell.rs
use crate::app::app_routes;
use crate::client::PodcastClient;
use crate::config::ShellConfig;
use crate::errors::ShellError;
use crate::pages::render_outcome;
use crate::query_cache::QueryCache;
use crate::router::{Navigation, Router};
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ===== document

/// An element the application can be mounted into. Keeps every frame
/// rendered into it.
#[derive(Debug)]
pub struct MountPoint {
    id: String,
    mounted: AtomicBool,
    frames: Mutex<Vec<String>>,
}

impl MountPoint {
    fn new(id: &str) -> Self {
        Self { id: id.to_string(), mounted: AtomicBool::new(false), frames: Mutex::new(Vec::new()) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn frames(&self) -> Vec<String> {
        match self.frames.lock() {
            Ok(frames) => frames.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last_frame(&self) -> Option<String> {
        self.frames().pop()
    }

    fn render(&self, frame: String) {
        match self.frames.lock() {
            Ok(mut frames) => frames.push(frame),
            Err(poisoned) => poisoned.into_inner().push(frame),
        }
    }
}

#[derive(Debug, Default)]
pub struct Document {
    elements: HashMap<String, Arc<MountPoint>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document holding the one element the config asks to mount into.
    pub fn for_config(config: &ShellConfig) -> Self {
        Self::new().with_element(&config.mount_point)
    }

    pub fn with_element(mut self, id: &str) -> Self {
        self.elements.insert(id.to_string(), Arc::new(MountPoint::new(id)));
        self
    }

    pub fn element_by_id(&self, id: &str) -> Option<Arc<MountPoint>> {
        self.elements.get(id).cloned()
    }
}

// ===== shell context

/// What every page gets to see: the process-wide query cache and the data client.
pub struct ShellContext {
    cache: QueryCache,
    client: Arc<dyn PodcastClient>,
}

impl ShellContext {
    pub fn new(cache: QueryCache, client: Arc<dyn PodcastClient>) -> Self {
        Self { cache, client }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn client(&self) -> &Arc<dyn PodcastClient> {
        &self.client
    }
}

// ===== shell

pub struct AppShell {
    context: Arc<ShellContext>,
    router: Router,
    mount_point: Arc<MountPoint>,
}

impl AppShell {
    /// Builds the cache and the router and mounts into the configured element.
    /// Fails if the element does not exist or already hosts an application.
    pub fn mount(
        document: &Document,
        config: &ShellConfig,
        client: Arc<dyn PodcastClient>,
    ) -> Result<Self, ShellError> {
        let mount_point = document.element_by_id(&config.mount_point).ok_or_else(|| {
            error!("Mount point '#{}' not found", config.mount_point);
            ShellError::MountPointMissing(config.mount_point.clone())
        })?;

        if mount_point.mounted.swap(true, Ordering::SeqCst) {
            return Err(ShellError::AlreadyMounted(config.mount_point.clone()));
        }

        let context = Arc::new(ShellContext::new(QueryCache::new(config.stale_time()), client.clone()));
        let router = Router::new(Arc::new(app_routes(client)));
        info!(
            "Mounted app into '#{}' ({} routes, cache stale after {:?})",
            mount_point.id(),
            router.tree().len(),
            config.stale_time()
        );

        Ok(Self { context, router, mount_point })
    }

    pub fn context(&self) -> &Arc<ShellContext> {
        &self.context
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn mount_point(&self) -> &Arc<MountPoint> {
        &self.mount_point
    }

    /// Navigates and, if the navigation commits, renders it into the mount
    /// point. Returns the rendered frame.
    pub async fn navigate(&self, location: &str) -> Option<String> {
        match self.router.navigate(location).await {
            Navigation::Committed(outcome) => {
                let frame = render_outcome(self.router.tree(), &outcome, &self.context).await;
                self.mount_point.render(frame.clone());
                Some(frame)
            }
            Navigation::Superseded { location } => {
                debug!("Shell: skipping render for superseded {}", location);
                None
            }
        }
    }
}
