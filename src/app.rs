// src/app.rs
use crate::client::PodcastClient;
use crate::loader::PodcastLoader;
use crate::pages::Page;
use crate::routes::{RouteBuilder, RouteTree};
use std::sync::Arc;

/// The application's route table:
///
/// ```text
/// /onboarding/user_account     UserAccount
/// /onboarding/device_name      DeviceName
/// /app                         AppShell
///   (index)                    Home
///   podcast/:podcastId         PodcastDetail, loaded by PodcastLoader
/// ```
pub fn app_routes(client: Arc<dyn PodcastClient>) -> RouteTree {
    RouteBuilder::root(Page::Root)
        .child(
            RouteBuilder::path("onboarding", Page::Onboarding)
                .child(RouteBuilder::path("user_account", Page::UserAccount))
                .child(RouteBuilder::path("device_name", Page::DeviceName)),
        )
        .child(
            RouteBuilder::path("app", Page::AppShell)
                .child(RouteBuilder::index(Page::Home))
                .child(
                    RouteBuilder::path("podcast/:podcastId", Page::PodcastDetail)
                        .loader(Arc::new(PodcastLoader::new(client))),
                ),
        )
        .build()
        // The declarations above are fixed; the tests below pin them as well formed.
        .expect("application route table is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryPodcastClient;

    fn tree() -> RouteTree {
        app_routes(Arc::new(InMemoryPodcastClient::new(vec![])))
    }

    #[test]
    fn route_table_builds() {
        let tree = tree();
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn exactly_one_route_has_a_loader() {
        let tree = tree();
        let with_loader: Vec<String> = tree
            .iter()
            .filter(|(_, node)| node.loader().is_some())
            .map(|(id, _)| tree.pattern(id))
            .collect();

        assert_eq!(with_loader, vec!["/app/podcast/:podcastId".to_string()]);
    }

    #[test]
    fn url_surface_is_covered() {
        let tree = tree();
        let cases = [
            ("/onboarding/user_account", Page::UserAccount),
            ("/onboarding/device_name", Page::DeviceName),
            ("/app", Page::Home),
            ("/app/", Page::Home),
            ("/app/podcast/42", Page::PodcastDetail),
        ];
        for (location, page) in cases {
            let matched = tree.resolve(location).unwrap();
            assert_eq!(tree.node(matched.leaf()).page(), page, "{}", location);
        }
    }
}
