// Fetch hook: builds request URLs and hands out typed, cancellable handles
// over the shared fetch cache.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::Fetcher;
use crate::cache::{FetchCache, SharedState};
use crate::error::{FetchError, PokedexError, Result};

use super::state::FetchState;

/// Build `base + path` or `base + path + "/" + item`.
///
/// An empty `item` is treated as absent. An empty `path` is rejected.
pub fn target_url(base_url: &str, path: &str, item: Option<&str>) -> Result<String> {
    if path.is_empty() {
        return Err(PokedexError::InvalidArgument(
            "resource path is required".to_string(),
        ));
    }

    Ok(match item {
        Some(item) if !item.is_empty() => format!("{}{}/{}", base_url, path, item),
        _ => format!("{}{}", base_url, path),
    })
}

/// Entry point views use to fetch a resource under one base URL.
#[derive(Clone)]
pub struct FetchHook {
    base_url: String,
    cache: Arc<FetchCache>,
    fetcher: Arc<dyn Fetcher>,
}

impl FetchHook {
    pub fn new(
        base_url: impl Into<String>,
        cache: Arc<FetchCache>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            cache,
            fetcher,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start (or join) the fetch for `path`/`item` and return a handle to its state.
    ///
    /// Fails with `InvalidArgument` before touching the cache when `path` is empty.
    pub fn use_fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        item: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<FetchHandle<T>> {
        let url = target_url(&self.base_url, path, item)?;
        let rx = self.cache.subscribe(&url, Arc::clone(&self.fetcher));
        Ok(FetchHandle::new(url, rx, cancel))
    }
}

/// A view's subscription to one cache key, decoded into `T`.
///
/// Errors are terminal for the handle. Successes may be replaced by a
/// revalidated success. Once the token is cancelled the state is frozen.
pub struct FetchHandle<T> {
    url: String,
    rx: watch::Receiver<SharedState>,
    state: FetchState<T>,
    cancel: CancellationToken,
}

impl<T: DeserializeOwned> FetchHandle<T> {
    fn new(url: String, mut rx: watch::Receiver<SharedState>, cancel: CancellationToken) -> Self {
        let current = rx.borrow_and_update().clone();
        let mut handle = Self {
            url,
            rx,
            state: FetchState::Pending,
            cancel,
        };
        handle.apply(current);
        handle
    }

    /// Pull the latest shared value, if any. Returns whether the state changed.
    pub fn poll(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        match self.rx.has_changed() {
            Ok(true) => {}
            _ => return false,
        }
        let current = self.rx.borrow_and_update().clone();
        self.apply(current)
    }

    /// Wait for the next shared value and apply it.
    #[cfg(test)]
    ///
    /// Returns `false` if the handle was cancelled or the cache entry went away.
    pub async fn changed(&mut self) -> bool {
        let changed = tokio::select! {
            _ = self.cancel.cancelled() => return false,
            res = self.rx.changed() => res.is_ok(),
        };
        if !changed || self.cancel.is_cancelled() {
            return false;
        }
        let current = self.rx.borrow_and_update().clone();
        self.apply(current)
    }

    fn apply(&mut self, shared: SharedState) -> bool {
        if self.state.is_error() {
            return false;
        }
        match shared {
            FetchState::Pending => false,
            FetchState::Error(err) => {
                self.state = FetchState::Error(err);
                true
            }
            FetchState::Success(value) => {
                self.state = match T::deserialize(&*value) {
                    Ok(data) => FetchState::Success(data),
                    Err(e) => FetchState::Error(FetchError::SchemaMismatch(e.to_string())),
                };
                true
            }
        }
    }
}

impl<T> FetchHandle<T> {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }
}

impl<T> Drop for FetchHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CollectionPage, Pokemon};
    use crate::fetch::testing::{FakeFetcher, settle};
    use serde_json::{Value, json};

    const BASE: &str = "https://pokeapi.co/api/v2/";

    fn hook(fetcher: Arc<FakeFetcher>) -> FetchHook {
        FetchHook::new(BASE, Arc::new(FetchCache::default()), fetcher)
    }

    #[test]
    fn test_target_url_without_item() {
        assert_eq!(
            target_url(BASE, "pokemon", None).unwrap(),
            "https://pokeapi.co/api/v2/pokemon"
        );
        assert_eq!(target_url("b/", "x", None).unwrap(), "b/x");
    }

    #[test]
    fn test_target_url_with_item() {
        assert_eq!(
            target_url(BASE, "pokemon", Some("bulbasaur")).unwrap(),
            "https://pokeapi.co/api/v2/pokemon/bulbasaur"
        );
        assert_eq!(target_url("b/", "p", Some("7")).unwrap(), "b/p/7");
    }

    #[test]
    fn test_target_url_empty_item_is_absent() {
        assert_eq!(target_url(BASE, "pokemon", Some("")).unwrap(), format!("{}pokemon", BASE));
    }

    #[test]
    fn test_target_url_empty_path_rejected() {
        let err = target_url(BASE, "", Some("bulbasaur")).unwrap_err();
        assert!(matches!(err, PokedexError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_empty_path_fails_before_any_fetch() {
        let fetcher = Arc::new(FakeFetcher::new());
        let cache = Arc::new(FetchCache::default());
        let hook = FetchHook::new(BASE, cache.clone(), fetcher.clone());

        let result = hook.use_fetch::<Value>("", None, CancellationToken::new());
        assert!(matches!(result, Err(PokedexError::InvalidArgument(_))));

        settle().await;
        assert_eq!(fetcher.calls(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_handle_resolves_typed_data() {
        let url = format!("{}pokemon", BASE);
        let fetcher = Arc::new(FakeFetcher::new().respond(
            &url,
            Ok(json!({"results": [{"name": "bulbasaur", "url": "u"}]})),
        ));
        let hook = hook(fetcher);

        let mut handle = hook
            .use_fetch::<CollectionPage>("pokemon", None, CancellationToken::new())
            .unwrap();
        assert_eq!(handle.url(), url);
        assert_eq!(handle.state(), &FetchState::Pending);

        assert!(handle.changed().await);
        let page = handle.state().data().unwrap();
        assert_eq!(page.results[0].name, "bulbasaur");
    }

    #[tokio::test]
    async fn test_concurrent_handles_share_fetch_and_value() {
        let url = format!("{}pokemon/pikachu", BASE);
        let fetcher = Arc::new(FakeFetcher::new().respond(
            &url,
            Ok(json!({
                "id": 25, "name": "pikachu",
                "sprites": {"front_default": "p.png"},
                "types": [{"slot": 1, "type": {"name": "electric", "url": "e"}}]
            })),
        ));
        let hook = hook(fetcher.clone());

        let mut a = hook
            .use_fetch::<Pokemon>("pokemon", Some("pikachu"), CancellationToken::new())
            .unwrap();
        let mut b = hook
            .use_fetch::<Pokemon>("pokemon", Some("pikachu"), CancellationToken::new())
            .unwrap();

        settle().await;
        assert!(a.poll());
        assert!(b.poll());
        assert_eq!(a.state(), b.state());
        assert_eq!(a.state().data().unwrap().id, 25);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_schema_mismatch_becomes_error() {
        let url = format!("{}pokemon/missingno", BASE);
        let fetcher = Arc::new(FakeFetcher::new().respond(&url, Ok(json!({"id": "not a number"}))));
        let hook = hook(fetcher);

        let mut handle = hook
            .use_fetch::<Pokemon>("pokemon", Some("missingno"), CancellationToken::new())
            .unwrap();
        handle.changed().await;

        assert!(matches!(
            handle.state(),
            FetchState::Error(FetchError::SchemaMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_handle_ignores_result() {
        let url = format!("{}pokemon", BASE);
        let fetcher = Arc::new(FakeFetcher::new().respond(&url, Ok(json!({"results": []}))));
        let hook = hook(fetcher.clone());

        let cancel = CancellationToken::new();
        let mut handle = hook
            .use_fetch::<CollectionPage>("pokemon", None, cancel.clone())
            .unwrap();
        cancel.cancel();

        settle().await;
        assert!(!handle.poll());
        assert!(!handle.changed().await);
        assert_eq!(handle.state(), &FetchState::Pending);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels_token() {
        let url = format!("{}pokemon", BASE);
        let fetcher = Arc::new(FakeFetcher::new().respond(&url, Ok(json!({"results": []}))));
        let hook = hook(fetcher);

        let cancel = CancellationToken::new();
        let handle = hook
            .use_fetch::<CollectionPage>("pokemon", None, cancel.clone())
            .unwrap();
        drop(handle);

        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_error_is_terminal_for_handle() {
        let url = format!("{}pokemon", BASE);
        let fetcher = Arc::new(
            FakeFetcher::new().respond(&url, Err(FetchError::Network("offline".into()))),
        );
        let hook = hook(fetcher);

        let mut handle = hook
            .use_fetch::<CollectionPage>("pokemon", None, CancellationToken::new())
            .unwrap();
        handle.changed().await;
        assert!(handle.state().is_error());

        let state = handle.state().clone();
        assert!(!handle.poll());
        assert_eq!(handle.state(), &state);
    }
}
