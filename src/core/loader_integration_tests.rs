//! Loader integration tests
//!
//! Drive full loads through stub and file-backed fetchers.

#[cfg(test)]
mod tests {
    use crate::core::catalog::{CatalogState, SortMode};
    use crate::core::config::AppConfig;
    use crate::core::fetcher::{FetchError, FileFetcher, TextFetcher};
    use crate::core::loader::{CatalogLoader, EmptyReason, LoadOutcome};
    use crate::core::models::StatusCategory;
    use crate::core::normalizer::Normalizer;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    const SHEET: &str = "Title,Name,Status,Description\r\n\
        Fire & Ice,Ada,Funded,Hot\r\n\
        Quiet Garden,Ben,Not funded,Calm\r\n\
        Lantern Walk,,Under review,\r\n\
        \r\n";

    /// 固定返回内容的测试抓取器，同时记录调用次数
    struct StubFetcher {
        response: Result<String, (u16, String)>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TextFetcher for StubFetcher {
        async fn fetch_text(&self, _source: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err((code, reason)) => Err(FetchError::Status {
                    code: *code,
                    reason: reason.clone(),
                }),
            }
        }
    }

    fn loader_with(response: Result<String, (u16, String)>) -> (CatalogLoader, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = StubFetcher {
            response,
            calls: calls.clone(),
        };
        (
            CatalogLoader::new(Box::new(fetcher), "stub://sheet", Normalizer::new()),
            calls,
        )
    }

    #[tokio::test]
    async fn test_load_success() {
        let (loader, _) = loader_with(Ok(SHEET.to_string()));

        let outcome = loader.load().await.unwrap();

        let LoadOutcome::Loaded(catalog) = outcome else {
            panic!("expected proposals");
        };
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.stats.total_rows, 3);

        let mut state = CatalogState::new();
        state.sort_mode = SortMode::Status;
        let titles: Vec<&str> = state
            .apply(&catalog.proposals)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Fire & Ice", "Lantern Walk", "Quiet Garden"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_retried() {
        let (loader, calls) = loader_with(Err((503, "Service Unavailable".to_string())));

        let err = loader.load().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch data: 503 Service Unavailable");
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_outcomes() {
        let (loader, _) = loader_with(Ok("   \n".to_string()));
        assert!(matches!(
            loader.load().await.unwrap(),
            LoadOutcome::Empty(EmptyReason::NoHeaders)
        ));

        let (loader, _) = loader_with(Ok("Title,Status\n".to_string()));
        assert!(matches!(
            loader.load().await.unwrap(),
            LoadOutcome::Empty(EmptyReason::NoRecords)
        ));

        let (loader, _) = loader_with(Ok("Title,Status\n,Funded\n".to_string()));
        assert!(matches!(
            loader.load().await.unwrap(),
            LoadOutcome::Empty(EmptyReason::NoTitledRecords)
        ));
    }

    #[tokio::test]
    async fn test_initial_selection_by_slug() {
        let (loader, _) = loader_with(Ok(SHEET.to_string()));
        let LoadOutcome::Loaded(catalog) = loader.load().await.unwrap() else {
            panic!("expected proposals");
        };

        let selected = catalog.initial_selection(Some("#quiet-garden")).unwrap();
        assert_eq!(selected.status_category, StatusCategory::NotFunded);
        assert!(catalog.initial_selection(Some("")).is_none());
        assert!(catalog.initial_selection(Some("missing")).is_none());
        assert!(catalog.initial_selection(None).is_none());
    }

    #[tokio::test]
    async fn test_load_from_config_with_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Project,Image\nKite Field,\n").unwrap();
        file.flush().unwrap();

        let mut config = AppConfig::default();
        config.display.placeholder_image = "https://cdn/none.png".to_string();
        let mut overrides = std::collections::HashMap::new();
        overrides.insert("title".to_string(), vec!["Project".to_string()]);
        config.field_mapping = Some(overrides);

        let path = file.path().to_str().unwrap().to_string();
        let loader = CatalogLoader::from_config(&config, Some(&path)).unwrap();
        assert_eq!(loader.source(), path);

        let LoadOutcome::Loaded(catalog) = loader.load().await.unwrap() else {
            panic!("expected proposals");
        };
        assert_eq!(catalog.proposals[0].title, "Kite Field");
        assert_eq!(catalog.proposals[0].cover_image_url, "https://cdn/none.png");
    }

    #[tokio::test]
    async fn test_missing_local_file_fails() {
        let loader = CatalogLoader::new(
            Box::new(FileFetcher),
            "/no/such/export.csv",
            Normalizer::new(),
        );

        assert!(matches!(loader.load().await, Err(FetchError::Io { .. })));
    }
}
