//! Collection coordinator - main run orchestration logic
//!
//! This module contains the page loop that drives a run:
//! - Composing result page URLs from base URL, page number and keyword
//! - Reading the total page count from the first page
//! - Fetching and extracting every page in order, with a fixed pause after each
//! - Handing the collected records to the output handlers

use crate::config::{Config, SourceConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::{extract_records, read_total_pages, PageLayout};
use crate::output::{default_handlers, HarvestStatistics, OutputHandler, RunPaths};
use crate::record::CollectionResult;
use crate::state::RunState;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use tracing::{Instrument, Span};
use url::Url;

/// Composes the URL of the first results page: `{base}?q={keyword}`
///
/// The keyword is form-urlencoded, so spaces become `+`.
pub fn first_page_url(source: &SourceConfig) -> Result<Url, HarvestError> {
    let mut url = Url::parse(&source.base_url)?;
    url.query_pairs_mut().append_pair("q", &source.keyword);
    Ok(url)
}

/// Composes the URL of results page `page`: `{base}?page={page}&q={keyword}`
pub fn page_url(source: &SourceConfig, page: u32) -> Result<Url, HarvestError> {
    let mut url = Url::parse(&source.base_url)?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("q", &source.keyword);
    Ok(url)
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Total page count read from the first page
    pub total_pages: u32,

    /// Number of records collected across all pages
    pub records: usize,

    /// Records whose name block had no link
    pub missing_links: usize,

    /// Where the run's artifacts were written
    pub paths: RunPaths,
}

/// Drives one collection run
///
/// The collector owns the accumulator for the duration of the run and walks
/// the `RunState` machine. All diagnostics are emitted inside the span given
/// at construction, so every log line carries the run's keyword.
pub struct Collector {
    source: SourceConfig,
    layout: PageLayout,
    client: Client,
    page_delay: Duration,
    span: Span,
    state: RunState,
}

impl Collector {
    /// Creates a new collector
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `span` - Span all of the run's diagnostics are recorded in
    pub fn new(config: &Config, span: Span) -> Result<Self, HarvestError> {
        let layout = PageLayout::compile(&config.layout)?;
        let client = build_http_client(&config.crawler)?;

        Ok(Self {
            source: config.source.clone(),
            layout,
            client,
            page_delay: Duration::from_millis(config.crawler.page_delay_ms),
            span,
            state: RunState::Init,
        })
    }

    /// Current state of the run
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Collects the records of every results page
    ///
    /// On success the collector is left in `Finalize`, ready for the output
    /// handlers. On failure it is `Aborted` and nothing has been written.
    pub async fn collect(&mut self) -> Result<CollectionResult, HarvestError> {
        let span = self.span.clone();
        let result = self.collect_pages().instrument(span).await;

        if let Err(e) = &result {
            self.abort(e);
        }
        result
    }

    async fn collect_pages(&mut self) -> Result<CollectionResult, HarvestError> {
        let first_url = first_page_url(&self.source)?;

        self.transition(RunState::DiscoverPageCount)?;
        let total_pages = {
            let page = fetch_page(&self.client, first_url.as_str()).await?;
            read_total_pages(&page, &self.layout)?
        };
        tracing::info!("Starting scraping process for {} pages", total_pages);

        let mut result = CollectionResult::new();

        for page_number in 1..=total_pages {
            self.transition(RunState::FetchPage)?;
            let url = page_url(&self.source, page_number)?;
            tracing::info!("Scraping page {}/{}", page_number, total_pages);

            let records = {
                let page = fetch_page(&self.client, url.as_str()).await?;
                self.transition(RunState::ExtractPage)?;
                extract_records(&page, &self.layout)?
            };

            tracing::debug!("Page {} yielded {} records", page_number, records.len());
            result.push_page(records);

            // Pause after every page, the last one included
            tokio::time::sleep(self.page_delay).await;
        }

        self.transition(RunState::Finalize)?;
        tracing::info!(
            "Collected {} records from {} pages",
            result.len(),
            result.pages()
        );

        Ok(result)
    }

    /// Hands the records to each handler in order
    ///
    /// A failing handler stops the remaining ones; files written by earlier
    /// handlers are left in place.
    pub fn finalize(
        &mut self,
        result: &CollectionResult,
        handlers: &[Box<dyn OutputHandler>],
    ) -> Result<HarvestStatistics, HarvestError> {
        let span = self.span.clone();
        let _enter = span.enter();

        let stats = HarvestStatistics::from_records(result.records());
        tracing::info!(
            "{} records collected, {} without a link",
            stats.total_records,
            stats.missing_links
        );

        for handler in handlers {
            if let Err(e) = handler.write(result.records()) {
                tracing::error!("Output '{}' failed: {}", handler.name(), e);
                let error = HarvestError::from(e);
                self.abort(&error);
                return Err(error);
            }
            tracing::debug!("Output '{}' written", handler.name());
        }

        self.transition(RunState::Done)?;
        tracing::info!("Scraping process completed successfully");
        Ok(stats)
    }

    /// Moves the run to `Aborted`, logging the cause
    pub fn abort(&mut self, error: &HarvestError) {
        if self.state.can_transition_to(RunState::Aborted) {
            let from = self.state;
            self.state = RunState::Aborted;
            self.span.in_scope(|| {
                tracing::error!("Run aborted during {}: {}", from, error);
            });
        }
    }

    fn transition(&mut self, next: RunState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Runs a complete harvest: collect every page, then write all outputs
///
/// # Flow
///
/// 1. Fetch the first page and read the total page count
/// 2. For page 1..=N: fetch, extract, append, pause
/// 3. Write the CSV file, the charts and the console table, in that order
///
/// Any collection failure returns before an output is written.
///
/// # Example
///
/// ```no_run
/// use journal_harvest::config::Config;
/// use journal_harvest::crawler::run_harvest;
/// use journal_harvest::output::RunPaths;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let paths = RunPaths::new(Path::new("scraped_data"), &config.source.keyword, chrono::Local::now());
/// paths.create()?;
/// run_harvest(&config, &paths).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: &Config, paths: &RunPaths) -> Result<HarvestReport, HarvestError> {
    let span = tracing::info_span!(
        "harvest",
        keyword = %config.source.keyword,
        base_url = %config.source.base_url
    );
    let mut collector = Collector::new(config, span)?;

    let result = collector.collect().await?;
    let handlers = default_handlers(paths);
    let stats = collector.finalize(&result, &handlers)?;

    Ok(HarvestReport {
        total_pages: result.pages(),
        records: stats.total_records,
        missing_links: stats.missing_links,
        paths: paths.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{OutputError, OutputResult};
    use crate::record::JournalRecord;
    use std::sync::{Arc, Mutex};

    fn source(keyword: &str) -> SourceConfig {
        SourceConfig {
            base_url: "https://example.org/journals/".to_string(),
            keyword: keyword.to_string(),
        }
    }

    #[test]
    fn test_first_page_url() {
        let url = first_page_url(&source("physics")).unwrap();
        assert_eq!(url.as_str(), "https://example.org/journals/?q=physics");
    }

    #[test]
    fn test_page_url() {
        let url = page_url(&source("physics"), 3).unwrap();
        assert_eq!(url.as_str(), "https://example.org/journals/?page=3&q=physics");
    }

    #[test]
    fn test_keyword_is_encoded_the_same_way_everywhere() {
        let src = source("teknologi informasi & data");
        let first = first_page_url(&src).unwrap();
        let second = page_url(&src, 2).unwrap();

        assert_eq!(
            first.as_str(),
            "https://example.org/journals/?q=teknologi+informasi+%26+data"
        );
        assert!(second.as_str().ends_with("&q=teknologi+informasi+%26+data"));
    }

    #[test]
    fn test_collector_starts_in_init() {
        let collector = Collector::new(&Config::default(), Span::none()).unwrap();
        assert_eq!(collector.state(), RunState::Init);
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let mut collector = Collector::new(&Config::default(), Span::none()).unwrap();
        let err = collector.transition(RunState::Done).unwrap_err();
        assert!(matches!(
            err,
            HarvestError::InvalidTransition {
                from: RunState::Init,
                to: RunState::Done
            }
        ));
    }

    struct RecordingHandler {
        name: &'static str,
        fail: bool,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl OutputHandler for RecordingHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn write(&self, _records: &[JournalRecord]) -> OutputResult<()> {
            self.calls.lock().unwrap().push(self.name);
            if self.fail {
                return Err(OutputError::Write(format!("{} failed", self.name)));
            }
            Ok(())
        }
    }

    fn finalize_ready_collector() -> Collector {
        let mut collector = Collector::new(&Config::default(), Span::none()).unwrap();
        collector.transition(RunState::DiscoverPageCount).unwrap();
        collector.transition(RunState::Finalize).unwrap();
        collector
    }

    #[test]
    fn test_finalize_runs_handlers_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let handlers: Vec<Box<dyn OutputHandler>> = ["csv", "charts", "console"]
            .into_iter()
            .map(|name| {
                Box::new(RecordingHandler {
                    name,
                    fail: false,
                    calls: calls.clone(),
                }) as Box<dyn OutputHandler>
            })
            .collect();

        let mut collector = finalize_ready_collector();
        collector
            .finalize(&CollectionResult::new(), &handlers)
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["csv", "charts", "console"]);
        assert_eq!(collector.state(), RunState::Done);
    }

    #[test]
    fn test_failing_handler_stops_later_handlers() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let handlers: Vec<Box<dyn OutputHandler>> = vec![
            Box::new(RecordingHandler {
                name: "csv",
                fail: false,
                calls: calls.clone(),
            }),
            Box::new(RecordingHandler {
                name: "charts",
                fail: true,
                calls: calls.clone(),
            }),
            Box::new(RecordingHandler {
                name: "console",
                fail: false,
                calls: calls.clone(),
            }),
        ];

        let mut collector = finalize_ready_collector();
        let err = collector
            .finalize(&CollectionResult::new(), &handlers)
            .unwrap_err();

        assert!(matches!(err, HarvestError::Export(_)));
        assert_eq!(*calls.lock().unwrap(), vec!["csv", "charts"]);
        assert_eq!(collector.state(), RunState::Aborted);
    }

    #[test]
    fn test_finalize_reports_missing_links() {
        let mut result = CollectionResult::new();
        result.push_page(vec![
            JournalRecord {
                name: "Linked".to_string(),
                link: "/j/1".to_string(),
                affiliation: "Univ".to_string(),
                accreditation: "S2".to_string(),
            },
            JournalRecord {
                name: "Unlinked".to_string(),
                link: String::new(),
                affiliation: "Univ".to_string(),
                accreditation: String::new(),
            },
        ]);

        let mut collector = finalize_ready_collector();
        let stats = collector.finalize(&result, &[]).unwrap();

        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.missing_links, 1);
        assert_eq!(stats.affiliations, vec![("Univ".to_string(), 2)]);
    }
}
