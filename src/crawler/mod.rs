//! Crawler module for results page fetching and processing
//!
//! This module contains the core collection logic, including:
//! - HTTP fetching with a bounded timeout
//! - Page count and record extraction from results pages
//! - The sequential, paced page loop

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{first_page_url, page_url, run_harvest, Collector, HarvestReport};
pub use fetcher::{build_http_client, fetch_page};
pub use parser::{extract_records, read_total_pages, PageLayout, ResultsPage};
