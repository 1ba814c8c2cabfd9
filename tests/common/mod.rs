//! Common test utilities for page-harvester integration tests

use std::path::{Path, PathBuf};
use std::time::Duration;

use page_harvester::{Config, RetryConfig};

/// Config writing into `dir/pages`, reading its list from `dir/urls`, with no backoff delay
pub fn test_config(dir: &Path, num_threads: usize) -> Config {
    Config {
        save_dir: dir.join("pages"),
        url_list_file: dir.join("urls"),
        retry: RetryConfig {
            max_retries: 2,
            max_backoff: Duration::ZERO,
        },
        num_threads,
        ..Config::default()
    }
}

/// Page in the "articles section" template with the given body text
pub fn article_page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>News site</title></head><body><nav>Home Sections</nav><section class="articles">{body}</section><footer>Legal</footer></body></html>"#
    )
}

/// Write a URL list, one per line
pub fn write_url_list(config: &Config, urls: &[String]) -> PathBuf {
    std::fs::write(&config.url_list_file, urls.join("\n")).unwrap();
    config.url_list_file.clone()
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
