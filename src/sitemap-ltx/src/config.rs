//! Configuration options for llms.txt generation.

use std::path::PathBuf;
use std::time::Duration;

/// OpenRouter's OpenAI-compatible chat completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model asked for every page summary.
pub const DEFAULT_MODEL: &str = "qwen/qwen-turbo";

/// Where the finished document is written.
pub const DEFAULT_OUTPUT: &str = "llms.txt";

/// Pages are processed one at a time unless asked otherwise.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Upper bound on any single network call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration options for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Chat completion endpoint that produces the summaries
    pub endpoint: String,
    /// Model name sent with every completion request
    pub model: String,
    /// Maximum number of pages fetched + summarized at once (default: 1)
    pub concurrency: usize,
    /// Timeout applied to every sitemap, page and completion request
    pub timeout: Duration,
    /// File the assembled llms.txt is written to
    pub output: PathBuf,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl GeneratorOptions {
    /// Creates a new builder for GeneratorOptions.
    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }
}

/// Builder for GeneratorOptions.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptionsBuilder {
    endpoint: Option<String>,
    model: Option<String>,
    concurrency: Option<usize>,
    timeout: Option<Duration>,
    output: Option<PathBuf>,
}

impl GeneratorOptionsBuilder {
    /// Sets the chat completion endpoint.
    pub fn endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the model used for summaries.
    pub fn model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the concurrency level (number of pages in flight). Zero is treated as one.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the output file path.
    pub fn output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Builds the GeneratorOptions.
    pub fn build(self) -> GeneratorOptions {
        GeneratorOptions {
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            output: self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        let built = GeneratorOptions::builder().build();
        let default = GeneratorOptions::default();
        assert_eq!(built.endpoint, default.endpoint);
        assert_eq!(built.model, default.model);
        assert_eq!(built.concurrency, 1);
        assert_eq!(built.timeout, DEFAULT_TIMEOUT);
        assert_eq!(built.output, PathBuf::from("llms.txt"));
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let options = GeneratorOptions::builder().concurrency(0).build();
        assert_eq!(options.concurrency, 1);
    }
}
