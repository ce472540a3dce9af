use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sitemap_ltx::config::{DEFAULT_CONCURRENCY, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_OUTPUT, DEFAULT_TIMEOUT};
use sitemap_ltx::{
    DEFAULT_LOG_SETTINGS, GeneratorOptions, HttpFetcher, OpenRouter, Outcome, Session, Summarizer, generate,
    normalize_website, setup_logging,
};

#[derive(Parser)]
#[command(name = "sitemap-ltx")]
#[command(about = "Summarize every page listed in a website's sitemaps into an llms.txt", long_about = None)]
struct Cli {
    /// The website to summarize. Asked for interactively when omitted.
    website: Option<String>,

    /// Output file path for the generated llms.txt
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_parser = validate_output_file)]
    output: PathBuf,

    /// Model used for page summaries.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible chat completion endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT, value_parser = validate_url)]
    endpoint: String,

    /// Number of pages fetched + summarized at the same time.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Timeout, in seconds, for every sitemap, page and completion request.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

fn validate_url(s: &str) -> Result<String, String> {
    url::Url::parse(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("Invalid URL: {}", e))
}

fn validate_output_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if path.exists() && path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(format!(
            "Output file parent directory does not exist: {}",
            parent.display()
        ));
    }

    Ok(path)
}

fn prompt_website() -> Result<String, dialoguer::Error> {
    dialoguer::Input::<String>::new()
        .with_prompt("Enter website URL")
        .interact_text()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(DEFAULT_LOG_SETTINGS) {
        eprintln!("WARNING: logging is unavailable: {e}");
    }

    let options = GeneratorOptions::builder()
        .endpoint(cli.endpoint)
        .model(cli.model)
        .concurrency(cli.concurrency)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .output(cli.output)
        .build();

    let entered = match cli.website {
        Some(website) => website,
        None => match prompt_website() {
            Ok(website) => website,
            Err(e) => {
                println!("ERROR: Cannot read website URL due to: {e}");
                std::process::exit(1)
            }
        },
    };

    let website = match normalize_website(&entered) {
        Ok(website) => website,
        Err(e) => {
            println!("ERROR: Not a usable website ({entered:?}): {e}");
            std::process::exit(1)
        }
    };

    let (fetcher, provider) = match (HttpFetcher::new(options.timeout), OpenRouter::from_options(&options)) {
        (Ok(fetcher), Ok(provider)) => (fetcher, provider),
        (Err(e), _) | (_, Err(e)) => {
            println!("ERROR: Cannot build HTTP client: {e}");
            std::process::exit(1)
        }
    };
    tracing::info!("Summarizing {website} with model {}", provider.model());
    let summarizer = Summarizer::new(provider, Session::interactive());

    match generate(&fetcher, &summarizer, &website, options.concurrency).await {
        Outcome::Generated(document) => {
            println!("\n{document}");
            match document.write_to(&options.output) {
                Ok(()) => println!("\nOutput has been saved to {}", options.output.display()),
                Err(e) => {
                    println!("ERROR: Cannot write {} due to: {e}", options.output.display());
                    std::process::exit(1)
                }
            }
        }
        Outcome::NoSitemap { website } => {
            tracing::warn!("No sitemap found for {website}");
            println!("No sitemap found. Please check the website URL or try a different website.");
        }
    }
}
