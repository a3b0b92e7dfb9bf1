use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use sentiment_client::{
    ClientConfig, Completion, Document, Element, HttpTransport, SentimentRequestHandler,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = ClientConfig::load()?;
    tracing::info!(base_url = %config.base_url, endpoint = %config.endpoint, "client configured");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() { read_line()? } else { args.join(" ") };

    let doc = Arc::new(Document::new(config.input_id.clone(), config.result_id.clone()));
    doc.insert(config.input_id.clone(), Element { value: text, ..Element::default() });
    doc.insert(config.result_id.clone(), Element::default());

    let transport = Arc::new(HttpTransport::new(config.base_url.clone()));
    let handler = SentimentRequestHandler::new(doc.clone(), transport).with_endpoint(config.endpoint);

    let pending = handler.analyze_sentiment()?;
    match pending.await.context("Request task panicked")?? {
        Completion::Rendered(_) => println!("{}", doc.result_html()?),
        Completion::Ignored(reason) => {
            tracing::info!(?reason, "result left untouched");
            println!("(no result)");
        }
    }

    Ok(())
}

/// One line from stdin, terminator stripped. Empty input is sent as-is.
fn read_line() -> Result<String> {
    eprint!("> ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}
