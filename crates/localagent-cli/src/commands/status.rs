//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use localagent_core::{Config, ElasticsearchStore, Embedder, OllamaClient};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct ServiceStatus {
    url: String,
    reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    model_server: ServiceStatus,
    models: Vec<String>,
    chat_model: String,
    chat_model_available: bool,
    embedding_model: String,
    knowledge_base: ServiceStatus,
    index: String,
    chunks: Option<u64>,
    web_search_enabled: bool,
    routing_policy: String,
    relevance_policy: String,
}

impl ServiceStatus {
    fn from_result<T>(url: &str, result: &localagent_core::Result<T>) -> Self {
        Self {
            url: url.to_string(),
            reachable: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

pub async fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let ollama = Arc::new(OllamaClient::new(config.llm.clone())?);
    let models = ollama.list_models().await;
    let model_server = ServiceStatus::from_result(&config.llm.url, &models);
    let models = models.unwrap_or_default();
    let chat_model_available = models
        .iter()
        .any(|m| m == &config.llm.model || m.split(':').next() == Some(config.llm.model.as_str()));

    let embedder: Arc<dyn Embedder> = ollama;
    let store = ElasticsearchStore::new(config.search.clone(), embedder)?;
    let ping = store.ping().await;
    let knowledge_base = ServiceStatus::from_result(&config.search.url, &ping);
    let chunks = if ping.is_ok() {
        match store.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::info!("No chunk count for '{}': {}", store.index_name(), e);
                None
            }
        }
    } else {
        None
    };

    let report = StatusReport {
        model_server,
        models,
        chat_model: config.llm.model.clone(),
        chat_model_available,
        embedding_model: config.llm.embedding_model.clone(),
        knowledge_base,
        index: config.search.index.clone(),
        chunks,
        web_search_enabled: config.web.enabled,
        routing_policy: config.routing.policy.to_string(),
        relevance_policy: config.relevance.policy.to_string(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &StatusReport) {
    println!("Model server:    {}", describe(&report.model_server));
    println!("  Chat model:    {}{}", report.chat_model, if report.chat_model_available {
        ""
    } else {
        " (not pulled)"
    });
    println!("  Embeddings:    {}", report.embedding_model);
    if !report.models.is_empty() {
        println!("  Available:     {}", report.models.join(", "));
    }
    println!();
    println!("Knowledge base:  {}", describe(&report.knowledge_base));
    println!("  Index:         {}", report.index);
    match report.chunks {
        Some(count) => println!("  Chunks:        {}", count),
        None if report.knowledge_base.reachable => {
            println!("  Chunks:        none yet, run `localagent ingest`")
        }
        None => {}
    }
    println!();
    println!(
        "Web search:      {}",
        if report.web_search_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("Routing:         {}", report.routing_policy);
    println!("Relevance:       {}", report.relevance_policy);
}

fn describe(status: &ServiceStatus) -> String {
    match (&status.error, status.reachable) {
        (_, true) => format!("connected ({})", status.url),
        (Some(e), false) => format!("unreachable ({}): {}", status.url, e),
        (None, false) => format!("unreachable ({})", status.url),
    }
}
