//! End-to-end pipeline tests over mock model backends.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use papyrus_rag::{
    CompletionModel, DocumentPipeline, EmbeddingProvider, IndexStore, MemoryIndexStore, RagConfig,
    RagError, NOT_FOUND_SENTENCE,
};

/// Embeds text as keyword counts so nearest-neighbor results are
/// predictable without a remote model.
struct KeywordEmbedder;

const KEYWORDS: [&str; 4] = ["paris", "france", "berlin", "germany"];

impl KeywordEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        KEYWORDS.iter().map(|kw| lowered.matches(kw).count() as f32).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(Self::vector(text))
    }
}

/// An embedder that always fails, for exercising the no-partial-persist
/// guarantee.
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_documents(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, RagError> {
        Err(RagError::EmbeddingUnavailable {
            provider: "mock".to_string(),
            message: "service down".to_string(),
        })
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, RagError> {
        Err(RagError::EmbeddingUnavailable {
            provider: "mock".to_string(),
            message: "service down".to_string(),
        })
    }
}

/// A completion model that records every prompt and replies with a fixed
/// string.
struct ScriptedModel {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), prompts: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        self.prompts.lock().await.push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct FailingModel;

#[async_trait]
impl CompletionModel for FailingModel {
    async fn generate(&self, _prompt: &str) -> Result<String, RagError> {
        Err(RagError::CompletionUnavailable {
            provider: "mock".to_string(),
            message: "rate limited".to_string(),
        })
    }
}

const CAPITALS_TEXT: &str = "Paris is the capital of France. Berlin is the capital of Germany.";

fn pipeline_with(
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn CompletionModel>,
    store: Arc<dyn IndexStore>,
    top_k: usize,
) -> DocumentPipeline {
    let config = RagConfig::builder().chunk_size(40).chunk_overlap(5).top_k(top_k).build().unwrap();
    DocumentPipeline::builder()
        .config(config)
        .embedder(embedder)
        .completion_model(model)
        .store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn nearest_chunk_wins_at_k_one() {
    let model = ScriptedModel::new("Paris");
    // Window size matches the padded sentence length so each sentence
    // lands in its own chunk.
    let config =
        RagConfig::builder().chunk_size(35).chunk_overlap(0).top_k(1).build().unwrap();
    let pipeline = DocumentPipeline::builder()
        .config(config)
        .embedder(Arc::new(KeywordEmbedder))
        .completion_model(model.clone())
        .store(Arc::new(MemoryIndexStore::new()))
        .build()
        .unwrap();

    pipeline
        .index_document(
            "capitals",
            "Paris is the capital of France.    Berlin is the capital of Germany.",
        )
        .await
        .unwrap();

    let answer = pipeline.ask("capitals", "What is the capital of France?").await.unwrap();
    assert!(answer.context.contains("Paris"));
    assert!(!answer.context.contains("Berlin"));

    // The prompt the model saw carries the same context.
    let prompts = model.prompts.lock().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Paris is the capital of France."));
}

#[tokio::test]
async fn unanswerable_question_returns_the_escape_sentence() {
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        ScriptedModel::new(NOT_FOUND_SENTENCE),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    pipeline.index_document("capitals", CAPITALS_TEXT).await.unwrap();
    let answer = pipeline.ask("capitals", "What is the capital of Japan?").await.unwrap();

    assert_eq!(answer.answer, NOT_FOUND_SENTENCE);
    assert!(!answer.context.is_empty());
}

#[tokio::test]
async fn completion_failure_degrades_to_readable_answer() {
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        Arc::new(FailingModel),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    pipeline.index_document("capitals", CAPITALS_TEXT).await.unwrap();
    let answer = pipeline.ask("capitals", "What is the capital of France?").await.unwrap();

    assert!(answer.answer.starts_with("An error occurred while answering:"));
    assert!(answer.context.is_empty());
}

#[tokio::test]
async fn embedding_failure_persists_nothing() {
    let store = Arc::new(MemoryIndexStore::new());
    let pipeline = pipeline_with(
        Arc::new(FailingEmbedder),
        ScriptedModel::new("unused"),
        store.clone(),
        5,
    );

    let err = pipeline.index_document("doc", CAPITALS_TEXT).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingUnavailable { .. }));
    assert!(store.load("doc").await.unwrap().is_none());
}

#[tokio::test]
async fn asking_an_unindexed_document_is_an_error() {
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        ScriptedModel::new("unused"),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    let err = pipeline.ask("nope", "anything?").await.unwrap_err();
    assert!(matches!(err, RagError::NotIndexed(id) if id == "nope"));
}

#[tokio::test]
async fn empty_text_is_unbuildable() {
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        ScriptedModel::new("unused"),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    let err = pipeline.index_document("empty", "").await.unwrap_err();
    assert!(matches!(err, RagError::IndexUnbuildable(_)));
}

#[tokio::test]
async fn reindexing_replaces_the_searchable_content() {
    let model = ScriptedModel::new("ok");
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        model.clone(),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    pipeline.index_document("doc", "Paris is the capital of France.").await.unwrap();
    pipeline.index_document("doc", "Berlin is the capital of Germany.").await.unwrap();

    let answer = pipeline.ask("doc", "capital of Germany?").await.unwrap();
    assert!(answer.context.contains("Berlin"));
    assert!(!answer.context.contains("Paris"));
}

#[tokio::test]
async fn invalidation_forces_a_reload_from_the_store() {
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        ScriptedModel::new("ok"),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    pipeline.index_document("doc", CAPITALS_TEXT).await.unwrap();
    let before = pipeline.ask("doc", "France?").await.unwrap();

    pipeline.invalidate("doc").await;
    let after = pipeline.ask("doc", "France?").await.unwrap();

    assert_eq!(before.context, after.context);
}

#[tokio::test]
async fn indexing_reports_the_chunk_count() {
    let pipeline = pipeline_with(
        Arc::new(KeywordEmbedder),
        ScriptedModel::new("unused"),
        Arc::new(MemoryIndexStore::new()),
        5,
    );

    // 40-char windows with a 5-char overlap over 65 chars of text.
    let count = pipeline.index_document("doc", &"x".repeat(65)).await.unwrap();
    assert_eq!(count, 2);
}
