//! In-memory doubles for the capability traits

#![allow(dead_code)]

use async_trait::async_trait;
use edict_domain::traits::{ChecklistReporter, ObjectStore, QueueGateway};
use edict_domain::{ChecklistPayload, ModelCatalog, QueueMessage};
use edict_extractor::{ChecklistService, DocumentExtractor, ExtractionError, InferenceConfig};
use edict_llm::MockProvider;
use edict_worker::{MessageHandler, MessageProcessor};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

#[derive(Default)]
struct QueueState {
    batches: VecDeque<Result<Vec<QueueMessage>, String>>,
    deleted: Vec<String>,
    failing_acks: Vec<String>,
    receive_calls: usize,
}

/// Queue serving scripted batches, then empty receives
#[derive(Clone, Default)]
pub struct InMemoryQueue {
    state: Arc<Mutex<QueueState>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&self, bodies: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let offset = state.batches.len() * 100;
        let batch = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| QueueMessage {
                message_id: Some(format!("m-{}", offset + i)),
                body: body.to_string(),
                ack_token: format!("rh-{}", offset + i),
            })
            .collect();
        state.batches.push_back(Ok(batch));
    }

    pub fn push_receive_error(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .batches
            .push_back(Err(message.to_string()));
    }

    pub fn fail_ack(&self, ack_token: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_acks
            .push(ack_token.to_string());
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn receive_calls(&self) -> usize {
        self.state.lock().unwrap().receive_calls
    }
}

#[async_trait]
impl QueueGateway for InMemoryQueue {
    type Error = FakeError;

    async fn receive(
        &self,
        max_messages: u32,
        _wait: Duration,
    ) -> Result<Vec<QueueMessage>, Self::Error> {
        let next = {
            let mut state = self.state.lock().unwrap();
            state.receive_calls += 1;
            state.batches.pop_front()
        };

        match next {
            Some(Ok(mut batch)) => {
                batch.truncate(max_messages as usize);
                Ok(batch)
            }
            Some(Err(message)) => Err(FakeError(message)),
            None => {
                // Stand-in for the long-poll wait
                tokio::task::yield_now().await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete(&self, ack_token: &str) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        if state.failing_acks.iter().any(|t| t == ack_token) {
            return Err(FakeError(format!("cannot delete {}", ack_token)));
        }
        state.deleted.push(ack_token.to_string());
        Ok(())
    }
}

/// Object store backed by a map, recording requested keys
#[derive(Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requested: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn put(&self, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    type Error = FakeError;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        self.requested.lock().unwrap().push(key.to_string());
        if self.failing {
            return Err(FakeError("storage unavailable".to_string()));
        }
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }
}

/// Reporter recording every call
#[derive(Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<(String, ChecklistPayload)>>>,
    failing: bool,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<(String, ChecklistPayload)> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChecklistReporter for RecordingReporter {
    type Error = FakeError;

    async fn report(&self, bidding_id: &str, payload: &ChecklistPayload) -> Result<(), Self::Error> {
        self.reports
            .lock()
            .unwrap()
            .push((bidding_id.to_string(), payload.clone()));
        if self.failing {
            return Err(FakeError("Bidding API returned 500".to_string()));
        }
        Ok(())
    }
}

/// Treats the document bytes as UTF-8 text
pub struct Utf8Extractor;

impl DocumentExtractor for Utf8Extractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = String::from_utf8_lossy(bytes).trim().to_string();
        if text.is_empty() {
            return Err(ExtractionError::NoText { pages: 1 });
        }
        Ok(text)
    }
}

/// Handler returning a fixed outcome and recording its inputs
#[derive(Clone)]
pub struct RecordingHandler {
    outcome: bool,
    seen: Arc<Mutex<Vec<Value>>>,
}

impl RecordingHandler {
    pub fn new(outcome: bool) -> Self {
        Self {
            outcome,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageHandler for RecordingHandler {
    async fn handle(&self, content: &Value) -> bool {
        self.seen.lock().unwrap().push(content.clone());
        self.outcome
    }
}

/// Handler that panics on messages with `"id": "POISON"` and succeeds otherwise
#[derive(Clone, Default)]
pub struct PoisonHandler {
    seen: Arc<Mutex<Vec<Value>>>,
}

impl PoisonHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageHandler for PoisonHandler {
    async fn handle(&self, content: &Value) -> bool {
        self.seen.lock().unwrap().push(content.clone());
        if content["id"] == "POISON" {
            panic!("malformed cross-reference stream");
        }
        true
    }
}

pub const CHECKLIST_RESPONSE: &str = "```json\n{\"checklistItems\":[{\"name\":\"Certidão\",\"exigenceStatus\":\"OBRIGATORIO\",\"additionalInfo\":\"\",\"possibleToAttach\":true}]}\n```";

pub type TestProcessor = MessageProcessor<InMemoryStore, MockProvider, Utf8Extractor, RecordingReporter>;

pub fn processor(
    store: InMemoryStore,
    llm: MockProvider,
    reporter: RecordingReporter,
) -> TestProcessor {
    let checklist = ChecklistService::new(
        llm,
        Utf8Extractor,
        ModelCatalog::default(),
        InferenceConfig::default(),
    );
    MessageProcessor::new(store, checklist, reporter)
}
