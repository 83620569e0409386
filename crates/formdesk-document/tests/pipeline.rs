//! Document pipeline behaviour with in-process collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use formdesk_common::config::GoogleCloudConfig;
use formdesk_common::{FormdeskError, Result};
use formdesk_document::redaction::Redactor;
use formdesk_document::structure::DocumentProcessor;
use formdesk_document::DocumentPipeline;

struct FailingRedactor;

#[async_trait]
impl Redactor for FailingRedactor {
    async fn redact(&self, _pdf_bytes: &[u8]) -> Result<Vec<u8>> {
        Err(FormdeskError::Api { status: 403, message: "DLP API disabled".to_string() })
    }
}

struct StampingRedactor;

#[async_trait]
impl Redactor for StampingRedactor {
    async fn redact(&self, pdf_bytes: &[u8]) -> Result<Vec<u8>> {
        let mut out = b"[redacted]".to_vec();
        out.extend_from_slice(pdf_bytes);
        Ok(out)
    }
}

/// Records the bytes it was given and reports a fixed two-page document.
#[derive(Default)]
struct RecordingProcessor {
    seen: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl DocumentProcessor for RecordingProcessor {
    async fn process(&self, pdf_bytes: &[u8]) -> Result<serde_json::Value> {
        self.seen.lock().unwrap().push(pdf_bytes.to_vec());
        Ok(serde_json::json!({ "pages": [{ "pageNumber": 1 }, { "pageNumber": 2 }], "text": "Hakemus" }))
    }

    fn name(&self) -> &str { "recording" }
}

struct BrokenProcessor;

#[async_trait]
impl DocumentProcessor for BrokenProcessor {
    async fn process(&self, _pdf_bytes: &[u8]) -> Result<serde_json::Value> {
        Err(FormdeskError::Api { status: 400, message: "Unsupported input file format.".to_string() })
    }

    fn name(&self) -> &str { "broken" }
}

#[tokio::test]
async fn test_local_pipeline_floors_page_count_at_one() {
    let analysis = DocumentPipeline::local().analyze(b"no markers here".to_vec()).await.unwrap();
    assert_eq!(analysis.page_count, 1);
    assert_eq!(analysis.document["text"], "DocAI disabled (fallback)");
}

#[tokio::test]
async fn test_local_pipeline_counts_markers() {
    let pdf = b"%PDF-1.7\n<< /Type /Pages >>\n<< /Type /Page >>\n<< /Type /Page >>\n<< /Type /Page >>".to_vec();
    let analysis = DocumentPipeline::local().analyze(pdf).await.unwrap();
    assert_eq!(analysis.page_count, 3);
}

#[tokio::test]
async fn test_processor_receives_redacted_bytes() {
    let processor = Arc::new(RecordingProcessor::default());
    let pipeline = DocumentPipeline::new(Some(Arc::new(StampingRedactor) as Arc<dyn Redactor>), processor.clone());

    let analysis = pipeline.analyze(b"%PDF".to_vec()).await.unwrap();
    assert_eq!(analysis.page_count, 2);
    assert_eq!(processor.seen.lock().unwrap()[0], b"[redacted]%PDF".to_vec());
}

#[tokio::test]
async fn test_redaction_failure_keeps_original_bytes() {
    let processor = Arc::new(RecordingProcessor::default());
    let pipeline = DocumentPipeline::new(Some(Arc::new(FailingRedactor) as Arc<dyn Redactor>), processor.clone());

    let analysis = pipeline.analyze(b"%PDF".to_vec()).await.unwrap();
    assert_eq!(analysis.page_count, 2);
    assert_eq!(processor.seen.lock().unwrap()[0], b"%PDF".to_vec());
}

#[tokio::test]
async fn test_processing_failure_is_surfaced() {
    let pipeline = DocumentPipeline::new(None, Arc::new(BrokenProcessor));
    let err = pipeline.analyze(b"%PDF".to_vec()).await.unwrap_err();
    assert!(err.to_string().contains("Unsupported input file format."));
}

#[tokio::test]
async fn test_unconfigured_pipeline_is_local() {
    let pipeline = DocumentPipeline::from_config(&GoogleCloudConfig::default(), None).unwrap();
    let analysis = pipeline.analyze(Vec::new()).await.unwrap();
    assert_eq!(analysis.page_count, 1);
}
