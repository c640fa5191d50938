//! Shared test helpers: a scripted transport, an in-memory sink and a downloader factory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::{Config, PacingConfig};
use crate::downloader::{BatchDownloader, MediaPayload, MediaTransport, TransferRequest};
use crate::error::{Error, Result};
use crate::export::{ArtifactKind, ArtifactSink};
use crate::types::{CommentRecord, Event, VideoRecord};

/// Something a collaborator was asked to do, in call order
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Media(TransferRequest),
    Comments(String),
    Save(ArtifactKind, String),
}

pub(crate) type Journal = Arc<Mutex<Vec<Call>>>;

/// Scripted outcome of one media transfer
#[derive(Clone, Debug)]
pub(crate) enum MediaScript {
    Ok(Vec<u8>),
    OkNamed(String, Vec<u8>),
    Fail(String),
    /// Succeeds after a delay (lets tests act while the transfer is in flight)
    Slow(Duration),
}

/// Transport answering from per-URL and per-identifier scripts; unscripted calls succeed
pub(crate) struct MockTransport {
    journal: Journal,
    media: Mutex<HashMap<String, MediaScript>>,
    comments: Mutex<HashMap<String, std::result::Result<Vec<CommentRecord>, String>>>,
}

impl MockTransport {
    /// Script the transfer of a source or direct URL
    pub(crate) fn script_media(&self, url: &str, script: MediaScript) {
        self.media.lock().unwrap().insert(url.to_string(), script);
    }

    pub(crate) fn script_comments(
        &self,
        identifier: &str,
        outcome: std::result::Result<Vec<CommentRecord>, String>,
    ) {
        self.comments
            .lock()
            .unwrap()
            .insert(identifier.to_string(), outcome);
    }

    fn script_for(&self, request: &TransferRequest) -> MediaScript {
        let key = match request {
            TransferRequest::Direct { url, .. } => url,
            TransferRequest::Extract { source_url, .. } => source_url,
        };
        self.media
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or(MediaScript::Ok(b"media".to_vec()))
    }
}

#[async_trait::async_trait]
impl MediaTransport for MockTransport {
    async fn fetch_media(&self, request: &TransferRequest) -> Result<MediaPayload> {
        self.journal
            .lock()
            .unwrap()
            .push(Call::Media(request.clone()));

        let advisory = request.filename().to_string();
        match self.script_for(request) {
            MediaScript::Ok(bytes) => Ok(MediaPayload {
                filename: advisory,
                bytes,
            }),
            MediaScript::OkNamed(filename, bytes) => Ok(MediaPayload { filename, bytes }),
            MediaScript::Fail(message) => Err(Error::Other(message)),
            MediaScript::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(MediaPayload {
                    filename: advisory,
                    bytes: b"slow".to_vec(),
                })
            }
        }
    }

    async fn fetch_comments(&self, identifier: &str, _limit: u32) -> Result<Vec<CommentRecord>> {
        self.journal
            .lock()
            .unwrap()
            .push(Call::Comments(identifier.to_string()));

        match self.comments.lock().unwrap().get(identifier).cloned() {
            Some(Ok(comments)) => Ok(comments),
            Some(Err(message)) => Err(Error::Upstream(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Sink keeping every saved artifact in memory
pub(crate) struct MemorySink {
    journal: Journal,
    saved: Mutex<Vec<(ArtifactKind, String, Vec<u8>)>>,
    fail_sheets: Mutex<bool>,
}

impl MemorySink {
    pub(crate) fn fail_sheets(&self) {
        *self.fail_sheets.lock().unwrap() = true;
    }

    pub(crate) fn saved(&self, kind: ArtifactKind) -> Vec<(String, Vec<u8>)> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, name, bytes)| (name.clone(), bytes.clone()))
            .collect()
    }

    /// Saved sheet decoded as text (BOM included)
    pub(crate) fn sheet_text(&self, prefix: &str) -> Option<String> {
        self.saved(ArtifactKind::Sheet)
            .into_iter()
            .find(|(name, _)| name.starts_with(prefix))
            .map(|(_, bytes)| String::from_utf8(bytes).unwrap())
    }
}

#[async_trait::async_trait]
impl ArtifactSink for MemorySink {
    async fn save(&self, kind: ArtifactKind, filename: &str, bytes: &[u8]) -> Result<()> {
        if kind == ArtifactKind::Sheet && *self.fail_sheets.lock().unwrap() {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        self.journal
            .lock()
            .unwrap()
            .push(Call::Save(kind, filename.to_string()));
        self.saved
            .lock()
            .unwrap()
            .push((kind, filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Everything a downloader test needs to drive and inspect a run
pub(crate) struct TestRig {
    pub(crate) downloader: BatchDownloader,
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) sink: Arc<MemorySink>,
    pub(crate) journal: Journal,
}

impl TestRig {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.journal.lock().unwrap().clone()
    }
}

/// Config with no pacing delays and a fixed export slug
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.pacing = PacingConfig::immediate();
    config.export.slug = Some("creator".to_string());
    config
}

/// Helper to create a downloader wired to a mock transport and an in-memory sink
pub(crate) fn create_test_downloader(config: Config) -> TestRig {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let transport = Arc::new(MockTransport {
        journal: journal.clone(),
        media: Mutex::new(HashMap::new()),
        comments: Mutex::new(HashMap::new()),
    });
    let sink = Arc::new(MemorySink {
        journal: journal.clone(),
        saved: Mutex::new(Vec::new()),
        fail_sheets: Mutex::new(false),
    });
    let downloader = BatchDownloader::new(config, transport.clone(), sink.clone());

    TestRig {
        downloader,
        transport,
        sink,
        journal,
    }
}

/// A video whose source URL is derived from its identifier
pub(crate) fn video(identifier: &str) -> VideoRecord {
    VideoRecord {
        identifier: identifier.to_string(),
        source_url: format!("https://www.instagram.com/reel/{identifier}/"),
        title: format!("Clip {identifier}"),
        view_count: 1_500,
        duration_seconds: Some(42),
        ..Default::default()
    }
}

/// A video carrying a direct CDN URL
pub(crate) fn direct_video(identifier: &str) -> VideoRecord {
    VideoRecord {
        direct_media_url: Some(format!("https://cdn.example/{identifier}.mp4")),
        ..video(identifier)
    }
}

pub(crate) fn comment(id: &str, text: &str) -> CommentRecord {
    CommentRecord {
        id: id.to_string(),
        author: "fan".to_string(),
        text: text.to_string(),
        likes: 2,
        ..Default::default()
    }
}

/// Wait for the first event matching `predicate`
pub(crate) async fn wait_for_event<F>(
    events: &mut tokio::sync::broadcast::Receiver<Event>,
    predicate: F,
) -> Event
where
    F: Fn(&Event) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
