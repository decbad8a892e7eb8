//! Test doubles for the runner's injected capabilities

use async_trait::async_trait;
use sonic_client::{ClientError, ObjectStorage};
use sonic_core::domain::audit::AuditLog;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::error::{AuditError, ProcessError};
use crate::process::{ProcessExecutor, ProcessOutput};
use crate::repository::AuditStore;
use crate::service::OutputSink;

/// Records every argv and answers `git` and container invocations from a script
pub struct FakeExecutor {
    calls: Mutex<Vec<Vec<String>>>,
    revision: Option<String>,
    failing_images: Vec<String>,
    missing_runtime: bool,
    stdout: String,
    stderr: String,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            revision: Some("abc123".to_string()),
            failing_images: Vec::new(),
            missing_runtime: false,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn with_revision(mut self, revision: &str) -> Self {
        self.revision = Some(revision.to_string());
        self
    }

    /// `git rev-parse HEAD` exits with 128
    pub fn without_revision(mut self) -> Self {
        self.revision = None;
        self
    }

    /// Any container run whose argv contains `image` exits with status 1
    pub fn failing_on(mut self, image: &str) -> Self {
        self.failing_images.push(image.to_string());
        self
    }

    /// Container runs fail to spawn
    pub fn missing_runtime(mut self) -> Self {
        self.missing_runtime = true;
        self
    }

    pub fn with_output(mut self, stdout: &str, stderr: &str) -> Self {
        self.stdout = stdout.to_string();
        self.stderr = stderr.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than the revision lookup
    pub fn container_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|argv| argv.first().map(String::as_str) != Some("git"))
            .collect()
    }
}

#[async_trait]
impl ProcessExecutor for FakeExecutor {
    async fn run(&self, argv: &[String]) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(argv.to_vec());

        if argv.first().map(String::as_str) == Some("git") {
            return Ok(match &self.revision {
                Some(revision) => ProcessOutput {
                    stdout: format!("{}\n", revision),
                    stderr: String::new(),
                    exit_code: 0,
                },
                None => ProcessOutput {
                    stdout: String::new(),
                    stderr: "fatal: not a git repository\n".to_string(),
                    exit_code: 128,
                },
            });
        }

        if self.missing_runtime {
            return Err(ProcessError::Spawn {
                program: argv[0].clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            });
        }

        if self.failing_images.iter().any(|image| argv.contains(image)) {
            return Ok(ProcessOutput {
                stdout: self.stdout.clone(),
                stderr: "boom\n".to_string(),
                exit_code: 1,
            });
        }

        Ok(ProcessOutput {
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            exit_code: 0,
        })
    }
}

/// Keeps every stored record in write order
#[derive(Default)]
pub struct RecordingAuditStore {
    writes: Mutex<Vec<AuditLog>>,
    fail: bool,
}

impl RecordingAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every store call fails after being recorded
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn writes(&self) -> Vec<AuditLog> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for RecordingAuditStore {
    async fn store(&self, log: &AuditLog) -> Result<(), AuditError> {
        self.writes.lock().unwrap().push(log.clone());
        if self.fail {
            return Err(AuditError::io("write audit log", "/read-only")(
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        Ok(())
    }

    async fn load_logs(
        &self,
        project: &str,
        git_revision: &str,
    ) -> Result<Vec<AuditLog>, AuditError> {
        Ok(self
            .writes()
            .into_iter()
            .filter(|log| log.project == project && log.git_revision == git_revision)
            .collect())
    }
}

/// Bucket contents keyed by (bucket, key)
#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    fail: bool,
}

impl InMemoryObjectStorage {
    pub fn failing() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            fail: true,
        }
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> sonic_client::Result<()> {
        if self.fail {
            return Err(ClientError::storage_error(bucket, key, 403, "AccessDenied"));
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> sonic_client::Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ClientError::not_found(bucket, key))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> sonic_client::Result<Vec<String>> {
        Ok(self
            .keys(bucket)
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}

/// Captures stage headers and output; clones share the same buffers
#[derive(Debug, Clone, Default)]
pub struct BufferedOutput {
    inner: Arc<Mutex<Captured>>,
}

#[derive(Debug, Default)]
struct Captured {
    stages: Vec<String>,
    stdout: String,
    stderr: String,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the stages started so far
    pub fn stages(&self) -> Vec<String> {
        self.inner.lock().unwrap().stages.clone()
    }

    pub fn stdout_text(&self) -> String {
        self.inner.lock().unwrap().stdout.clone()
    }

    pub fn stderr_text(&self) -> String {
        self.inner.lock().unwrap().stderr.clone()
    }
}

impl OutputSink for BufferedOutput {
    fn stage_started(&self, stage: &str, _runner: &str, _command: &str) {
        self.inner.lock().unwrap().stages.push(stage.to_string());
    }

    fn stdout(&self, text: &str) {
        self.inner.lock().unwrap().stdout.push_str(text);
    }

    fn stderr(&self, text: &str) {
        self.inner.lock().unwrap().stderr.push_str(text);
    }
}
