// Integration tests for the string replacer task
use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stringreplacer::config::constants::FAILURE_MESSAGE;
use stringreplacer::{
    BuildTask, EnvMap, MemoryWorkspace, ReplacerError, Resource, Result, StringReplacerTask,
    TaskOptions, TaskParameters, Workspace,
};

/// Captures formatted log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

/// Wraps a memory workspace, counting writes and failing the ones for `fail_path`
struct FlakyWorkspace {
    inner: MemoryWorkspace,
    fail_path: Option<String>,
    writes: AtomicUsize,
}

impl FlakyWorkspace {
    fn new(inner: MemoryWorkspace, fail_path: Option<&str>) -> Self {
        Self {
            inner,
            fail_path: fail_path.map(str::to_string),
            writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Workspace for FlakyWorkspace {
    async fn by_glob(&self, patterns: &[String]) -> Result<Vec<Resource>> {
        self.inner.by_glob(patterns).await
    }

    async fn write(&self, resource: Resource) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_path.as_deref() == Some(resource.path()) {
            return Err(ReplacerError::workspace("disk full"));
        }
        self.inner.write(resource).await
    }
}

fn version_task() -> StringReplacerTask {
    let env: EnvMap = [("stringreplacer.${VERSION}", "1.2.3"), ("OTHER", "ignored")]
        .into_iter()
        .collect();
    StringReplacerTask::from_env(&env)
}

#[tokio::test]
async fn test_replaces_matching_resources() {
    let workspace = MemoryWorkspace::new().with_chunk_size(3);
    workspace
        .insert("/resources/app/Component.js", "const v = \"${VERSION}\";")
        .unwrap();
    workspace
        .insert("/resources/app/manifest.json", "{\"version\": \"${VERSION}\"}")
        .unwrap();
    workspace.insert("/resources/app/README.md", "${VERSION}").unwrap();

    let task = version_task();
    let options = TaskOptions::with_files(["/resources/**/*.js", "/resources/**/*.json"]);
    let written = task
        .run(TaskParameters {
            workspace: &workspace,
            options: &options,
        })
        .await
        .expect("task succeeds");

    assert_eq!(written, 2);
    assert_eq!(
        workspace.read("/resources/app/Component.js").unwrap(),
        "const v = \"1.2.3\";"
    );
    assert_eq!(
        workspace.read("/resources/app/manifest.json").unwrap(),
        "{\"version\": \"1.2.3\"}"
    );
    assert_eq!(workspace.read("/resources/app/README.md").unwrap(), "${VERSION}");
}

#[tokio::test]
async fn test_no_matches_writes_nothing() {
    let workspace = FlakyWorkspace::new(MemoryWorkspace::new(), None);
    workspace.inner.insert("/a.txt", "${VERSION}").unwrap();

    let task = version_task();
    let options = TaskOptions::with_files(["**/*.js"]);
    let written = task
        .run(TaskParameters {
            workspace: &workspace,
            options: &options,
        })
        .await
        .unwrap();

    assert_eq!(written, 0);
    assert_eq!(workspace.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_write_is_logged_and_swallowed() {
    let (logs, _guard) = capture_logs();

    let inner = MemoryWorkspace::new();
    inner.insert("/a.js", "${VERSION}").unwrap();
    inner.insert("/b.js", "${VERSION}").unwrap();
    inner.insert("/c.js", "${VERSION}").unwrap();
    let workspace = FlakyWorkspace::new(inner, Some("/b.js"));

    let task = version_task();
    let options = TaskOptions::with_files(["*.js"]);
    task.execute(TaskParameters {
        workspace: &workspace,
        options: &options,
    })
    .await;

    // Every write was attempted; the others still landed
    assert_eq!(workspace.writes.load(Ordering::SeqCst), 3);
    assert_eq!(workspace.inner.read("/a.js").unwrap(), "1.2.3");
    assert_eq!(workspace.inner.read("/c.js").unwrap(), "1.2.3");

    let output = logs.contents();
    assert_eq!(output.matches(FAILURE_MESSAGE).count(), 1);
    assert!(output.contains("ERROR"));
}

#[tokio::test]
async fn test_failed_write_is_reported_by_run() {
    let inner = MemoryWorkspace::new();
    inner.insert("/a.js", "${VERSION}").unwrap();
    let workspace = FlakyWorkspace::new(inner, Some("/a.js"));

    let task = version_task();
    let options = TaskOptions::with_files(["*.js"]);
    let result = task
        .run(TaskParameters {
            workspace: &workspace,
            options: &options,
        })
        .await;

    assert!(matches!(result, Err(ReplacerError::Workspace(_))));
}

#[tokio::test]
async fn test_invalid_glob_is_swallowed() {
    let (logs, _guard) = capture_logs();
    let workspace = MemoryWorkspace::new();
    workspace.insert("/a.js", "${VERSION}").unwrap();

    let task = version_task();
    let options = TaskOptions::with_files(["src/["]);
    task.execute(TaskParameters {
        workspace: &workspace,
        options: &options,
    })
    .await;

    assert!(logs.contents().contains(FAILURE_MESSAGE));
    assert_eq!(workspace.read("/a.js").unwrap(), "${VERSION}");
}

#[tokio::test]
async fn test_missing_patterns_is_an_error() {
    let workspace = MemoryWorkspace::new();
    let task = version_task();
    let options = TaskOptions::from_json("{}").unwrap();

    let result = task
        .run(TaskParameters {
            workspace: &workspace,
            options: &options,
        })
        .await;
    assert!(matches!(result, Err(ReplacerError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_invalid_content_fails_its_write() {
    let workspace = MemoryWorkspace::new();
    workspace.insert("/bad.js", &b"${VERSION}\xff"[..]).unwrap();
    workspace.insert("/good.js", "${VERSION}").unwrap();

    let task = version_task();
    let options = TaskOptions::with_files(["*.js"]);
    let result = task
        .run(TaskParameters {
            workspace: &workspace,
            options: &options,
        })
        .await;

    assert!(matches!(result, Err(ReplacerError::Encoding { .. })));
    assert_eq!(workspace.read("/bad.js").unwrap(), &b"${VERSION}\xff"[..]);
    assert_eq!(workspace.read("/good.js").unwrap(), "1.2.3");
}

#[test]
fn test_table_is_built_once() {
    let task = version_task();
    assert_eq!(task.table().len(), 1);
    assert_eq!(task.name(), "ui5-task-stringreplacer");

    let clone = task.clone();
    assert_eq!(clone.table(), task.table());
}
