//! Integration tests for dry-run mode
//!
//! With submission disabled every chunk still gets a script, but the queue is
//! never contacted and no status marker is awaited.

use async_trait::async_trait;
use chado_gff::adapters::queue::JobQueue;
use chado_gff::adapters::source::FileOrganismSource;
use chado_gff::config::parse_config;
use chado_gff::core::export::ExportCoordinator;
use chado_gff::core::script::JobScript;
use chado_gff::core::submit::{JobHandle, QueueRequest};
use chado_gff::core::tracker::ChunkOutcome;
use chado_gff::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

#[derive(Default)]
struct CountingQueue {
    submissions: AtomicUsize,
}

#[async_trait]
impl JobQueue for CountingQueue {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn submit(&self, _script: &JobScript, _request: &QueueRequest) -> Result<JobHandle> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        Ok(JobHandle::Queued {
            job_id: "1".to_string(),
        })
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn dry_run_config(target: &Path, slice_size: usize) -> chado_gff::config::ChadoGffConfig {
    parse_config(&format!(
        r#"
[application]
dry_run = true

[tools]
writedb_entry = "/software/pathogen/projects/artemis/etc/writedb_entry"
gt = "/software/pathogen/external/apps/usr/bin/gt"

[export]
slice_size = {slice_size}
target_path = "{}"

[queue]
name = "basement"
"#,
        target.display()
    ))
    .unwrap()
}

#[tokio::test]
async fn test_dry_run_writes_one_script_per_chunk() {
    let temp = TempDir::new().unwrap();
    let queue = Arc::new(CountingQueue::default());
    let (_tx, rx) = watch::channel(false);

    let coordinator = ExportCoordinator::new(
        dry_run_config(temp.path(), 10),
        Box::new(FileOrganismSource::new(fixture("organisms1.orglist"))),
        queue.clone(),
        rx,
    );
    let summary = coordinator.execute_export().await.unwrap();

    let mut scripts: Vec<String> = fs::read_dir(temp.path().join("scripts"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    scripts.sort();

    assert_eq!(
        scripts,
        vec![
            "chunk_00000.sh",
            "chunk_00001.sh",
            "chunk_00002.sh",
            "chunk_00003.sh",
        ]
    );
    assert_eq!(queue.submissions.load(Ordering::SeqCst), 0);
    assert!(summary.dry_run);
    assert_eq!(summary.total_organisms, 40);
    assert!(summary
        .chunks
        .values()
        .all(|c| c.outcome == ChunkOutcome::NotSubmitted && c.handle == Some(JobHandle::NotSubmitted)));
    assert!(summary.is_successful());
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_dry_run_creates_workspace_and_summary() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("chado-gff");
    let (_tx, rx) = watch::channel(false);

    let coordinator = ExportCoordinator::new(
        dry_run_config(&target, 3),
        Box::new(FileOrganismSource::new(fixture("organisms2.orglist"))),
        Arc::new(CountingQueue::default()),
        rx,
    );
    let summary = coordinator.execute_export().await.unwrap();

    for dir in ["results", "scripts", "logs", "status"] {
        assert!(target.join(dir).is_dir(), "{dir} missing");
    }
    assert_eq!(summary.chunks.len(), 4);
    assert_eq!(summary.chunks[&3].organisms.len(), 1);
    assert_eq!(fs::read_dir(target.join("status")).unwrap().count(), 0);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.join("logs/run_summary.json")).unwrap())
            .unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["total_organisms"], 10);
    assert_eq!(json["chunks"]["3"]["outcome"], "not_submitted");
}

#[tokio::test]
async fn test_dry_run_script_contents() {
    let temp = TempDir::new().unwrap();
    let (_tx, rx) = watch::channel(false);

    let coordinator = ExportCoordinator::new(
        dry_run_config(temp.path(), 3),
        Box::new(FileOrganismSource::new(fixture("organisms2.orglist"))),
        Arc::new(CountingQueue::default()),
        rx,
    );
    coordinator.execute_export().await.unwrap();

    let script = fs::read_to_string(temp.path().join("scripts/chunk_00001.sh")).unwrap();
    for organism in ["Ebrunetti", "Egranulosus", "Emaxima"] {
        assert!(script.contains(&format!("'-s' '{organism}'")), "{organism} not exported");
        assert!(script.contains(&format!("{organism}.gff3.gz")), "{organism} not converted");
    }
    assert!(!script.contains("Bsaltans"));
    assert!(script.contains("chunk_00001.status"));
}

#[tokio::test]
async fn test_rerun_with_fewer_organisms_removes_stale_chunks() {
    let temp = TempDir::new().unwrap();
    let larger = temp.path().join("organisms50.orglist");
    let mut names = fs::read_to_string(fixture("organisms1.orglist")).unwrap();
    for i in 0..10 {
        names.push_str(&format!("Extra{i}\n"));
    }
    fs::write(&larger, names).unwrap();

    let (_tx, rx) = watch::channel(false);
    ExportCoordinator::new(
        dry_run_config(temp.path(), 10),
        Box::new(FileOrganismSource::new(larger)),
        Arc::new(CountingQueue::default()),
        rx.clone(),
    )
    .execute_export()
    .await
    .unwrap();
    assert_eq!(fs::read_dir(temp.path().join("scripts")).unwrap().count(), 5);
    fs::write(temp.path().join("status/chunk_00004.status"), "0\n").unwrap();

    let summary = ExportCoordinator::new(
        dry_run_config(temp.path(), 10),
        Box::new(FileOrganismSource::new(fixture("organisms1.orglist"))),
        Arc::new(CountingQueue::default()),
        rx,
    )
    .execute_export()
    .await
    .unwrap();

    assert_eq!(summary.chunks.len(), 4);
    assert_eq!(fs::read_dir(temp.path().join("scripts")).unwrap().count(), 4);
    assert!(!temp.path().join("scripts/chunk_00004.sh").exists());
    assert!(!temp.path().join("status/chunk_00004.status").exists());
}
