use material_uploader::config::{UploadConfig, BYTES_PER_MB, DEFAULT_MAX_STEP, DEFAULT_TICK_INTERVAL_MS};
use material_uploader::upload::{
    Advance, AlertQueue, BatchSource, CandidateFile, FileIntake, IntakeQueue, ProgressDriver, ProgressSource,
    Rejection, SimulatedProgress, UploadStatus,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

const KB: u64 = 1024;

/// Simulated progress with a fixed seed per spawned file, so runs repeat.
fn seeded_driver(first_seed: u64) -> ProgressDriver {
    let seed = AtomicU64::new(first_seed);
    ProgressDriver::with_source(
        Handle::current(),
        Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        move || {
            let seed = seed.fetch_add(1, Ordering::Relaxed);
            Box::new(SimulatedProgress::seeded(seed, DEFAULT_MAX_STEP)) as Box<dyn ProgressSource>
        },
    )
}

fn pdf_intake(max_size_mb: f64) -> (FileIntake, AlertQueue) {
    let alerts = AlertQueue::new();
    let config = UploadConfig::new(".pdf", max_size_mb, true, false).unwrap();
    let intake = FileIntake::new(config, seeded_driver(7), Arc::new(alerts.clone()));
    (intake, alerts)
}

#[tokio::test(start_paused = true)]
async fn oversize_files_never_reach_the_queue() {
    let (mut intake, alerts) = pdf_intake(1.0);
    let outcome = intake.submit(
        BatchSource::Drop,
        vec![
            CandidateFile::new("big.pdf", BYTES_PER_MB + 1),
            CandidateFile::new("huge.pdf", 50 * BYTES_PER_MB),
        ],
    );

    assert_eq!(outcome.accepted_count(), 0);
    assert!(intake.snapshot().is_empty());
    assert_eq!(alerts.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn unaccepted_extensions_never_reach_the_queue() {
    let (mut intake, alerts) = pdf_intake(1.0);
    intake.submit(
        BatchSource::Picker,
        vec![
            CandidateFile::new("notes.txt", KB),
            CandidateFile::new("slides.PPTX", KB),
            CandidateFile::new("pdf", 1),
        ],
    );

    let names: Vec<_> = intake.snapshot().iter().map(|e| e.name().to_string()).collect();
    // A dot-less name counts as its own extension.
    assert_eq!(names, vec!["pdf".to_string()]);
    assert_eq!(alerts.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn extension_matching_is_case_insensitive() {
    let (mut intake, alerts) = pdf_intake(1.0);
    let outcome = intake.submit(BatchSource::Drop, vec![CandidateFile::new("EXAM.PDF", KB)]);

    assert_eq!(outcome.accepted_count(), 1);
    assert!(alerts.is_empty());
}

#[tokio::test(start_paused = true)]
async fn progress_is_monotonic_and_completes_exactly_once() {
    let (mut intake, _alerts) = pdf_intake(1.0);
    let id = intake.accept(CandidateFile::new("a.pdf", KB));

    let mut observed: Vec<(f32, UploadStatus)> = Vec::new();
    let mut completions = 0;
    for _ in 0..200 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let entry = intake.queue().get(id).unwrap();
        assert!((0.0..=100.0).contains(&entry.progress));
        assert_eq!(entry.progress == 100.0, entry.status == UploadStatus::Completed);
        if entry.is_completed() && observed.last().map_or(true, |(_, status)| *status != UploadStatus::Completed) {
            completions += 1;
        }
        observed.push((entry.progress, entry.status));
    }

    assert!(observed.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    assert_eq!(completions, 1);
    assert_eq!(observed.last().map(|(progress, _)| *progress), Some(100.0));
}

#[tokio::test(start_paused = true)]
async fn removal_stops_updates_immediately() {
    let (mut intake, _alerts) = pdf_intake(1.0);
    let keep = intake.accept(CandidateFile::new("keep.pdf", KB));
    let dropped = intake.accept(CandidateFile::new("drop.pdf", KB));

    tokio::time::sleep(Duration::from_millis(210)).await;
    assert!(intake.remove(dropped));
    assert!(intake.snapshot().iter().all(|e| e.id != dropped));

    intake.settle().await;
    let snapshot = intake.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, keep);
    assert!(snapshot[0].is_completed());
}

#[tokio::test(start_paused = true)]
async fn batch_keeps_relative_order_of_accepted_files() {
    let (mut intake, alerts) = pdf_intake(1.0);
    let batch = vec![
        CandidateFile::new("1.pdf", KB),
        CandidateFile::new("2.doc", KB),
        CandidateFile::new("3.pdf", KB),
        CandidateFile::new("4.pdf", 2 * BYTES_PER_MB),
        CandidateFile::new("5.pdf", KB),
        CandidateFile::new("6.txt", KB),
    ];

    let outcome = intake.submit(BatchSource::Drop, batch);
    let report = outcome.report().unwrap();
    assert_eq!(report.accepted.len(), 3);
    assert_eq!(report.rejected.len(), 3);
    assert_eq!(alerts.len(), 3);

    let snapshot = intake.snapshot();
    let names: Vec<_> = snapshot.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["1.pdf", "3.pdf", "5.pdf"]);
    assert_eq!(snapshot.iter().map(|e| e.id).collect::<Vec<_>>(), report.accepted);
}

#[tokio::test(start_paused = true)]
async fn mixed_batch_scenario() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&calls);
    let (intake, alerts) = pdf_intake(1.0);
    let mut intake = intake.with_on_upload(move |files| {
        recorder
            .lock()
            .unwrap()
            .push(files.iter().map(|f| f.name.clone()).collect::<Vec<_>>());
    });

    let outcome = intake.submit(
        BatchSource::Drop,
        vec![
            CandidateFile::new("a.pdf", 500 * KB),
            CandidateFile::new("b.txt", 10 * KB),
            CandidateFile::new("c.pdf", 2 * BYTES_PER_MB),
        ],
    );

    let report = outcome.report().unwrap();
    assert!(matches!(
        &report.rejected[0],
        Rejection::UnsupportedType { name, .. } if name == "b.txt"
    ));
    assert!(matches!(
        &report.rejected[1],
        Rejection::FileTooLarge { name, .. } if name == "c.pdf"
    ));
    assert_eq!(alerts.current().as_deref(), Some("File type .txt of b.txt is not supported."));
    alerts.dismiss();
    assert_eq!(
        alerts.current().as_deref(),
        Some("File c.pdf is too large. Maximum size is 1MB.")
    );
    assert_eq!(*calls.lock().unwrap(), vec![vec!["a.pdf".to_string()]]);

    intake.settle().await;
    let snapshot = intake.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name(), "a.pdf");
    assert_eq!(snapshot[0].status, UploadStatus::Completed);
    assert_eq!(snapshot[0].progress, 100.0);
}

struct CountingSource(Arc<AtomicUsize>);

impl ProgressSource for CountingSource {
    fn next_increment(&mut self) -> f32 {
        self.0.fetch_add(1, Ordering::SeqCst);
        50.0
    }
}

#[tokio::test(start_paused = true)]
async fn removed_before_first_tick_never_completes() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ticks);
    let driver = ProgressDriver::with_source(
        Handle::current(),
        Duration::from_millis(200),
        move || Box::new(CountingSource(Arc::clone(&counter))) as Box<dyn ProgressSource>,
    );

    let queue = IntakeQueue::new();
    let id = queue.accept(Arc::new(CandidateFile::new("x.pdf", KB)));
    let handle = driver.spawn(queue.clone(), id);
    queue.remove(id);

    assert_eq!(handle.join().await, Some(Advance::Missing));
    assert!(queue.is_empty());
    // The one tick that ran found the entry gone and applied nothing.
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn remove_after_completion_is_a_no_op_for_others() {
    let (mut intake, _alerts) = pdf_intake(1.0);
    let first = intake.accept(CandidateFile::new("first.pdf", KB));
    let second = intake.accept(CandidateFile::new("second.pdf", KB));
    intake.settle().await;

    assert!(intake.remove(first));
    assert!(!intake.remove(first));
    let snapshot = intake.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, second);
    assert!(snapshot[0].is_completed());
}

#[tokio::test(start_paused = true)]
async fn concurrent_entries_progress_independently() {
    let (mut intake, _alerts) = pdf_intake(10.0);
    let ids: Vec<_> = (0..10)
        .map(|n| intake.accept(CandidateFile::new(format!("{n}.pdf"), KB)))
        .collect();

    intake.settle().await;
    let snapshot = intake.snapshot();
    assert_eq!(snapshot.iter().map(|e| e.id).collect::<Vec<_>>(), ids);
    assert!(snapshot.iter().all(|e| e.is_completed() && e.progress == 100.0));
}
