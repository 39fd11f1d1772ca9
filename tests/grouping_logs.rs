// Warnings emitted while grouping contracts: orphans and out-of-range progress
// must show up in the log with the offending contract id.

use std::io;
use std::sync::{Arc, Mutex};

use soil_erp::{group_by_project, summarize_project, ContractRecord};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_warnings<F: FnOnce()>(f: F) -> String {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = sink.0.lock().expect("lock output").clone();
    String::from_utf8(bytes).expect("utf8 log output")
}

#[test]
fn orphan_contract_is_logged_with_its_id() {
    let mut orphan = ContractRecord::new("unused", "키 없음", 10);
    orphan.id = "C-ORPHAN-7".to_string();
    orphan.project_key = Some("  ".to_string());
    let contracts = vec![ContractRecord::new("P-1", "정상", 5), orphan];

    let text = capture_warnings(|| {
        let groups = group_by_project(&contracts);
        assert_eq!(groups.orphans.len(), 1);
    });

    let line = text
        .lines()
        .find(|l| l.contains("skipped from project grouping"))
        .expect("orphan warning");
    assert!(line.contains("WARN"));
    assert!(line.contains("contract_id=C-ORPHAN-7"));
    assert!(text.contains("orphans=1"));
}

#[test]
fn keyed_contracts_log_nothing() {
    let contracts = vec![ContractRecord::new("P-1", "a", 1), ContractRecord::new("P-2", "b", 2)];

    let text = capture_warnings(|| {
        group_by_project(&contracts);
    });

    assert!(text.trim().is_empty(), "unexpected log output: {}", text);
}

#[test]
fn clamped_progress_is_logged() {
    let mut over = ContractRecord::new("P-1", "a", 1).with_progress(180);
    over.id = "C-OVER".to_string();

    let text = capture_warnings(|| {
        let summary = summarize_project(&[over]).expect("summary");
        assert_eq!(summary.contract.progress_percentage, 100);
    });

    let line = text
        .lines()
        .find(|l| l.contains("clamped"))
        .expect("clamp warning");
    assert!(line.contains("contract_id=C-OVER"));
    assert!(line.contains("progress=180"));
}
