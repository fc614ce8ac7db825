//! Loading timing exports from disk

mod common;

use common::builders::{CsvBuilder, RecordBuilder};
use hierscope::io::{self, LoadIssue};
use hierscope::{HierScopeError, Session};

#[test]
fn test_load_fixture() {
    let report = io::load_path(common::fixture("timing_small.csv")).unwrap();

    assert_eq!(report.delimiter, ',');
    assert_eq!(report.records.len(), 7);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].column, "wns");
    assert_eq!(report.warnings[0].issue, LoadIssue::NotANumber);

    let lsu = &report.records[2];
    assert_eq!(lsu.hier, "top/u_cpu/u_lsu");
    assert_eq!(lsu.connections, 30);
    common::assert_float_eq(lsu.tns, -22.6, 1e-9);
    assert_eq!(report.records[4].direction, "");
}

#[test]
fn test_session_over_fixture() {
    let session = Session::open(common::fixture("timing_small.csv")).unwrap();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.record_count, 7);
    // Positive slack row filtered by default
    assert_eq!(snapshot.filtered_count, 6);
    // Blank hier row
    assert_eq!(snapshot.skipped_records(), 1);
    assert_eq!(snapshot.model.node_count(), 9);
    assert_eq!(snapshot.model.edge_count(), 5);

    assert_eq!(snapshot.global_stats.max_connections, 30);
    common::assert_float_eq(snapshot.global_stats.min_wns, -1.75, 1e-9);
    common::assert_float_eq(snapshot.filtered_stats.min_tns, -22.6, 1e-9);

    let internal = snapshot.model.edge("top/u_cpu/u_alu->top/u_cpu").unwrap();
    assert!(internal.internal);
    assert!(snapshot.model.edge("top/u_cpu/u_lsu->top/u_dma").is_some());

    assert_eq!(snapshot.tree.len(), 1);
    let cpu = snapshot.tree[0].find("top/u_cpu").unwrap();
    let children: Vec<&str> = cpu.children.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(children, vec!["u_alu", "u_regfile", "u_lsu"]);

    assert_eq!(session.source(), Some(common::fixture("timing_small.csv").as_path()));
    assert_eq!(session.load_warnings().len(), 1);
}

#[test]
fn test_semicolon_file_in_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    let text = CsvBuilder::new()
        .delimiter(';')
        .row(RecordBuilder::new("a/b", "a/c").connections(2).wns(-0.5).tns(-0.5).to().build())
        .row(RecordBuilder::new("a/c", "a/b/d").connections(1).wns(-0.1).tns(-0.1).build())
        .build();
    let path = common::write_file(&dir, "export.txt", &text);

    let session = Session::open(&path).unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.model.edge_count(), 2);
    assert_eq!(snapshot.model.edges()[1].source, "a/b/d");
}

#[test]
fn test_missing_column_error_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(&dir, "bad.csv", "hier,wns\ntop/a,-1\n");

    let err = io::load_path(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("bad.csv"), "{}", message);
    assert!(message.contains("connnecting_hier"), "{}", message);
    match err {
        HierScopeError::WithContext { source, .. } => {
            assert!(matches!(*source, HierScopeError::MissingColumn(_)))
        }
        other => panic!("expected context, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Session::open(dir.path().join("absent.csv")).is_err());
}

#[test]
fn test_load_reader() {
    let text = "hier|connnecting_hier|connections\nx|y|-4\n";
    let report = io::load_reader(text.as_bytes()).unwrap();
    assert_eq!(report.delimiter, '|');
    assert_eq!(report.records[0].connections, 0);
    assert_eq!(report.warnings[0].issue, LoadIssue::NegativeCount);
}
