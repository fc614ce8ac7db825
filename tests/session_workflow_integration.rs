//! Session workflows: filtering, view changes, saved views and off-thread
//! rebuilds.

mod common;

use common::builders::RecordBuilder;
use hierscope::analysis::{Inspection, SearchMode};
use hierscope::config::{AppState, ViewConfig};
use hierscope::style::{Domain, StyledElement};
use hierscope::{FilterConfig, RawRecord, Session, SnapshotWorker, ViewMode};
use std::sync::Arc;

fn design() -> Vec<RawRecord> {
    vec![
        RecordBuilder::new("top/u_cpu/u_alu", "top/u_cpu/u_regfile")
            .connections(12)
            .wns(-0.4)
            .tns(-3.0)
            .to()
            .build(),
        RecordBuilder::new("top/u_cpu", "top/u_cpu/u_alu")
            .connections(4)
            .wns(-0.1)
            .tns(-0.2)
            .from()
            .build(),
        RecordBuilder::new("top/u_cpu/u_lsu", "top/u_mem")
            .connections(30)
            .wns(-1.5)
            .tns(-20.0)
            .to()
            .build(),
        RecordBuilder::new("top/u_mem", "top/u_dma")
            .connections(7)
            .wns(0.2)
            .to()
            .build(),
    ]
}

#[test]
fn test_review_workflow() {
    let mut session = Session::from_records(design());
    assert_eq!(session.snapshot().model.edge_count(), 3);

    // Hide connections inside a module
    session.apply_filters(FilterConfig::from_inputs("0", "0", "0", true));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.model.edge_count(), 2);
    assert!(snapshot.model.edges().iter().all(|e| !e.internal));

    // Domain follows the filtered view
    assert_eq!(session.mapping().gradient_domain, Domain::new(-1.5, 0.0));
    session.set_view_mode(ViewMode::Connections);
    assert_eq!(session.mapping().gradient_domain, Domain::new(30.0, 0.0));

    let doc = session.render();
    let widths: Vec<f64> = doc
        .elements
        .iter()
        .filter_map(|e| match e {
            StyledElement::Edges { style, .. } => Some(style.width),
            StyledElement::Nodes { .. } => None,
        })
        .collect();
    assert_eq!(widths.len(), 2);
    common::assert_float_eq(widths[1], 5.0, 1e-9);
}

#[test]
fn test_search_inspect_isolate() {
    let session = Session::from_records(design());

    let hits = session.search("^u_(alu|lsu)$", SearchMode::Regex).unwrap();
    let ids: Vec<&str> = hits.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["top/u_cpu/u_alu", "top/u_cpu/u_lsu"]);
    assert!(session.search("(", SearchMode::Regex).is_err());

    match session.inspect("top/u_mem").unwrap() {
        Inspection::Node(report) => {
            // Unfiltered records are reported, including the positive slack one
            assert_eq!(report.total_records, 2);
            assert_eq!(report.most_connections[0].connections, 30);
            assert_eq!(report.worst_tns[0].hier, "top/u_cpu/u_lsu");
            assert_eq!(report.worst_wns.last().unwrap().connnecting_hier, "top/u_dma");
        }
        other => panic!("expected node report, got {:?}", other),
    }

    let hood = session.isolate("top/u_cpu/u_alu").unwrap();
    assert!(hood.contains("top/u_cpu"));
    assert!(hood.contains("top"));
    assert!(hood.contains("top/u_cpu/u_regfile"));
    assert!(!hood.contains("top/u_mem"));
}

#[test]
fn test_saved_view_reapplied_to_new_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("views").join("violations.toml");

    let mut session = Session::from_records(design());
    session.apply_filters(FilterConfig::default().with_min_connections(10.0));
    session.set_view_mode(ViewMode::Tns);
    session.view_config("big nets").save(&path).unwrap();

    let view = ViewConfig::load(&path).unwrap();
    assert_eq!(view.name, "big nets");
    assert_eq!(view.mapping.view_mode, ViewMode::Tns);

    let mut newer = design();
    newer.push(
        RecordBuilder::new("top/u_io", "top/u_mem")
            .connections(50)
            .wns(-3.0)
            .tns(-40.0)
            .to()
            .build(),
    );
    let mut other = Session::from_records(newer);
    other.apply_view_config(&view);

    assert_eq!(other.snapshot().filtered_count, 3);
    assert_eq!(other.mapping().gradient_domain, Domain::new(-40.0, 0.0));

    let mut state = AppState::default();
    state.set_last_view_config(&path);
    assert_eq!(state.last_view_config(), Some(path.as_path()));
}

#[test]
fn test_worker_rebuilds_for_session() {
    let (mut handle, join) = SnapshotWorker::spawn().unwrap();
    let mut session = Session::from_records(design());

    session.set_filter_value("exclude_internal", "true");
    let first = session.rebuild_request();
    session.set_filter_value("min_connections", "20");
    let second = session.rebuild_request();
    let wanted = second.revision;

    handle.submit(first).unwrap();
    handle.submit(second).unwrap();

    let snapshot = handle.wait_for(wanted, common::test_timeout()).unwrap();
    assert!(session.accept(Arc::clone(&snapshot)));
    assert_eq!(session.snapshot().revision, wanted);
    assert_eq!(session.snapshot().filtered_count, 1);

    // A late copy of the same revision changes nothing
    assert!(!session.accept(snapshot));

    handle.shutdown();
    let built = join.join().unwrap();
    assert!((1..=2).contains(&built));
}
