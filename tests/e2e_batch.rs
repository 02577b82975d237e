//! End-to-end tests for batch runs: parameter-driven, range-driven, bundle,
//! and parameters-table derivation.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use synthnet::export::read_document;
use synthnet::params::derive_parameter_table;
use synthnet::{
    BatchDriver, Converter, Error, ExportConfig, FailurePolicy, NetworkId, ParameterTable,
};

// ============================================================================
// Helper: three small networks plus a parameters table
// ============================================================================

struct Fixture {
    dir: tempfile::TempDir,
    config: ExportConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let nodes = dir.path().join("nodes_pg.csv");
        let edges = dir.path().join("edges.csv");
        fs::write(
            &nodes,
            "id,node,minority,pagerank,order_rank,order_node\n\
             0,1,0,0.5,1,1\n\
             0,2,1,0.5,2,2\n\
             1,1,1,0.7,1,1\n\
             1,2,0,0.3,2,2\n\
             2,1,0,1.0,1,1\n",
        )
        .unwrap();
        fs::write(&edges, "id,source,target\n0,1,2\n1,2,1\n1,1,2\n").unwrap();
        let config = ExportConfig::new(nodes, edges).without_ranking();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn params(&self, body: &str) -> ParameterTable {
        let path = self.path("parameters.csv");
        fs::write(&path, body).unwrap();
        ParameterTable::new(path)
    }

    fn driver(&self, out: &str) -> BatchDriver {
        BatchDriver::new(Converter::new(self.config.clone()), self.path(out))
    }

    fn skipping_driver(&self, out: &str) -> BatchDriver {
        let config = self.config.clone().with_failure_policy(FailurePolicy::Skip);
        BatchDriver::new(Converter::new(config), self.path(out))
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// 1. Parameter-table driven
// ============================================================================

#[test]
fn test_batch_names_files_from_parameters() {
    let fx = Fixture::new();
    let params = fx.params("id,fm,h_MM,h_mm,k\n0,0.1,0.2,0.8,10\n1,0.3,0.5,0.5,10\n");

    let report = fx.driver("out").by_parameters(&params).unwrap();

    assert_eq!(report.written.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(
        file_names(&fx.path("out")),
        vec!["graph_fm1_hMM2_hmm8.json", "graph_fm3_hMM5_hmm5.json"]
    );

    let doc = read_document(&fx.path("out/graph_fm3_hMM5_hmm5.json")).unwrap();
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.links.len(), 2);
}

#[test]
fn test_colliding_parameters_overwrite() {
    let fx = Fixture::new();
    // h_MM 0.21 and 0.24 both scale to 2: network 1 replaces network 0.
    let params = fx.params("id,fm,h_MM,h_mm\n0,0.10,0.21,0.5\n1,0.10,0.24,0.5\n");

    let report = fx.driver("out").by_parameters(&params).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.written[0].path, report.written[1].path);
    assert_eq!(report.overwritten(), vec![report.written[0].path.as_path()]);
    assert_eq!(file_names(&fx.path("out")), vec!["graph_fm1_hMM2_hmm5.json"]);

    let survivor = read_document(&fx.path("out/graph_fm1_hMM2_hmm5.json")).unwrap();
    assert_eq!(survivor.nodes[0].pagerank, 0.7);
}

#[test]
fn test_output_dir_is_created_and_reused() {
    let fx = Fixture::new();
    let params = fx.params("id,fm,h_MM,h_mm\n2,0.1,0.1,0.1\n");
    let driver = fx.driver("nested/out");

    driver.by_parameters(&params).unwrap();
    driver.by_parameters(&params).unwrap();

    assert_eq!(file_names(&fx.path("nested/out")), vec!["graph_fm1_hMM1_hmm1.json"]);
}

#[test]
fn test_missing_params_table_aborts() {
    let fx = Fixture::new();
    let err = fx
        .driver("out")
        .by_parameters(&ParameterTable::new(fx.path("nope.csv")))
        .unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

// ============================================================================
// 2. Failure policy
// ============================================================================

#[test]
fn test_abort_policy_stops_at_first_bad_network() {
    let fx = Fixture::new();
    fs::write(
        &fx.config.nodes,
        "id,node,minority,pagerank,order_rank,order_node\n\
         0,1,0,0.5,1,1\n1,1,0,bad,1,1\n2,1,0,1.0,1,1\n",
    )
    .unwrap();

    let err = fx.driver("out").by_range(0, 2).unwrap_err();
    match err {
        Error::FieldCoercion { network, column, .. } => {
            assert_eq!(network, NetworkId::from(1));
            assert_eq!(column, "pagerank");
        }
        other => panic!("expected FieldCoercion, got {other:?}"),
    }
    assert_eq!(file_names(&fx.path("out")), vec!["graph_0.json"]);
}

#[test]
fn test_skip_policy_continues_and_reports() {
    let fx = Fixture::new();
    fs::write(
        &fx.config.nodes,
        "id,node,minority,pagerank,order_rank,order_node\n\
         0,1,0,0.5,1,1\n1,1,0,bad,1,1\n2,1,0,1.0,1,1\n",
    )
    .unwrap();

    let report = fx.skipping_driver("out").by_range(0, 2).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].id, NetworkId::from(1));
    assert_eq!(file_names(&fx.path("out")), vec!["graph_0.json", "graph_2.json"]);
}

#[test]
fn test_skip_policy_still_aborts_on_missing_table() {
    let fx = Fixture::new();
    fs::remove_file(&fx.config.edges).unwrap();
    let err = fx.skipping_driver("out").by_range(0, 0).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[test]
fn test_skip_policy_covers_bad_parameter_rows() {
    let fx = Fixture::new();
    let params = fx.params("id,fm,h_MM,h_mm\n0,0.1,x,0.8\n1,0.3,0.5,0.5\n");
    let report = fx.skipping_driver("out").by_parameters(&params).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.written.len(), 1);
    assert_eq!(file_names(&fx.path("out")), vec!["graph_fm3_hMM5_hmm5.json"]);
}

// ============================================================================
// 3. Range driven
// ============================================================================

#[test]
fn test_range_writes_one_file_per_id() {
    let fx = Fixture::new();
    let report = fx.driver("out").by_range(0, 3).unwrap();

    assert_eq!(report.written.len(), 4);
    assert_eq!(
        file_names(&fx.path("out")),
        vec!["graph_0.json", "graph_1.json", "graph_2.json", "graph_3.json"]
    );
    let empty = read_document(&fx.path("out/graph_3.json")).unwrap();
    assert!(empty.nodes.is_empty() && empty.links.is_empty());
}

#[test]
fn test_inverted_range_is_empty() {
    let fx = Fixture::new();
    let report = fx.driver("out").by_range(5, 1).unwrap();
    assert!(report.written.is_empty());
    assert!(fx.path("out").is_dir());
}

// ============================================================================
// 4. Single network named from parameters
// ============================================================================

#[test]
fn test_single_named_uses_parameters() {
    let fx = Fixture::new();
    let params = fx.params("id,fm,h_MM,h_mm\n0,0.1,0.2,0.8\n1,0.3,0.5,0.5\n");
    let written = fx.driver("out").single_named(&NetworkId::new("1.0"), &params).unwrap();
    assert_eq!(written.path, fx.path("out/graph_fm3_hMM5_hmm5.json"));
    assert_eq!(written.nodes, 2);
}

#[test]
fn test_single_named_without_parameters_fails_explicitly() {
    let fx = Fixture::new();
    let params = fx.params("id,fm,h_MM,h_mm\n0,0.1,0.2,0.8\n");
    let err = fx.driver("out").single_named(&NetworkId::from(2), &params).unwrap_err();
    assert!(matches!(err, Error::ParametersNotFound(ref id) if *id == NetworkId::from(2)));
    assert!(!fx.path("out").exists());
}

// ============================================================================
// 5. Bundle
// ============================================================================

#[test]
fn test_bundle_collects_entries_in_table_order() {
    let fx = Fixture::new();
    let params = fx.params("id,fm,h_MM,h_mm\n2,0.1,0.2,0.8\n0,0.3,0.5,0.5\n");

    let converter = Converter::new(fx.config.clone());
    let bundle = synthnet::batch::bundle(&converter, &params).unwrap();

    let ids: Vec<_> = bundle.entries.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, vec![NetworkId::from(2), NetworkId::from(0)]);
    assert_eq!(bundle.entries[1].network.nodes.len(), 2);
    assert_eq!(bundle.entries[1].network.network_attributes, None);

    let json = serde_json::to_value(&bundle.entries).unwrap();
    assert_eq!(json[0]["id"], serde_json::json!(2));
    assert_eq!(json[0]["attributes"]["id"], serde_json::json!("2"));
    assert_eq!(json[0]["attributes"]["fm"], serde_json::json!(0.1));
}

#[test]
fn test_bundle_skips_bad_network_without_output_dir() {
    let fx = Fixture::new();
    fs::write(
        &fx.config.nodes,
        "id,node,minority,pagerank,order_rank,order_node
0,1,0,0.5,1,1
1,1,1,high,1,1
",
    )
    .unwrap();
    let params = fx.params("id,fm,h_MM,h_mm
0,0.1,0.2,0.8
1,0.3,0.5,0.5
");
    let converter = Converter::new(fx.config.clone().with_failure_policy(FailurePolicy::Skip));

    let bundle = synthnet::batch::bundle(&converter, &params).unwrap();

    assert_eq!(bundle.entries.len(), 1);
    assert_eq!(bundle.entries[0].id, NetworkId::from(0));
    assert_eq!(bundle.skipped.len(), 1);
    assert_eq!(bundle.skipped[0].id, NetworkId::from(1));
    assert!(matches!(bundle.skipped[0].error, Error::FieldCoercion { .. }));
    assert_eq!(file_names(fx.dir.path()), vec!["edges.csv", "nodes_pg.csv", "parameters.csv"]);
}

// ============================================================================
// 6. Parameters table from a ranking table
// ============================================================================

#[test]
fn test_derive_parameters_keeps_matching_k() {
    let fx = Fixture::new();
    let ranking = fx.path("ranking_minorities.csv");
    fs::write(
        &ranking,
        "id,k,fm,h_MM,h_mm\n0,10,0.1,0.2,0.8\n0,20,0.1,0.2,0.8\n1,10.0,0.3,0.5,0.5\n",
    )
    .unwrap();
    let csv_out = fx.path("parameters.csv");
    let jsonl_out = fx.path("parameters.json");

    let kept = derive_parameter_table(&ranking, "10", &csv_out, Some(&jsonl_out)).unwrap();

    assert_eq!(kept, 2);
    assert_eq!(
        fs::read_to_string(&csv_out).unwrap(),
        "id,k,fm,h_MM,h_mm\n0,10,0.1,0.2,0.8\n1,10.0,0.3,0.5,0.5\n"
    );
    let lines: Vec<serde_json::Value> = fs::read_to_string(&jsonl_out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["k"], serde_json::json!("10.0"));
    assert_eq!(lines[1]["fm"], serde_json::json!(0.3));

    // The derived table drives a batch directly.
    let report = fx.driver("out").by_parameters(&ParameterTable::new(&csv_out)).unwrap();
    assert_eq!(report.written.len(), 2);
}
