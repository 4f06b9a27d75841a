//! Tests for parallel sweep grouping

use crate::config::DatasetBuilder;
use crate::error::{SweepError, SweepMetadataError};
use crate::model::{Dataset, DimId};
use crate::roles::RoleAssignment;
use crate::sweeps::SweepGrouping;

/// Two qubits whose amplitudes were swept together, plus a shared frequency axis
fn lockstep_run(metadata: Option<&str>) -> Dataset {
    let builder = DatasetBuilder::new("lockstep")
        .counter("iteration", 2)
        .linspace("q1__amp", "V", 0.0, 0.2, 3)
        .linspace("q2__amp", "V", 0.0, 0.4, 3)
        .linspace("freq", "Hz", 5.0e9, 5.3e9, 4)
        .variable_fn("q1__state", &["iteration", "q1__amp", "freq"], |i| i as f64)
        .variable_fn("q2__state", &["iteration", "q2__amp", "freq"], |i| -(i as f64));
    match metadata {
        Some(raw) => builder.parallel_sweep_axes(raw).build().unwrap(),
        None => builder.build().unwrap(),
    }
}

fn member_names(grouping: &SweepGrouping) -> Vec<Vec<&str>> {
    grouping
        .groups()
        .iter()
        .map(|g| g.members().iter().map(String::as_str).collect())
        .collect()
}

#[test]
fn test_groups_from_metadata() {
    let ds = lockstep_run(Some("{'0': ['iteration'], '1': ['q1__amp', 'q2__amp'], '2': ['freq']}"));
    let grouping = SweepGrouping::from_dataset(&ds);

    assert!(grouping.together_sweeps());
    assert!(grouping.malformed().is_none());
    assert_eq!(
        member_names(&grouping),
        vec![vec!["iteration"], vec!["q1__amp", "q2__amp"], vec!["freq"]]
    );
    assert_eq!(grouping.groups()[1].active_name(), "q1__amp");
    assert!(grouping.groups()[1].is_parallel());
    assert_eq!(
        grouping.logical_dimensions(&ds),
        vec![
            ("iteration".to_string(), 2),
            ("q1__amp".to_string(), 3),
            ("freq".to_string(), 4)
        ]
    );
}

#[test]
fn test_double_quoted_metadata() {
    let ds = lockstep_run(Some(r#"{"0": ["iteration"], "1": ["q1__amp", "q2__amp"], "2": ["freq"]}"#));
    let grouping = SweepGrouping::from_dataset(&ds);
    assert!(grouping.together_sweeps());
    assert_eq!(grouping.groups().len(), 3);
}

#[test]
fn test_absent_metadata_is_ungrouped() {
    let ds = lockstep_run(None);
    let grouping = SweepGrouping::from_dataset(&ds);

    assert!(!grouping.together_sweeps());
    assert!(grouping.malformed().is_none());
    assert_eq!(
        member_names(&grouping),
        vec![vec!["iteration"], vec!["q1__amp"], vec!["q2__amp"], vec!["freq"]]
    );
}

#[test]
fn test_unmentioned_axes_become_singleton_groups() {
    let ds = lockstep_run(Some("{'3': ['q1__amp', 'q2__amp']}"));
    let grouping = SweepGrouping::from_dataset(&ds);

    assert!(grouping.together_sweeps());
    assert_eq!(
        member_names(&grouping),
        vec![vec!["iteration"], vec!["q1__amp", "q2__amp"], vec!["freq"]]
    );
    let indices: Vec<usize> = grouping.groups().iter().map(|g| g.group_index()).collect();
    assert_eq!(indices, vec![4, 3, 5]);
    assert_eq!(grouping.dim_of_group(3), Some(DimId(1)));
}

#[test]
fn test_partial_metadata_keeps_declared_order() {
    let ds = DatasetBuilder::new("partial")
        .axis("flux", "V", vec![0.0, 0.1, 0.2])
        .linspace("freq", "Hz", 4.0e9, 5.0e9, 4)
        .variable_fn("signal", &["flux", "freq"], |i| i as f64)
        .parallel_sweep_axes("{'0': ['freq']}")
        .build()
        .unwrap();
    let grouping = SweepGrouping::from_dataset(&ds);

    let names: Vec<String> = grouping.logical_dimensions(&ds).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["flux", "freq"]);

    let roles = RoleAssignment::with_defaults(grouping.logical_dimensions(&ds));
    assert_eq!(roles.x_axis().map(|d| d.name()), Some("freq"));
    assert_eq!(roles.y_axis().map(|d| d.name()), Some("flux"));
}

#[test]
fn test_malformed_metadata_falls_back() {
    let cases = [
        "not json at all",
        "{'0': ['iteration'], '1': ['nope']}",
        "{'0': ['iteration', 'freq']}",
        "{'0': ['q1__amp'], '1': ['q1__amp', 'q2__amp']}",
        "{'0': []}",
        "{'one': ['iteration']}",
    ];
    for raw in cases {
        let ds = lockstep_run(Some(raw));
        let grouping = SweepGrouping::from_dataset(&ds);
        assert!(!grouping.together_sweeps(), "accepted {raw}");
        assert!(grouping.malformed().is_some(), "no reason for {raw}");
        assert_eq!(grouping.groups().len(), 4);
    }
}

#[test]
fn test_malformed_metadata_reasons() {
    let grouping = SweepGrouping::from_dataset(&lockstep_run(Some("{'0': ['iteration', 'freq']}")));
    assert_eq!(
        grouping.malformed(),
        Some(&SweepMetadataError::SizeMismatch {
            group: 0,
            axis: "freq".into(),
            expected: 2,
            actual: 4
        })
    );

    let grouping = SweepGrouping::from_dataset(&lockstep_run(Some("{'0': ['iteration'], '1': ['nope']}")));
    assert_eq!(
        grouping.malformed(),
        Some(&SweepMetadataError::UnknownAxis {
            group: 1,
            axis: "nope".into()
        })
    );
}

#[test]
fn test_variable_indexed_by_two_members_is_malformed() {
    let ds = DatasetBuilder::new("bad")
        .counter("a", 2)
        .counter("b", 2)
        .variable_fn("v", &["a", "b"], |i| i as f64)
        .parallel_sweep_axes("{'0': ['a', 'b']}")
        .build()
        .unwrap();
    let grouping = SweepGrouping::from_dataset(&ds);
    assert_eq!(
        grouping.malformed(),
        Some(&SweepMetadataError::VariableSpansGroup {
            variable: "v".into(),
            group: 0
        })
    );
}

#[test]
fn test_set_active_member() {
    let ds = lockstep_run(Some("{'0': ['iteration'], '1': ['q1__amp', 'q2__amp'], '2': ['freq']}"));
    let mut grouping = SweepGrouping::from_dataset(&ds);

    assert_eq!(grouping.set_active_member(1, "q2__amp"), Ok(DimId(1)));
    assert_eq!(grouping.groups()[1].active_name(), "q2__amp");
    assert_eq!(
        grouping.groups()[1].inactive_members().collect::<Vec<_>>(),
        vec!["q1__amp"]
    );
}

#[test]
fn test_set_active_member_rejects_non_member() {
    let ds = lockstep_run(Some("{'0': ['iteration'], '1': ['q1__amp', 'q2__amp'], '2': ['freq']}"));
    let mut grouping = SweepGrouping::from_dataset(&ds);
    let before = grouping.clone();

    assert_eq!(
        grouping.set_active_member(1, "freq"),
        Err(SweepError::InvalidMember {
            group: 1,
            name: "freq".into()
        })
    );
    assert_eq!(grouping.set_active_member(9, "freq"), Err(SweepError::UnknownGroup(9)));
    assert_eq!(grouping, before);
}
