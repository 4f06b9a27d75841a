//! Tests for the session action surface

use std::sync::Arc;

use crate::config::DatasetBuilder;
use crate::error::{AssignError, SessionError, SweepError};
use crate::model::{Dataset, LayoutConfig, Role};
use crate::notice::Notice;
use crate::plot_grid::ChartSpec;
use crate::session::{RunSession, SessionOptions};

/// Qubit spectroscopy with two amplitudes swept in lockstep
fn run() -> Arc<Dataset> {
    Arc::new(
        DatasetBuilder::new("run 12")
            .counter("iteration", 4)
            .linspace("q1__amp", "V", 0.0, 0.2, 3)
            .linspace("q2__amp", "V", 0.0, 0.4, 3)
            .linspace("freq", "Hz", 5.0e9, 5.3e9, 4)
            .variable_fn("q1__state", &["iteration", "q1__amp", "freq"], |i| i as f64)
            .variable_fn("q2__state", &["iteration", "q2__amp", "freq"], |i| -(i as f64))
            .parallel_sweep_axes("{'0': ['iteration'], '1': ['q1__amp', 'q2__amp'], '2': ['freq']}")
            .build()
            .unwrap(),
    )
}

fn role_of(session: &RunSession, name: &str) -> Option<Role> {
    let roles = session.roles();
    roles.id_of(name).and_then(|id| roles.dimension(id)).and_then(|d| d.role())
}

#[test]
fn test_open_applies_defaults() {
    let session = RunSession::open(run());

    assert_eq!(session.selection().names(), &["q1__state".to_string()]);
    assert_eq!(role_of(&session, "iteration"), Some(Role::Average));
    assert_eq!(role_of(&session, "freq"), Some(Role::XAxis));
    assert_eq!(role_of(&session, "q1__amp"), Some(Role::YAxis));
    assert_eq!(session.roles().len(), 3);
    assert_eq!(session.revision(), 0);
    assert!(session.startup_notices().is_empty());
}

#[test]
fn test_open_without_default_selection() {
    let options = SessionOptions {
        layout: LayoutConfig::new(3).unwrap(),
        select_first_variable: false,
    };
    let session = RunSession::with_options(run(), options);

    assert!(session.selection().is_empty());
    assert_eq!(session.layout().columns_per_row(), 3);
    let rendered = session.render().unwrap();
    assert!(rendered.grid.is_none());
    assert!(rendered.notices.is_empty());
}

#[test]
fn test_render_default_heatmap() {
    let session = RunSession::open(run());

    let rendered = session.render().unwrap();

    let grid = rendered.grid.unwrap();
    let ChartSpec::Heatmap(chart) = &grid.rows()[0][0] else {
        panic!("expected a heatmap");
    };
    assert_eq!(chart.title, "q1.state");
    assert_eq!(chart.x.len(), 4);
    assert_eq!(chart.y.len(), 3);
    // flat index = 12 * iteration + 4 * amp + freq; iteration mean adds 18
    assert_eq!(chart.z[0], vec![18.0, 19.0, 20.0, 21.0]);
}

#[test]
fn test_set_role_cascades_and_bumps_revision() {
    let mut session = RunSession::open(run());

    let changes = session.set_role("q1__amp", Role::XAxis, None).unwrap();

    assert_eq!(changes.len(), 2);
    assert_eq!(role_of(&session, "freq"), Some(Role::FixedIndex));
    assert!(session.roles().y_axis().is_none());
    assert_eq!(session.revision(), 1);

    let rendered = session.render().unwrap();
    assert_eq!(rendered.revision, 1);
    assert!(matches!(rendered.grid.unwrap().rows()[0][0], ChartSpec::Line(_)));
}

#[test]
fn test_rejected_actions_leave_state() {
    let mut session = RunSession::open(run());
    let roles = session.roles().clone();

    let err = session.set_role("freq", Role::FixedIndex, Some(4)).unwrap_err();
    assert!(err.is_contract_violation());
    assert_eq!(
        err,
        SessionError::Assign(AssignError::IndexOutOfRange {
            dimension: "freq".into(),
            index: 4,
            size: 4
        })
    );

    assert_eq!(
        session.set_role("power", Role::Average, None),
        Err(SessionError::UnknownDimension("power".into()))
    );
    assert_eq!(
        session.set_fixed_index("q1__amp", 3),
        Err(SessionError::Assign(AssignError::IndexOutOfRange {
            dimension: "q1__amp".into(),
            index: 3,
            size: 3
        }))
    );
    assert_eq!(
        session.toggle_variable_selection("nope"),
        Err(SessionError::UnknownVariable("nope".into()))
    );
    assert_eq!(session.set_columns_per_row(0), Err(SessionError::InvalidColumns));

    assert_eq!(session.roles(), &roles);
    assert_eq!(session.revision(), 0);
    assert_eq!(session.layout(), LayoutConfig::default());
}

#[test]
fn test_set_active_sweep_member_keeps_role() {
    let mut session = RunSession::open(run());
    session.set_role("q1__amp", Role::FixedIndex, Some(2)).unwrap();

    session.set_active_sweep_member(1, "q2__amp").unwrap();

    assert!(session.roles().id_of("q1__amp").is_none());
    let id = session.roles().id_of("q2__amp").unwrap();
    let dim = session.roles().dimension(id).unwrap();
    assert_eq!(dim.role(), Some(Role::FixedIndex));
    assert_eq!(dim.fixed_index(), Some(2));
    assert_eq!(session.grouping().groups()[1].active_name(), "q2__amp");

    // The line title now reads the fixed tick off the renamed axis
    let grid = session.render().unwrap().grid.unwrap();
    let ChartSpec::Line(chart) = &grid.rows()[0][0] else {
        panic!("expected a line chart");
    };
    assert_eq!(chart.title, "q2.amp = 400 mV");
}

#[test]
fn test_set_active_sweep_member_rejects_non_member() {
    let mut session = RunSession::open(run());

    let err = session.set_active_sweep_member(1, "freq").unwrap_err();

    assert!(err.is_contract_violation());
    assert_eq!(
        err,
        SessionError::Sweep(SweepError::InvalidMember {
            group: 1,
            name: "freq".into()
        })
    );
    assert_eq!(session.grouping().groups()[1].active_name(), "q1__amp");
    assert_eq!(session.revision(), 0);
}

#[test]
fn test_no_x_axis_notice() {
    let mut session = RunSession::open(run());
    session.set_role("freq", Role::Average, None).unwrap();

    let rendered = session.render().unwrap();

    assert!(rendered.grid.is_none());
    assert_eq!(rendered.notices, vec![Notice::NoXAxisSelected]);
}

#[test]
fn test_toggle_and_columns() {
    let mut session = RunSession::open(run());

    assert!(session.toggle_variable_selection("q2__state").unwrap());
    session.set_columns_per_row(1).unwrap();

    let grid = session.render().unwrap().grid.unwrap();
    assert_eq!(grid.rows().len(), 2);
    assert_eq!(grid.rows()[1][0].title(), "q2.state");

    assert!(!session.toggle_variable_selection("q1__state").unwrap());
    assert_eq!(session.selection().names(), &["q2__state".to_string()]);
    assert_eq!(session.revision(), 3);
}

#[test]
fn test_malformed_metadata_reported_once() {
    let dataset = DatasetBuilder::new("bad")
        .counter("a", 2)
        .counter("b", 3)
        .variable_fn("v", &["a", "b"], |i| i as f64)
        .parallel_sweep_axes("{'0': ['a', 'b']}")
        .build()
        .unwrap();

    let session = RunSession::open(Arc::new(dataset));

    let notices = session.startup_notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::MalformedSweepMetadata { .. }));
    assert_eq!(session.roles().len(), 2);
    assert!(session.render().unwrap().grid.is_some());
}

#[test]
fn test_sessions_share_dataset_not_state() {
    let dataset = run();
    let mut first = RunSession::open(Arc::clone(&dataset));
    let second = RunSession::open(Arc::clone(&dataset));

    first.set_role("freq", Role::Average, None).unwrap();

    assert_eq!(role_of(&second, "freq"), Some(Role::XAxis));
    assert!(Arc::ptr_eq(first.dataset(), second.dataset()));
}

#[test]
fn test_describe_roles() {
    let mut session = RunSession::open(run());
    session.set_role("q1__amp", Role::FixedIndex, Some(1)).unwrap();

    assert_eq!(
        session.describe_roles(),
        "average: [iteration] fixed: [q1__amp[1]] x-axis: [freq] y-axis: []"
    );
}

#[test]
fn test_full_reduce_keeps_every_variable() {
    let session = RunSession::open(run());

    let reduced = session.reduce().unwrap();

    assert_eq!(reduced.variable_names(), vec!["q1__state", "q2__state"]);
    assert_eq!(reduced.axes(), &["q1__amp".to_string(), "freq".to_string()]);
}
