//! Operator actions given on the command line, and the JSON export of the
//! resulting plot grid.

use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{WrapErr, eyre};
use serde::Serialize;
use sweepscope_core::{DatasetSummary, Notice, PlotGrid, Role, RunSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptAction {
    /// `NAME=ROLE[:INDEX]`
    SetRole {
        dim: String,
        role: Role,
        index: Option<usize>,
    },
    /// `GROUP=NAME`
    SetActive { group: usize, member: String },
    Select(String),
    Columns(usize),
}

impl ScriptAction {
    /// Parse a `--role` argument such as `freq=x` or `power=fixed:2`
    pub fn parse_role(spec: &str) -> color_eyre::Result<Self> {
        let (dim, role) = split_assignment(spec)?;
        let (role, index) = match role.split_once(':') {
            Some((role, index)) => {
                let index = index
                    .trim()
                    .parse::<usize>()
                    .wrap_err_with(|| format!("invalid index in `{spec}`"))?;
                (role, Some(index))
            }
            None => (role, None),
        };
        Ok(ScriptAction::SetRole {
            dim: dim.to_string(),
            role: Role::from_str(role)?,
            index,
        })
    }

    /// Parse an `--active` argument such as `1=q2__amp`
    pub fn parse_active(spec: &str) -> color_eyre::Result<Self> {
        let (group, member) = split_assignment(spec)?;
        let group = group
            .parse::<usize>()
            .wrap_err_with(|| format!("invalid sweep group in `{spec}`"))?;
        Ok(ScriptAction::SetActive {
            group,
            member: member.to_string(),
        })
    }

    pub fn apply(&self, session: &mut RunSession) -> color_eyre::Result<()> {
        match self {
            ScriptAction::SetRole { dim, role, index } => {
                session.set_role(dim, *role, *index)?;
            }
            ScriptAction::SetActive { group, member } => session.set_active_sweep_member(*group, member)?,
            ScriptAction::Select(name) => {
                if !session.selection().contains(name) {
                    session.toggle_variable_selection(name)?;
                }
            }
            ScriptAction::Columns(columns) => session.set_columns_per_row(*columns)?,
        }
        Ok(())
    }
}

fn split_assignment(spec: &str) -> color_eyre::Result<(&str, &str)> {
    spec.split_once('=')
        .map(|(left, right)| (left.trim(), right.trim()))
        .filter(|(left, right)| !left.is_empty() && !right.is_empty())
        .ok_or_else(|| eyre!("expected KEY=VALUE, got `{spec}`"))
}

/// Apply `actions` in order, stopping at the first rejected one
pub fn apply_all(session: &mut RunSession, actions: &[ScriptAction]) -> color_eyre::Result<()> {
    for action in actions {
        action
            .apply(session)
            .wrap_err_with(|| format!("applying {action:?}"))?;
    }
    Ok(())
}

/// Everything the plot pane would show, as one JSON document
#[derive(Debug, Clone, Serialize)]
pub struct Export {
    pub run: String,
    pub summary: DatasetSummary,
    pub revision: u64,
    pub roles: String,
    pub notices: Vec<String>,
    pub grid: Option<PlotGrid>,
}

impl Export {
    pub fn from_session(session: &RunSession) -> color_eyre::Result<Self> {
        let rendered = session.render()?;
        let notices = session
            .startup_notices()
            .iter()
            .chain(&rendered.notices)
            .map(Notice::to_string)
            .collect();
        Ok(Self {
            run: session.dataset().name().to_string(),
            summary: session.dataset().describe(),
            revision: rendered.revision,
            roles: session.describe_roles(),
            notices,
            grid: rendered.grid,
        })
    }

    pub fn write(&self, path: &Path) -> color_eyre::Result<()> {
        let json = serde_json::to_string_pretty(self).wrap_err("serializing plot grid")?;
        std::fs::write(path, json).wrap_err_with(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), revision = self.revision, "plot grid exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sweepscope_core::DatasetBuilder;
    use tempfile::TempDir;

    fn session() -> RunSession {
        let dataset = DatasetBuilder::new("scripted")
            .counter("iteration", 2)
            .linspace("q1__amp", "V", 0.0, 0.2, 3)
            .linspace("q2__amp", "V", 0.0, 0.4, 3)
            .linspace("freq", "Hz", 5.0e9, 5.3e9, 4)
            .variable_fn("q1__state", &["iteration", "q1__amp", "freq"], |i| i as f64)
            .variable_fn("q2__state", &["iteration", "q2__amp", "freq"], |i| i as f64)
            .parallel_sweep_axes("{'0': ['iteration'], '1': ['q1__amp', 'q2__amp'], '2': ['freq']}")
            .build()
            .unwrap();
        RunSession::open(Arc::new(dataset))
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(
            ScriptAction::parse_role("power=fixed:2").unwrap(),
            ScriptAction::SetRole {
                dim: "power".into(),
                role: Role::FixedIndex,
                index: Some(2)
            }
        );
        assert_eq!(
            ScriptAction::parse_role("freq = x").unwrap(),
            ScriptAction::SetRole {
                dim: "freq".into(),
                role: Role::XAxis,
                index: None
            }
        );
        assert!(ScriptAction::parse_role("freq").is_err());
        assert!(ScriptAction::parse_role("freq=z").is_err());
        assert!(ScriptAction::parse_role("freq=fixed:-1").is_err());
    }

    #[test]
    fn test_parse_active() {
        assert_eq!(
            ScriptAction::parse_active("1=q2__amp").unwrap(),
            ScriptAction::SetActive {
                group: 1,
                member: "q2__amp".into()
            }
        );
        assert!(ScriptAction::parse_active("one=q2__amp").is_err());
    }

    #[test]
    fn test_apply_all_and_export() {
        let mut session = session();
        let actions = vec![
            ScriptAction::parse_active("1=q2__amp").unwrap(),
            ScriptAction::parse_role("q2__amp=fixed:1").unwrap(),
            ScriptAction::Select("q2__state".into()),
        ];
        apply_all(&mut session, &actions).unwrap();

        let export = Export::from_session(&session).unwrap();
        assert_eq!(export.run, "scripted");
        assert!(export.notices.is_empty());
        let grid = export.grid.as_ref().unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.rows()[0][0].title(), "q2.amp = 200 mV");

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("grid.json");
        export.write(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["grid"]["rows"][0][0]["kind"], "line");
        assert_eq!(json["grid"]["rows"][0][0]["series"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["axes"].as_array().unwrap().len(), 4);
        assert_eq!(json["summary"]["axes"][1]["name"], "q1__amp");
        assert_eq!(json["summary"]["variables"][1]["dims"][1], "q2__amp");
    }

    #[test]
    fn test_rejected_action_stops_script() {
        let mut session = session();
        let actions = vec![
            ScriptAction::parse_active("1=freq").unwrap(),
            ScriptAction::Columns(3),
        ];

        assert!(apply_all(&mut session, &actions).is_err());
        assert_eq!(session.layout().columns_per_row(), 2);
    }
}
