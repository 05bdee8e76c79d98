use std::collections::BTreeMap;

use serde::Serialize;
use tally_core::entities::{Assignment, ExtensionAttributes};
use tally_core::enums::ControlStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::{effective_limit, truncate};
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Default)]
pub struct Filter<'a> {
    status: Option<ControlStatus>,
    auditor: Option<&'a str>,
}

impl<'a> Filter<'a> {
    pub fn parse(status: Option<&str>, auditor: Option<&'a str>) -> anyhow::Result<Self> {
        Ok(Self {
            status: status
                .map(|value| parse_enum::<ControlStatus>(value, "status"))
                .transpose()?,
            auditor,
        })
    }

    fn matches(&self, assignment: &Assignment) -> bool {
        self.status.is_none_or(|status| assignment.status == status)
            && self.auditor.is_none_or(|auditor| assignment.auditor_id == auditor)
    }
}

/// An assignment with the unmapped extract columns of its material.
#[derive(Debug, Serialize)]
struct AssignmentView {
    #[serde(flatten)]
    assignment: Assignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<BTreeMap<String, String>>,
}

fn with_attributes(
    assignments: Vec<Assignment>,
    extensions: &ExtensionAttributes,
) -> Vec<AssignmentView> {
    assignments
        .into_iter()
        .map(|assignment| AssignmentView {
            attributes: extensions.get(&assignment.material_id).cloned(),
            assignment,
        })
        .collect()
}

pub async fn run(
    session_id: &str,
    filter: &Filter<'_>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);
    let assignments = ctx
        .service
        .load_assignments(session_id)
        .await?
        .into_iter()
        .filter(|assignment| filter.matches(assignment))
        .collect();
    let extensions = ctx.service.extensions(session_id).await?;
    output(
        &with_attributes(truncate(assignments, limit), &extensions),
        flags.format,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tally_core::entities::{Assignment, ExtensionAttributes};
    use tally_core::enums::ControlStatus;

    use super::{Filter, with_attributes};

    fn assignment(auditor: &str, status: ControlStatus) -> Assignment {
        let counted = status.has_count();
        Assignment {
            id: "asg-1".into(),
            session_id: "inv-1".into(),
            auditor_id: auditor.into(),
            material_id: "A".into(),
            description: String::new(),
            location_code: String::new(),
            lot_id: None,
            expected_quantity: Decimal::TEN,
            physical_quantity: counted.then_some(Decimal::TEN),
            status,
            notes: None,
            created_at: Utc::now(),
            controlled_at: counted.then(Utc::now),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::default();
        assert!(filter.matches(&assignment("ctrl01", ControlStatus::Pending)));
    }

    #[test]
    fn status_and_auditor_both_apply() {
        let filter = Filter::parse(Some("error"), Some("ctrl02")).expect("filter");
        assert!(filter.matches(&assignment("ctrl02", ControlStatus::Error)));
        assert!(!filter.matches(&assignment("ctrl01", ControlStatus::Error)));
        assert!(!filter.matches(&assignment("ctrl02", ControlStatus::Controlled)));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(Filter::parse(Some("counted"), None).is_err());
    }

    #[test]
    fn attributes_follow_the_material() {
        let mut extensions = ExtensionAttributes::default();
        extensions.insert("A", "BIN", "B-07");
        let other = Assignment {
            material_id: "B".into(),
            ..assignment("ctrl01", ControlStatus::Pending)
        };

        let views = with_attributes(
            vec![assignment("ctrl01", ControlStatus::Pending), other],
            &extensions,
        );
        let json = serde_json::to_value(&views).expect("serialize");
        assert_eq!(json[0]["material_id"], "A");
        assert_eq!(json[0]["attributes"]["BIN"], "B-07");
        assert!(json[1].get("attributes").is_none());
    }
}
