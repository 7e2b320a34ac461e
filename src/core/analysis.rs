use crate::config::file_config::TeamConfig;
use crate::core::fields;
use crate::domain::model::{Issue, Sprint, SprintSnapshot};
use std::collections::BTreeMap;

pub const UNKNOWN_TEAM: &str = "Unknown";
pub const UNASSIGNED: &str = "Unassigned";

/// Story points committed to a sprint and the part of them delivered in it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Work {
    pub planned: f64,
    pub delivered: f64,
}

impl Work {
    fn add(&mut self, points: f64, delivered: bool) {
        self.planned += points;
        if delivered {
            self.delivered += points;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpicEntry {
    pub link: String,
    pub work: Work,
    /// Browse links of every sprint issue under the epic, estimated or not.
    pub issue_links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpicBreakdown {
    pub epics: BTreeMap<String, EpicEntry>,
    pub totals: Work,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Velocity {
    pub totals: Work,
    pub teams: BTreeMap<String, Work>,
    pub members: BTreeMap<String, Work>,
}

/// Everything the report writers need, computed from one snapshot.
#[derive(Debug, Clone)]
pub struct SprintReport {
    pub sprint: Sprint,
    pub epics: EpicBreakdown,
    pub velocity: Velocity,
}

/// `part / whole`, or zero for an empty whole.
pub fn share(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}

pub struct SprintAnalyzer<'a> {
    teams: &'a [TeamConfig],
    story_points_field: &'a str,
    server_url: &'a str,
}

impl<'a> SprintAnalyzer<'a> {
    pub fn new(teams: &'a [TeamConfig], story_points_field: &'a str, server_url: &'a str) -> Self {
        Self {
            teams,
            story_points_field,
            server_url,
        }
    }

    /// Team by assignee email first, then by component ownership.
    pub fn team_of(&self, issue: &Issue) -> String {
        if let Some(email) = issue.assignee_email() {
            if let Some(team) = self
                .teams
                .iter()
                .find(|team| team.members.iter().any(|m| m.eq_ignore_ascii_case(email)))
            {
                return team.name.clone();
            }
        }

        issue
            .components
            .iter()
            .find_map(|component| {
                self.teams
                    .iter()
                    .find(|team| team.components.contains(&component.name))
            })
            .map(|team| team.name.clone())
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string())
    }

    /// Assignee email, spelled as configured when it matches a team member.
    pub fn member_of(&self, issue: &Issue) -> String {
        let Some(email) = issue.assignee_email() else {
            return UNASSIGNED.to_string();
        };
        self.teams
            .iter()
            .flat_map(|team| team.members.iter())
            .find(|member| member.eq_ignore_ascii_case(email))
            .cloned()
            .unwrap_or_else(|| email.to_string())
    }

    pub fn epic_breakdown(&self, snapshot: &SprintSnapshot) -> EpicBreakdown {
        let mut breakdown = EpicBreakdown::default();

        for issue in &snapshot.issues {
            let label = fields::epic_label(issue);
            let entry = breakdown.epics.entry(label).or_insert_with(|| EpicEntry {
                link: fields::epic_key(issue)
                    .map(|key| fields::browse_link(self.server_url, &key))
                    .unwrap_or_else(|| fields::EMPTY_EPIC.to_string()),
                ..EpicEntry::default()
            });
            entry
                .issue_links
                .push(fields::browse_link(self.server_url, &issue.key));

            let points = fields::story_points(issue, self.story_points_field);
            if points > 0.0 {
                let delivered = fields::is_closed_in_sprint(issue, snapshot.sprint.id);
                entry.work.add(points, delivered);
                breakdown.totals.add(points, delivered);
            }
        }

        tracing::debug!(
            "Epic breakdown: {} epics, {} planned / {} delivered points",
            breakdown.epics.len(),
            breakdown.totals.planned,
            breakdown.totals.delivered
        );
        breakdown
    }

    pub fn velocity(&self, snapshot: &SprintSnapshot) -> Velocity {
        let mut velocity = Velocity::default();
        for team in self.teams {
            velocity.teams.entry(team.name.clone()).or_default();
            for member in &team.members {
                velocity.members.entry(member.clone()).or_default();
            }
        }

        for issue in &snapshot.issues {
            let points = fields::story_points(issue, self.story_points_field);
            if points <= 0.0 {
                continue;
            }
            let delivered = fields::is_closed_in_sprint(issue, snapshot.sprint.id);

            velocity.totals.add(points, delivered);
            velocity
                .teams
                .entry(self.team_of(issue))
                .or_default()
                .add(points, delivered);
            velocity
                .members
                .entry(self.member_of(issue))
                .or_default()
                .add(points, delivered);
        }

        velocity
    }

    pub fn report(&self, snapshot: SprintSnapshot) -> SprintReport {
        let epics = self.epic_breakdown(&snapshot);
        let velocity = self.velocity(&snapshot);
        SprintReport {
            sprint: snapshot.sprint,
            epics,
            velocity,
        }
    }
}
