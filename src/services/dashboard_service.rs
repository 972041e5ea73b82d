use futures::future::try_join_all;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Role, Team, UserSummary};
use crate::services::team_service::TeamService;
use crate::services::user_service::UserService;
use crate::services::work_confirmation_service::{StatusCounts, WorkConfirmationService};

#[derive(Debug, Serialize)]
pub struct TeamTotals {
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct UserTotals {
    pub total_employees: i64,
    pub total_managers: i64,
}

#[derive(Debug, Serialize)]
pub struct WorkConfirmationTotals {
    pub total: i64,
    #[serde(flatten)]
    pub by_status: StatusCounts,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub teams: TeamTotals,
    pub users: UserTotals,
    pub work_confirmations: WorkConfirmationTotals,
}

#[derive(Debug, Serialize)]
pub struct WorkConfirmationStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub total: i64,
    pub by_status: StatusCounts,
}

#[derive(Debug, Serialize)]
pub struct TeamStats {
    pub team_id: Uuid,
    pub team_name: String,
    pub manager_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<UserSummary>,
    pub total_employees: i64,
    pub total_work_confirmations: i64,
}

#[derive(Debug, Serialize)]
pub struct TeamsStats {
    pub total_teams: usize,
    pub teams: Vec<TeamStats>,
}

/// Read-only aggregates for the leader dashboard
pub struct DashboardService {
    users: UserService,
    teams: TeamService,
    work_confirmations: WorkConfirmationService,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            teams: TeamService::new(pool.clone()),
            work_confirmations: WorkConfirmationService::new(pool),
        }
    }

    pub async fn overview(&self) -> Result<Overview, DatabaseError> {
        let (total_teams, total_employees, total_managers, by_status) = futures::try_join!(
            self.teams.count_teams(),
            self.users.count_by_role(Role::Employee),
            self.users.count_by_role(Role::Manager),
            self.work_confirmations.count_by_status(None),
        )?;

        Ok(Overview {
            teams: TeamTotals { total: total_teams },
            users: UserTotals {
                total_employees,
                total_managers,
            },
            work_confirmations: WorkConfirmationTotals {
                total: by_status.total(),
                by_status,
            },
        })
    }

    /// Tenant-wide counts, or the counts for one team's manager and members
    pub async fn work_confirmation_stats(&self, team: Option<&Team>) -> Result<WorkConfirmationStats, DatabaseError> {
        let by_status = match team {
            None => self.work_confirmations.count_by_status(None).await?,
            Some(Team { manager_id: None, .. }) => StatusCounts::default(),
            Some(Team { manager_id: Some(manager_id), .. }) => {
                let creators = self.team_creators(*manager_id).await?;
                self.work_confirmations.count_by_status(Some(&creators)).await?
            }
        };

        Ok(WorkConfirmationStats {
            team_id: team.map(|t| t.id),
            team_name: team.map(|t| t.name.clone()),
            total: by_status.total(),
            by_status,
        })
    }

    pub async fn teams_stats(&self) -> Result<TeamsStats, DatabaseError> {
        let teams = self.teams.all_teams().await?;
        let teams = try_join_all(teams.iter().map(|team| self.team_stats(team))).await?;

        Ok(TeamsStats {
            total_teams: teams.len(),
            teams,
        })
    }

    async fn team_stats(&self, team: &Team) -> Result<TeamStats, DatabaseError> {
        let mut stats = TeamStats {
            team_id: team.id,
            team_name: team.name.clone(),
            manager_id: team.manager_id,
            manager: None,
            total_employees: 0,
            total_work_confirmations: 0,
        };

        if let Some(manager_id) = team.manager_id {
            stats.manager = self.users.find_by_id(manager_id).await?.map(|m| m.summary());

            let creators = self.team_creators(manager_id).await?;
            stats.total_employees = (creators.len() - 1) as i64;
            stats.total_work_confirmations = self.work_confirmations.count_for_creators(&creators).await?;
        }

        Ok(stats)
    }

    /// The manager followed by every live team member
    async fn team_creators(&self, manager_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let mut creators = vec![manager_id];
        creators.extend(self.teams.member_ids(manager_id).await?);
        Ok(creators)
    }
}
