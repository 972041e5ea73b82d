//! Work-confirmation approval rules.
//!
//! A form moves `pending_manager -> pending_leader -> approved`, or to `rejected` from either
//! pending state. Managers act on the first stage, leaders on the second. When the creator is an
//! employee, the acting manager must also be that employee's team manager; the caller resolves
//! that with a database lookup when [`Transition::team_check_required`] is set.
//!
//! Nothing here touches the database. Persisting a [`Transition`] must be conditional on the
//! stored status still equalling [`Transition::from`].

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Role, WorkConfirmationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn verb(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ManagerReview,
    LeaderReview,
}

impl Stage {
    pub fn required_role(&self) -> Role {
        match self {
            Stage::ManagerReview => Role::Manager,
            Stage::LeaderReview => Role::Leader,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ManagerReview => f.write_str("managers"),
            Stage::LeaderReview => f.write_str("leaders"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Work confirmation is not in a state that can be {}", .0.past_tense())]
    NotActionable(Decision),

    #[error("Only {stage} can {} work confirmations at this stage", .decision.verb())]
    RoleNotAllowed { stage: Stage, decision: Decision },

    #[error("You can only {} work confirmations from your team members", .0.verb())]
    NotTeamMember(Decision),

    #[error("Can only update pending work confirmations")]
    NotEditable,

    #[error("Access denied")]
    AccessDenied,

    #[error("Work confirmation was modified concurrently")]
    StaleStatus,
}

/// Starting status for a new form. Managers skip their own review stage.
pub fn initial_status(creator_role: Role) -> WorkConfirmationStatus {
    match creator_role {
        Role::Manager => WorkConfirmationStatus::PendingLeader,
        _ => WorkConfirmationStatus::PendingManager,
    }
}

pub fn stage_for(status: WorkConfirmationStatus, decision: Decision) -> Result<Stage, WorkflowError> {
    match status {
        WorkConfirmationStatus::PendingManager => Ok(Stage::ManagerReview),
        WorkConfirmationStatus::PendingLeader => Ok(Stage::LeaderReview),
        WorkConfirmationStatus::Approved | WorkConfirmationStatus::Rejected => {
            Err(WorkflowError::NotActionable(decision))
        }
    }
}

pub fn check_actor(stage: Stage, actor_role: Role, decision: Decision) -> Result<(), WorkflowError> {
    if actor_role == stage.required_role() {
        Ok(())
    } else {
        Err(WorkflowError::RoleNotAllowed { stage, decision })
    }
}

/// Forms from employees need their own manager; forms from leadership can be taken by any manager.
pub fn requires_team_check(stage: Stage, creator_role: Role) -> bool {
    stage == Stage::ManagerReview && creator_role == Role::Employee
}

pub fn next_status(stage: Stage, decision: Decision) -> WorkConfirmationStatus {
    match (decision, stage) {
        (Decision::Reject, _) => WorkConfirmationStatus::Rejected,
        (Decision::Approve, Stage::ManagerReview) => WorkConfirmationStatus::PendingLeader,
        (Decision::Approve, Stage::LeaderReview) => WorkConfirmationStatus::Approved,
    }
}

pub fn is_editable(status: WorkConfirmationStatus) -> bool {
    matches!(
        status,
        WorkConfirmationStatus::PendingManager | WorkConfirmationStatus::PendingLeader
    )
}

/// A validated state change, ready to be written with a compare-and-set on `from`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub decision: Decision,
    pub stage: Stage,
    pub from: WorkConfirmationStatus,
    pub to: WorkConfirmationStatus,
    pub team_check_required: bool,
}

/// Run every role rule for a decision on a form in `status`.
pub fn plan_transition(
    status: WorkConfirmationStatus,
    creator_role: Role,
    actor_role: Role,
    decision: Decision,
) -> Result<Transition, WorkflowError> {
    let stage = stage_for(status, decision)?;
    check_actor(stage, actor_role, decision)?;

    Ok(Transition {
        decision,
        stage,
        from: status,
        to: next_status(stage, decision),
        team_check_required: requires_team_check(stage, creator_role),
    })
}

/// Which creators' forms a caller may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    Creators(Vec<Uuid>),
}

impl ListScope {
    /// `None` means unrestricted.
    pub fn creator_filter(&self) -> Option<&[Uuid]> {
        match self {
            ListScope::All => None,
            ListScope::Creators(ids) => Some(ids),
        }
    }

    pub fn can_view(&self, created_by: Uuid) -> bool {
        match self {
            ListScope::All => true,
            ListScope::Creators(ids) => ids.contains(&created_by),
        }
    }
}

/// Resolve visibility for a list request.
///
/// `team_member_ids` is only consulted for managers. `requested_creator` narrows the scope and is
/// rejected when it falls outside what the caller may see.
pub fn list_scope(
    actor_role: Role,
    actor_id: Uuid,
    team_member_ids: &[Uuid],
    requested_creator: Option<Uuid>,
) -> Result<ListScope, WorkflowError> {
    if actor_role.sees_everyone() {
        return Ok(match requested_creator {
            Some(creator) => ListScope::Creators(vec![creator]),
            None => ListScope::All,
        });
    }

    let mut visible = vec![actor_id];
    if actor_role == Role::Manager {
        visible.extend(team_member_ids.iter().copied().filter(|id| *id != actor_id));
    }

    match requested_creator {
        Some(creator) if visible.contains(&creator) => Ok(ListScope::Creators(vec![creator])),
        Some(_) => Err(WorkflowError::AccessDenied),
        None => Ok(ListScope::Creators(visible)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkConfirmationStatus::*;

    #[test]
    fn managers_skip_their_own_review() {
        assert_eq!(initial_status(Role::Manager), PendingLeader);
        assert_eq!(initial_status(Role::Employee), PendingManager);
        assert_eq!(initial_status(Role::Leader), PendingManager);
        assert_eq!(initial_status(Role::AssistantDirector), PendingManager);
    }

    #[test]
    fn full_approval_chain() {
        let first = plan_transition(PendingManager, Role::Employee, Role::Manager, Decision::Approve).unwrap();
        assert_eq!(first.to, PendingLeader);
        assert!(first.team_check_required);

        let second = plan_transition(first.to, Role::Employee, Role::Leader, Decision::Approve).unwrap();
        assert_eq!(second.from, PendingLeader);
        assert_eq!(second.to, Approved);
        assert!(!second.team_check_required);
    }

    #[test]
    fn reject_from_either_pending_stage() {
        let t = plan_transition(PendingManager, Role::Employee, Role::Manager, Decision::Reject).unwrap();
        assert_eq!(t.to, Rejected);
        let t = plan_transition(PendingLeader, Role::Manager, Role::Leader, Decision::Reject).unwrap();
        assert_eq!(t.to, Rejected);
    }

    #[test]
    fn terminal_states_are_not_actionable() {
        for status in [Approved, Rejected] {
            for decision in [Decision::Approve, Decision::Reject] {
                let err = plan_transition(status, Role::Employee, Role::Leader, decision).unwrap_err();
                assert_eq!(err, WorkflowError::NotActionable(decision));
            }
        }
        assert_eq!(
            WorkflowError::NotActionable(Decision::Reject).to_string(),
            "Work confirmation is not in a state that can be rejected"
        );
    }

    #[test]
    fn wrong_role_for_stage() {
        let err = plan_transition(PendingManager, Role::Employee, Role::Leader, Decision::Approve).unwrap_err();
        assert_eq!(err.to_string(), "Only managers can approve work confirmations at this stage");

        let err = plan_transition(PendingLeader, Role::Employee, Role::Manager, Decision::Reject).unwrap_err();
        assert_eq!(err.to_string(), "Only leaders can reject work confirmations at this stage");

        // assistant directors see everything but do not act on either stage
        let err = plan_transition(PendingLeader, Role::Employee, Role::AssistantDirector, Decision::Approve);
        assert!(matches!(err, Err(WorkflowError::RoleNotAllowed { stage: Stage::LeaderReview, .. })));
    }

    #[test]
    fn team_check_only_for_employee_forms_at_manager_stage() {
        assert!(requires_team_check(Stage::ManagerReview, Role::Employee));
        assert!(!requires_team_check(Stage::ManagerReview, Role::Leader));
        assert!(!requires_team_check(Stage::ManagerReview, Role::AssistantDirector));
        assert!(!requires_team_check(Stage::LeaderReview, Role::Employee));
    }

    #[test]
    fn editable_only_while_pending() {
        assert!(is_editable(PendingManager));
        assert!(is_editable(PendingLeader));
        assert!(!is_editable(Approved));
        assert!(!is_editable(Rejected));
    }

    #[test]
    fn employee_sees_only_self() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        let scope = list_scope(Role::Employee, me, &[other], None).unwrap();
        assert_eq!(scope, ListScope::Creators(vec![me]));
        assert!(!scope.can_view(other));

        assert_eq!(list_scope(Role::Employee, me, &[], Some(other)), Err(WorkflowError::AccessDenied));
        assert_eq!(list_scope(Role::Employee, me, &[], Some(me)).unwrap(), ListScope::Creators(vec![me]));
    }

    #[test]
    fn manager_sees_self_and_team() {
        let me = Uuid::new_v4();
        let member = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let scope = list_scope(Role::Manager, me, &[member], None).unwrap();
        assert!(scope.can_view(me));
        assert!(scope.can_view(member));
        assert!(!scope.can_view(stranger));

        assert_eq!(
            list_scope(Role::Manager, me, &[member], Some(member)).unwrap(),
            ListScope::Creators(vec![member])
        );
        assert_eq!(list_scope(Role::Manager, me, &[member], Some(stranger)), Err(WorkflowError::AccessDenied));
    }

    #[test]
    fn leadership_sees_everything() {
        let me = Uuid::new_v4();
        let anyone = Uuid::new_v4();

        let scope = list_scope(Role::Leader, me, &[], None).unwrap();
        assert_eq!(scope, ListScope::All);
        assert!(scope.creator_filter().is_none());

        let scope = list_scope(Role::AssistantDirector, me, &[], Some(anyone)).unwrap();
        assert_eq!(scope.creator_filter(), Some(&[anyone][..]));
    }
}
