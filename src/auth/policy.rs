//! Role and ownership rules evaluated before every ledger read or write.

use crate::{auth::auth::AuthUser, error::ApiError, model::role::Role};

/// Things a signed-in user may try to do.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    CheckIn,
    CheckOut,
    SweepAbsent,
    ApplyLeave,
    DecideLeave,
    EditHrFields,
    /// Edit profile fields or attach files on `target`'s record.
    EditProfile { target: i64 },
    ViewAttendance,
    ViewLeave,
    ViewPayroll,
    ViewUser { target: i64 },
    ListStaff,
    SendMessage,
    ReadInbox,
}

/// Which rows an authorized read may see.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Scope {
    All,
    Own(i64),
}

impl Scope {
    pub fn permits(&self, owner: i64) -> bool {
        match self {
            Scope::All => true,
            Scope::Own(user_id) => *user_id == owner,
        }
    }
}

pub fn authorize(actor: &AuthUser, action: Action) -> Result<Scope, ApiError> {
    let own = Scope::Own(actor.user_id);

    match (actor.role, action) {
        (Role::Employee, Action::CheckIn | Action::CheckOut | Action::ApplyLeave) => Ok(own),
        (Role::Admin, Action::CheckIn | Action::CheckOut) => {
            Err(ApiError::Forbidden("Attendance is recorded by employees only"))
        }
        (Role::Admin, Action::ApplyLeave) => {
            Err(ApiError::Forbidden("Leave is requested by employees only"))
        }

        (Role::Admin, Action::SweepAbsent | Action::DecideLeave | Action::EditHrFields | Action::ListStaff) => {
            Ok(Scope::All)
        }
        (Role::Employee, Action::SweepAbsent | Action::DecideLeave | Action::EditHrFields | Action::ListStaff) => {
            Err(ApiError::Forbidden("Admin only"))
        }

        (_, Action::EditProfile { target }) if target == actor.user_id => Ok(own),
        (_, Action::EditProfile { .. }) => Err(ApiError::Forbidden("Profiles are edited by their owner")),

        (Role::Admin, Action::ViewAttendance | Action::ViewLeave | Action::ViewPayroll | Action::ViewUser { .. }) => {
            Ok(Scope::All)
        }
        (Role::Employee, Action::ViewAttendance | Action::ViewLeave | Action::ViewPayroll) => Ok(own),
        (Role::Employee, Action::ViewUser { target }) if target == actor.user_id => Ok(own),
        (Role::Employee, Action::ViewUser { .. }) => Err(ApiError::Forbidden("Employees may only view their own record")),

        (_, Action::SendMessage | Action::ReadInbox) => Ok(own),
    }
}

/// Admin accounts may only be created while none exists.
pub fn authorize_admin_signup(existing_admins: i64) -> Result<(), ApiError> {
    if existing_admins > 0 {
        return Err(ApiError::AdminExists);
    }
    Ok(())
}
