use crate::api::attendance::{AttendanceDateReq, CheckInReq};
use crate::api::leave_request::DecideLeave;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary, SweepReport};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType, NewLeave};
use crate::model::message::{Message, NewMessage};
use crate::model::payroll::PayrollEntry;
use crate::model::role::Role;
use crate::model::user::{AttachmentKind, DirectoryEntry, HrFields, SelfFields, User};
use crate::models::{
    LoginReqDto, LoginResponse, ResendVerificationReq, ResetPasswordReq, SignupReq, VerifyReq,
};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dayflow HRMS API",
        version = "1.0.0",
        description = r#"
## Dayflow: attendance and leave for small teams

### Key Features
- **Attendance**
  - Daily check-in / check-out, half days, absentee sweep, summaries
- **Leave Management**
  - Employees apply, the administrator approves or rejects once
- **Staff & Payroll**
  - HR fields, salary figures, colleague directory
- **Profile, Uploads & Messages**
  - Contact details, profile picture / documents, internal inbox

### Security
Protected endpoints expect `Authorization: Bearer <token>` from `/api/login`.
Employees only ever see their own attendance, leave and payroll rows.

### Errors
Failures return `{"error": "<Kind>", "message": "..."}`.
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::verify,
        crate::auth::handlers::resend_verification,
        crate::auth::handlers::login,
        crate::auth::handlers::reset_password,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::mark_absent,
        crate::api::attendance::list_attendance,
        crate::api::attendance::attendance_summary,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::decide_leave,

        crate::api::employee::list_users,
        crate::api::employee::get_user,
        crate::api::employee::update_user,
        crate::api::employee::directory,

        crate::api::payroll::list_payroll,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile,
        crate::api::profile::upload,

        crate::api::message::send_message,
        crate::api::message::inbox
    ),
    components(
        schemas(
            SignupReq,
            VerifyReq,
            ResendVerificationReq,
            LoginReqDto,
            LoginResponse,
            ResetPasswordReq,
            Role,
            User,
            HrFields,
            SelfFields,
            DirectoryEntry,
            AttachmentKind,
            PayrollEntry,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceSummary,
            SweepReport,
            CheckInReq,
            AttendanceDateReq,
            LeaveType,
            LeaveStatus,
            LeaveRequest,
            NewLeave,
            DecideLeave,
            Message,
            NewMessage
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Signup, verification, login and password reset"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Employee", description = "Staff records and directory"),
        (name = "Payroll", description = "Payroll figures"),
        (name = "Profile", description = "Own profile and uploads"),
        (name = "Messages", description = "Internal messages"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
