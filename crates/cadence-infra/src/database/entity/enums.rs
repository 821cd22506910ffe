//! Column enums mirroring the domain enums. Stored as upper-case text.

use sea_orm::entity::prelude::*;

use cadence_core::domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PostStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PENDING_APPROVAL")]
    PendingApproval,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "CHANGE_REQUESTED")]
    ChangeRequested,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl From<PostStatus> for domain::PostStatus {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Self::Draft,
            PostStatus::PendingApproval => Self::PendingApproval,
            PostStatus::Approved => Self::Approved,
            PostStatus::ChangeRequested => Self::ChangeRequested,
            PostStatus::Rejected => Self::Rejected,
            PostStatus::Scheduled => Self::Scheduled,
            PostStatus::Published => Self::Published,
            PostStatus::Failed => Self::Failed,
            PostStatus::Archived => Self::Archived,
        }
    }
}

impl From<domain::PostStatus> for PostStatus {
    fn from(status: domain::PostStatus) -> Self {
        match status {
            domain::PostStatus::Draft => Self::Draft,
            domain::PostStatus::PendingApproval => Self::PendingApproval,
            domain::PostStatus::Approved => Self::Approved,
            domain::PostStatus::ChangeRequested => Self::ChangeRequested,
            domain::PostStatus::Rejected => Self::Rejected,
            domain::PostStatus::Scheduled => Self::Scheduled,
            domain::PostStatus::Published => Self::Published,
            domain::PostStatus::Failed => Self::Failed,
            domain::PostStatus::Archived => Self::Archived,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ScheduleStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl From<ScheduleStatus> for domain::ScheduleStatus {
    fn from(status: ScheduleStatus) -> Self {
        match status {
            ScheduleStatus::Pending => Self::Pending,
            ScheduleStatus::Completed => Self::Completed,
            ScheduleStatus::Failed => Self::Failed,
            ScheduleStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<domain::ScheduleStatus> for ScheduleStatus {
    fn from(status: domain::ScheduleStatus) -> Self {
        match status {
            domain::ScheduleStatus::Pending => Self::Pending,
            domain::ScheduleStatus::Completed => Self::Completed,
            domain::ScheduleStatus::Failed => Self::Failed,
            domain::ScheduleStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Platform {
    #[sea_orm(string_value = "FACEBOOK")]
    Facebook,
    #[sea_orm(string_value = "INSTAGRAM")]
    Instagram,
    #[sea_orm(string_value = "X")]
    X,
    #[sea_orm(string_value = "LINKEDIN")]
    Linkedin,
    #[sea_orm(string_value = "TIKTOK")]
    Tiktok,
}

impl From<Platform> for domain::Platform {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Facebook => Self::Facebook,
            Platform::Instagram => Self::Instagram,
            Platform::X => Self::X,
            Platform::Linkedin => Self::Linkedin,
            Platform::Tiktok => Self::Tiktok,
        }
    }
}

impl From<domain::Platform> for Platform {
    fn from(platform: domain::Platform) -> Self {
        match platform {
            domain::Platform::Facebook => Self::Facebook,
            domain::Platform::Instagram => Self::Instagram,
            domain::Platform::X => Self::X,
            domain::Platform::Linkedin => Self::Linkedin,
            domain::Platform::Tiktok => Self::Tiktok,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    #[sea_orm(string_value = "OWNER")]
    Owner,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "EDITOR")]
    Editor,
    #[sea_orm(string_value = "VIEWER")]
    Viewer,
}

impl From<Role> for domain::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::Owner => Self::Owner,
            Role::Admin => Self::Admin,
            Role::Editor => Self::Editor,
            Role::Viewer => Self::Viewer,
        }
    }
}

impl From<domain::Role> for Role {
    fn from(role: domain::Role) -> Self {
        match role {
            domain::Role::Owner => Self::Owner,
            domain::Role::Admin => Self::Admin,
            domain::Role::Editor => Self::Editor,
            domain::Role::Viewer => Self::Viewer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ApprovalAction {
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "CHANGE_REQUESTED")]
    ChangeRequested,
    #[sea_orm(string_value = "REOPENED")]
    Reopened,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl From<ApprovalAction> for domain::ApprovalAction {
    fn from(action: ApprovalAction) -> Self {
        match action {
            ApprovalAction::Submitted => Self::Submitted,
            ApprovalAction::Approved => Self::Approved,
            ApprovalAction::Rejected => Self::Rejected,
            ApprovalAction::ChangeRequested => Self::ChangeRequested,
            ApprovalAction::Reopened => Self::Reopened,
            ApprovalAction::Archived => Self::Archived,
        }
    }
}

impl From<domain::ApprovalAction> for ApprovalAction {
    fn from(action: domain::ApprovalAction) -> Self {
        match action {
            domain::ApprovalAction::Submitted => Self::Submitted,
            domain::ApprovalAction::Approved => Self::Approved,
            domain::ApprovalAction::Rejected => Self::Rejected,
            domain::ApprovalAction::ChangeRequested => Self::ChangeRequested,
            domain::ApprovalAction::Reopened => Self::Reopened,
            domain::ApprovalAction::Archived => Self::Archived,
        }
    }
}
