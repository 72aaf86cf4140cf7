#![forbid(unsafe_code)]

mod channel;
mod codec;
mod flags;
mod ids;
mod mask;
mod model;
mod perk;
mod repository;
mod resolver;
mod roles;
mod server;
mod service;

pub use channel::{evaluate_channel_permission, GuildContext};
pub use codec::{FlagDefinition, FlagTable};
pub use flags::{ADMINISTRATOR, PERKS, PERMISSIONS};
pub use ids::{ChannelId, GuildId, PlanId, RoleId, UserId};
pub use mask::PermissionMask;
pub use model::{
    Channel, Guild, Overwrite, Role, RoleOverwrite, Subscription, UserOverwrite,
    UserSubscriptionPerk,
};
pub use perk::evaluate_perk;
pub use repository::{EntityKind, InMemoryRepository, PermissionRepository, RepositoryError};
pub use resolver::{check_permission, has_permissions, FlagStatus, Verdict};
pub use roles::{explicit_roles, ordered_roles};
pub use server::evaluate_server_permission;
pub use service::PermissionService;

/// Returns the project code name.
#[must_use]
pub const fn project_name() -> &'static str {
    "warden"
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("id is invalid")]
    InvalidId,
    #[error("permission mask is invalid")]
    InvalidMask,
}
