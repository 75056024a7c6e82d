//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod chain_repo;
pub mod comment_repo;
pub mod image_repo;
pub mod like_repo;
pub mod organization_member_repo;
pub mod organization_repo;
pub mod response_repo;
pub mod share_repo;
pub mod user_repo;

pub use chain_repo::ChainRepo;
pub use comment_repo::CommentRepo;
pub use image_repo::ImageRepo;
pub use like_repo::LikeRepo;
pub use organization_member_repo::{MembershipChange, OrganizationMemberRepo};
pub use organization_repo::OrganizationRepo;
pub use response_repo::ResponseRepo;
pub use share_repo::ShareRepo;
pub use user_repo::UserRepo;
