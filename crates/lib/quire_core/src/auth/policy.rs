//! Role + ownership authorization policy.
//!
//! - No IO
//! - No panics
//! - Deterministic: same `(actor, resource, action)` always yields the same
//!   decision.
//!
//! Matching is exhaustive over role, resource kind and action, so adding any of
//! them forces a rule to be written here.

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::Role;

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// Target of an action, carrying the ownership metadata the rules need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post { author_id: Uuid },
    Comment { author_id: Uuid, post_author_id: Uuid },
    Identity { id: Uuid },
    Category,
    /// All identities (directory listing).
    IdentityDirectory,
    /// All comments across posts.
    CommentDirectory,
}

impl Resource {
    fn kind(&self) -> &'static str {
        match self {
            Resource::Post { .. } => "post",
            Resource::Comment { .. } => "comment",
            Resource::Identity { .. } => "identity",
            Resource::Category => "category",
            Resource::IdentityDirectory => "identity directory",
            Resource::CommentDirectory => "comment directory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    ChangePassword,
    ChangeRole,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::ChangePassword => "change password of",
            Action::ChangeRole => "change role of",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    fn from_bool(allowed: bool) -> Self {
        if allowed { Decision::Allow } else { Decision::Deny }
    }
}

/// Evaluate the policy for one `(actor, resource, action)` triple.
pub fn evaluate(actor: &Actor, resource: &Resource, action: Action) -> Decision {
    match actor.role {
        Role::Admin => Decision::Allow,
        Role::Author => Decision::from_bool(author_may(actor.id, resource, action)),
    }
}

/// Ownership rules for non-admin actors.
fn author_may(actor_id: Uuid, resource: &Resource, action: Action) -> bool {
    use Action::*;

    match (*resource, action) {
        (Resource::Post { .. }, Read | Create) => true,
        (Resource::Post { author_id }, Update | Delete) => actor_id == author_id,
        (Resource::Post { .. }, ChangePassword | ChangeRole) => false,

        (Resource::Comment { .. }, Read | Create) => true,
        (Resource::Comment { author_id, .. }, Update) => actor_id == author_id,
        // Post authors moderate comments on their own posts.
        (Resource::Comment { author_id, post_author_id }, Delete) => {
            actor_id == author_id || actor_id == post_author_id
        }
        (Resource::Comment { .. }, ChangePassword | ChangeRole) => false,

        (Resource::Identity { id }, Read | Update | Delete | ChangePassword) => actor_id == id,
        (Resource::Identity { .. }, Create | ChangeRole) => false,

        (Resource::Category, Read) => true,
        (Resource::Category, Create | Update | Delete | ChangePassword | ChangeRole) => false,

        (Resource::IdentityDirectory | Resource::CommentDirectory, _) => false,
    }
}

/// Evaluate and convert a DENY into [`CoreError::Forbidden`].
pub fn authorize(actor: &Actor, resource: &Resource, action: Action) -> CoreResult<()> {
    match evaluate(actor, resource, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(CoreError::Forbidden(format!(
            "{} may not {} this {}",
            actor.role,
            action.as_str(),
            resource.kind()
        ))),
    }
}

/// Whether the action demands a token minted directly from a password login.
pub fn requires_fresh(resource: &Resource, action: Action) -> bool {
    use Action::*;

    match (resource, action) {
        (Resource::Identity { .. }, Update | Delete | ChangePassword | ChangeRole) => true,
        (Resource::Category, Create | Update | Delete) => true,
        (Resource::Comment { .. }, Delete) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(id: Uuid) -> Actor {
        Actor {
            id,
            role: Role::Author,
        }
    }

    fn admin() -> Actor {
        Actor {
            id: Uuid::now_v7(),
            role: Role::Admin,
        }
    }

    const ALL_ACTIONS: [Action; 6] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::ChangePassword,
        Action::ChangeRole,
    ];

    fn all_resources(owner: Uuid) -> Vec<Resource> {
        vec![
            Resource::Post { author_id: owner },
            Resource::Comment {
                author_id: owner,
                post_author_id: owner,
            },
            Resource::Identity { id: owner },
            Resource::Category,
            Resource::IdentityDirectory,
            Resource::CommentDirectory,
        ]
    }

    #[test]
    fn admin_is_allowed_everything() {
        let someone_else = Uuid::now_v7();
        let admin = admin();
        for resource in all_resources(someone_else) {
            for action in ALL_ACTIONS {
                assert_eq!(evaluate(&admin, &resource, action), Decision::Allow);
            }
        }
    }

    #[test]
    fn post_owner_may_update_and_delete() {
        let owner = Uuid::now_v7();
        let post = Resource::Post { author_id: owner };
        assert_eq!(evaluate(&author(owner), &post, Action::Update), Decision::Allow);
        assert_eq!(evaluate(&author(owner), &post, Action::Delete), Decision::Allow);
    }

    #[test]
    fn other_author_may_read_but_not_modify_post() {
        let post = Resource::Post {
            author_id: Uuid::now_v7(),
        };
        let stranger = author(Uuid::now_v7());
        assert_eq!(evaluate(&stranger, &post, Action::Read), Decision::Allow);
        assert_eq!(evaluate(&stranger, &post, Action::Update), Decision::Deny);
        assert_eq!(evaluate(&stranger, &post, Action::Delete), Decision::Deny);
    }

    #[test]
    fn post_author_may_delete_but_not_edit_comments_on_own_post() {
        let post_author = Uuid::now_v7();
        let comment = Resource::Comment {
            author_id: Uuid::now_v7(),
            post_author_id: post_author,
        };
        let actor = author(post_author);
        assert_eq!(evaluate(&actor, &comment, Action::Delete), Decision::Allow);
        assert_eq!(evaluate(&actor, &comment, Action::Update), Decision::Deny);
    }

    #[test]
    fn comment_author_may_update_and_delete() {
        let commenter = Uuid::now_v7();
        let comment = Resource::Comment {
            author_id: commenter,
            post_author_id: Uuid::now_v7(),
        };
        let actor = author(commenter);
        assert_eq!(evaluate(&actor, &comment, Action::Update), Decision::Allow);
        assert_eq!(evaluate(&actor, &comment, Action::Delete), Decision::Allow);
    }

    #[test]
    fn unrelated_author_may_not_delete_comment() {
        let comment = Resource::Comment {
            author_id: Uuid::now_v7(),
            post_author_id: Uuid::now_v7(),
        };
        let err = authorize(&author(Uuid::now_v7()), &comment, Action::Delete).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn identity_rules_are_self_only() {
        let me = Uuid::now_v7();
        let actor = author(me);
        for action in [
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::ChangePassword,
        ] {
            assert_eq!(
                evaluate(&actor, &Resource::Identity { id: me }, action),
                Decision::Allow
            );
            assert_eq!(
                evaluate(&actor, &Resource::Identity { id: Uuid::now_v7() }, action),
                Decision::Deny
            );
        }
        assert_eq!(
            evaluate(&actor, &Resource::Identity { id: me }, Action::ChangeRole),
            Decision::Deny
        );
    }

    #[test]
    fn categories_are_admin_managed() {
        let actor = author(Uuid::now_v7());
        assert_eq!(evaluate(&actor, &Resource::Category, Action::Read), Decision::Allow);
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert_eq!(evaluate(&actor, &Resource::Category, action), Decision::Deny);
            assert_eq!(evaluate(&admin(), &Resource::Category, action), Decision::Allow);
        }
    }

    #[test]
    fn directories_are_admin_only() {
        let actor = author(Uuid::now_v7());
        for resource in [Resource::IdentityDirectory, Resource::CommentDirectory] {
            assert_eq!(evaluate(&actor, &resource, Action::Read), Decision::Deny);
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let owner = Uuid::now_v7();
        let actors = [author(owner), author(Uuid::now_v7()), admin()];
        for actor in &actors {
            for resource in all_resources(owner) {
                for action in ALL_ACTIONS {
                    let first = evaluate(actor, &resource, action);
                    let second = evaluate(actor, &resource, action);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn fresh_table_covers_sensitive_actions() {
        let id = Uuid::now_v7();
        assert!(requires_fresh(&Resource::Identity { id }, Action::Delete));
        assert!(requires_fresh(&Resource::Identity { id }, Action::ChangePassword));
        assert!(requires_fresh(&Resource::Identity { id }, Action::ChangeRole));
        assert!(requires_fresh(&Resource::Category, Action::Delete));
        assert!(!requires_fresh(&Resource::Identity { id }, Action::Read));
        assert!(!requires_fresh(&Resource::Post { author_id: id }, Action::Delete));
    }
}
