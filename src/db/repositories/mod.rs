//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the operations for a specific entity; the
//! ranking repository holds the like-count aggregations.

pub mod comment;
pub mod like;
pub mod picture;
pub mod publication;
pub mod ranking;
pub mod subscription;
pub mod tag;
pub mod user;

pub use comment::{CommentRepository, SqlxCommentRepository};
pub use like::{LikeRepository, SqlxLikeRepository};
pub use picture::{PictureRepository, SqlxPictureRepository};
pub use publication::{PublicationRepository, SqlxPublicationRepository};
pub use ranking::{RankingRepository, SqlxRankingRepository};
pub use subscription::{SqlxSubscriptionRepository, SubscriptionRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};

/// Fixtures shared by the repository and service tests
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{
        Comment, CreateCommentInput, Publication, PublicationInput, User, UserInput,
    };
    use chrono::NaiveDate;

    /// In-memory SQLite pool with the schema applied
    pub async fn setup_pool() -> DynDatabasePool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    pub fn user_input(name: &str) -> UserInput {
        UserInput {
            name: name.to_string(),
            birthday: NaiveDate::from_ymd_opt(1995, 3, 14).unwrap(),
            registration_date: None,
            email: format!("{}@example.com", name),
            avatar_id: None,
            description: None,
        }
    }

    pub async fn insert_user(pool: &DynDatabasePool, name: &str) -> User {
        SqlxUserRepository::new(pool.clone())
            .create(&User::new(user_input(name)))
            .await
            .expect("Failed to create test user")
    }

    pub async fn insert_publication(
        pool: &DynDatabasePool,
        author_id: i64,
        title: &str,
    ) -> Publication {
        SqlxPublicationRepository::new(pool.clone())
            .create(&PublicationInput {
                author_id,
                title: Some(title.to_string()),
                description: None,
            })
            .await
            .expect("Failed to create test publication")
    }

    pub async fn insert_comment(
        pool: &DynDatabasePool,
        author_id: i64,
        publication_id: i64,
        text: &str,
    ) -> Comment {
        SqlxCommentRepository::new(pool.clone())
            .create(&CreateCommentInput {
                author_id,
                publication_id,
                comment: text.to_string(),
            })
            .await
            .expect("Failed to create test comment")
    }
}
