//! Similarity edge definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored directed link asserting that `user_id` is similar to
/// `similar_user_id`.
///
/// The relation is semantically undirected: edges produced by a match
/// computation appear in mirrored pairs, and the store keeps the two
/// directions in sync whenever it rewrites them. The same ordered pair is
/// never stored twice, and no edge points from a user to itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarUser {
    /// Unique identifier.
    pub id: Uuid,
    /// Source user.
    pub user_id: Uuid,
    /// Target user.
    pub similar_user_id: Uuid,
}

impl SimilarUser {
    /// Creates a new similarity edge.
    pub fn new(user_id: Uuid, similar_user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            similar_user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let edge = SimilarUser::new(a, b);

        assert_eq!(edge.user_id, a);
        assert_eq!(edge.similar_user_id, b);
    }
}
