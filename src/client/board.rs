use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::posts::{NewPost, Post, VoteChange};

use super::api::{ClientError, PostsApi};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive substring of the restaurant name.
    pub restaurant: String,
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        let needle = self.restaurant.trim().to_lowercase();
        let name_ok = needle.is_empty() || post.restaurant_name.to_lowercase().contains(&needle);
        let tag_ok = match self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(tag) => post
                .restaurant_tag
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
        };
        name_ok && tag_ok
    }
}

/// Community review feed with local bookmarks and filtering.
pub struct CommunityBoard<A> {
    api: A,
    posts: Vec<Post>,
    bookmarks: HashSet<Uuid>,
    filter: PostFilter,
}

impl<A: PostsApi> CommunityBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            posts: Vec::new(),
            bookmarks: HashSet::new(),
            filter: PostFilter::default(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn sort(&mut self) {
        self.posts.sort_by(|a, b| b.votes.cmp(&a.votes));
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.posts = self.api.list_posts().await?;
        self.sort();
        self.bookmarks.retain(|id| self.posts.iter().any(|p| p.id == *id));
        Ok(())
    }

    pub async fn submit(&mut self, post: &NewPost) -> Result<Post, ClientError> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&post.restaurant_name) || blank(&post.review_text) || !(1..=5).contains(&post.rating) {
            return Err(ClientError::Validation("All fields are required.".into()));
        }
        let created = self.api.create_post(post).await?;
        info!(post_id = %created.id, "post published");
        self.posts.push(created.clone());
        self.sort();
        Ok(created)
    }

    /// Sends one vote and adopts the server's count.
    pub async fn vote(&mut self, id: Uuid, change: VoteChange) -> Result<i32, ClientError> {
        if !self.posts.iter().any(|p| p.id == id) {
            return Err(ClientError::UnknownItem(id));
        }
        let votes = self.api.vote(id, change).await?;
        if let Some(post) = self.posts.iter_mut().find(|p| p.id == id) {
            post.votes = votes;
        }
        self.sort();
        Ok(votes)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_post(id).await?;
        self.posts.retain(|p| p.id != id);
        self.bookmarks.remove(&id);
        Ok(())
    }

    /// Flips the bookmark and returns whether the post is now bookmarked.
    pub fn toggle_bookmark(&mut self, id: Uuid) -> bool {
        if self.bookmarks.remove(&id) {
            false
        } else {
            self.bookmarks.insert(id)
        }
    }

    pub fn is_bookmarked(&self, id: Uuid) -> bool {
        self.bookmarks.contains(&id)
    }

    pub fn bookmarked(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| self.bookmarks.contains(&p.id))
            .collect()
    }

    pub fn set_filter(&mut self, filter: PostFilter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| self.filter.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeApi;

    fn new_post(name: &str, tag: Option<&str>) -> NewPost {
        NewPost {
            restaurant_name: name.into(),
            review_text: "Great food".into(),
            rating: 4,
            restaurant_tag: tag.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn up_then_down_restores_votes() {
        let mut board = CommunityBoard::new(FakeApi::default());
        let post = board.submit(&new_post("Cafe Uno", None)).await.unwrap();
        assert_eq!(post.votes, 0);

        assert_eq!(board.vote(post.id, VoteChange::Up).await.unwrap(), 1);
        assert_eq!(board.vote(post.id, VoteChange::Down).await.unwrap(), 0);
        assert_eq!(board.posts()[0].votes, 0);
    }

    #[tokio::test]
    async fn votes_are_additive() {
        let mut board = CommunityBoard::new(FakeApi::default());
        let post = board.submit(&new_post("Cafe Uno", None)).await.unwrap();
        board.vote(post.id, VoteChange::Up).await.unwrap();
        board.vote(post.id, VoteChange::Up).await.unwrap();
        assert_eq!(board.posts()[0].votes, 2);

        board.refresh().await.unwrap();
        assert_eq!(board.posts()[0].votes, 2);
    }

    #[tokio::test]
    async fn voted_posts_move_up() {
        let mut board = CommunityBoard::new(FakeApi::default());
        board.submit(&new_post("First", None)).await.unwrap();
        let second = board.submit(&new_post("Second", None)).await.unwrap();
        board.vote(second.id, VoteChange::Up).await.unwrap();
        assert_eq!(board.posts()[0].restaurant_name, "Second");
    }

    #[tokio::test]
    async fn filters_and_bookmarks() {
        let mut board = CommunityBoard::new(FakeApi::default());
        let taco = board.submit(&new_post("Taco Town", Some("Mexican"))).await.unwrap();
        board.submit(&new_post("Pho House", Some("Vietnamese"))).await.unwrap();

        board.set_filter(PostFilter {
            restaurant: "taco".into(),
            tag: None,
        });
        assert_eq!(board.visible().len(), 1);

        board.set_filter(PostFilter {
            restaurant: String::new(),
            tag: Some("vietnamese".into()),
        });
        assert_eq!(board.visible()[0].restaurant_name, "Pho House");

        assert!(board.toggle_bookmark(taco.id));
        assert_eq!(board.bookmarked().len(), 1);
        board.delete(taco.id).await.unwrap();
        assert!(!board.is_bookmarked(taco.id));
        assert_eq!(board.posts().len(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_post_locally() {
        let mut board = CommunityBoard::new(FakeApi::default());
        let mut post = new_post("Cafe", None);
        post.rating = 6;
        assert!(matches!(
            board.submit(&post).await,
            Err(ClientError::Validation(_))
        ));
    }
}
