use std::collections::HashMap;

use serde::Serialize;

use super::repo_types::Post;

pub const DEFAULT_REPORT_REASON: &str = "Inappropriate content";

/// A single up or down vote. Votes are additive and not deduplicated per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    Up,
    Down,
}

impl VoteChange {
    pub fn delta(self) -> i32 {
        match self {
            VoteChange::Up => 1,
            VoteChange::Down => -1,
        }
    }
}

impl TryFrom<i64> for VoteChange {
    type Error = i64;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(VoteChange::Up),
            -1 => Ok(VoteChange::Down),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRating {
    pub restaurant_name: String,
    pub average_rating: f64,
    pub review_count: usize,
}

/// Average rating per restaurant, best first. Ties keep first-seen order.
pub fn rank_restaurants(posts: &[Post]) -> Vec<RestaurantRating> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (i64, usize)> = HashMap::new();
    for post in posts {
        let entry = sums.entry(post.restaurant_name.as_str()).or_insert_with(|| {
            order.push(post.restaurant_name.as_str());
            (0, 0)
        });
        entry.0 += i64::from(post.rating);
        entry.1 += 1;
    }

    let mut ranked: Vec<RestaurantRating> = order
        .into_iter()
        .map(|name| {
            let (total, count) = sums[name];
            RestaurantRating {
                restaurant_name: name.to_string(),
                average_rating: total as f64 / count as f64,
                review_count: count,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
    ranked
}
