use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::{Meal, NewMeal};
use crate::posts::{NewPost, Post, VoteChange};

use super::api::{ClientError, MealsApi, PostsApi};

/// In-memory stand-in for the REST API.
#[derive(Default)]
pub struct FakeApi {
    meals: Mutex<Vec<Meal>>,
    posts: Mutex<Vec<Post>>,
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: "not found".into(),
    }
}

fn meal_row(id: Uuid, m: &NewMeal) -> Meal {
    Meal {
        id,
        name: m.name.clone(),
        calories: m.calories,
        protein: m.protein,
        carbs: m.carbs,
        fats: m.fats,
        date: m.date,
        created_at: OffsetDateTime::now_utc(),
    }
}

#[async_trait]
impl MealsApi for FakeApi {
    async fn list_meals(&self) -> Result<Vec<Meal>, ClientError> {
        Ok(self.meals.lock().unwrap().clone())
    }

    async fn create_meal(&self, meal: &NewMeal) -> Result<Meal, ClientError> {
        let row = meal_row(Uuid::new_v4(), meal);
        self.meals.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_meal(&self, id: Uuid, meal: &NewMeal) -> Result<Meal, ClientError> {
        let mut meals = self.meals.lock().unwrap();
        let slot = meals.iter_mut().find(|m| m.id == id).ok_or_else(not_found)?;
        *slot = meal_row(id, meal);
        Ok(slot.clone())
    }

    async fn delete_meal(&self, id: Uuid) -> Result<(), ClientError> {
        let mut meals = self.meals.lock().unwrap();
        let before = meals.len();
        meals.retain(|m| m.id != id);
        if meals.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

#[async_trait]
impl PostsApi for FakeApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        let row = Post {
            id: Uuid::new_v4(),
            restaurant_name: post.restaurant_name.clone(),
            review_text: post.review_text.clone(),
            rating: post.rating,
            restaurant_tag: post.restaurant_tag.clone(),
            votes: 0,
            created_at: OffsetDateTime::now_utc(),
        };
        self.posts.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn vote(&self, id: Uuid, change: VoteChange) -> Result<i32, ClientError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.iter_mut().find(|p| p.id == id).ok_or_else(not_found)?;
        post.votes += change.delta();
        Ok(post.votes)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        self.posts.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}
