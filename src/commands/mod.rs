pub mod user_tweets;
