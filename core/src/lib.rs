pub mod action;
pub mod card;
pub mod config;
pub mod coordinator;
pub mod deck;
pub mod error;
pub mod hand;
pub mod journal;
pub mod match_state;
pub mod protocol;
pub mod rank;
pub mod rng;
pub mod rules;
pub mod session;
pub mod shape;
