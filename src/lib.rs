//! Publica - data layer of a small social network
//!
//! Users, subscriptions, publications, pictures, comments, likes and tags in
//! a relational store, plus rankings of publications and comments by likes.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
