//! HTTP client for the forum.
//!
//! This module moves bytes between a [`Session`](crate::Session) and the
//! forum. It knows the two response families (legacy HTML and the JSON
//! envelope) but nothing about what a page means.

mod forum;

pub(crate) use forum::ForumClient;
