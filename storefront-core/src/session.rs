//! Authentication session.
//!
//! A [`Session`] holds the currently authenticated user (if any). Consumers
//! either read the identity directly with [`Session::current_user`] or take an
//! [`AuthSubscription`] to follow sign-in and sign-out. A subscription is
//! released when it is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Opaque account identifier.
    pub uid: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            uid: uid.into(),
            created_at,
        }
    }
}

/// Holder of the current authentication state.
#[derive(Debug)]
pub struct Session {
    state: watch::Sender<Option<AuthUser>>,
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Creates a session already signed in as `user`.
    pub fn signed_in(user: AuthUser) -> Self {
        let (state, _) = watch::channel(Some(user));
        Self { state }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn sign_in(&self, user: AuthUser) {
        tracing::debug!("Signed in as {}", user.uid);
        self.state.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        if self.state.send_replace(None).is_some() {
            tracing::debug!("Signed out");
        }
    }

    /// Starts following authentication changes.
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.state.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to a [`Session`]'s authentication state.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: watch::Receiver<Option<AuthUser>>,
}

impl AuthSubscription {
    /// The identity as last observed by this subscription.
    pub fn current(&self) -> Option<AuthUser> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next sign-in or sign-out and returns the new identity.
    ///
    /// Returns `None` once the session has been dropped.
    pub async fn changed(&mut self) -> Option<Option<AuthUser>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Releases the subscription.
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(uid: &str) -> AuthUser {
        AuthUser::new(uid, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_new_session_is_signed_out() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = Session::new();
        session.sign_in(user("admin"));
        assert_eq!(session.current_user().unwrap().uid, "admin");

        session.sign_out();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_signed_in_constructor() {
        let session = Session::signed_in(user("admin"));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_subscription_sees_changes() {
        let session = Session::new();
        let mut subscription = session.subscribe();
        assert_eq!(subscription.current(), None);

        session.sign_in(user("admin"));
        let next = subscription.changed().await.unwrap();
        assert_eq!(next, Some(user("admin")));

        session.sign_out();
        let next = subscription.changed().await.unwrap();
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn test_subscription_ends_with_session() {
        let session = Session::signed_in(user("admin"));
        let mut subscription = session.subscribe();
        drop(session);
        assert_eq!(subscription.changed().await, None);
    }

    #[test]
    fn test_dropping_subscription_releases_it() {
        let session = Session::new();
        let first = session.subscribe();
        let second = session.subscribe();
        assert_eq!(session.subscriber_count(), 2);

        drop(first);
        assert_eq!(session.subscriber_count(), 1);

        second.unsubscribe();
        assert_eq!(session.subscriber_count(), 0);
    }
}
