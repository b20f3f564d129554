/// Per-request session handle
///
/// GraphQL resolvers cannot touch the HTTP response directly, so cookie
/// changes flow through this handle: the `/graphql` handler resolves the
/// incoming cookie to a `SessionHandle`, places it in the GraphQL request
/// context, and applies whatever cookie change the resolvers recorded once
/// execution finishes.
///
/// Session state itself (the Redis record) is managed by the resolvers via
/// `SessionStore`; only the cookie side effect is deferred. That is why
/// `logout` can report the real destroy result while the cookie clear is
/// still applied unconditionally.

use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Cookie change recorded by a resolver during execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieChange {
    /// Set the session cookie to this opaque token
    Set(String),

    /// Clear the session cookie
    Clear,
}

#[derive(Debug)]
struct Inner {
    /// Token presented by the client, if any
    incoming_token: Option<String>,

    /// Authenticated user for this request (updated on login/register)
    user_id: Mutex<Option<Uuid>>,

    /// Cookie change to apply to the response
    pending: Mutex<Option<CookieChange>>,
}

/// Handle to the request's session, shared with GraphQL resolvers
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl SessionHandle {
    /// Creates a handle for a request
    ///
    /// `user_id` is the user resolved from the session record (None when
    /// anonymous); `incoming_token` is the raw cookie value when present.
    pub fn new(user_id: Option<Uuid>, incoming_token: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                incoming_token,
                user_id: Mutex::new(user_id),
                pending: Mutex::new(None),
            }),
        }
    }

    /// The currently authenticated user, if any
    pub fn user_id(&self) -> Option<Uuid> {
        *self.inner.user_id.lock().unwrap()
    }

    /// The session token the client presented, if any
    pub fn incoming_token(&self) -> Option<String> {
        self.inner.incoming_token.clone()
    }

    /// Marks the request as logged in: records the new session token for
    /// the response cookie and switches the current user
    pub fn login(&self, user_id: Uuid, token: String) {
        *self.inner.user_id.lock().unwrap() = Some(user_id);
        *self.inner.pending.lock().unwrap() = Some(CookieChange::Set(token));
    }

    /// Records that the session cookie must be cleared on the response and
    /// drops the current user
    pub fn clear(&self) {
        *self.inner.user_id.lock().unwrap() = None;
        *self.inner.pending.lock().unwrap() = Some(CookieChange::Clear);
    }

    /// Takes the recorded cookie change, leaving None behind
    ///
    /// Called exactly once by the HTTP layer after execution.
    pub fn take_change(&self) -> Option<CookieChange> {
        self.inner.pending.lock().unwrap().take()
    }
}
