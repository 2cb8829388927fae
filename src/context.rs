//! Per-call identity.
//!
//! A [`CallContext`] carries who a call is made on behalf of. The async executor
//! takes it as an explicit argument. Thread-per-call callers can instead park it
//! in the calling thread's ambient slot ([`set_auth_token`], [`get`], [`clear`])
//! and let the blocking client read it from there; [`scope`] returns a guard that
//! clears the slot on every exit path.
//!
//! ```rust
//! use stuffusell_client::context::{self, CallContext};
//!
//! {
//!     let _guard = context::scope(CallContext::basic("alice", "secret"));
//!     assert!(context::get().auth_token().is_some());
//! }
//! assert!(context::get().auth_token().is_none());
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static CURRENT: RefCell<Option<CallContext>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    auth_token: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context authenticated with `username:password`.
    pub fn basic(username: &str, password: &str) -> Self {
        Self::new().with_auth_token(basic_auth_token(username, password))
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Address of the end user the call is made for; sent as `X-Forwarded-For`.
    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Drops any end-user address, so no `X-Forwarded-For` is sent.
    pub fn without_ip_address(mut self) -> Self {
        self.ip_address = None;
        self
    }

    /// Overrides the configured user agent for this call only.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The auth token, if one is set and non-empty.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref().filter(|ip| !ip.is_empty())
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref().filter(|ua| !ua.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some()
    }
}

/// Base64 of `username:password`, the token format the service expects after `Basic`.
pub fn basic_auth_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

fn with_current<R>(f: impl FnOnce(&mut CallContext) -> R) -> R {
    CURRENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        f(slot.get_or_insert_with(CallContext::default))
    })
}

/// Snapshot of the calling thread's context; creates an empty one on first access.
pub fn get() -> CallContext {
    with_current(|ctx| ctx.clone())
}

pub fn set_auth_token(token: impl Into<String>) {
    let token = token.into();
    with_current(|ctx| ctx.auth_token = Some(token));
}

pub fn set_ip_address(ip: impl Into<String>) {
    let ip = ip.into();
    with_current(|ctx| ctx.ip_address = Some(ip));
}

pub fn set_user_agent(user_agent: impl Into<String>) {
    let user_agent = user_agent.into();
    with_current(|ctx| ctx.user_agent = Some(user_agent));
}

/// Remove the calling thread's context, returning it if one existed.
pub fn clear() -> Option<CallContext> {
    CURRENT.with(|slot| slot.borrow_mut().take())
}

/// Install `ctx` for the calling thread until the returned guard drops.
pub fn scope(ctx: CallContext) -> ContextGuard {
    CURRENT.with(|slot| *slot.borrow_mut() = Some(ctx));
    ContextGuard {
        _not_send: PhantomData,
    }
}

/// Clears the thread's context when dropped. Not `Send`: it must drop on the
/// thread that created it.
#[must_use = "the context is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ContextGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        clear();
    }
}
