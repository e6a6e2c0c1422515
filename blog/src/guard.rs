//! Route guard decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call these on mount and on every session change. Public-only pages
//! (login, signup) redirect on token presence alone without waiting for a
//! fetch. Protected pages redirect when there is no token at all and
//! otherwise hold their content until the session resolves.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::cms::CmsApi;
use crate::credentials::CredentialStore;
use crate::service::SessionService;
use crate::status::SessionStatus;

/// Views the front ends route between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    Write,
}

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAccess {
    /// Anyone.
    Public,
    /// Only visitors without a stored token.
    PublicOnly,
    /// Only visitors with a stored token and a resolved session.
    Protected,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Write => "/write",
        }
    }

    #[must_use]
    pub fn access(self) -> PageAccess {
        match self {
            Self::Home => PageAccess::Public,
            Self::Login | Self::Signup => PageAccess::PublicOnly,
            Self::Write => PageAccess::Protected,
        }
    }
}

/// Where to send the visitor on mount, if anywhere.
#[must_use]
pub fn redirect_on_mount(access: PageAccess, has_token: bool) -> Option<Route> {
    match (access, has_token) {
        (PageAccess::PublicOnly, true) => Some(Route::Home),
        (PageAccess::Protected, false) => Some(Route::Signup),
        _ => None,
    }
}

/// Mount-time check for `route` against the service's stored token.
///
/// Synchronous and offline: only token presence is consulted.
#[must_use]
pub fn on_mount<C, S>(route: Route, service: &SessionService<C, S>) -> Option<Route>
where
    C: CmsApi,
    S: CredentialStore,
{
    redirect_on_mount(route.access(), service.has_token())
}

/// What a protected page shows for the current session status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtectedView {
    /// Session still loading.
    Placeholder,
    /// Signed in: show the protected form.
    Form,
    /// Signed out: keep protected controls hidden.
    Hidden,
}

#[must_use]
pub fn protected_view(status: SessionStatus) -> ProtectedView {
    match status {
        SessionStatus::Loading => ProtectedView::Placeholder,
        SessionStatus::SignedIn => ProtectedView::Form,
        SessionStatus::SignedOut => ProtectedView::Hidden,
    }
}

/// Whether a public-only page renders its form.
#[must_use]
pub fn public_only_view(status: SessionStatus) -> bool {
    status != SessionStatus::SignedIn
}
