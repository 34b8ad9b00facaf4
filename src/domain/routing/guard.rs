//! Route guard: decides what a protected route produces for a given
//! authentication state.
//!
//! The guard is a pure function. It never looks at the session, the
//! request or the provider; callers hand it an [`AuthState`] and the
//! content they would render, and get back an instruction.
//!
//! | state             | outcome                         |
//! |-------------------|---------------------------------|
//! | `Loading`         | [`GuardOutcome::Placeholder`]   |
//! | `Authenticated`   | [`GuardOutcome::Render`]        |
//! | `Unauthenticated` | [`GuardOutcome::Redirect`] to `/` |

use crate::domain::foundation::AuthState;

use super::PUBLIC_ENTRY;

/// Instruction produced by [`guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<C> {
    /// Show a loading indicator; neither the content nor a redirect.
    Placeholder,
    /// Show the protected content, unchanged.
    Render(C),
    /// Send the browser to a public path instead.
    Redirect { to: &'static str },
}

impl<C> GuardOutcome<C> {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardOutcome::Render(_))
    }

    /// Maps the wrapped content, leaving placeholders and redirects as-is.
    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> GuardOutcome<D> {
        match self {
            GuardOutcome::Placeholder => GuardOutcome::Placeholder,
            GuardOutcome::Render(content) => GuardOutcome::Render(f(content)),
            GuardOutcome::Redirect { to } => GuardOutcome::Redirect { to },
        }
    }
}

/// Gates `content` behind `state`.
pub fn guard<C>(state: AuthState, content: C) -> GuardOutcome<C> {
    match state {
        AuthState::Loading => GuardOutcome::Placeholder,
        AuthState::Authenticated => GuardOutcome::Render(content),
        AuthState::Unauthenticated => GuardOutcome::Redirect { to: PUBLIC_ENTRY },
    }
}
