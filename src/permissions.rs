//! Authorization predicates.
//!
//! A predicate answers "may this actor perform this action on this record?"
//! against already-loaded state, with no I/O. Handlers compose the predicates
//! they need and call [`enforce`] before any mutation.

use axum::http::Method;

use crate::{
    error::{AppError, AppResult},
    models::account::{Actor, Role},
};

/// Records carrying the id of the account that owns them
pub trait Owned {
    fn owner_id(&self) -> i64;
}

/// What a request intends to do with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

impl Action {
    /// GET, HEAD and OPTIONS are safe methods; everything else writes
    pub fn from_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
            Action::Read
        } else {
            Action::Write
        }
    }
}

/// Reason a predicate refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial(pub &'static str);

pub trait Predicate<R: ?Sized> {
    fn check(&self, actor: Option<&Actor>, action: Action, record: &R) -> Result<(), Denial>;
}

/// Any authenticated actor
pub struct IsAuthenticated;

impl<R: ?Sized> Predicate<R> for IsAuthenticated {
    fn check(&self, actor: Option<&Actor>, _action: Action, _record: &R) -> Result<(), Denial> {
        match actor {
            Some(_) => Ok(()),
            None => Err(Denial("Authentication credentials were not provided.")),
        }
    }
}

/// Reads always pass; writes need an authenticated actor
pub struct IsAuthenticatedOrReadOnly;

impl<R: ?Sized> Predicate<R> for IsAuthenticatedOrReadOnly {
    fn check(&self, actor: Option<&Actor>, action: Action, record: &R) -> Result<(), Denial> {
        match action {
            Action::Read => Ok(()),
            Action::Write => IsAuthenticated.check(actor, action, record),
        }
    }
}

/// Reads always pass; writes need the actor to be the record's author
pub struct IsOwnerOrReadOnly;

impl<R: Owned + ?Sized> Predicate<R> for IsOwnerOrReadOnly {
    fn check(&self, actor: Option<&Actor>, action: Action, record: &R) -> Result<(), Denial> {
        if action == Action::Read {
            return Ok(());
        }
        match actor {
            Some(actor) if actor.id == record.owner_id() => Ok(()),
            _ => Err(Denial("You must be the owner to modify this object.")),
        }
    }
}

/// Exact role match
pub struct HasRole(pub Role);

impl<R: ?Sized> Predicate<R> for HasRole {
    fn check(&self, actor: Option<&Actor>, _action: Action, _record: &R) -> Result<(), Denial> {
        match actor {
            Some(actor) if actor.role == self.0 => Ok(()),
            _ => Err(Denial("Your role does not give access to this page.")),
        }
    }
}

/// Named capability flag
pub struct HasPermission(pub &'static str);

impl<R: ?Sized> Predicate<R> for HasPermission {
    fn check(&self, actor: Option<&Actor>, _action: Action, _record: &R) -> Result<(), Denial> {
        match actor {
            Some(actor) if actor.has_permission(self.0) => Ok(()),
            _ => Err(Denial("You do not have permission to perform this action.")),
        }
    }
}

/// Both predicates must pass; the first denial is reported
impl<R: ?Sized, A: Predicate<R>, B: Predicate<R>> Predicate<R> for (A, B) {
    fn check(&self, actor: Option<&Actor>, action: Action, record: &R) -> Result<(), Denial> {
        self.0.check(actor, action, record)?;
        self.1.check(actor, action, record)
    }
}

/// Run a predicate. A refusal without an actor is an authentication failure,
/// with an actor it is a permission failure.
pub fn enforce<R: ?Sized, P: Predicate<R>>(
    predicate: &P,
    actor: Option<&Actor>,
    action: Action,
    record: &R,
) -> AppResult<()> {
    predicate.check(actor, action, record).map_err(|Denial(message)| match actor {
        None => AppError::Authentication("Authentication credentials were not provided.".to_string()),
        Some(_) => AppError::Authorization(message.to_string()),
    })
}
