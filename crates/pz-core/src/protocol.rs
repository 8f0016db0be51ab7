//! Protected-resource access protocol.
//!
//! Every read of a possibly-password-protected resource (secret project
//! or paste) follows the same two-state protocol: fetch optimistically
//! without credentials, and on an access-denied signal obtain a password
//! and retry once with an unlock request. The retry's payload is used
//! whether or not the password was correct — wrong-password detection
//! happens lazily, the first time a decrypt runs against the payload.
//!
//! The protocol is modeled as an explicit transition table rather than
//! unwinding control flow, which makes the single-retry limit and the
//! propagation of non-access-denied errors directly testable.

use tracing::debug;

use crate::error::{PzError, Result};

/// A resource the collaborator store can serve openly or behind a
/// password. Implementations perform the actual transport calls.
pub trait ProtectedResource {
    type Payload;

    /// Fetch without credentials. Signals a protected resource with
    /// `Err(PzError::AccessDenied)`.
    fn fetch(&self) -> Result<Self::Payload>;

    /// Retry with a password. The store returns the payload even when the
    /// password is wrong; correctness is only observable at decrypt time.
    fn unlock(&self, password: &str) -> Result<Self::Payload>;
}

/// How a protected fetch concluded.
#[derive(Debug)]
pub enum Access<T> {
    /// The resource was served without credentials.
    Open(T),
    /// The resource required an unlock; the password used is carried along
    /// so subsequent decrypts do not prompt again.
    Unlocked { payload: T, password: String },
}

impl<T> Access<T> {
    pub fn payload(&self) -> &T {
        match self {
            Access::Open(payload) => payload,
            Access::Unlocked { payload, .. } => payload,
        }
    }

    /// The password used for the unlock, if one was needed.
    pub fn password(&self) -> Option<&str> {
        match self {
            Access::Open(_) => None,
            Access::Unlocked { password, .. } => Some(password),
        }
    }

    pub fn into_parts(self) -> (T, Option<String>) {
        match self {
            Access::Open(payload) => (payload, None),
            Access::Unlocked { payload, password } => (payload, Some(password)),
        }
    }
}

/// Run the fetch / unlock protocol against a resource.
///
/// `password_source` is invoked at most once, and only when the first
/// fetch is denied — it is where the caller plugs in a `--password` flag
/// or an interactive prompt. Any error other than `AccessDenied`
/// propagates immediately without a retry, and the protocol never loops:
/// a wrong password surfaces later as `DecryptionFailed` and the user
/// must re-invoke the command.
pub fn fetch_protected<R, F>(resource: &R, password_source: F) -> Result<Access<R::Payload>>
where
    R: ProtectedResource,
    F: FnOnce() -> Result<String>,
{
    match resource.fetch() {
        Ok(payload) => Ok(Access::Open(payload)),
        Err(PzError::AccessDenied) => {
            debug!("resource is protected; retrying with password");
            let password = password_source()?;
            let payload = resource.unlock(&password)?;
            Ok(Access::Unlocked { payload, password })
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Scripted resource: programmable fetch/unlock outcomes plus call
    /// counters to pin down the transition table.
    struct ScriptedResource {
        fetch_result: fn() -> Result<String>,
        unlock_result: fn(&str) -> Result<String>,
        fetch_calls: Cell<usize>,
        unlock_calls: Cell<usize>,
    }

    impl ScriptedResource {
        fn new(
            fetch_result: fn() -> Result<String>,
            unlock_result: fn(&str) -> Result<String>,
        ) -> Self {
            Self {
                fetch_result,
                unlock_result,
                fetch_calls: Cell::new(0),
                unlock_calls: Cell::new(0),
            }
        }
    }

    impl ProtectedResource for ScriptedResource {
        type Payload = String;

        fn fetch(&self) -> Result<String> {
            self.fetch_calls.set(self.fetch_calls.get() + 1);
            (self.fetch_result)()
        }

        fn unlock(&self, password: &str) -> Result<String> {
            self.unlock_calls.set(self.unlock_calls.get() + 1);
            (self.unlock_result)(password)
        }
    }

    #[test]
    fn test_open_resource_skips_password() {
        let resource = ScriptedResource::new(
            || Ok("payload".to_string()),
            |_| panic!("unlock must not be called"),
        );

        let access = fetch_protected(&resource, || {
            panic!("password source must not be called")
        })
        .unwrap();

        assert!(matches!(access, Access::Open(ref p) if p == "payload"));
        assert_eq!(access.password(), None);
        assert_eq!(resource.fetch_calls.get(), 1);
        assert_eq!(resource.unlock_calls.get(), 0);
    }

    #[test]
    fn test_denied_resource_unlocks_once() {
        let resource = ScriptedResource::new(
            || Err(PzError::AccessDenied),
            |password| Ok(format!("unlocked with {}", password)),
        );

        let access = fetch_protected(&resource, || Ok("hunter2".to_string())).unwrap();

        let (payload, password) = access.into_parts();
        assert_eq!(payload, "unlocked with hunter2");
        assert_eq!(password.as_deref(), Some("hunter2"));
        assert_eq!(resource.fetch_calls.get(), 1);
        assert_eq!(resource.unlock_calls.get(), 1);
    }

    #[test]
    fn test_unlock_payload_used_even_for_wrong_password() {
        // The store cannot tell a wrong password apart at unlock time;
        // the protocol must hand the payload through regardless.
        let resource = ScriptedResource::new(
            || Err(PzError::AccessDenied),
            |_| Ok("ciphertext payload".to_string()),
        );

        let access = fetch_protected(&resource, || Ok("wrong-pw".to_string())).unwrap();
        assert_eq!(access.payload(), "ciphertext payload");
    }

    #[test]
    fn test_other_fetch_errors_propagate_without_retry() {
        let resource = ScriptedResource::new(
            || Err(PzError::NotFound("no such project".to_string())),
            |_| panic!("unlock must not be called"),
        );

        let result = fetch_protected(&resource, || {
            panic!("password source must not be called")
        });

        assert!(matches!(result, Err(PzError::NotFound(_))));
        assert_eq!(resource.unlock_calls.get(), 0);
    }

    #[test]
    fn test_unlock_failure_propagates_without_second_retry() {
        let resource = ScriptedResource::new(
            || Err(PzError::AccessDenied),
            |_| Err(PzError::Store("server unavailable".to_string())),
        );

        let result = fetch_protected(&resource, || Ok("pw".to_string()));

        assert!(matches!(result, Err(PzError::Store(_))));
        assert_eq!(resource.fetch_calls.get(), 1);
        assert_eq!(resource.unlock_calls.get(), 1);
    }

    #[test]
    fn test_password_source_failure_propagates() {
        let resource = ScriptedResource::new(
            || Err(PzError::AccessDenied),
            |_| panic!("unlock must not be called"),
        );

        let result = fetch_protected(&resource, || {
            Err(PzError::MalformedInput("no tty".to_string()))
        });

        assert!(matches!(result, Err(PzError::MalformedInput(_))));
        assert_eq!(resource.unlock_calls.get(), 0);
    }
}
