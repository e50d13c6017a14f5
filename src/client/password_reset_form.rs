use log::info;

use super::api::{ApiFailure, ResetPasswordApi};
use crate::password::{meets_policy, policy_violation};
use crate::routes::auth::auth_models::ResetPasswordRequest;

pub const RESET_SUCCESS_PATH: &str = "/new-password-made";
pub const RESET_FAILURE_MESSAGE: &str = "Failed to reset password";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// State behind the "choose a new password" screen reached from a reset link.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetForm {
    token: String,
    pub new_password: String,
    pub confirm_password: String,
    is_submitting: bool,
    error: Option<String>,
}

impl PasswordResetForm {
    pub fn new(token: &str) -> Self {
        PasswordResetForm {
            token: token.to_string(),
            new_password: String::new(),
            confirm_password: String::new(),
            is_submitting: false,
            error: None,
        }
    }

    /// Policy message for the new password, once something has been typed.
    pub fn password_error(&self) -> Option<&'static str> {
        if self.new_password.is_empty() {
            return None;
        }
        policy_violation(&self.new_password)
    }

    pub fn confirm_error(&self) -> Option<&'static str> {
        if !self.confirm_password.is_empty() && self.confirm_password != self.new_password {
            Some(PASSWORD_MISMATCH_MESSAGE)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        meets_policy(&self.new_password)
            && !self.confirm_password.is_empty()
            && self.confirm_password == self.new_password
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_submitting
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks the request in flight and returns its payload, or None when the
    /// form may not be submitted.
    pub fn begin_submit(&mut self) -> Option<ResetPasswordRequest> {
        if !self.can_submit() {
            return None;
        }
        self.is_submitting = true;
        self.error = None;
        Some(ResetPasswordRequest {
            token: self.token.clone(),
            new_password: self.new_password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }

    pub fn finish_submit<N>(&mut self, result: Result<(), ApiFailure>, navigator: &mut N)
    where
        N: Navigator + ?Sized,
    {
        self.is_submitting = false;
        match result {
            Ok(()) => {
                info!("Password reset succeeded");
                navigator.navigate(RESET_SUCCESS_PATH);
            }
            Err(failure) => {
                self.error = Some(failure.message.unwrap_or_else(|| RESET_FAILURE_MESSAGE.to_string()));
            }
        }
    }

    pub async fn submit<A, N>(&mut self, api: &A, navigator: &mut N)
    where
        A: ResetPasswordApi + ?Sized,
        N: Navigator + ?Sized,
    {
        let request = match self.begin_submit() {
            Some(request) => request,
            None => return,
        };
        let result = api.reset_password(&request).await;
        self.finish_submit(result, navigator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubApi {
        result: Result<(), ApiFailure>,
        calls: AtomicUsize,
    }

    impl StubApi {
        fn new(result: Result<(), ApiFailure>) -> Self {
            StubApi {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ResetPasswordApi for StubApi {
        async fn reset_password(&self, _request: &ResetPasswordRequest) -> Result<(), ApiFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, path: &str) {
            self.visited.push(path.to_string());
        }
    }

    fn filled_form(password: &str, confirm: &str) -> PasswordResetForm {
        let mut form = PasswordResetForm::new("token-1");
        form.new_password = password.into();
        form.confirm_password = confirm.into();
        form
    }

    #[test]
    fn submit_disabled_until_valid() {
        assert!(!PasswordResetForm::new("t").can_submit());
        assert!(!filled_form("Passw0rd!", "").can_submit());
        assert!(!filled_form("Passw0rd!", "Passw0rd?").can_submit());
        assert!(!filled_form("password", "password").can_submit());
        assert!(filled_form("Passw0rd!", "Passw0rd!").can_submit());
    }

    #[test]
    fn field_errors() {
        let form = filled_form("short", "shorter");
        assert_eq!(form.password_error(), Some("Password must be at least 8 characters long"));
        assert_eq!(form.confirm_error(), Some(PASSWORD_MISMATCH_MESSAGE));

        let form = PasswordResetForm::new("t");
        assert_eq!(form.password_error(), None);
        assert_eq!(form.confirm_error(), None);
    }

    #[test]
    fn in_flight_request_blocks_resubmission() {
        let mut form = filled_form("Passw0rd!", "Passw0rd!");
        let request = form.begin_submit().unwrap();
        assert_eq!(request.token, "token-1");
        assert!(form.is_submitting());
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none());
    }

    #[tokio::test]
    async fn server_message_is_shown_verbatim() {
        let api = StubApi::new(Err(ApiFailure::with_message("Token expired")));
        let mut navigator = RecordingNavigator::default();
        let mut form = filled_form("Passw0rd!", "Passw0rd!");

        form.submit(&api, &mut navigator).await;

        assert_eq!(form.error(), Some("Token expired"));
        assert!(!form.is_submitting());
        assert!(navigator.visited.is_empty());
    }

    #[tokio::test]
    async fn failure_without_message_uses_default() {
        let api = StubApi::new(Err(ApiFailure::without_message()));
        let mut navigator = RecordingNavigator::default();
        let mut form = filled_form("Passw0rd!", "Passw0rd!");

        form.submit(&api, &mut navigator).await;

        assert_eq!(form.error(), Some(RESET_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn success_navigates_once() {
        let api = StubApi::new(Ok(()));
        let mut navigator = RecordingNavigator::default();
        let mut form = filled_form("Passw0rd!", "Passw0rd!");

        form.submit(&api, &mut navigator).await;

        assert_eq!(navigator.visited, vec![RESET_SUCCESS_PATH.to_string()]);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.error(), None);
    }

    #[tokio::test]
    async fn invalid_form_never_calls_api() {
        let api = StubApi::new(Ok(()));
        let mut navigator = RecordingNavigator::default();
        let mut form = filled_form("Passw0rd!", "different");

        form.submit(&api, &mut navigator).await;

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(navigator.visited.is_empty());
    }
}
