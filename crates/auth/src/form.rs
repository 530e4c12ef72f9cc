//! Login / register form flow.
//!
//! Auth failures surface inline as form notices and never escape to crash
//! navigation; a successful registration switches back to login mode and
//! tells the user to confirm their email.

use std::sync::Arc;

use supplyline_backend::{AuthApi, Identity, NewUserAttributes};

use crate::role::Role;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Inline banner shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    Success(String),
    Error(String),
}

/// What the caller should do after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Signed in; navigate to the home view (role routing happens there).
    SignedIn(Identity),
    /// Registered; the form has switched to login mode.
    Registered,
    /// The service rejected the submission; a notice explains why.
    Failed,
}

/// State of the combined login/register form.
pub struct AuthForm {
    auth: Arc<dyn AuthApi>,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    notice: Option<FormNotice>,
}

impl AuthForm {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self {
            auth,
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
            full_name: String::new(),
            role: Role::Staff,
            notice: None,
        }
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.notice = None;
    }

    /// Submit the form in its current mode.
    pub async fn submit(&mut self) -> AuthOutcome {
        self.notice = None;
        match self.mode {
            AuthMode::Login => self.submit_login().await,
            AuthMode::Register => self.submit_register().await,
        }
    }

    async fn submit_login(&mut self) -> AuthOutcome {
        match self.auth.sign_in(&self.email, &self.password).await {
            Ok(identity) => AuthOutcome::SignedIn(identity),
            Err(err) => {
                self.notice = Some(FormNotice::Error(err.to_string()));
                AuthOutcome::Failed
            }
        }
    }

    async fn submit_register(&mut self) -> AuthOutcome {
        let attributes = NewUserAttributes {
            full_name: self.full_name.clone(),
            role: self.role.as_str().to_string(),
        };
        match self
            .auth
            .sign_up(&self.email, &self.password, attributes)
            .await
        {
            Ok(_) => {
                self.notice = Some(FormNotice::Success(
                    "Registration successful! Please check your email to confirm your account."
                        .to_string(),
                ));
                self.full_name.clear();
                self.password.clear();
                self.role = Role::Staff;
                self.mode = AuthMode::Login;
                AuthOutcome::Registered
            }
            Err(err) => {
                self.notice = Some(FormNotice::Error(err.to_string()));
                AuthOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplyline_backend::MemoryBackend;

    fn form_with(backend: &Arc<MemoryBackend>) -> AuthForm {
        AuthForm::new(backend.clone())
    }

    #[tokio::test]
    async fn register_then_login() {
        let backend = Arc::new(MemoryBackend::new());
        let mut form = form_with(&backend);

        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::Register);
        form.email = "lead@example.com".into();
        form.password = "hunter2".into();
        form.full_name = "Jess Cruz".into();
        form.role = Role::Manager;

        assert_eq!(form.submit().await, AuthOutcome::Registered);
        assert_eq!(form.mode, AuthMode::Login);
        assert!(form.full_name.is_empty());
        assert!(matches!(form.notice(), Some(FormNotice::Success(_))));

        form.password = "hunter2".into();
        let outcome = form.submit().await;
        let AuthOutcome::SignedIn(identity) = outcome else {
            panic!("expected sign-in, got {outcome:?}");
        };
        assert_eq!(identity.email, "lead@example.com");
    }

    #[tokio::test]
    async fn bad_credentials_surface_inline() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_user("ops@example.com", "hunter2");

        let mut form = form_with(&backend);
        form.email = "ops@example.com".into();
        form.password = "wrong".into();

        assert_eq!(form.submit().await, AuthOutcome::Failed);
        assert_eq!(
            form.notice(),
            Some(&FormNotice::Error("Invalid login credentials".to_string()))
        );
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_user("ops@example.com", "hunter2");

        let mut form = form_with(&backend);
        form.toggle_mode();
        form.email = "ops@example.com".into();
        form.password = "hunter2".into();
        form.full_name = "Someone Else".into();

        assert_eq!(form.submit().await, AuthOutcome::Failed);
        assert!(matches!(form.notice(), Some(FormNotice::Error(_))));
    }
}
