//! Driving port for signing in.
//!
//! The identity provider is external; inbound adapters only need a user id
//! for a set of credentials, so HTTP tests can swap in a double without any
//! provider wiring.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator accepting a single fixed account.
///
/// `admin` / `password` signs in as a fixed user id; anything else is
/// rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    fn check(credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            UserId::new(FIXTURE_USER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        Self::check(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn development_account_credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("admin", "password").expect("valid creds")
    }

    fn a_wrong_password() -> LoginCredentials {
        LoginCredentials::try_from_parts("admin", "wrong").expect("valid shape")
    }

    fn the_fixture_service_checks_them(credentials: LoginCredentials) -> Result<UserId, Error> {
        FixtureLoginService::check(&credentials)
    }

    fn the_fixed_user_id_is_returned(result: Result<UserId, Error>) {
        let id = result.expect("authentication succeeds");
        assert_eq!(id.to_string(), FIXTURE_USER_ID);
    }

    fn an_unauthorised_error_is_returned(result: Result<UserId, Error>) {
        let error = result.expect_err("authentication fails");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn development_account_signs_in() {
        let credentials = development_account_credentials();
        let result = the_fixture_service_checks_them(credentials);
        the_fixed_user_id_is_returned(result);
    }

    #[rstest]
    fn wrong_password_is_rejected() {
        let credentials = a_wrong_password();
        let result = the_fixture_service_checks_them(credentials);
        an_unauthorised_error_is_returned(result);
    }

    #[rstest]
    #[case("other", "password")]
    #[case("admin", "Password")]
    #[tokio::test]
    async fn only_the_fixed_account_is_accepted(#[case] username: &str, #[case] password: &str) {
        let credentials =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&credentials).await;
        an_unauthorised_error_is_returned(result);
    }
}
