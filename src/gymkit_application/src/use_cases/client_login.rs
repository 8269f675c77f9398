use secrecy::Secret;

use gymkit_core::{
    ClientStore, ClientStoreError, CredentialHasher, PasswordHashError, RefreshTokenStore,
    Role, TokenIssuer,
};

use crate::use_cases::{
    issue_session::{IssueSessionError, issue_session},
    session::LoginSession,
};

/// Error types specific to client login
#[derive(Debug, thiserror::Error)]
pub enum ClientLoginError {
    /// Unknown name and wrong password are deliberately collapsed into one
    /// variant so the response cannot be used to enumerate client names.
    #[error("Incorrect name or password")]
    InvalidCredentials,
    #[error("Client store error: {0}")]
    ClientStoreError(#[from] ClientStoreError),
    #[error("Password hashing error: {0}")]
    PasswordHashError(#[from] PasswordHashError),
    #[error("Session error: {0}")]
    IssueSessionError(#[from] IssueSessionError),
}

/// Client login use case - verifies name/password credentials and issues a
/// session token pair.
pub struct ClientLoginUseCase<CS, H, I, R>
where
    CS: ClientStore,
    H: CredentialHasher,
    I: TokenIssuer,
    R: RefreshTokenStore,
{
    client_store: CS,
    hasher: H,
    issuer: I,
    refresh_tokens: R,
}

impl<CS, H, I, R> ClientLoginUseCase<CS, H, I, R>
where
    CS: ClientStore,
    H: CredentialHasher,
    I: TokenIssuer,
    R: RefreshTokenStore,
{
    pub fn new(client_store: CS, hasher: H, issuer: I, refresh_tokens: R) -> Self {
        Self {
            client_store,
            hasher,
            issuer,
            refresh_tokens,
        }
    }

    #[tracing::instrument(name = "ClientLoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        name: &str,
        password: Secret<String>,
    ) -> Result<LoginSession, ClientLoginError> {
        let Some(client) = self.client_store.find_by_name(name).await? else {
            return Err(ClientLoginError::InvalidCredentials);
        };

        // A client record created without credentials cannot log in.
        let Some(stored_hash) = client.password_hash() else {
            return Err(ClientLoginError::InvalidCredentials);
        };

        if !self.hasher.verify(&password, stored_hash).await? {
            return Err(ClientLoginError::InvalidCredentials);
        }

        let tokens =
            issue_session(&self.issuer, &self.refresh_tokens, client.id(), Role::Client).await?;

        Ok(LoginSession {
            tokens,
            user: client.profile(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use secrecy::ExposeSecret;
    use tokio::sync::RwLock;

    use gymkit_core::{
        Client, ClientUpdate, Password, PrincipalId, RefreshRecord, RefreshTokenStoreError,
        TokenIssueError,
    };

    use super::*;

    #[derive(Clone)]
    struct MockClientStore {
        client: Client,
    }

    #[async_trait::async_trait]
    impl ClientStore for MockClientStore {
        async fn insert(&self, _client: Client) -> Result<(), ClientStoreError> {
            unimplemented!()
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientStoreError> {
            if self.client.name() == name {
                Ok(Some(self.client.clone()))
            } else {
                Ok(None)
            }
        }

        async fn find_by_id(&self, _id: &PrincipalId) -> Result<Option<Client>, ClientStoreError> {
            unimplemented!()
        }

        async fn list_by_trainer(
            &self,
            _trainer_id: &PrincipalId,
        ) -> Result<Vec<Client>, ClientStoreError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _id: &PrincipalId,
            _update: ClientUpdate,
        ) -> Result<Client, ClientStoreError> {
            unimplemented!()
        }

        async fn delete(&self, _id: &PrincipalId) -> Result<(), ClientStoreError> {
            unimplemented!()
        }

        async fn append_workout(
            &self,
            _id: &PrincipalId,
            _date: String,
            _minutes: u32,
        ) -> Result<Client, ClientStoreError> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct PlaintextHasher;

    #[async_trait::async_trait]
    impl CredentialHasher for PlaintextHasher {
        async fn hash(&self, password: &Password) -> Result<Secret<String>, PasswordHashError> {
            Ok(Secret::new(format!(
                "hashed:{}",
                password.as_ref().expose_secret()
            )))
        }

        async fn verify(
            &self,
            candidate: &Secret<String>,
            stored_hash: &Secret<String>,
        ) -> Result<bool, PasswordHashError> {
            Ok(stored_hash.expose_secret() == &format!("hashed:{}", candidate.expose_secret()))
        }
    }

    #[derive(Clone, Default)]
    struct StubTokenIssuer {
        minted: Arc<AtomicU64>,
    }

    impl TokenIssuer for StubTokenIssuer {
        fn issue_access_token(
            &self,
            principal_id: &PrincipalId,
            role: Role,
        ) -> Result<String, TokenIssueError> {
            Ok(format!("access|{principal_id}|{role}"))
        }

        fn mint_refresh_token(&self) -> (String, i64) {
            let n = self.minted.fetch_add(1, Ordering::SeqCst);
            (format!("refresh-{n}"), i64::MAX)
        }
    }

    #[derive(Clone, Default)]
    struct MockRefreshTokenStore {
        records: Arc<RwLock<HashMap<String, RefreshRecord>>>,
    }

    #[async_trait::async_trait]
    impl RefreshTokenStore for MockRefreshTokenStore {
        async fn put(
            &self,
            token: String,
            record: RefreshRecord,
        ) -> Result<(), RefreshTokenStoreError> {
            self.records.write().await.insert(token, record);
            Ok(())
        }

        async fn consume(
            &self,
            token: &str,
        ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError> {
            Ok(self.records.write().await.remove(token))
        }
    }

    fn stored_client() -> Client {
        Client::new(
            "alex".to_owned(),
            PrincipalId::new_trainer(),
            Some(Secret::new("hashed:correct".to_owned())),
        )
    }

    fn use_case(
        client: Client,
    ) -> (
        ClientLoginUseCase<MockClientStore, PlaintextHasher, StubTokenIssuer, MockRefreshTokenStore>,
        MockRefreshTokenStore,
    ) {
        let refresh_store = MockRefreshTokenStore::default();
        let use_case = ClientLoginUseCase::new(
            MockClientStore { client },
            PlaintextHasher,
            StubTokenIssuer::default(),
            refresh_store.clone(),
        );
        (use_case, refresh_store)
    }

    #[tokio::test]
    async fn valid_credentials_yield_token_pair_and_sanitized_user() {
        let client = stored_client();
        let client_id = client.id().clone();
        let (use_case, refresh_store) = use_case(client);

        let session = use_case
            .execute("alex", Secret::new("correct".to_owned()))
            .await
            .unwrap();

        assert!(!session.tokens.access_token.is_empty());
        assert_eq!(session.user.id, client_id);
        assert_eq!(session.user.role, Role::Client);

        // The refresh record is bound to the authenticated principal.
        let record = refresh_store
            .consume(&session.tokens.refresh_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.principal_id, client_id);
        assert_eq!(record.role, Role::Client);
    }

    #[tokio::test]
    async fn unknown_name_and_wrong_password_are_indistinguishable() {
        let (use_case, _) = use_case(stored_client());

        let unknown = use_case
            .execute("nobody", Secret::new("correct".to_owned()))
            .await
            .unwrap_err();
        let wrong = use_case
            .execute("alex", Secret::new("incorrect".to_owned()))
            .await
            .unwrap_err();

        assert!(matches!(unknown, ClientLoginError::InvalidCredentials));
        assert!(matches!(wrong, ClientLoginError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn client_without_credentials_cannot_log_in() {
        let client = Client::new("alex".to_owned(), PrincipalId::new_trainer(), None);
        let (use_case, _) = use_case(client);

        let result = use_case
            .execute("alex", Secret::new("anything".to_owned()))
            .await;

        assert!(matches!(result, Err(ClientLoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn user_payload_contains_no_password_field() {
        let (use_case, _) = use_case(stored_client());

        let session = use_case
            .execute("alex", Secret::new("correct".to_owned()))
            .await
            .unwrap();

        let payload = serde_json::to_value(&session.user).unwrap();
        let object = payload.as_object().unwrap();
        assert!(!object.keys().any(|k| k.to_lowercase().contains("password")));
    }
}
