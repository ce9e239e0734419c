//! OAuth2 authentication management for Gmail API

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use std::path::Path;
use yup_oauth2::InstalledFlowReturnMethod;

use crate::error::{GmailError, Result};

/// Read/write access to messages and labels, no permanent deletion
pub const MODIFY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";

/// Scopes requested for the run
pub const REQUIRED_SCOPES: &[&str] = &[MODIFY_SCOPE];

/// Type alias for Gmail Hub to simplify type signatures
pub type GmailHub = Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// How the user hands the authorization code back during first-time consent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsentFlow {
    /// Browser redirect to a local web server on an ephemeral port
    #[default]
    LocalServer,
    /// Browser redirect to a local web server on a fixed port
    LocalServerPort(u16),
    /// Print the URL and read the pasted code from stdin
    Interactive,
}

impl ConsentFlow {
    fn return_method(self) -> InstalledFlowReturnMethod {
        match self {
            ConsentFlow::LocalServer => InstalledFlowReturnMethod::HTTPRedirect,
            ConsentFlow::LocalServerPort(port) => InstalledFlowReturnMethod::HTTPPortRedirect(port),
            ConsentFlow::Interactive => InstalledFlowReturnMethod::Interactive,
        }
    }
}

/// Initialize Gmail API hub with OAuth2 authentication
///
/// Cached tokens at `token_cache_path` are reused and refreshed; the consent
/// flow only runs when no usable token is stored.
///
/// # Arguments
/// * `client_secrets_path` - Path to the OAuth2 client secrets JSON file
/// * `token_cache_path` - Path where access tokens are persisted
/// * `flow` - How the consent flow receives the authorization code
pub async fn initialize_gmail_hub(
    client_secrets_path: &Path,
    token_cache_path: &Path,
    flow: ConsentFlow,
) -> Result<GmailHub> {
    let secret = yup_oauth2::read_application_secret(client_secrets_path)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to read client secrets: {}", e)))?;

    if let Some(parent) = token_cache_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(secret, flow.return_method())
        .persist_tokens_to_disk(token_cache_path)
        .build()
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    // Obtain the token up front so consent happens before any API call
    let _token = auth
        .token(REQUIRED_SCOPES)
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to obtain token: {}", e)))?;

    secure_token_file(token_cache_path).await?;

    // HTTP/1 works better with google-gmail1
    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| GmailError::AuthError(format!("Failed to load TLS roots: {}", e)))?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

/// Restrict the token file to owner read/write (0600)
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Windows relies on the profile directory ACLs
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_secure_token_file() {
        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), "{}").await.unwrap();

        secure_token_file(temp_file.path()).await.unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = tokio::fs::metadata(temp_file.path()).await.unwrap();
            assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_missing_client_secrets_is_auth_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = initialize_gmail_hub(
            &dir.path().join("missing.json"),
            &dir.path().join("token.json"),
            ConsentFlow::Interactive,
        )
        .await;

        assert!(matches!(result, Err(GmailError::AuthError(_))));
    }

    #[test]
    fn test_consent_flow_return_method() {
        assert!(matches!(
            ConsentFlow::default().return_method(),
            InstalledFlowReturnMethod::HTTPRedirect
        ));
        assert!(matches!(
            ConsentFlow::LocalServerPort(8080).return_method(),
            InstalledFlowReturnMethod::HTTPPortRedirect(8080)
        ));
        assert!(matches!(
            ConsentFlow::Interactive.return_method(),
            InstalledFlowReturnMethod::Interactive
        ));
    }

    #[test]
    fn test_scopes_constants() {
        assert_eq!(REQUIRED_SCOPES, &["https://www.googleapis.com/auth/gmail.modify"]);
    }
}
