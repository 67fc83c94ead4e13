#[cfg(test)]
mod tests {

    use std::io::Write;
    use std::path::Path;

    use http::Method;
    use serial_test::serial;

    use crate::auth::credentials::AuthScheme;
    use crate::config::proc_loader::{file_to_config, parse_config};
    use crate::config::proc_validator::validate_service_config;
    use crate::ServiceConfig;

    #[tokio::test]
    #[serial]
    async fn bundled_config_is_valid() {
        let path = Path::new("api-agent.yaml");
        let service_config: ServiceConfig = file_to_config(path)
            .await
            .expect("api-agent.yaml must exist in repo root for tests");
        validate_service_config(&service_config).await.unwrap();
        assert_eq!(service_config.search.auth, AuthScheme::OAuth2);
        assert_eq!(service_config.search.method, Method::GET);
    }

    #[tokio::test]
    async fn minimal_config_gets_defaults() {
        let yaml = r#"
search:
  url: http://localhost:8080/search
"#;
        let service_config = parse_config(yaml.to_string()).await.unwrap();
        assert_eq!(service_config.settings.http_timeout_ms, Some(5000));
        assert_eq!(service_config.settings.logging.as_ref().unwrap().level, "info");
        assert_eq!(service_config.token_store.path, "api-agent-token.json");
        assert_eq!(service_config.search.auth, AuthScheme::None);
        assert!(service_config.authorization.is_none());
    }

    #[tokio::test]
    #[should_panic(expected = "config is not valid")]
    async fn oauth2_without_authorization_block_is_invalid() {
        let yaml = r#"
search:
  url: http://localhost:8080/search
  auth: oauth2
"#;
        parse_config(yaml.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn validation_errors_are_aggregated() {
        let yaml = r#"
settings:
  http_timeout_ms: 0
  server:
    host: 0.0.0.0
    port: http
authorization:
  url: token-server
search:
  url: ftp://localhost/search
  method: DELETE
  auth: basic
"#;
        let err = parse_config(yaml.to_string()).await.unwrap_err().to_string();
        for expected in [
            "settings.http_timeout_ms must be greater than 0",
            "settings.server.port 'http' is not a valid port",
            "authorization.url 'token-server' must start with http:// or https://",
            "authorization.username is required",
            "search.url 'ftp://localhost/search' must start with http:// or https://",
            "search.method 'DELETE' must be GET or POST",
            "search.auth is 'basic' but search.username is missing",
        ] {
            assert!(err.contains(expected), "missing '{}' in:\n{}", expected, err);
        }
    }

    #[tokio::test]
    #[serial]
    async fn env_vars_resolve_inside_config_file() {
        std::env::set_var("API_AGENT_TEST_SEARCH_HOST", "search.internal");
        std::env::remove_var("API_AGENT_TEST_TOKEN_PATH");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
token_store:
  path: ${{API_AGENT_TEST_TOKEN_PATH:/var/lib/api-agent/token.json}}
authorization:
  url: https://auth.example.com/token
  username: client
search:
  url: https://${{API_AGENT_TEST_SEARCH_HOST}}/v3/search
  auth: oauth
"#
        )
        .unwrap();

        let service_config = file_to_config(file.path()).await.unwrap();
        assert_eq!(service_config.token_store.path, "/var/lib/api-agent/token.json");
        assert_eq!(service_config.search.url, "https://search.internal/v3/search");
        assert_eq!(service_config.search.auth, AuthScheme::OAuth2);

        std::env::remove_var("API_AGENT_TEST_SEARCH_HOST");
    }
}
