//! End-to-end pipeline tests over a real temp directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io;
use std::path::Path;

use apigen::delegate::{ArtifactGenerator, FormatOptions};
use apigen::error::DelegateError;
use apigen::fsx::{FileStore, LocalFs};
use apigen::pipeline::{OutputLayout, Pipeline};
use apigen::{ApiDocument, Domain, GenerateError, ZodClientGenerator};

const SAMPLE_DOC: &str = r##"{
  "openapi": "3.1.0",
  "info": { "title": "Sample API", "version": "1.0.0" },
  "paths": {
    "/auth/login": {
      "post": {
        "requestBody": {
          "content": { "application/json": { "schema": {
            "type": "object",
            "properties": {
              "email": { "type": "string" },
              "password": { "type": "string" }
            },
            "required": ["email", "password"]
          } } }
        },
        "responses": {
          "200": { "content": { "application/json": { "schema": {
            "type": "object",
            "properties": { "token": { "type": "string" } },
            "required": ["token"]
          } } } }
        }
      }
    },
    "/chats": {
      "get": {
        "responses": {
          "200": { "content": { "application/json": { "schema": {
            "type": "array",
            "items": { "type": "object", "properties": { "id": { "type": "string" } }, "required": ["id"] }
          } } } }
        }
      },
      "post": {
        "requestBody": {
          "content": { "application/json": { "schema": {
            "type": "object",
            "properties": { "title": { "type": "string" } }
          } } }
        },
        "responses": {}
      }
    },
    "/health": {
      "get": { "responses": {} }
    },
    "/internal/debug": {
      "get": { "responses": {} }
    }
  }
}"##;

fn pipeline_at(root: &Path) -> Pipeline<ZodClientGenerator, LocalFs> {
    Pipeline::new(
        ZodClientGenerator,
        LocalFs,
        OutputLayout::new(root),
        FormatOptions::default(),
    )
}

#[tokio::test]
async fn test_run_writes_three_modules_per_domain_and_no_temp() {
    let dir = tempfile::tempdir().unwrap();
    let doc = ApiDocument::from_json(SAMPLE_DOC).unwrap();
    let report = pipeline_at(dir.path()).run(&doc).await.unwrap();

    assert_eq!(report.generated, vec![Domain::Auth, Domain::Chat]);

    for domain in ["auth", "chat"] {
        assert!(dir.path().join(format!("schemas/{domain}.schemas.ts")).is_file());
        assert!(dir.path().join(format!("clients/{domain}.client.ts")).is_file());
        assert!(dir.path().join(format!("types/{domain}.types.ts")).is_file());
        assert!(!dir.path().join(format!("temp-{domain}.ts")).exists());
        assert!(!dir.path().join(format!("schemas/{domain}.schemas.ts.tmp")).exists());
    }

    // Excluded and endpoint-less domains never produce files.
    for domain in ["user", "system", "shared"] {
        assert!(!dir.path().join(format!("clients/{domain}.client.ts")).exists());
    }
}

#[tokio::test]
async fn test_generated_module_contents() {
    let dir = tempfile::tempdir().unwrap();
    let doc = ApiDocument::from_json(SAMPLE_DOC).unwrap();
    pipeline_at(dir.path()).run(&doc).await.unwrap();

    let schemas = std::fs::read_to_string(dir.path().join("schemas/auth.schemas.ts")).unwrap();
    assert!(schemas.starts_with("import { z } from \"zod\";"));
    assert!(schemas.contains("const postAuthLoginBodySchema = z.object({"));
    assert!(schemas.contains("export { postAuthLoginBodySchema };"));

    let client = std::fs::read_to_string(dir.path().join("clients/auth.client.ts")).unwrap();
    assert!(client.contains("import { z } from \"zod\";"));
    assert!(client.contains("const authEndpoints = makeApi(["));
    assert!(client.contains("import { postAuthLoginBodySchema } from \"./auth.schemas\";"));
    assert!(client.contains("export const authApi = new Zodios(authEndpoints);"));
    assert!(client.contains("export function createAuthApiClient"));

    let types = std::fs::read_to_string(dir.path().join("types/auth.types.ts")).unwrap();
    assert!(types.contains("export interface AuthPostLoginRequest {"));
    assert!(types.contains("  email: string;"));
    assert!(types.contains("export interface AuthPostLoginResponse {"));

    // The chat GET has no request body; its array response still types out.
    let chat_types = std::fs::read_to_string(dir.path().join("types/chat.types.ts")).unwrap();
    assert!(chat_types.contains("export type ChatGetChatsResponse = { id: string }[];"));
}

#[tokio::test]
async fn test_document_with_only_excluded_paths_generates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let doc = ApiDocument::from_json(
        r#"{ "paths": { "/health": { "get": { "responses": {} } } } }"#,
    )
    .unwrap();
    let report = pipeline_at(dir.path()).run(&doc).await.unwrap();
    assert!(report.generated.is_empty());
    assert!(!dir.path().join("schemas").exists());
}

/// Delegate that always fails, for exercising the error path.
#[derive(Debug, Clone, Copy)]
struct FailingGenerator;

impl ArtifactGenerator for FailingGenerator {
    async fn generate(
        &self,
        _document: &ApiDocument,
        _out_path: &Path,
        _options: &FormatOptions,
    ) -> Result<(), DelegateError> {
        Err(DelegateError::new("simulated delegate crash"))
    }
}

#[tokio::test]
async fn test_failing_delegate_reports_all_domains_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let doc = ApiDocument::from_json(SAMPLE_DOC).unwrap();
    let pipeline = Pipeline::new(
        FailingGenerator,
        LocalFs,
        OutputLayout::new(dir.path()),
        FormatOptions::default(),
    );

    let err = pipeline.run(&doc).await.unwrap_err();
    match err {
        GenerateError::Run {
            attempted,
            failures,
        } => {
            assert_eq!(attempted, 2);
            let domains: Vec<Domain> = failures.iter().map(|f| f.domain).collect();
            assert_eq!(domains, vec![Domain::Auth, Domain::Chat]);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(!dir.path().join("clients/auth.client.ts").exists());
    assert!(!dir.path().join("temp-auth.ts").exists());
}

/// Filesystem that fails reads of the chat temp artifact, simulating a
/// failure between delegation and splitting.
#[derive(Debug, Clone, Copy)]
struct ChatReadFailFs;

impl FileStore for ChatReadFailFs {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if path.to_string_lossy().contains("temp-chat") {
            return Err(io::Error::other("simulated read failure"));
        }
        LocalFs.read_to_string(path).await
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        LocalFs.write(path, contents).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        LocalFs.remove_file(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        LocalFs.rename(from, to).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        LocalFs.create_dir_all(path).await
    }
}

#[tokio::test]
async fn test_artifact_read_failure_still_cleans_temp_and_isolates_domain() {
    let dir = tempfile::tempdir().unwrap();
    let doc = ApiDocument::from_json(SAMPLE_DOC).unwrap();
    let pipeline = Pipeline::new(
        ZodClientGenerator,
        ChatReadFailFs,
        OutputLayout::new(dir.path()),
        FormatOptions::default(),
    );

    let err = pipeline.run(&doc).await.unwrap_err();
    match err {
        GenerateError::Run { failures, .. } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].domain, Domain::Chat);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The failing domain's temp artifact was still cleaned up, and no
    // partial triple was left behind.
    assert!(!dir.path().join("temp-chat.ts").exists());
    assert!(!dir.path().join("clients/chat.client.ts").exists());
    assert!(!dir.path().join("schemas/chat.schemas.ts").exists());
    assert!(!dir.path().join("types/chat.types.ts").exists());

    // The auth domain was unaffected by chat's failure.
    assert!(dir.path().join("clients/auth.client.ts").is_file());
    assert!(!dir.path().join("temp-auth.ts").exists());
}
