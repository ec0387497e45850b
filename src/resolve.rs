//! Script source resolution.
//!
//! Turns classified references into raw source text: local assets are read
//! from the public directory, remote assets are fetched over HTTP, inline
//! code is passed through with `/_public` specifiers rewritten to the real
//! public directory so the bundler can resolve imports from the scratch
//! entry. All texts for a route are joined with `\n` in extraction order.

use std::path::Path;

use crate::core::BudgetError;
use crate::extract::ScriptRef;

/// Combined module body for one route, plus any degraded references.
#[derive(Debug)]
pub struct ResolvedSources {
    /// All resolved texts, joined with `\n` in extraction order.
    pub body: String,
    /// Route-scoped failures that degraded to empty text.
    pub degraded: Vec<BudgetError>,
}

/// Resolve every reference for a route into one combined module body.
///
/// Missing local assets and failed remote fetches contribute empty text
/// instead of aborting the route; their errors are returned alongside the
/// body so the caller can surface them.
pub async fn resolve_sources(
    refs: Vec<ScriptRef>,
    public_dir: &Path,
    client: &reqwest::Client,
) -> ResolvedSources {
    let mut sources = Vec::with_capacity(refs.len());
    let mut degraded = Vec::new();

    for script in refs {
        match resolve_one(script, public_dir, client).await {
            Ok(text) => sources.push(text),
            Err(err) => {
                sources.push(String::new());
                degraded.push(err);
            }
        }
    }

    ResolvedSources {
        body: sources.join("\n"),
        degraded,
    }
}

async fn resolve_one(
    script: ScriptRef,
    public_dir: &Path,
    client: &reqwest::Client,
) -> Result<String, BudgetError> {
    match script {
        ScriptRef::Local { path } => read_local_asset(public_dir, &path),
        ScriptRef::Remote { url } => http_text(client, &url).await,
        ScriptRef::Inline { code } => Ok(rewrite_public_specifiers(&code, public_dir)),
    }
}

/// Read a `/_public`-rooted script from the public asset directory.
fn read_local_asset(public_dir: &Path, path: &str) -> Result<String, BudgetError> {
    let file = public_dir.join(path.trim_start_matches('/'));
    std::fs::read_to_string(&file).map_err(|source| BudgetError::MissingAsset { path: file, source })
}

/// GET a URL and return the full response body as text.
///
/// Also used for the rendered-markup fetch; any transport failure or
/// non-2xx status maps to a route-scoped network error.
pub async fn http_text(client: &reqwest::Client, url: &str) -> Result<String, BudgetError> {
    let network = |detail: String| BudgetError::Network {
        url: url.to_string(),
        detail,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(network(format!("status {}", response.status())));
    }
    response.text().await.map_err(|e| network(e.to_string()))
}

/// Rewrite `/_public` URL prefixes inside inline code to the real public
/// directory, so imports resolve relative to the filesystem rather than
/// the dev server.
fn rewrite_public_specifiers(code: &str, public_dir: &Path) -> String {
    code.replace("/_public", &public_dir.to_string_lossy())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[tokio::test]
    async fn test_local_asset_reads_from_public_dir() {
        let temp = TempDir::new().unwrap();
        let public = temp.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(public.join("app.js"), "console.log('app')").unwrap();

        let refs = vec![ScriptRef::Local {
            path: "/app.js".to_string(),
        }];
        let resolved = resolve_sources(refs, &public, &client()).await;

        assert_eq!(resolved.body, "console.log('app')");
        assert!(resolved.degraded.is_empty());
    }

    #[tokio::test]
    async fn test_missing_asset_degrades_to_empty() {
        let temp = TempDir::new().unwrap();
        let refs = vec![
            ScriptRef::Local {
                path: "/gone.js".to_string(),
            },
            ScriptRef::Inline {
                code: "console.log(1)".to_string(),
            },
        ];
        let resolved = resolve_sources(refs, temp.path(), &client()).await;

        // Empty contribution, in order, with the error reported
        assert_eq!(resolved.body, "\nconsole.log(1)");
        assert_eq!(resolved.degraded.len(), 1);
        assert!(matches!(
            resolved.degraded[0],
            BudgetError::MissingAsset { .. }
        ));
    }

    #[tokio::test]
    async fn test_inline_specifier_rewrite() {
        let temp = TempDir::new().unwrap();
        let refs = vec![ScriptRef::Inline {
            code: "import { a } from '/_public/lib/a.mjs'".to_string(),
        }];
        let resolved = resolve_sources(refs, temp.path(), &client()).await;

        let expected = format!("import {{ a }} from '{}/lib/a.mjs'", temp.path().display());
        assert_eq!(resolved.body, expected);
    }

    #[tokio::test]
    async fn test_sources_join_in_extraction_order() {
        let temp = TempDir::new().unwrap();
        let public = temp.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(public.join("a.js"), "first()").unwrap();

        let refs = vec![
            ScriptRef::Local {
                path: "/a.js".to_string(),
            },
            ScriptRef::Inline {
                code: "second()".to_string(),
            },
        ];
        let resolved = resolve_sources(refs, &public, &client()).await;
        assert_eq!(resolved.body, "first()\nsecond()");
    }
}
