//! Request Classification
//!
//! Maps an intercepted request to exactly one strategy, first-match-wins on
//! a fixed ordered list of predicates. Classification is total and pure:
//! it never errors, has no side effects, and depends only on the request's
//! method, URL and destination headers, so a key can never be written under
//! one namespace and read under another.

use url::Url;

use crate::config::Config;
use crate::models::Request;

/// Image and font extensions served cache-first.
const IMAGE_FONT_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "avif", "svg", "ico", "bmp", "woff", "woff2", "ttf",
    "otf", "eot",
];

/// Script and stylesheet extensions served cache-first with revalidation
/// when same-origin.
const SCRIPT_STYLE_EXTENSIONS: &[&str] = &["js", "mjs", "css"];

// == Route Class ==
/// The strategy a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Pass through to the network untouched, no caching
    Bypass,
    /// Cache-First against the images namespace
    Images,
    /// Cache-First with background revalidation against the static namespace
    StaticAsset,
    /// Network-First with timeout against the api namespace
    Api,
    /// Network-First with application-shell fallback (reads static, never writes)
    Navigation,
    /// Network-First, generic, against the runtime namespace
    Runtime,
}

// == Classify ==
/// Classifies a request. Unmatched requests always fall through to
/// [`RouteClass::Runtime`].
pub fn classify(request: &Request, config: &Config) -> RouteClass {
    // 1. Only GET responses are ever cached
    if request.method != "GET" {
        return RouteClass::Bypass;
    }

    // 2. Only http(s) traffic is interceptable
    if !matches!(request.url.scheme(), "http" | "https") {
        return RouteClass::Bypass;
    }

    // 3. Images and fonts
    let extension = path_extension(&request.url);
    if let Some(ext) = extension.as_deref() {
        if IMAGE_FONT_EXTENSIONS.contains(&ext) {
            return RouteClass::Images;
        }

        // 4. Same-origin scripts and stylesheets
        if SCRIPT_STYLE_EXTENSIONS.contains(&ext) && same_origin(&request.url, &config.app_origin)
        {
            return RouteClass::StaticAsset;
        }
    }

    // 5. Known API host or API path marker
    let is_api_host = request
        .url
        .host_str()
        .map(|host| config.api_hosts.iter().any(|h| h == host))
        .unwrap_or(false);
    if is_api_host || request.url.path().contains(&config.api_path_marker) {
        return RouteClass::Api;
    }

    // 6. Top-level document loads
    if request.is_navigation() {
        return RouteClass::Navigation;
    }

    // 7. Everything else
    RouteClass::Runtime
}

/// Lowercased extension of the URL path's final segment, if any.
fn path_extension(url: &Url) -> Option<String> {
    let last_segment = url.path().rsplit('/').next()?;
    let (_, ext) = last_segment.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Scheme, host and effective port all match.
fn same_origin(url: &Url, origin: &Url) -> bool {
    url.scheme() == origin.scheme()
        && url.host_str() == origin.host_str()
        && url.port_or_known_default() == origin.port_or_known_default()
}
