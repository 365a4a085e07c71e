//! Bootstrap sequence: references → validated addon set → serve hand-off.
//!
//! Loading is all-or-nothing: a host serving an incomplete or inconsistent
//! addon set is worse than refusing to start, so the first failure aborts the
//! whole bootstrap and the process exits non-zero.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use armature_core::{ADDON_API_MAJOR, Addon};

use crate::config::{OptionsLoader, ServeOptions};
use crate::error::{BootstrapError, BootstrapResult};
use crate::logging;
use crate::resolver::AddonResolver;
use crate::serve::AddonServer;

// ─── StartArgs ────────────────────────────────────────────────────────────────

/// Process start arguments, decoded from a single JSON argument.
///
/// ```json
/// { "files": ["iptv-example", "worker-example"], "opts": { "port": 8080 } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartArgs {
    /// External addon references, resolved in order.
    #[serde(default)]
    pub files: Vec<String>,
    /// Runtime configuration overrides, highest precedence.
    #[serde(default)]
    pub opts: Value,
}

impl StartArgs {
    /// Parses the JSON-encoded argument form.
    pub fn from_json(raw: &str) -> BootstrapResult<Self> {
        serde_json::from_str(raw).map_err(|e| BootstrapError::Args(e.to_string()))
    }
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Resolves every reference into a validated addon, preserving order.
///
/// Each addon passes the setup-time gates before it is accepted: props
/// validation and the semver major-version parse. A major version other than
/// [`ADDON_API_MAJOR`] is logged but not rejected, so hosts can opt into a
/// hard gate themselves. A composite contributes itself, not an expansion of
/// its children.
///
/// # Errors
///
/// The first load, validation, or version-parse failure aborts the whole
/// call — there is no partial-success mode.
pub async fn load_addons(
    resolver: &dyn AddonResolver,
    references: &[String],
) -> BootstrapResult<Vec<Arc<Addon>>> {
    let mut addons = Vec::with_capacity(references.len());

    for reference in references {
        let addon = resolver.resolve(reference).await?;
        addon.validate()?;
        let major = addon.major_version()?;
        if major != ADDON_API_MAJOR {
            warn!(
                addon = %addon.id(),
                addon_major = major,
                host_major = ADDON_API_MAJOR,
                "Addon major version differs from the host API — behaviour may be undefined"
            );
        }
        info!(
            addon = %addon.id(),
            version = %addon.version(),
            kind = %addon.kind(),
            children = addon.addons().len(),
            "Addon loaded"
        );
        addons.push(Arc::new(addon));
    }

    Ok(addons)
}

// ─── Entry points ─────────────────────────────────────────────────────────────

/// Runs the bootstrap sequence and hands control to the server.
///
/// Merges options (discovered file < environment < `args.opts`), initialises
/// logging, loads the addon set, and calls [`AddonServer::serve`] — which
/// does not return until the host shuts down.
pub async fn start(
    resolver: &dyn AddonResolver,
    server: &dyn AddonServer,
    args: StartArgs,
) -> BootstrapResult<()> {
    let options: ServeOptions = OptionsLoader::new().overrides(args.opts).load()?;
    logging::init_from_config(&options.logging);

    let addons = load_addons(resolver, &args.files).await?;
    info!(count = addons.len(), "Addon set complete, handing off to server");

    server.serve(addons, options).await
}

/// Process entry: parses `argv[1]` as [`StartArgs`] and runs [`start`].
///
/// On any failure the error is reported and the process exits with status 1;
/// after a clean server shutdown it exits with status 0.
pub async fn run(resolver: &dyn AddonResolver, server: &dyn AddonServer) -> ! {
    let raw = std::env::args().nth(1).unwrap_or_else(|| "{}".to_string());
    let args = match StartArgs::from_json(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match start(resolver, server, args).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
