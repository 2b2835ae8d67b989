//! Process-wide set of participating platforms.
//!
//! The registry maps each [`PlatformId`] to a "registered" flag. It is filled
//! once at start-up by [`init_builtin`] and read afterwards; reads take a
//! shared lock, registration an exclusive one.

use super::{Platform, PlatformContext, PlatformId, create_platform};
use crate::core::AixError;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::{LazyLock, Once, PoisonError, RwLock};
use strsim::levenshtein;
use tracing::debug;

/// Maximum edit distance, as a percentage of the input length, for a
/// "did you mean" suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);
static INIT: Once = Once::new();

/// Thread-safe set of registered platforms.
#[derive(Debug, Default)]
pub struct Registry {
    platforms: RwLock<BTreeMap<PlatformId, bool>>,
}

impl Registry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a platform by name.
    ///
    /// Fails for names outside the supported set and for platforms that are
    /// already registered.
    pub fn register(&self, name: &str) -> Result<PlatformId> {
        let id = PlatformId::from_name(name).ok_or_else(|| unknown_platform(name))?;
        let mut platforms = self.platforms.write().unwrap_or_else(PoisonError::into_inner);
        if platforms.get(&id).copied().unwrap_or(false) {
            return Err(AixError::PlatformAlreadyRegistered {
                name: id.as_str().to_string(),
            }
            .into());
        }
        platforms.insert(id, true);
        debug!("Registered platform {id}");
        Ok(id)
    }

    /// Whether `id` is registered
    #[must_use]
    pub fn get(&self, id: PlatformId) -> bool {
        let platforms = self.platforms.read().unwrap_or_else(PoisonError::into_inner);
        platforms.get(&id).copied().unwrap_or(false)
    }

    /// Registered platforms in [`PlatformId::ALL`] order
    #[must_use]
    pub fn all(&self) -> Vec<PlatformId> {
        let platforms = self.platforms.read().unwrap_or_else(PoisonError::into_inner);
        PlatformId::ALL
            .into_iter()
            .filter(|id| platforms.get(id).copied().unwrap_or(false))
            .collect()
    }

    /// Registered platforms whose availability check passes
    #[must_use]
    pub fn available(&self, ctx: &PlatformContext) -> Vec<Box<dyn Platform>> {
        self.all()
            .into_iter()
            .map(|id| create_platform(id, ctx))
            .filter(|platform| platform.is_available())
            .collect()
    }

    /// Turn a `--platform` value into the adapters to operate on.
    ///
    /// A named platform is returned alone, available or not. Without a name
    /// every available platform is returned; none available is an error.
    pub fn resolve_platforms(
        &self,
        flag: Option<&str>,
        ctx: &PlatformContext,
    ) -> Result<Vec<Box<dyn Platform>>> {
        if let Some(name) = flag.map(str::trim).filter(|n| !n.is_empty()) {
            let id = PlatformId::from_name(name)
                .filter(|id| self.get(*id))
                .ok_or_else(|| unknown_platform(name))?;
            return Ok(vec![create_platform(id, ctx)]);
        }

        let platforms = self.available(ctx);
        if platforms.is_empty() {
            return Err(AixError::NoPlatformsAvailable.into());
        }
        Ok(platforms)
    }
}

fn unknown_platform(name: &str) -> AixError {
    let lowered = name.to_ascii_lowercase();
    let suggestion = PlatformId::ALL
        .into_iter()
        .map(|id| (id, levenshtein(&lowered, id.as_str())))
        .filter(|(_, dist)| *dist <= lowered.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .min_by_key(|(_, dist)| *dist)
        .map(|(id, _)| id.as_str().to_string());
    AixError::UnknownPlatform {
        name: name.to_string(),
        suggestion,
    }
}

/// The process-wide registry.
#[must_use]
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Register every supported platform in the global registry, once.
pub fn init_builtin() {
    INIT.call_once(|| {
        for id in PlatformId::ALL {
            // Only this closure registers, and it runs once.
            let _ = GLOBAL.register(id.as_str());
        }
    });
}
