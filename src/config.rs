//! # Emitter configuration.
//!
//! Provides [`EmitterConfig`], the per-emitter settings.
//!
//! Config is used in two ways:
//! 1. **Emitter creation**: `Emitter::with_config(config)` (or `Emitter::named(label)`)
//! 2. **Diagnostics**: `label` is attached to every tracing event the emitter records
//!
//! ## Defaults
//! - `label = "emitter"`
//! - `prune_empty = true` (a tier's storage is dropped with its last listener)

use std::borrow::Cow;

/// Settings for one [`Emitter`](crate::Emitter).
///
/// ## Field semantics
/// - `label`: name recorded in tracing fields (`emitter = ...`)
/// - `prune_empty`: drop empty `(event, priority)` storage after removals
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Name used in logs.
    pub label: Cow<'static, str>,

    /// Whether to free a tier's storage once its last listener is removed.
    ///
    /// Keep `false` for emitters whose listeners churn on a hot path.
    pub prune_empty: bool,
}

impl EmitterConfig {
    /// Default configuration with the given label.
    #[must_use]
    pub fn named(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

impl Default for EmitterConfig {
    /// Default configuration:
    ///
    /// - `label = "emitter"`
    /// - `prune_empty = true`
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("emitter"),
            prune_empty: true,
        }
    }
}
