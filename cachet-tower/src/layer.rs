use std::time::Duration;

use cachet::{
    Config, ConfigBuilder, ConfigError, Engine, ErrorPredicate, ExpiryResolver, KeyResolver,
    Settings,
};
use cachet_backend::Backend;
use cachet_moka::MokaBackend;
use http::header::HeaderName;
use tower::Layer;

use crate::service::CacheService;

/// Capacity of the in-memory backend used when none is configured.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Tower layer adding response caching to a service.
///
/// Every service produced by one layer shares the same backend and write
/// queue. Separate layers never wait on each other's writes, even over the
/// same backend.
pub struct Cache<B> {
    engine: Engine<B>,
}

impl<B> Clone for Cache<B> {
    fn clone(&self) -> Self {
        Cache {
            engine: self.engine.clone(),
        }
    }
}

impl<B> Cache<B>
where
    B: Backend + 'static,
{
    /// Layer over `backend` with default configuration.
    pub fn new(backend: B) -> Self {
        Cache {
            engine: Engine::new(backend, Config::default()),
        }
    }

    /// Decision engine shared by the layer's services.
    pub fn engine(&self) -> &Engine<B> {
        &self.engine
    }
}

impl Cache<MokaBackend> {
    /// Builder falling back to an in-memory backend of [`DEFAULT_CAPACITY`]
    /// entries unless [`backend`](CacheBuilder::backend) is called.
    pub fn builder() -> CacheBuilder<DefaultBackend> {
        CacheBuilder {
            backend: DefaultBackend,
            config: Config::builder(),
        }
    }
}

impl<S, B> Layer<S> for Cache<B> {
    type Service = CacheService<S, B>;

    fn layer(&self, upstream: S) -> Self::Service {
        CacheService::new(upstream, self.engine.clone())
    }
}

/// Backend of a [`CacheBuilder`] that has not been given one.
///
/// The in-memory backend is only created by [`CacheBuilder::build`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBackend;

/// Builder for [`Cache`].
///
/// Values set here win over [`settings`](Self::settings), which win over
/// built-in defaults.
pub struct CacheBuilder<B> {
    backend: B,
    config: ConfigBuilder,
}

impl<B> CacheBuilder<B>
where
    B: Backend + 'static,
{
    /// Builder over `backend`.
    pub fn new(backend: B) -> Self {
        CacheBuilder {
            backend,
            config: Config::builder(),
        }
    }

    /// Resolves the configuration and builds the layer.
    pub fn build(self) -> Result<Cache<B>, ConfigError> {
        Ok(Cache {
            engine: Engine::new(self.backend, self.config.build()?),
        })
    }
}

impl CacheBuilder<DefaultBackend> {
    /// Resolves the configuration and builds the layer over a new in-memory
    /// backend.
    pub fn build(self) -> Result<Cache<MokaBackend>, ConfigError> {
        let backend = MokaBackend::builder().max_entries(DEFAULT_CAPACITY).build();
        self.backend(backend).build()
    }
}

impl<B> CacheBuilder<B> {
    /// Storage for cached responses.
    pub fn backend<NB: Backend + 'static>(self, backend: NB) -> CacheBuilder<NB> {
        CacheBuilder {
            backend,
            config: self.config,
        }
    }

    /// Decides which responses are errors and must not be stored.
    pub fn is_error<P: ErrorPredicate + 'static>(self, predicate: P) -> Self {
        CacheBuilder {
            config: self.config.error_predicate(predicate),
            ..self
        }
    }

    /// Derives the cache key of a request.
    pub fn cache_key<R: KeyResolver + 'static>(self, resolver: R) -> Self {
        CacheBuilder {
            config: self.config.key_resolver(resolver),
            ..self
        }
    }

    /// Resolves the expiry of a response in seconds.
    pub fn expiry<R: ExpiryResolver + 'static>(self, resolver: R) -> Self {
        CacheBuilder {
            config: self.config.expiry_resolver(resolver),
            ..self
        }
    }

    /// Expiry of responses that resolve to none or zero.
    pub fn default_expiry(self, expiry: Duration) -> Self {
        CacheBuilder {
            config: self.config.default_expiry(expiry),
            ..self
        }
    }

    /// Name of the cache status header (default `x-cache-status`).
    pub fn status_header(self, name: HeaderName) -> Self {
        CacheBuilder {
            config: self.config.status_header(name),
            ..self
        }
    }

    /// Name of the cache key header (default `x-cache-key`).
    pub fn key_header(self, name: HeaderName) -> Self {
        CacheBuilder {
            config: self.config.key_header(name),
            ..self
        }
    }

    /// Suffix of the headers entry key (default `:headers`).
    pub fn headers_suffix(self, suffix: impl AsRef<str>) -> Self {
        CacheBuilder {
            config: self.config.headers_suffix(suffix.as_ref()),
            ..self
        }
    }

    /// Fallback values loaded from a settings file.
    pub fn settings(self, settings: Settings) -> Self {
        CacheBuilder {
            config: self.config.settings(settings),
            ..self
        }
    }
}
