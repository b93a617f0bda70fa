//! Retrieval pipeline: cache-aside lookup in front of the provider.

use std::sync::Arc;
use std::time::Duration;

use nimbus_core::{AppError, Config, Units};
use tracing::instrument;

use crate::cache::{cache_key, MemoryRecordCache, RecordCache};
use crate::compass::classify;
use crate::error::FailureResponse;
use crate::locale::{Catalog, LocaleResolver, Translator};
use crate::provider::WeatherProvider;
use crate::types::{FieldLabels, UpstreamPayload, WeatherQuery, WeatherRecord};

/// Language negotiation plus the catalogs it selects from.
#[derive(Debug, Clone)]
pub struct Localization {
    resolver: LocaleResolver,
    catalog: Catalog,
}

impl Localization {
    pub fn new(resolver: LocaleResolver, catalog: Catalog) -> Self {
        Self { resolver, catalog }
    }
}

pub struct WeatherService {
    provider: WeatherProvider,
    cache: Arc<dyn RecordCache>,
    localization: Option<Localization>,
    units: Units,
}

impl WeatherService {
    /// Without `localization`, records are English and keyed by city only.
    pub fn new(
        provider: WeatherProvider,
        cache: Arc<dyn RecordCache>,
        localization: Option<Localization>,
        units: Units,
    ) -> Self {
        Self {
            provider,
            cache,
            localization,
            units,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let provider = WeatherProvider::from_config(&config.weather)
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        let cache = MemoryRecordCache::new(
            config.weather.cache_capacity,
            Duration::from_secs(config.weather.cache_timeout_secs),
        );

        let localization = if config.locale.enabled {
            let catalog = Catalog::builtin().map_err(|e| AppError::Locale(e.to_string()))?;
            let resolver =
                LocaleResolver::new(&config.locale.default_language, &config.locale.languages);
            Some(Localization::new(resolver, catalog))
        } else {
            None
        };

        tracing::info!(
            "Weather service ready (ttl {}s, localization {})",
            config.weather.cache_timeout_secs,
            if localization.is_some() { "on" } else { "off" }
        );

        Ok(Self::new(provider, Arc::new(cache), localization, config.weather.units))
    }

    /// Current conditions in the language negotiated from `accept_language`.
    pub async fn current(
        &self,
        city: &str,
        accept_language: Option<&str>,
    ) -> Result<WeatherRecord, FailureResponse> {
        self.retrieve(city, None, accept_language).await
    }

    /// Current conditions in an explicitly requested language.
    pub async fn current_in(
        &self,
        city: &str,
        lang: &str,
        accept_language: Option<&str>,
    ) -> Result<WeatherRecord, FailureResponse> {
        self.retrieve(city, Some(lang), accept_language).await
    }

    /// Run the pipeline for one request.
    ///
    /// A cache hit is returned as stored: no upstream call, no
    /// re-translation, no TTL refresh. Failures are never cached.
    #[instrument(skip(self), level = "info")]
    pub async fn retrieve(
        &self,
        city: &str,
        lang: Option<&str>,
        accept_language: Option<&str>,
    ) -> Result<WeatherRecord, FailureResponse> {
        let query = WeatherQuery::new(city, lang);

        let language = self
            .localization
            .as_ref()
            .map(|l| l.resolver.resolve(query.lang.as_deref(), accept_language));

        let key = cache_key(&query.city, language.as_deref());

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cached);
        }
        tracing::debug!("Cache miss for {}", key);

        let translator = match (&self.localization, &language) {
            (Some(localization), Some(language)) => localization.catalog.translator(language),
            _ => Translator::passthrough(),
        };

        let payload = match self.provider.fetch(&query.city, self.units).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Upstream fetch for '{}' failed: {}", query.city, e);
                return Err(FailureResponse::from_error(&e, &translator));
            }
        };

        let record = build_record(&query.city, &payload, &translator);

        self.cache.set(&key, record.clone()).await;
        tracing::debug!("Cached {}", key);

        Ok(record)
    }
}

/// Normalize a provider payload into a localized record.
pub fn build_record(
    city: &str,
    payload: &UpstreamPayload,
    translator: &Translator<'_>,
) -> WeatherRecord {
    let direction = classify(payload.wind_bearing());

    WeatherRecord {
        city_name: translator.gettext(city).to_string(),
        temperature: payload.temperature(),
        min_temperature: payload.min_temperature(),
        max_temperature: payload.max_temperature(),
        humidity: payload.humidity(),
        pressure: payload.pressure(),
        wind_speed: payload.wind_speed(),
        wind_direction: translator.gettext(direction.label()).to_string(),
        description: payload
            .description()
            .map(|d| translator.gettext(d).to_string()),
        labels: FieldLabels::localized(translator),
    }
}
