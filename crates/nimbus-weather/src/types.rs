use serde::de::IgnoredAny;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::locale::Translator;

/// A request for current conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub lang: Option<String>,
}

impl WeatherQuery {
    /// Build a query with the city and language case-folded.
    pub fn new(city: &str, lang: Option<&str>) -> Self {
        Self {
            city: city.to_lowercase(),
            lang: lang.map(str::to_lowercase),
        }
    }
}

/// Raw provider response. Every block and leaf is optional, and a value
/// of the wrong type decodes as `None`, so one odd field never fails the
/// whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<MainBlock>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind: Option<WindBlock>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Vec<ConditionBlock>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainBlock {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub humidity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub pressure: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindBlock {
    #[serde(default, deserialize_with = "lenient")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionBlock {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Int(i64),
    Float(f64),
    Invalid(IgnoredAny),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => None,
    })
}

// Integral floats such as `85.0` are accepted; fractional ones are not.
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Integer::deserialize(deserializer)? {
        Integer::Int(value) => Some(value),
        Integer::Float(value) if value.fract() == 0.0 => Some(value as i64),
        Integer::Float(_) | Integer::Invalid(_) => None,
    })
}

impl UpstreamPayload {
    fn main_field<T>(&self, field: impl FnOnce(&MainBlock) -> Option<T>) -> Option<T> {
        self.main.as_ref().and_then(field)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.main_field(|m| m.temp)
    }

    pub fn min_temperature(&self) -> Option<f64> {
        self.main_field(|m| m.temp_min)
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.main_field(|m| m.temp_max)
    }

    pub fn humidity(&self) -> Option<i64> {
        self.main_field(|m| m.humidity)
    }

    pub fn pressure(&self) -> Option<i64> {
        self.main_field(|m| m.pressure)
    }

    pub fn wind_speed(&self) -> Option<f64> {
        self.wind.as_ref().and_then(|w| w.speed)
    }

    pub fn wind_bearing(&self) -> Option<f64> {
        self.wind.as_ref().and_then(|w| w.deg)
    }

    /// Description of the first reported condition.
    pub fn description(&self) -> Option<&str> {
        self.weather
            .as_ref()
            .and_then(|conditions| conditions.first())
            .and_then(|c| c.description.as_deref())
    }
}

/// Output key names in the record's language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLabels {
    pub city_name: String,
    pub temperature: String,
    pub min_temperature: String,
    pub max_temperature: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub description: String,
}

impl FieldLabels {
    pub fn localized(translator: &Translator<'_>) -> Self {
        let t = |msgid: &str| translator.gettext(msgid).to_string();
        Self {
            city_name: t("city_name"),
            temperature: t("temperature"),
            min_temperature: t("min_temperature"),
            max_temperature: t("max_temperature"),
            humidity: t("humidity"),
            pressure: t("pressure"),
            wind_speed: t("wind_speed"),
            wind_direction: t("wind_direction"),
            description: t("description"),
        }
    }
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self::localized(&Translator::passthrough())
    }
}

/// Normalized, localized current conditions for one city.
///
/// Serializes as a flat JSON object whose keys come from `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city_name: String,
    pub temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub humidity: Option<i64>,
    pub pressure: Option<i64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: String,
    pub description: Option<String>,
    pub labels: FieldLabels,
}

impl Serialize for WeatherRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(9))?;
        map.serialize_entry(&self.labels.city_name, &self.city_name)?;
        map.serialize_entry(&self.labels.temperature, &self.temperature)?;
        map.serialize_entry(&self.labels.min_temperature, &self.min_temperature)?;
        map.serialize_entry(&self.labels.max_temperature, &self.max_temperature)?;
        map.serialize_entry(&self.labels.humidity, &self.humidity)?;
        map.serialize_entry(&self.labels.pressure, &self.pressure)?;
        map.serialize_entry(&self.labels.wind_speed, &self.wind_speed)?;
        map.serialize_entry(&self.labels.wind_direction, &self.wind_direction)?;
        map.serialize_entry(&self.labels.description, &self.description)?;
        map.end()
    }
}
