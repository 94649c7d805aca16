//! Currency and location context for the overlay and clock

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

impl Currency {
    fn new(code: &str, symbol: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    pub fn usd() -> Self {
        Self::new("USD", "$", "US Dollar")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

/// The most widely used currencies, most common first.
pub const GLOBAL_CURRENCIES: [(&str, &str, &str); 5] = [
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("CNY", "¥", "Chinese Yuan"),
    ("JPY", "¥", "Japanese Yen"),
    ("GBP", "£", "British Pound"),
];

const COUNTRY_CURRENCIES: [(&str, (&str, &str, &str)); 18] = [
    ("US", ("USD", "$", "US Dollar")),
    ("CA", ("CAD", "C$", "Canadian Dollar")),
    ("GB", ("GBP", "£", "British Pound")),
    ("DE", ("EUR", "€", "Euro")),
    ("FR", ("EUR", "€", "Euro")),
    ("IT", ("EUR", "€", "Euro")),
    ("ES", ("EUR", "€", "Euro")),
    ("CN", ("CNY", "¥", "Chinese Yuan")),
    ("JP", ("JPY", "¥", "Japanese Yen")),
    ("KR", ("KRW", "₩", "South Korean Won")),
    ("IN", ("INR", "₹", "Indian Rupee")),
    ("BR", ("BRL", "R$", "Brazilian Real")),
    ("AU", ("AUD", "A$", "Australian Dollar")),
    ("RU", ("RUB", "₽", "Russian Ruble")),
    ("MX", ("MXN", "$", "Mexican Peso")),
    ("NG", ("NGN", "₦", "Nigerian Naira")),
    ("SA", ("SAR", "ر.س", "Saudi Riyal")),
    ("AE", ("AED", "د.إ", "United Arab Emirates Dirham")),
];

/// Currency used in a country, USD when the country is not in the table.
pub fn currency_for_country(country_code: &str) -> Currency {
    let code = country_code.trim().to_ascii_uppercase();
    COUNTRY_CURRENCIES
        .iter()
        .find(|(country, _)| *country == code)
        .map(|(_, (code, symbol, name))| Currency::new(code, symbol, name))
        .unwrap_or_default()
}

/// Symbol for an ISO currency code, `$` when unknown.
pub fn currency_symbol(code: &str) -> &'static str {
    GLOBAL_CURRENCIES
        .iter()
        .chain(COUNTRY_CURRENCIES.iter().map(|(_, currency)| currency))
        .find(|(c, _, _)| *c == code)
        .map_or("$", |(_, symbol, _)| *symbol)
}

/// Fields we read from the ipapi.co JSON response. Everything is optional;
/// the service omits fields it cannot resolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpApiResponse {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationData {
    pub country: Option<String>,
    pub currency: Currency,
    /// `None` means the local system zone.
    pub timezone: Option<Tz>,
}

impl LocationData {
    /// Used when the lookup fails: US dollars, local time, no country.
    pub fn fallback() -> Self {
        Self {
            country: None,
            currency: Currency::usd(),
            timezone: None,
        }
    }

    pub fn from_ip_api(response: IpApiResponse) -> Self {
        let currency = response
            .country_code
            .as_deref()
            .map(currency_for_country)
            .unwrap_or_default();
        let timezone = response.timezone.as_deref().and_then(parse_timezone);
        Self {
            country: response.country_name.filter(|name| !name.trim().is_empty()),
            currency,
            timezone,
        }
    }
}

impl Default for LocationData {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Parses an IANA zone name, logging and returning `None` if unknown.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    match name.trim().parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(e) => {
            warn!("Unknown timezone {:?}, using local time: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_map_to_their_currency() {
        assert_eq!(currency_for_country("jp").code, "JPY");
        assert_eq!(currency_for_country("DE").symbol, "€");
        assert_eq!(currency_for_country("AE").name, "United Arab Emirates Dirham");
    }

    #[test]
    fn unknown_country_falls_back_to_usd() {
        assert_eq!(currency_for_country("ZZ"), Currency::usd());
        assert_eq!(currency_for_country(""), Currency::usd());
    }

    #[test]
    fn symbol_lookup() {
        assert_eq!(currency_symbol("GBP"), "£");
        assert_eq!(currency_symbol("KRW"), "₩");
        assert_eq!(currency_symbol("XYZ"), "$");
    }

    #[test]
    fn ip_api_response_is_mapped() {
        let response: IpApiResponse = serde_json::from_str(
            r#"{"ip":"1.2.3.4","country_code":"FR","country_name":"France","timezone":"Europe/Paris"}"#,
        )
        .unwrap();
        let location = LocationData::from_ip_api(response);
        assert_eq!(location.country.as_deref(), Some("France"));
        assert_eq!(location.currency.code, "EUR");
        assert_eq!(location.timezone, Some(chrono_tz::Europe::Paris));
    }

    #[test]
    fn partial_response_degrades_field_by_field() {
        let response: IpApiResponse =
            serde_json::from_str(r#"{"country_name":"","timezone":"Mars/Olympus"}"#).unwrap();
        let location = LocationData::from_ip_api(response);
        assert_eq!(location, LocationData::fallback());
    }
}
