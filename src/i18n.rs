/*
User-facing copy for the ShopMunim client.

This module provides:
- An embedded translations store for EN/HI (compile-time embedded JSON).
- A `tr` function to look up a translation by key with optional params.
- A `t` convenience wrapper using the default language (DEFAULT_LANG).

Usage:
    use crate::i18n;
    let msg = i18n::t("validation.shop_name_required");
    let ago = i18n::tr(Some("hi"), "time.minutes_ago", Some(&[("n", "5")]));

Notes:
- Placeholders use single-brace format: `{name}`.
- Default language is `en`. Keys missing in the requested language fall back
  to the default language, then to the key itself.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "en";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const EN_JSON: &str = r#"
{
  "app.name": "ShopMunim",
  "notifications.header": "RECENT UPDATES",
  "notifications.empty.title": "No notifications yet",
  "notifications.empty.subtitle": "Payment requests and updates from your shops will appear here",
  "notifications.default_title": "Payment Request",
  "time.just_now": "Just now",
  "time.minutes_ago": "{n}m ago",
  "time.hours_ago": "{n}h ago",
  "time.days_ago": "{n}d ago",
  "time.date": "{day} {month} {year}",
  "month.1": "Jan",
  "month.2": "Feb",
  "month.3": "Mar",
  "month.4": "Apr",
  "month.5": "May",
  "month.6": "Jun",
  "month.7": "Jul",
  "month.8": "Aug",
  "month.9": "Sep",
  "month.10": "Oct",
  "month.11": "Nov",
  "month.12": "Dec",
  "validation.shop_name_required": "Please enter shop name",
  "validation.shop_category_required": "Please select a category",
  "validation.shop_location_required": "Please enter shop location",
  "shop.created": "Shop created successfully",
  "shop.create_failed": "Failed to create shop. Please try again.",
  "preferences.push": "Push notifications",
  "preferences.payment_alerts": "Payment alerts",
  "preferences.promotions": "Promotions & offers",
  "preferences.all": "All notifications",
  "category.grocery": "Grocery",
  "category.medical": "Medical",
  "category.electronics": "Electronics",
  "category.clothing": "Clothing",
  "category.restaurant": "Restaurant",
  "category.other": "Other",
  "error.unsupported_language": "Unsupported language: {lang}"
}
"#;

const HI_JSON: &str = r#"
{
  "app.name": "ShopMunim",
  "notifications.header": "हाल के अपडेट",
  "notifications.empty.title": "अभी कोई सूचना नहीं",
  "notifications.empty.subtitle": "आपकी दुकानों से भुगतान अनुरोध और अपडेट यहाँ दिखेंगे",
  "notifications.default_title": "भुगतान अनुरोध",
  "time.just_now": "अभी अभी",
  "time.minutes_ago": "{n} मिनट पहले",
  "time.hours_ago": "{n} घंटे पहले",
  "time.days_ago": "{n} दिन पहले",
  "time.date": "{day} {month} {year}",
  "month.1": "जनवरी",
  "month.2": "फ़रवरी",
  "month.3": "मार्च",
  "month.4": "अप्रैल",
  "month.5": "मई",
  "month.6": "जून",
  "month.7": "जुलाई",
  "month.8": "अगस्त",
  "month.9": "सितंबर",
  "month.10": "अक्टूबर",
  "month.11": "नवंबर",
  "month.12": "दिसंबर",
  "validation.shop_name_required": "कृपया दुकान का नाम दर्ज करें",
  "validation.shop_category_required": "कृपया श्रेणी चुनें",
  "validation.shop_location_required": "कृपया दुकान का स्थान दर्ज करें",
  "shop.created": "दुकान सफलतापूर्वक बनाई गई",
  "shop.create_failed": "दुकान नहीं बन सकी। कृपया पुनः प्रयास करें।",
  "preferences.push": "पुश सूचनाएँ",
  "preferences.payment_alerts": "भुगतान अलर्ट",
  "preferences.promotions": "प्रचार और ऑफ़र",
  "preferences.all": "सभी सूचनाएँ",
  "category.grocery": "किराना",
  "category.medical": "दवा",
  "category.electronics": "इलेक्ट्रॉनिक्स",
  "category.clothing": "कपड़े",
  "category.restaurant": "रेस्टोरेंट",
  "category.other": "अन्य"
}
"#;

fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    let hi_map: HashMap<String, String> = serde_json::from_str(HI_JSON).unwrap_or_else(|e| {
        panic!("failed to parse HI_JSON in i18n module: {}", e);
    });
    out.insert("hi".to_string(), hi_map);

    out
}

fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "hi-IN" -> "hi").
pub fn normalize_language(lang: &str) -> String {
    lang.split(['-', '_'])
        .next()
        .unwrap_or(lang)
        .trim()
        .to_lowercase()
}

pub fn is_supported_language(lang: &str) -> bool {
    translations().contains_key(lang)
}

/// Translate `key` in `lang` (or DEFAULT_LANG when None), substituting `{name}`
/// placeholders from `params`.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.unwrap_or(DEFAULT_LANG);

    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .cloned()
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)).cloned())
        .unwrap_or_else(|| key.to_string());

    if let Some(params) = params {
        let mut s = val;
        for (k, v) in params {
            s = s.replace(&format!("{{{}}}", k), v);
        }
        s
    } else {
        val
    }
}

pub fn t(key: &str) -> String {
    tr(None, key, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_with_params() {
        assert_eq!(tr(None, "time.minutes_ago", Some(&[("n", "5")])), "5m ago");
        assert_eq!(
            tr(Some("hi"), "time.hours_ago", Some(&[("n", "2")])),
            "2 घंटे पहले"
        );
    }

    #[test]
    fn missing_hindi_key_falls_back_to_english() {
        let s = tr(Some("hi"), "error.unsupported_language", Some(&[("lang", "fr")]));
        assert_eq!(s, "Unsupported language: fr");
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        assert_eq!(tr(Some("fr"), "time.just_now", None), "Just now");
    }

    #[test]
    fn missing_key_returns_key() {
        let k = "non.existent.key";
        assert_eq!(t(k), k.to_string());
    }

    #[test]
    fn language_tags_are_normalized() {
        assert_eq!(normalize_language("hi-IN"), "hi");
        assert_eq!(normalize_language("EN_us"), "en");
        assert!(is_supported_language("hi"));
        assert!(!is_supported_language("fr"));
    }
}
