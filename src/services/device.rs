//! Device classification from User-Agent strings
//!
//! A pure function over the request's User-Agent header: no state, no I/O.
//! Parsing is delegated to woothee; parsed names are normalized so the
//! platform rules below see stable values regardless of parser vocabulary
//! ("iPhone"/"iPad"/"iPod" become "iOS", "Mac OSX" becomes "Mac OS").

use woothee::parser::Parser;

/// Classification of a single request's user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub is_ios: bool,
    pub is_android: bool,
    pub is_desktop: bool,
    pub is_mobile: bool,
    pub browser: String,
    pub os: String,
    pub device_type: String,
}

/// User-Agent substrings identifying social crawlers and bots.
const CRAWLER_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "facebook",
    "twitter",
    "linkedin",
    "whatsapp",
];

/// Classify a raw User-Agent string.
///
/// Unknown or unparseable input defaults to browser/os "unknown" and
/// device type "desktop".
///
/// macOS user agents classify as iOS-eligible on purpose: desktop Safari
/// visits should take the app-link path where one is configured.
pub fn classify(user_agent: &str) -> DeviceInfo {
    let parser = Parser::new();
    let parsed = parser.parse(user_agent);

    let (browser, os, device_type) = match parsed {
        Some(result) => {
            let browser = if result.name == "UNKNOWN" || result.name.is_empty() {
                "unknown".to_string()
            } else {
                result.name.to_string()
            };
            let os = normalize_os(result.os);
            let device_type = normalize_device_type(result.category, result.os);
            (browser, os, device_type)
        }
        None => (
            "unknown".to_string(),
            "unknown".to_string(),
            "desktop".to_string(),
        ),
    };

    let os_lower = os.to_lowercase();
    let is_ios = os_lower.contains("ios") || os_lower.contains("mac os");
    let is_android = os_lower.contains("android");
    let is_desktop = device_type == "desktop" || (!is_ios && !is_android);
    let is_mobile = device_type == "mobile" || device_type == "tablet";

    DeviceInfo {
        is_ios,
        is_android,
        is_desktop,
        is_mobile,
        browser,
        os,
        device_type,
    }
}

/// Case-insensitive check against the fixed crawler marker set.
pub fn is_social_crawler(user_agent: &str) -> bool {
    let ua_lower = user_agent.to_lowercase();
    CRAWLER_MARKERS.iter().any(|m| ua_lower.contains(m))
}

fn normalize_os(os: &str) -> String {
    match os {
        "iPhone" | "iPad" | "iPod" => "iOS".to_string(),
        "Mac OSX" => "Mac OS".to_string(),
        "UNKNOWN" | "" => "unknown".to_string(),
        other => other.to_string(),
    }
}

fn normalize_device_type(category: &str, os: &str) -> String {
    match category {
        "pc" => "desktop".to_string(),
        "smartphone" if os == "iPad" => "tablet".to_string(),
        "smartphone" | "mobilephone" => "mobile".to_string(),
        _ => "desktop".to_string(),
    }
}
