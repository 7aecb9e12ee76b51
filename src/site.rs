//! Compiled-in identity and endpoints for the client.

use crate::feed::FEED_USER;
use crate::telemetry::{LogLevel, Logger};

pub const OWNER_NAME: &str = "Mark Jeus Pagkaliwagan";
pub const OWNER_ROLE: &str = "Information Technology Student | Aspiring Full-Stack Developer";
pub const OWNER_LOCATION: &str = "Philippines";
pub const RESUME_PATH: &str = "/resume.pdf";

pub const FEED_ENDPOINT: &str = "/api/repos";
pub const FEED_PAGE_SIZE: u32 = 100;
pub const FEED_SORT: &str = "updated";
pub const FEED_DISPLAY_CAP: usize = 8;
pub const FEED_PLACEHOLDER_CARDS: usize = 6;

pub const COUNTER_BASE: &str = "https://api.countapi.xyz";
pub const COUNTER_NAMESPACE: &str = "portfolio-markjeus";
pub const COUNTER_KEY: &str = "visitors";
pub const COUNTER_POLL_INTERVAL_MS: u32 = 3_000;
pub const SESSION_VISITED_KEY: &str = "devfolio-visited";

pub const RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const RELAY_SERVICE_ID: &str = "service_8fz0swg";
pub const RELAY_TEMPLATE_ID: &str = "template_cys8wd2";
pub const RELAY_PUBLIC_KEY: &str = "ppysn2_4f0jRNDEDl";

pub const CLIENT_LOGGER: Logger = Logger::new(LogLevel::Info);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocialLink {
    pub label: &'static str,
    pub url: &'static str,
    pub glyph: &'static str,
}

pub const SOCIAL_LINKS: [SocialLink; 5] = [
    SocialLink {
        label: "Facebook",
        url: "https://www.facebook.com/share/1H33BtQhsk/",
        glyph: "f",
    },
    SocialLink {
        label: "Instagram",
        url: "https://www.instagram.com/yorr_mi",
        glyph: "◎",
    },
    SocialLink {
        label: "TikTok",
        url: "https://www.tiktok.com/@mosh.v",
        glyph: "♪",
    },
    SocialLink {
        label: "LinkedIn",
        url: "https://www.linkedin.com/in/mark-jeus-pagkaliwagan-b37482303/",
        glyph: "in",
    },
    SocialLink {
        label: "Email",
        url: "mailto:info.markpagkaliwagan@gmail.com",
        glyph: "✉",
    },
];

pub const TECHNOLOGIES: [&str; 12] = [
    "Python",
    "JavaScript",
    "HTML",
    "CSS",
    "Java",
    "C",
    "C++",
    "PHP",
    "SQL",
    "Kotlin",
    "Bash",
    "Dart",
];

pub fn feed_url() -> String {
    format!("{FEED_ENDPOINT}?per_page={FEED_PAGE_SIZE}&sort={FEED_SORT}")
}

pub fn profile_url() -> String {
    format!("https://github.com/{FEED_USER}")
}

pub fn counter_hit_url() -> String {
    format!("{COUNTER_BASE}/hit/{COUNTER_NAMESPACE}/{COUNTER_KEY}")
}

pub fn counter_get_url() -> String {
    format!("{COUNTER_BASE}/get/{COUNTER_NAMESPACE}/{COUNTER_KEY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_share_one_counter_key() {
        assert_eq!(
            counter_hit_url(),
            "https://api.countapi.xyz/hit/portfolio-markjeus/visitors"
        );
        assert_eq!(
            counter_get_url(),
            "https://api.countapi.xyz/get/portfolio-markjeus/visitors"
        );
    }

    #[test]
    fn feed_url_carries_page_size_and_sort_hint() {
        assert_eq!(feed_url(), "/api/repos?per_page=100&sort=updated");
    }
}
